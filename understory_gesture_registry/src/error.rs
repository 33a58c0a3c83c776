// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration errors.

use alloc::string::String;

use understory_gesture::ParseError;

/// A registration could not be made.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The event name list is empty.
    #[error("no event name given")]
    EmptyName,
    /// The selector is empty.
    #[error("empty selector")]
    EmptySelector,
    /// The element list is empty.
    #[error("no target given")]
    NoTarget,
    /// The selector matched no element.
    #[error("selector `{0}` matches no element")]
    NoMatch(String),
    /// A bulk registration lists no events.
    #[error("bulk registration lists no events")]
    EmptySpec,
    /// An option name or value did not parse.
    #[error(transparent)]
    Option(#[from] ParseError),
}
