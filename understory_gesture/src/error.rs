// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while parsing gesture names and options.

use alloc::string::String;

/// A gesture name or configuration option could not be understood.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The coordinate policy name is not one of the known policies.
    #[error("unknown coordinate policy `{0}`")]
    UnknownPosition(String),
    /// The gesture name is not a known gesture.
    #[error("unknown gesture `{0}`")]
    UnknownGesture(String),
    /// The option name is not recognized.
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    /// The option value does not parse for that option.
    #[error("invalid value `{value}` for option `{option}`")]
    InvalidValue {
        /// Option name.
        option: String,
        /// Offending value.
        value: String,
    },
}
