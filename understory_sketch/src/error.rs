// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sketch errors.

use alloc::string::{String, ToString};

/// A recording could not be stored or loaded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SketchError {
    /// The recording could not be written as JSON.
    #[error("cannot encode recording: {0}")]
    Encode(String),
    /// The input is not a valid recording.
    #[error("malformed recording: {0}")]
    Decode(String),
}

impl SketchError {
    pub(crate) fn encode(err: &serde_json::Error) -> Self {
        Self::Encode(err.to_string())
    }

    pub(crate) fn decode(err: &serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
