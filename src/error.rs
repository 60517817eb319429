// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Crate-level error type and `Result` alias.
//!
//! Every operation in this crate is a pure transform, so there are
//! only two ways to fail: the caller handed us something we can't
//! carve, or our own bookkeeping went wrong.  Neither is worth
//! retrying.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The caller must correct the named parameter.
    #[error("invalid input: {param}: {reason}")]
    InvalidInput { param: &'static str, reason: String },

    /// A bug in the carver; the same input will fail the same way.
    #[error("internal invariant violated: {invariant}: {detail}")]
    InternalInvariantViolation {
        invariant: &'static str,
        detail: String,
    },
}

impl Error {
    pub fn invalid<R: Into<String>>(param: &'static str, reason: R) -> Self {
        Error::InvalidInput {
            param,
            reason: reason.into(),
        }
    }

    pub fn invariant<D: Into<String>>(invariant: &'static str, detail: D) -> Self {
        Error::InternalInvariantViolation {
            invariant,
            detail: detail.into(),
        }
    }

    /// True for errors the caller can fix by changing the request.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput { .. })
    }
}
