// Copyright 2022 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Implementation of the [`Error`] type returned by record and role
//! operations.

use std::fmt;

use crate::rr::UnknownTypeError;
use crate::store;
use crate::validate::ValidationError;

/// The error type of record and role operations.
///
/// Each variant corresponds to one way a request can fail, and so to
/// one kind of response: the actor is not permitted to perform the
/// operation, the request itself is wrong, or something failed on the
/// server side. The message of an internal error is a generic
/// description of what failed; the underlying cause is available
/// through [`std::error::Error::source`] for logging, and should not be
/// shown to clients.
#[derive(Debug)]
pub enum Error {
    Forbidden(String),
    BadRequest(String),
    Internal {
        context: &'static str,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// The kind of an [`Error`], without its details.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    Forbidden,
    BadRequest,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub(crate) fn internal(
        context: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Internal {
            context,
            source: source.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Forbidden(message) | Self::BadRequest(message) => f.write_str(message),
            Self::Internal { context, .. } => f.write_str(context),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Internal { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<store::Error> for Error {
    fn from(e: store::Error) -> Self {
        Self::internal("failed to access database", e)
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<UnknownTypeError> for Error {
    fn from(e: UnknownTypeError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn internal_errors_hide_their_cause() {
        let error = Error::internal("failed to write record to database", store::Error::Poisoned);
        assert_eq!(error.kind(), ErrorKind::Internal);
        assert_eq!(error.to_string(), "failed to write record to database");
        assert_eq!(
            error.source().unwrap().to_string(),
            "store lock was poisoned",
        );
    }

    #[test]
    fn request_errors_carry_their_message() {
        let error = Error::from(ValidationError::Missing("host"));
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.to_string(), "field 'host' is required");
        assert!(error.source().is_none());
    }
}
