// Copyright © 2026 mailmirror.dev
// Licensed under the MailMirror License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::raise_error;
use bb8::RunError;
use code::ErrorCode;
use snafu::{Location, Snafu};

pub mod code;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum MailMirrorError {
    #[snafu(display("{message}"))]
    Generic {
        message: String,
        #[snafu(implicit)]
        location: Location,
        code: ErrorCode,
    },
}

pub type MailMirrorResult<T, E = MailMirrorError> = std::result::Result<T, E>;

impl From<RunError<MailMirrorError>> for MailMirrorError {
    fn from(e: RunError<MailMirrorError>) -> Self {
        match e {
            RunError::User(e) => e,
            RunError::TimedOut => raise_error!(
                "Timed out while attempting to acquire a connection from the pool".into(),
                ErrorCode::ConnectionPoolTimeout
            ),
        }
    }
}

impl MailMirrorError {
    pub fn code(&self) -> ErrorCode {
        match self {
            MailMirrorError::Generic { code, .. } => *code,
        }
    }
}
