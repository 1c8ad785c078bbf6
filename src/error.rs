use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::model::MAX_SUBJECTS;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("student not found: {email}")]
    NotFound { email: String },

    #[error("student {email} is already enrolled in {} subjects", MAX_SUBJECTS)]
    LimitReached { email: String },

    #[error("student {email} would hold subject {id} twice")]
    DuplicateSubject { email: String, id: String },

    #[error("student already exists: {email}")]
    AlreadyExists { email: String },

    #[error("student record #{index} cannot be decoded: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode students document: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    /// Stable machine-readable code for front ends.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "not_found",
            StoreError::LimitReached { .. } => "limit_reached",
            StoreError::DuplicateSubject { .. } => "duplicate_subject",
            StoreError::AlreadyExists { .. } => "already_exists",
            StoreError::InvalidRecord { .. } => "invalid_record",
            StoreError::Io { .. } => "io_failed",
            StoreError::Encode(_) => "encode_failed",
        }
    }
}

/// Result of a credential check. Not an error: every variant is a normal answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Ok,
    /// Email or password blank after trimming.
    Empty,
    NoSuchStudent,
    BadPassword,
}

impl AuthOutcome {
    pub fn code(&self) -> &'static str {
        match self {
            AuthOutcome::Ok => "ok",
            AuthOutcome::Empty => "empty",
            AuthOutcome::NoSuchStudent => "no_such_student",
            AuthOutcome::BadPassword => "bad_password",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, AuthOutcome::Ok)
    }
}
