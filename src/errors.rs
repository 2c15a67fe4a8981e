//! Typed error definitions for durable_write.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fs_ops::hint_for;

/// Caller misuse of the name generator. Never retried.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("length must be greater than 0")]
    ZeroLength,

    #[error("charset selection resolves to an empty character pool")]
    EmptyPool,
}

/// The write step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CreateTemp,
    Write,
    Sync,
    Close,
    SetPermissions,
    Rename,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::CreateTemp => "create temporary file",
            Step::Write => "write temporary file",
            Step::Sync => "fsync temporary file",
            Step::Close => "close temporary file",
            Step::SetPermissions => "set permissions",
            Step::Rename => "rename into place",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum AtomicWriteError {
    #[error(transparent)]
    ContractViolation(#[from] ContractViolation),

    #[error("target path has no file name: {}", .0.display())]
    InvalidTarget(PathBuf),

    #[error("{step} '{}': {source}{}", .path.display(), hint_for(.source))]
    Resource {
        step: Step,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "rename '{}' -> '{}' still locked after {attempts} attempts: {source}",
        .from.display(),
        .to.display()
    )]
    TransientLock {
        from: PathBuf,
        to: PathBuf,
        attempts: u32,
        #[source]
        source: io::Error,
    },

    #[error("serialize payload for '{}': {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("write to '{}' interrupted before it started", .0.display())]
    Interrupted(PathBuf),
}

impl AtomicWriteError {
    pub(crate) fn resource(step: Step, path: impl Into<PathBuf>, source: io::Error) -> Self {
        AtomicWriteError::Resource {
            step,
            path: path.into(),
            source,
        }
    }

    /// Stable numeric code for structured logs.
    pub fn code(&self) -> i32 {
        match self {
            AtomicWriteError::ContractViolation(_) => 10,
            AtomicWriteError::InvalidTarget(_) => 11,
            AtomicWriteError::Resource { .. } => 20,
            AtomicWriteError::TransientLock { .. } => 21,
            AtomicWriteError::Serialize { .. } => 30,
            AtomicWriteError::Interrupted(_) => 130,
        }
    }

    /// Step that failed, when the error came from the write protocol.
    pub fn step(&self) -> Option<Step> {
        match self {
            AtomicWriteError::Resource { step, .. } => Some(*step),
            AtomicWriteError::TransientLock { .. } => Some(Step::Rename),
            _ => None,
        }
    }
}
