//! Error types for cantis.

use crate::codebase::CodebaseError;
use crate::output::{FormatError, OutputError};
use crate::sink::SinkError;
use crate::walker::WalkError;

/// Top-level error type for cantis operations.
#[derive(Debug, thiserror::Error)]
pub enum CantisError {
    #[error(transparent)]
    Codebase(#[from] CodebaseError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Map an error to its exit code.
///
/// Code 2 is left to clap, which uses it for usage errors.
pub fn exit_code(error: &CantisError) -> i32 {
    match error {
        CantisError::Format(_) => 6,
        CantisError::Codebase(CodebaseError::NotFound { .. }) => 3,
        CantisError::Codebase(CodebaseError::Walk(WalkError::NotFound { .. })) => 3,
        CantisError::Codebase(CodebaseError::Walk(WalkError::PermissionDenied { .. })) => 3,
        CantisError::Codebase(CodebaseError::Parse { .. }) => 4,
        CantisError::Sink(_) => 5,
        CantisError::Codebase(CodebaseError::Read { .. }) => 1,
        CantisError::Codebase(CodebaseError::Walk(_)) => 1,
        CantisError::Output(_) => 1,
    }
}
