use thiserror::Error;

use crate::error::{ParseError, RuntimeError};

/// Why a calculation line of a document produced no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    /// The line classified as a calculation but did not parse under the
    /// configured limits.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Evaluation failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
