//! Error types for compilation and output filtering.

use thiserror::Error;

/// Errors that stop compilation of the current input stream.
///
/// Every variant that refers to the input carries the 1-based line number of
/// the offending line so callers can map it back to a source file.
#[derive(Error, Debug)]
pub enum CompileError {
    /// An indented (continuation) line arrived with no open logical line to extend.
    #[error("line {line}: continuation line has no command to continue")]
    OrphanContinuation { line: usize },

    /// Input ended while a quoted block was still open.
    #[error("line {line}: quoted block opened here is never closed")]
    UnterminatedQuote { line: usize },

    /// The stream already failed; no further input is accepted.
    #[error("line {line}: input was abandoned after an earlier error")]
    Aborted { line: usize },

    /// A define name cannot be used for substitution.
    #[error("invalid define name {name:?}: {reason}")]
    InvalidDefine { name: String, reason: &'static str },

    /// The substitution automaton could not be built from the define table.
    #[error("failed to build define matcher: {0}")]
    Matcher(#[from] aho_corasick::BuildError),

    /// An output line filter pattern was not a valid regular expression.
    #[error("invalid match pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl CompileError {
    /// Line number the error refers to, if it is tied to the input.
    pub fn line(&self) -> Option<usize> {
        match self {
            CompileError::OrphanContinuation { line }
            | CompileError::UnterminatedQuote { line }
            | CompileError::Aborted { line } => Some(*line),
            _ => None,
        }
    }
}

/// Convenience alias used throughout mushformat-core.
pub type Result<T> = std::result::Result<T, CompileError>;
