//! Diagnostic records collected while compiling.
//!
//! Non-fatal conditions are recorded and compilation continues, so a single run
//! reports as many problems as possible. Fatal conditions are recorded too,
//! right before the engine returns the matching [`CompileError`](crate::CompileError).

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// What kind of condition a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Continuation line with no open logical line (fatal).
    Structural,
    /// Input ended inside a quoted block (fatal).
    UnterminatedQuote,
    /// Directive keyword not recognised; the line is dropped.
    UnknownDirective,
    /// Recognised directive that this tool cannot act on; the line is dropped.
    UnsupportedDirective,
    /// Directive with missing or invalid arguments; the line is dropped.
    MalformedDirective,
    /// A define overwrote an earlier definition of the same name.
    Redefinition,
    /// Text following a `-` line break marker was thrown away.
    DiscardedText,
    /// A command came out empty (e.g. after substitution) and was not emitted.
    EmptyLine,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::Structural | DiagnosticKind::UnterminatedQuote => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

/// One `(line, severity, message)` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: usize, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            line,
            severity: kind.severity(),
            kind,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.severity, self.message)
    }
}
