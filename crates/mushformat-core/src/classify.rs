//! Line classification.
//!
//! Each input line gets exactly one [`LineKind`], decided only by its own
//! (tab-expanded) content and whether a quoted block is currently open. Prior
//! output never influences the outcome.
//!
//! Normal-mode rules, first match wins:
//!
//! 1. `#:` prefix → directive
//! 2. empty or whitespace-only → blank
//! 3. `#` or `@@` prefix, or `#//` as the first non-blank text → comment
//! 4. `-` prefix → line break
//! 5. `"` prefix → quote delimiter (opens a block; may also close it)
//! 6. non-whitespace first column → content (starts a new command)
//! 7. leading whitespace → continuation of the current command
//!
//! Inside a quoted block every line is block content, except a non-empty line
//! ending in `"`, which closes the block.

use crate::types::{RawLine, DIRECTIVE_MARKER, QUOTE, TRAILING_COMMENT};

/// Whether a quoted block is open at the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    InsideQuote,
}

/// Which boundary of a quoted block a delimiter line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteEdge {
    /// Starts a block that continues on following lines.
    Open,
    /// Ends the open block.
    Close,
    /// Starts and ends a block on a single line.
    OpenClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Directive,
    QuoteDelimiter(QuoteEdge),
    LineBreak,
    Continuation,
    Content,
}

impl LineKind {
    /// Lines that are dropped without touching logical line boundaries.
    pub fn is_discarded(self) -> bool {
        matches!(self, LineKind::Blank | LineKind::Comment)
    }
}

/// A line with its kind and the text relevant to that kind.
///
/// `payload` is:
/// - directive: the raw (not tab-expanded) text after `#:`
/// - line break: whatever follows the `-`
/// - quote delimiter: the text with the delimiting quote(s) removed
/// - continuation: the text with leading whitespace removed
/// - content: the whole expanded line
/// - blank / comment: the whole expanded line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    pub number: usize,
    pub kind: LineKind,
    pub payload: &'a str,
}

/// Classify one line under the given mode.
pub fn classify(line: &RawLine, mode: Mode) -> ClassifiedLine<'_> {
    let (kind, payload) = match mode {
        Mode::InsideQuote => classify_quoted(&line.expanded),
        Mode::Normal => classify_normal(line),
    };
    ClassifiedLine {
        number: line.number,
        kind,
        payload,
    }
}

fn classify_quoted(text: &str) -> (LineKind, &str) {
    match text.strip_suffix(QUOTE) {
        Some(inner) => (LineKind::QuoteDelimiter(QuoteEdge::Close), inner),
        None => (LineKind::Content, text),
    }
}

fn classify_normal(line: &RawLine) -> (LineKind, &str) {
    if let Some(body) = line.text.strip_prefix(DIRECTIVE_MARKER) {
        return (LineKind::Directive, body);
    }

    let text = line.expanded.as_str();
    let stripped = text.trim_start();

    if stripped.trim_end().is_empty() {
        return (LineKind::Blank, text);
    }
    if text.starts_with('#') || text.starts_with("@@") || stripped.starts_with(TRAILING_COMMENT) {
        return (LineKind::Comment, text);
    }
    if let Some(rest) = text.strip_prefix('-') {
        return (LineKind::LineBreak, rest);
    }
    if let Some(rest) = text.strip_prefix(QUOTE) {
        return match rest.strip_suffix(QUOTE) {
            Some(inner) => (LineKind::QuoteDelimiter(QuoteEdge::OpenClose), inner),
            None => (LineKind::QuoteDelimiter(QuoteEdge::Open), rest),
        };
    }
    if stripped.len() == text.len() {
        (LineKind::Content, text)
    } else {
        (LineKind::Continuation, stripped)
    }
}
