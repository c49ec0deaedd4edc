//! The compile engine: a single pass over input lines producing one output
//! line per command.
//!
//! ```text
//! raw line ─ tab expansion ─ classify ─┬─ directive ──────────── define table
//!                                      ├─ quote delimiter/body ─ quoted block ─┐
//!                                      └─ content/continuation ─ substitute ───┴─ line builder
//! ```
//!
//! The engine is a fold: feed lines in order with [`Compiler::feed`], then call
//! [`Compiler::finish`] to flush the last command. Stopping early is the same
//! as reaching end of input.
//!
//! # Example
//! ```
//! use mushformat_core::{compile, DefineTable};
//!
//! let source = "#:DEFINE OBJ #42\n&cmd OBJ=$hi:\n    @pemit %#=Hello!\n";
//! let out = compile(source, DefineTable::new()).unwrap();
//! assert_eq!(out.lines, vec!["&cmd #42=$hi:@pemit %#=Hello!"]);
//! ```

use crate::builder::{Flushed, LineBuilder};
use crate::classify::{classify, LineKind, Mode, QuoteEdge};
use crate::defines::{DefineTable, InsertOutcome, Rank};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::directive::{self, Directive, DirectiveError};
use crate::error::{CompileError, Result};
use crate::quote::{encode_single_line, QuotedBlock};
use crate::substitute::Substitutor;
use crate::types::{RawLine, TRAILING_COMMENT};

/// Result of a successful compilation.
#[derive(Debug, Clone)]
pub struct Compiled {
    /// One entry per command, without line terminators.
    pub lines: Vec<String>,
    /// Warnings collected along the way.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of input lines consumed.
    pub input_lines: usize,
    /// The define table as it stood at end of input.
    pub defines: DefineTable,
}

#[derive(Debug)]
enum State {
    Normal,
    Quoted(QuotedBlock),
}

impl State {
    fn mode(&self) -> Mode {
        match self {
            State::Normal => Mode::Normal,
            State::Quoted(_) => Mode::InsideQuote,
        }
    }
}

/// Incremental compiler over one input stream.
///
/// After `feed` or `finish` returns an error the stream is aborted: every later
/// call fails with [`CompileError::Aborted`] naming the original line. The
/// diagnostics gathered so far remain available through
/// [`diagnostics`](Self::diagnostics).
#[derive(Debug)]
pub struct Compiler {
    defines: DefineTable,
    substitutor: Option<Substitutor>,
    state: State,
    builder: LineBuilder,
    diagnostics: Vec<Diagnostic>,
    lines_read: usize,
    aborted_at: Option<usize>,
}

impl Compiler {
    /// Start a run with a table already seeded from the outer layers
    /// (built-ins, defines store, command line).
    pub fn new(defines: DefineTable) -> Self {
        Self {
            defines,
            substitutor: None,
            state: State::Normal,
            builder: LineBuilder::new(),
            diagnostics: Vec::new(),
            lines_read: 0,
            aborted_at: None,
        }
    }

    /// Feed the next line of text, numbering it after the lines already read.
    pub fn feed_str(&mut self, text: &str) -> Result<()> {
        let line = RawLine::new(self.lines_read + 1, text);
        self.feed(&line)
    }

    /// Feed one line.
    pub fn feed(&mut self, line: &RawLine) -> Result<()> {
        self.check_aborted()?;
        let result = self.feed_line(line);
        if let Err(err) = &result {
            self.aborted_at = Some(err.line().unwrap_or(line.number));
        }
        result
    }

    fn feed_line(&mut self, line: &RawLine) -> Result<()> {
        self.lines_read += 1;
        let classified = classify(line, self.state.mode());
        let number = classified.number;
        let payload = classified.payload;

        match classified.kind {
            LineKind::Blank | LineKind::Comment => {
                tracing::trace!(line = number, kind = ?classified.kind, "Skipped line");
            }
            LineKind::Directive => self.apply_directive(number, payload),
            LineKind::LineBreak => {
                let flushed = self.builder.flush();
                self.report_flush(flushed);
                if !payload.trim().is_empty() {
                    self.warn(
                        number,
                        DiagnosticKind::DiscardedText,
                        format!("text after '-' line break was discarded: {:?}", payload.trim()),
                    );
                }
            }
            LineKind::QuoteDelimiter(QuoteEdge::Open) => {
                let flushed = self.builder.flush();
                self.report_flush(flushed);
                self.state = State::Quoted(QuotedBlock::open(number, payload));
            }
            LineKind::QuoteDelimiter(QuoteEdge::OpenClose) => {
                self.emit_standalone(number, encode_single_line(payload));
            }
            LineKind::QuoteDelimiter(QuoteEdge::Close) => {
                if let State::Quoted(block) = std::mem::replace(&mut self.state, State::Normal) {
                    let opened_at = block.opened_at();
                    self.emit_standalone(opened_at, block.close(payload));
                }
            }
            LineKind::Content => {
                if let State::Quoted(block) = &mut self.state {
                    block.push_line(payload);
                } else {
                    let text = self.prepare(payload)?;
                    let flushed = self.builder.start(number, text);
                    self.report_flush(flushed);
                }
            }
            LineKind::Continuation => {
                let text = self.prepare(payload)?;
                if self.builder.append(text).is_err() {
                    return Err(self.fatal(
                        CompileError::OrphanContinuation { line: number },
                        DiagnosticKind::Structural,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Signal end of input: flush the open command, or fail if a quoted block
    /// is still open.
    pub fn finish(&mut self) -> Result<()> {
        self.check_aborted()?;
        if let State::Quoted(block) = &self.state {
            let line = block.opened_at();
            self.aborted_at = Some(line);
            return Err(self.fatal(
                CompileError::UnterminatedQuote { line },
                DiagnosticKind::UnterminatedQuote,
            ));
        }
        let flushed = self.builder.flush();
        self.report_flush(flushed);
        tracing::debug!(
            input_lines = self.lines_read,
            output_lines = self.builder.lines().len(),
            warnings = self.diagnostics.len(),
            "Compilation finished"
        );
        Ok(())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn defines(&self) -> &DefineTable {
        &self.defines
    }

    /// Commands emitted so far.
    pub fn lines(&self) -> &[String] {
        self.builder.lines()
    }

    pub fn into_compiled(self) -> Compiled {
        Compiled {
            lines: self.builder.into_lines(),
            diagnostics: self.diagnostics,
            input_lines: self.lines_read,
            defines: self.defines,
        }
    }

    fn check_aborted(&self) -> Result<()> {
        match self.aborted_at {
            Some(line) => Err(CompileError::Aborted { line }),
            None => Ok(()),
        }
    }

    fn apply_directive(&mut self, number: usize, body: &str) {
        match directive::parse(body) {
            Ok(Directive::Define { name, value }) => {
                match self.defines.insert(name, value, Rank::Directive) {
                    Ok(
                        InsertOutcome::Replaced { previous, .. }
                        | InsertOutcome::ValueReplaced { previous, .. },
                    ) => {
                        self.warn(
                            number,
                            DiagnosticKind::Redefinition,
                            format!("'{name}' redefined (was {previous:?})"),
                        );
                    }
                    Ok(_) => {}
                    Err(err) => {
                        self.warn(number, DiagnosticKind::MalformedDirective, err.to_string());
                        return;
                    }
                }
                self.substitutor = None;
            }
            Ok(Directive::Search { name, .. }) => {
                self.warn(
                    number,
                    DiagnosticKind::UnsupportedDirective,
                    format!("SEARCH for '{name}' is only performed when installing; ignored"),
                );
            }
            Err(DirectiveError::Empty) => {
                self.warn(number, DiagnosticKind::UnknownDirective, "empty directive ignored");
            }
            Err(DirectiveError::Unknown(keyword)) => {
                self.warn(
                    number,
                    DiagnosticKind::UnknownDirective,
                    format!("unknown directive '{keyword}' ignored"),
                );
            }
            Err(DirectiveError::Malformed { keyword, usage }) => {
                self.warn(
                    number,
                    DiagnosticKind::MalformedDirective,
                    format!("{keyword} directive is missing arguments (usage: {usage})"),
                );
            }
        }
    }

    /// Substitute defines, drop any trailing `#//` comment and trailing blanks.
    fn prepare(&mut self, payload: &str) -> Result<String> {
        let substitutor = match self.substitutor.take() {
            Some(s) => s,
            None => Substitutor::new(&self.defines)?,
        };
        let mut text = substitutor.apply(payload);
        self.substitutor = Some(substitutor);
        if let Some(idx) = text.find(TRAILING_COMMENT) {
            text.truncate(idx);
        }
        let len = text.trim_end().len();
        text.truncate(len);
        Ok(text)
    }

    /// A quoted block is always a command of its own.
    fn emit_standalone(&mut self, number: usize, text: String) {
        let flushed = self.builder.start(number, text);
        self.report_flush(flushed);
        let flushed = self.builder.flush();
        self.report_flush(flushed);
    }

    fn report_flush(&mut self, flushed: Flushed) {
        if let Flushed::Empty { started_at } = flushed {
            self.warn(
                started_at,
                DiagnosticKind::EmptyLine,
                "command is empty and was not emitted",
            );
        }
    }

    fn warn(&mut self, line: usize, kind: DiagnosticKind, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(line, kind, message);
        tracing::debug!(%diagnostic, "Diagnostic recorded");
        self.diagnostics.push(diagnostic);
    }

    fn fatal(&mut self, error: CompileError, kind: DiagnosticKind) -> CompileError {
        let line = error.line().unwrap_or(self.lines_read);
        self.diagnostics
            .push(Diagnostic::new(line, kind, error.to_string()));
        error
    }
}

/// Compile a whole source text in one call.
pub fn compile(source: &str, defines: DefineTable) -> Result<Compiled> {
    compile_lines(source.lines(), defines)
}

/// Compile an ordered sequence of lines (already combined from all sources).
pub fn compile_lines<I, S>(lines: I, defines: DefineTable) -> Result<Compiled>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut compiler = Compiler::new(defines);
    for line in lines {
        compiler.feed_str(line.as_ref())?;
    }
    compiler.finish()?;
    Ok(compiler.into_compiled())
}
