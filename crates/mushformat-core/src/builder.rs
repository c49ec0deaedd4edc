//! Logical line assembly.
//!
//! Holds at most one open logical line. Fragments are glued together with no
//! separator; the source was split across lines only for readability.

/// One command being assembled from several input lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    started_at: usize,
    fragments: Vec<String>,
}

impl LogicalLine {
    fn new(started_at: usize, first: String) -> Self {
        Self {
            started_at,
            fragments: vec![first],
        }
    }

    pub fn started_at(&self) -> usize {
        self.started_at
    }

    fn finish(self) -> String {
        self.fragments.concat()
    }
}

/// What happened to the open logical line on a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flushed {
    /// No logical line was open.
    Nothing,
    /// The line was emitted.
    Emitted,
    /// The line had no content and was dropped.
    Empty { started_at: usize },
}

/// Returned by [`LineBuilder::append`] when no logical line is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoOpenLine;

#[derive(Debug, Default)]
pub struct LineBuilder {
    current: Option<LogicalLine>,
    lines: Vec<String>,
}

impl LineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flush any open line, then open a new one seeded with `text`.
    pub fn start(&mut self, line: usize, text: String) -> Flushed {
        let flushed = self.flush();
        self.current = Some(LogicalLine::new(line, text));
        flushed
    }

    /// Glue `text` onto the end of the open line.
    pub fn append(&mut self, text: String) -> Result<(), NoOpenLine> {
        match self.current.as_mut() {
            Some(current) => {
                current.fragments.push(text);
                Ok(())
            }
            None => Err(NoOpenLine),
        }
    }

    /// Close the open line, emitting it unless it is empty.
    pub fn flush(&mut self) -> Flushed {
        let Some(current) = self.current.take() else {
            return Flushed::Nothing;
        };
        let started_at = current.started_at();
        let text = current.finish();
        if text.is_empty() {
            tracing::trace!(line = started_at, "Dropped empty logical line");
            return Flushed::Empty { started_at };
        }
        tracing::trace!(line = started_at, len = text.len(), "Emitted logical line");
        self.lines.push(text);
        Flushed::Emitted
    }

    /// Lines emitted so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
