//! Combining source files into the single line stream the compiler reads.
//!
//! Files are concatenated in the order given (each glob pattern's matches in
//! sorted order). Line numbers reported by the compiler refer to the combined
//! stream; [`SourceSet::locate`] maps them back to a file and local line.

use anyhow::{bail, Context, Result};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
struct SourceFile {
    name: String,
    /// 1-based line number of this file's first line in the combined stream.
    first_line: usize,
    line_count: usize,
    /// Size of the file as read, before decoding.
    byte_len: usize,
}

#[derive(Debug, Default)]
pub struct SourceSet {
    lines: Vec<String>,
    files: Vec<SourceFile>,
}

impl SourceSet {
    /// Expand `patterns` relative to `base` and read every matching file.
    pub fn from_patterns(patterns: &[String], base: &Path) -> Result<Self> {
        let mut set = Self::default();
        for path in expand_patterns(patterns, base)? {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            set.push(path.display().to_string(), bytes);
        }
        Ok(set)
    }

    pub fn from_stdin() -> Result<Self> {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read from stdin")?;
        let mut set = Self::default();
        set.push("<stdin>".to_string(), buf);
        Ok(set)
    }

    /// Append one file's raw contents to the stream.
    pub fn push(&mut self, name: String, bytes: Vec<u8>) {
        let byte_len = bytes.len();
        let text = decode(bytes, &name);
        let before = self.lines.len();
        self.lines.extend(text.lines().map(str::to_owned));
        self.files.push(SourceFile {
            name,
            first_line: before + 1,
            line_count: self.lines.len() - before,
            byte_len,
        });
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Total size of all sources as read.
    pub fn byte_len(&self) -> usize {
        self.files.iter().map(|f| f.byte_len).sum()
    }

    /// Map a combined-stream line number to `(file name, line within file)`.
    pub fn locate(&self, line: usize) -> Option<(&str, usize)> {
        self.files
            .iter()
            .find(|f| line >= f.first_line && line < f.first_line + f.line_count)
            .map(|f| (f.name.as_str(), line - f.first_line + 1))
    }

    /// `file:line` for diagnostics, falling back to the bare number.
    pub fn describe(&self, line: usize) -> String {
        match self.locate(line) {
            Some((name, local)) => format!("{name}:{local}"),
            None => format!("line {line}"),
        }
    }
}

/// Expand glob patterns; a pattern that matches nothing is an error.
pub fn expand_patterns(patterns: &[String], base: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let full = if Path::new(pattern).is_absolute() {
            PathBuf::from(pattern)
        } else {
            base.join(pattern)
        };
        let full = full.to_string_lossy();
        let mut matched: Vec<PathBuf> = glob::glob(&full)
            .with_context(|| format!("Invalid source pattern: {pattern}"))?
            .collect::<std::result::Result<_, _>>()
            .with_context(|| format!("Failed to expand source pattern: {pattern}"))?;
        if matched.is_empty() {
            bail!("No source files match: {pattern}");
        }
        matched.sort();
        tracing::debug!(pattern = %pattern, files = matched.len(), "Expanded source pattern");
        paths.extend(matched);
    }
    Ok(paths)
}

/// UTF-8 if valid, otherwise Latin-1 (every byte maps to one char).
fn decode(bytes: Vec<u8>, name: &str) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(file = %name, "Source is not valid UTF-8, reading as Latin-1");
            err.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_maps_back_to_files() {
        let mut set = SourceSet::default();
        set.push("a.mush".into(), b"one\ntwo\n".to_vec());
        set.push("b.mush".into(), b"three\n".to_vec());
        assert_eq!(set.lines(), ["one", "two", "three"]);
        assert_eq!(set.locate(2), Some(("a.mush", 2)));
        assert_eq!(set.locate(3), Some(("b.mush", 1)));
        assert_eq!(set.locate(4), None);
        assert_eq!(set.describe(3), "b.mush:1");
        assert_eq!(set.describe(9), "line 9");
    }

    #[test]
    fn empty_file_takes_no_lines() {
        let mut set = SourceSet::default();
        set.push("empty".into(), Vec::new());
        set.push("b".into(), b"x".to_vec());
        assert_eq!(set.locate(1), Some(("b", 1)));
        assert_eq!(set.file_count(), 2);
    }

    #[test]
    fn byte_len_counts_raw_file_size() {
        let mut set = SourceSet::default();
        set.push("crlf".into(), b"one\r\ntwo\r\n".to_vec());
        set.push("unterminated".into(), b"three".to_vec());
        assert_eq!(set.lines(), ["one", "two", "three"]);
        assert_eq!(set.byte_len(), 10 + 5);
    }

    #[test]
    fn latin1_fallback() {
        assert_eq!(decode(vec![b'c', b'a', b'f', 0xE9], "t"), "caf\u{e9}");
    }

    #[test]
    fn patterns_expand_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.mush"), "B\n").unwrap();
        std::fs::write(dir.path().join("a.mush"), "A\n").unwrap();
        let set = SourceSet::from_patterns(&["*.mush".to_string()], dir.path()).unwrap();
        assert_eq!(set.lines(), ["A", "B"]);
    }

    #[test]
    fn unmatched_pattern_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = expand_patterns(&["missing.mush".to_string()], dir.path()).unwrap_err();
        assert!(err.to_string().contains("missing.mush"));
    }
}
