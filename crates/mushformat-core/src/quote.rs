//! Quoted block encoding.
//!
//! A quoted block keeps the exact spacing of its lines (ASCII art, tables),
//! which the target engine would otherwise collapse. Lines are joined with
//! [`LINE_SEPARATOR`], then runs of spaces are rewritten into tokens the
//! engine renders back as literal spaces:
//!
//! | run length | output                                   |
//! |------------|------------------------------------------|
//! | 1–2        | unchanged                                |
//! | 3–4        | one [`BLANK_PAIR`] per two spaces, plus a literal space if odd |
//! | 5+         | `[space(N)]`                             |

use crate::types::{BLANK_PAIR, ESCAPE, LINE_SEPARATOR};

/// Runs longer than this are emitted as a `[space(N)]` call.
const LONG_RUN: usize = 4;

/// Runs shorter than this are left as literal spaces.
const SHORT_RUN: usize = 3;

/// An open quoted block collecting its lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedBlock {
    opened_at: usize,
    segments: Vec<String>,
}

impl QuotedBlock {
    /// Start a block on line `opened_at` with the text after the opening quote.
    pub fn open(opened_at: usize, first: &str) -> Self {
        Self {
            opened_at,
            segments: vec![first.to_string()],
        }
    }

    /// Line number of the opening delimiter.
    pub fn opened_at(&self) -> usize {
        self.opened_at
    }

    pub fn push_line(&mut self, text: &str) {
        self.segments.push(text.to_string());
    }

    /// Close the block with the text before the closing quote and encode it.
    ///
    /// If `last` ends with the escape character it is dropped and the final
    /// segment is glued to the previous one without a separator.
    pub fn close(self, last: &str) -> String {
        let (last, glued) = match last.strip_suffix(ESCAPE) {
            Some(head) => (head, true),
            None => (last, false),
        };
        let mut joined = self.segments.join(LINE_SEPARATOR);
        if !glued {
            joined.push_str(LINE_SEPARATOR);
        }
        joined.push_str(last);
        compress_spaces(&joined)
    }
}

/// Encode a block that opens and closes on the same line.
pub fn encode_single_line(inner: &str) -> String {
    let inner = inner.strip_suffix(ESCAPE).unwrap_or(inner);
    compress_spaces(inner)
}

/// Rewrite runs of spaces per the table in the module docs.
pub fn compress_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    for ch in text.chars() {
        if ch == ' ' {
            run += 1;
            continue;
        }
        flush_run(run, &mut out);
        run = 0;
        out.push(ch);
    }
    flush_run(run, &mut out);
    out
}

fn flush_run(run: usize, out: &mut String) {
    match run {
        0 => {}
        n if n > LONG_RUN => out.push_str(&format!("[space({n})]")),
        n if n >= SHORT_RUN => {
            for _ in 0..n / 2 {
                out.push_str(BLANK_PAIR);
            }
            if n % 2 == 1 {
                out.push(' ');
            }
        }
        n => out.extend(std::iter::repeat_n(' ', n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_runs_untouched() {
        assert_eq!(compress_spaces("a b  c"), "a b  c");
    }

    #[test]
    fn three_and_four_use_blank_pairs() {
        assert_eq!(compress_spaces("a   b"), "a%b%b b");
        assert_eq!(compress_spaces("a    b"), "a%b%b%b%bb");
    }

    #[test]
    fn five_or_more_use_space_call() {
        assert_eq!(compress_spaces("a     b"), "a[space(5)]b");
        assert_eq!(compress_spaces("        x"), "[space(8)]x");
    }

    #[test]
    fn trailing_run_is_flushed() {
        assert_eq!(compress_spaces("x      "), "x[space(6)]");
    }

    #[test]
    fn lines_joined_with_separator() {
        let mut block = QuotedBlock::open(1, " /\\_/\\");
        block.push_line("( o.o )");
        assert_eq!(block.close(" > ^ <"), " /\\_/\\%r( o.o )%r > ^ <");
    }

    #[test]
    fn escape_glues_final_segment() {
        let block = QuotedBlock::open(1, "abc");
        assert_eq!(block.close("def\\"), "abcdef");
    }

    #[test]
    fn single_line_escape_is_dropped() {
        assert_eq!(encode_single_line("hi\\"), "hi");
        assert_eq!(encode_single_line(""), "");
    }
}
