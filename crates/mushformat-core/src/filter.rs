//! Output line filtering -- keep only compiled commands matching a pattern.
//!
//! Patterns are regular expressions anchored at the start of the line, so
//! `&` keeps attribute sets and `@(create|set)` keeps object setup commands.
//!
//! # Examples
//!
//! ```
//! use mushformat_core::LineFilter;
//!
//! let filter = LineFilter::new("&").unwrap();
//! let lines = vec!["@create Box".to_string(), "&cmd Box=$go:think".to_string()];
//! assert_eq!(filter.apply(&lines), vec!["&cmd Box=$go:think"]);
//! ```

use regex::Regex;

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct LineFilter {
    regex: Regex,
}

impl LineFilter {
    /// Compile `pattern`, anchoring it at the start of the line.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})"))?;
        Ok(Self { regex })
    }

    pub fn matches(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    /// Lines that match, in their original order.
    pub fn apply<'a>(&self, lines: &'a [String]) -> Vec<&'a str> {
        lines
            .iter()
            .map(String::as_str)
            .filter(|line| self.matches(line))
            .collect()
    }
}

/// Filter `lines` by an optional pattern; `None` keeps everything.
pub fn filter_lines<'a>(lines: &'a [String], pattern: Option<&str>) -> Result<Vec<&'a str>> {
    match pattern {
        Some(pattern) => Ok(LineFilter::new(pattern)?.apply(lines)),
        None => Ok(lines.iter().map(String::as_str).collect()),
    }
}
