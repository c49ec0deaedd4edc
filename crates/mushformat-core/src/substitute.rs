//! Macro substitution: replaces define names in content text with their values.
//!
//! All names are matched in one left-to-right scan. Where several names match
//! at the same position the longest wins, so `FOOBAR` is never split into
//! `FOO` + `BAR`. Replacement text is emitted as-is and never rescanned, which
//! keeps substitution terminating even for self-referencing defines.

use aho_corasick::{AhoCorasick, MatchKind};

use crate::defines::DefineTable;
use crate::error::Result;

/// A compiled snapshot of a [`DefineTable`], ready to rewrite text.
#[derive(Debug, Clone)]
pub struct Substitutor {
    matcher: Option<AhoCorasick>,
    values: Vec<String>,
}

impl Substitutor {
    pub fn new(table: &DefineTable) -> Result<Self> {
        if table.is_empty() {
            return Ok(Self {
                matcher: None,
                values: Vec::new(),
            });
        }
        let (names, values): (Vec<&str>, Vec<String>) = table
            .iter()
            .map(|(name, entry)| (name, entry.value.clone()))
            .unzip();
        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(names)?;
        Ok(Self {
            matcher: Some(matcher),
            values,
        })
    }

    /// Replace every occurrence of every defined name in `text`.
    pub fn apply(&self, text: &str) -> String {
        match &self.matcher {
            Some(matcher) => matcher.replace_all(text, &self.values),
            None => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defines::Rank;

    fn table(pairs: &[(&str, &str)]) -> DefineTable {
        let mut t = DefineTable::new();
        t.extend_layer(Rank::File, pairs.iter().copied()).unwrap();
        t
    }

    #[test]
    fn replaces_every_occurrence() {
        let s = Substitutor::new(&table(&[("FOO", "bar")])).unwrap();
        assert_eq!(s.apply("FOO and FOO"), "bar and bar");
    }

    #[test]
    fn longest_name_wins() {
        let s = Substitutor::new(&table(&[("FOO", "x"), ("FOOBAR", "y")])).unwrap();
        assert_eq!(s.apply("FOOBAR FOO"), "y x");
    }

    #[test]
    fn replacement_is_not_rescanned() {
        let s = Substitutor::new(&table(&[("A", "B"), ("B", "A")])).unwrap();
        assert_eq!(s.apply("AB"), "BA");
    }

    #[test]
    fn self_reference_terminates() {
        let s = Substitutor::new(&table(&[("X", "XX")])).unwrap();
        assert_eq!(s.apply("X"), "XX");
    }

    #[test]
    fn empty_table_is_identity() {
        let s = Substitutor::new(&DefineTable::new()).unwrap();
        assert_eq!(s.apply("anything"), "anything");
    }
}
