//! The define table: macro name → replacement text, with layered provenance.
//!
//! Definitions come from several layers, ranked by [`Rank`]. Within the table a
//! name holds one entry and the last write always sets its value. The entry's
//! rank only moves up: a lower-ranked definition replaces the value but keeps
//! the rank already recorded.

use std::collections::BTreeMap;

use crate::error::{CompileError, Result};

/// Name of the built-in define that expands to the tool version.
pub const VERSION_DEFINE: &str = "__MUSHFORMAT_VERSION__";

/// Where a definition came from, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rank {
    /// Shipped with the tool.
    Builtin,
    /// Persistent defines store.
    File,
    /// `-D NAME=VALUE` on the command line.
    CommandLine,
    /// `#:DEFINE` in the source being compiled.
    Directive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefineEntry {
    pub value: String,
    pub rank: Rank,
}

/// Result of [`DefineTable::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The name was not defined before.
    Added,
    /// An existing definition was replaced; carries the old value.
    Replaced { previous: String, previous_rank: Rank },
    /// The value was replaced but the existing, higher rank was kept.
    ValueReplaced { previous: String, kept_rank: Rank },
}

/// Case-sensitive mapping from define name to replacement text.
#[derive(Debug, Clone, Default)]
pub struct DefineTable {
    entries: BTreeMap<String, DefineEntry>,
}

impl DefineTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table seeded with the built-in defines.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        table.entries.insert(
            VERSION_DEFINE.to_string(),
            DefineEntry {
                value: env!("CARGO_PKG_VERSION").to_string(),
                rank: Rank::Builtin,
            },
        );
        table
    }

    /// Insert or replace a definition. The value is always replaced; the
    /// recorded rank becomes the higher of the old and new ranks.
    ///
    /// Fails only for names that can never match anything (empty or containing
    /// whitespace).
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        rank: Rank,
    ) -> Result<InsertOutcome> {
        let name = name.into();
        validate_name(&name)?;
        let value = value.into();

        let (outcome, rank) = match self.entries.get(&name) {
            Some(existing) if existing.rank > rank => {
                tracing::debug!(
                    name = %name,
                    kept = ?existing.rank,
                    given = ?rank,
                    "Define value replaced below its recorded rank"
                );
                (
                    InsertOutcome::ValueReplaced {
                        previous: existing.value.clone(),
                        kept_rank: existing.rank,
                    },
                    existing.rank,
                )
            }
            Some(existing) => (
                InsertOutcome::Replaced {
                    previous: existing.value.clone(),
                    previous_rank: existing.rank,
                },
                rank,
            ),
            None => (InsertOutcome::Added, rank),
        };

        tracing::debug!(name = %name, value = %value, rank = ?rank, "Define set");
        self.entries.insert(name, DefineEntry { value, rank });
        Ok(outcome)
    }

    /// Seed a whole layer of definitions at one rank.
    pub fn extend_layer<I, K, V>(&mut self, rank: Rank, defines: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in defines {
            self.insert(name, value, rank)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&DefineEntry> {
        self.entries.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|e| e.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DefineEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Parse a `NAME=VALUE` pair as given on the command line. Both sides are trimmed.
pub fn parse_assignment(item: &str) -> Option<(String, String)> {
    let (name, value) = item.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CompileError::InvalidDefine {
            name: name.to_string(),
            reason: "name is empty",
        });
    }
    if name.chars().any(char::is_whitespace) {
        return Err(CompileError::InvalidDefine {
            name: name.to_string(),
            reason: "name contains whitespace",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_rank_replaces_lower() {
        let mut t = DefineTable::new();
        t.insert("JGO", "#10", Rank::File).unwrap();
        let out = t.insert("JGO", "#20", Rank::CommandLine).unwrap();
        assert_eq!(
            out,
            InsertOutcome::Replaced {
                previous: "#10".into(),
                previous_rank: Rank::File
            }
        );
        assert_eq!(t.value("JGO"), Some("#20"));
    }

    #[test]
    fn lower_rank_replaces_value_but_keeps_rank() {
        let mut t = DefineTable::new();
        t.insert("JGO", "#20", Rank::CommandLine).unwrap();
        let out = t.insert("JGO", "#10", Rank::File).unwrap();
        assert_eq!(
            out,
            InsertOutcome::ValueReplaced {
                previous: "#20".into(),
                kept_rank: Rank::CommandLine
            }
        );
        assert_eq!(t.value("JGO"), Some("#10"));
        assert_eq!(t.get("JGO").unwrap().rank, Rank::CommandLine);

        t.insert("JGO", "#11", Rank::File).unwrap();
        assert_eq!(t.value("JGO"), Some("#11"));
        assert_eq!(t.get("JGO").unwrap().rank, Rank::CommandLine);
    }

    #[test]
    fn equal_rank_overwrites() {
        let mut t = DefineTable::new();
        t.insert("A", "1", Rank::Directive).unwrap();
        t.insert("A", "2", Rank::Directive).unwrap();
        assert_eq!(t.value("A"), Some("2"));
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut t = DefineTable::new();
        t.insert("foo", "a", Rank::File).unwrap();
        t.insert("FOO", "b", Rank::File).unwrap();
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut t = DefineTable::new();
        assert!(matches!(
            t.insert("", "x", Rank::File),
            Err(CompileError::InvalidDefine { .. })
        ));
    }

    #[test]
    fn builtins_include_version() {
        let t = DefineTable::with_builtins();
        assert_eq!(t.value(VERSION_DEFINE), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn assignment_parsing() {
        assert_eq!(
            parse_assignment(" JGO = #123 "),
            Some(("JGO".to_string(), "#123".to_string()))
        );
        assert_eq!(parse_assignment("A=b=c"), Some(("A".into(), "b=c".into())));
        assert_eq!(parse_assignment("novalue"), None);
        assert_eq!(parse_assignment("=x"), None);
    }
}
