//! In-source directives (`#:KEYWORD args...`).
//!
//! Directives configure the conversion and never produce output. Keywords are
//! case-insensitive.

/// A parsed directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `#:DEFINE name value...`; the value is the rest of the line, verbatim.
    Define { name: &'a str, value: &'a str },
    /// `#:SEARCH name query...`; only meaningful when installing to a live server.
    Search { name: &'a str, query: &'a str },
}

/// Why a directive line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError<'a> {
    /// Nothing after the marker.
    Empty,
    /// Keyword not recognised.
    Unknown(&'a str),
    /// Keyword recognised, arguments missing.
    Malformed { keyword: &'static str, usage: &'static str },
}

/// Parse the body of a directive (the text after `#:`).
pub fn parse(body: &str) -> Result<Directive<'_>, DirectiveError<'_>> {
    let (keyword, rest) = split_word(body);
    if keyword.is_empty() {
        return Err(DirectiveError::Empty);
    }

    if keyword.eq_ignore_ascii_case("define") {
        let (name, value) = split_word(rest);
        if name.is_empty() {
            return Err(DirectiveError::Malformed {
                keyword: "DEFINE",
                usage: "#:DEFINE NAME VALUE",
            });
        }
        return Ok(Directive::Define { name, value });
    }

    if keyword.eq_ignore_ascii_case("search") {
        let (name, query) = match split_word(rest).0.find('=') {
            Some(eq) => (&rest[..eq], rest[eq + 1..].trim_start_matches(BLANKS)),
            None => split_word(rest),
        };
        if name.is_empty() || query.is_empty() {
            return Err(DirectiveError::Malformed {
                keyword: "SEARCH",
                usage: "#:SEARCH NAME=QUERY",
            });
        }
        return Ok(Directive::Search { name, query });
    }

    Err(DirectiveError::Unknown(keyword))
}

const BLANKS: [char; 2] = [' ', '\t'];

/// Split off the first blank-delimited word. The remainder keeps its inner
/// spacing; only the separating run of blanks is removed.
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start_matches(BLANKS);
    match text.find(BLANKS) {
        Some(idx) => (&text[..idx], text[idx..].trim_start_matches(BLANKS)),
        None => (text, ""),
    }
}
