//! Input line representation and the fixed tokens of the compact output format.

/// Column width of a tab stop.
pub const TAB_WIDTH: usize = 8;

/// Marks the start of an in-source directive line.
pub const DIRECTIVE_MARKER: &str = "#:";

/// Starts a trailing comment on content and continuation lines.
pub const TRAILING_COMMENT: &str = "#//";

/// Delimits quoted blocks.
pub const QUOTE: char = '"';

/// Placed before a closing quote to glue the final segment without a separator.
pub const ESCAPE: char = '\\';

/// Joins the lines of a quoted block (a newline in the target engine).
pub const LINE_SEPARATOR: &str = "%r";

/// Stands for two spaces inside compressed quoted text.
pub const BLANK_PAIR: &str = "%b%b";

/// One physical input line, kept alongside its tab-expanded form.
///
/// `number` is 1-based and refers to the position in the combined input stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub number: usize,
    pub text: String,
    pub expanded: String,
}

impl RawLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        let text = text.strip_suffix('\r').map(str::to_owned).unwrap_or(text);
        let expanded = expand_tabs(&text);
        Self {
            number,
            text,
            expanded,
        }
    }
}

/// Replace each tab with spaces up to the next multiple of [`TAB_WIDTH`] columns.
pub fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + TAB_WIDTH);
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let width = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat_n(' ', width));
            column += width;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_tab_is_eight_spaces() {
        assert_eq!(expand_tabs("\tfoo"), "        foo");
    }

    #[test]
    fn tab_stops_align_to_columns() {
        assert_eq!(expand_tabs("ab\tc"), "ab      c");
        assert_eq!(expand_tabs("12345678\tx"), "12345678        x");
    }

    #[test]
    fn carriage_return_is_dropped() {
        let line = RawLine::new(1, "foo\r");
        assert_eq!(line.text, "foo");
        assert_eq!(line.expanded, "foo");
    }
}
