/// Output line filter tests.
use mushformat_core::{filter_lines, CompileError, LineFilter};

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn pattern_is_anchored_at_line_start() {
    let input = lines(&["&cmd obj=x", "@set obj=&flag", "think &"]);
    let kept = filter_lines(&input, Some("&")).unwrap();
    assert_eq!(kept, vec!["&cmd obj=x"]);
}

#[test]
fn alternation_stays_anchored() {
    let input = lines(&["@create Box", "@set Box=SAFE", "think @set"]);
    let kept = filter_lines(&input, Some("@create|@set")).unwrap();
    assert_eq!(kept, vec!["@create Box", "@set Box=SAFE"]);
}

#[test]
fn no_pattern_keeps_everything() {
    let input = lines(&["a", "b"]);
    assert_eq!(filter_lines(&input, None).unwrap(), vec!["a", "b"]);
}

#[test]
fn order_is_preserved() {
    let input = lines(&["&b x", "@x", "&a x", "&c x"]);
    let filter = LineFilter::new("&").unwrap();
    assert_eq!(filter.apply(&input), vec!["&b x", "&a x", "&c x"]);
}

#[test]
fn invalid_pattern_is_an_error() {
    let err = LineFilter::new("(unclosed").unwrap_err();
    assert!(matches!(err, CompileError::Pattern(_)));
}
