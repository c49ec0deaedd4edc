/// Property-based tests for the compiler.
///
/// Strategies generate small well-formed sources (commands with indented
/// continuation lines) and check invariants that must hold for every input:
///
/// - inserting blank/comment lines anywhere never changes the output
/// - a leading tab and eight spaces classify identically
/// - every command in the source becomes exactly one output line
/// - long space runs inside quotes always become a single `[space(N)]` call
/// - substitution replaces every occurrence and never recurses
use proptest::prelude::*;
use mushformat_core::{
    classify, compile, compress_spaces, DefineTable, Mode, RawLine, Rank,
};

// ============================================================================
// Strategies
// ============================================================================

/// Command text: starts in column 0 with a non-special character.
fn arb_command() -> impl Strategy<Value = String> {
    prop::string::string_regex("[&@a-z][a-z0-9 =%:\\[\\]()]{0,20}")
        .unwrap()
        .prop_map(|s| s.trim_end().to_string())
        .prop_filter("command must not be empty", |s| !s.is_empty())
}

/// Continuation text, without its indentation.
fn arb_fragment() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9=%,\\[\\]()]{1,15}").unwrap()
}

/// One command with up to three continuation lines.
fn arb_block() -> impl Strategy<Value = Vec<String>> {
    (arb_command(), prop::collection::vec(arb_fragment(), 0..4)).prop_map(|(head, tail)| {
        let mut lines = vec![head];
        lines.extend(tail.into_iter().map(|f| format!("    {f}")));
        lines
    })
}

fn arb_source() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(arb_block(), 1..6)
}

/// Lines that must be skipped without effect.
fn arb_noise() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("    ".to_string()),
        "# [a-z ]{0,10}",
        "@@[a-z ]{0,10}",
        "  #// [a-z ]{0,10}",
    ]
}

fn join(blocks: &[Vec<String>]) -> Vec<String> {
    blocks.iter().flatten().cloned().collect()
}

fn run(lines: &[String]) -> Vec<String> {
    compile(&lines.join("\n"), DefineTable::new()).unwrap().lines
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn noise_lines_never_change_output(
        blocks in arb_source(),
        noise in prop::collection::vec((any::<prop::sample::Index>(), arb_noise()), 1..6),
    ) {
        let clean = join(&blocks);
        let mut noisy = clean.clone();
        for (idx, line) in noise {
            // never in front of the first command: a continuation must follow something
            let at = 1 + idx.index(noisy.len());
            noisy.insert(at.min(noisy.len()), line);
        }
        prop_assert_eq!(run(&clean), run(&noisy));
    }

    #[test]
    fn each_command_is_one_output_line(blocks in arb_source()) {
        let out = run(&join(&blocks));
        prop_assert_eq!(out.len(), blocks.len());
        for (line, block) in out.iter().zip(&blocks) {
            let expected: String = block.iter().map(|l| l.trim()).collect();
            prop_assert_eq!(line, &expected);
        }
    }

    #[test]
    fn dash_between_commands_is_redundant(blocks in arb_source()) {
        let plain = join(&blocks);
        let dashed: Vec<String> = blocks
            .iter()
            .flat_map(|b| b.iter().cloned().chain(std::iter::once("-".to_string())))
            .collect();
        prop_assert_eq!(run(&plain), run(&dashed));
    }

    #[test]
    fn leading_tab_classifies_like_eight_spaces(rest in "[a-z#@\"-][a-z ]{0,10}") {
        let tabbed = RawLine::new(1, format!("\t{rest}"));
        let spaced = RawLine::new(1, format!("        {rest}"));
        for mode in [Mode::Normal, Mode::InsideQuote] {
            prop_assert_eq!(classify(&tabbed, mode).kind, classify(&spaced, mode).kind);
        }
    }

    #[test]
    fn long_runs_become_one_call(n in 5usize..200, a in "[a-z]{1,5}", b in "[a-z]{1,5}") {
        let text = format!("{a}{}{b}", " ".repeat(n));
        prop_assert_eq!(compress_spaces(&text), format!("{a}[space({n})]{b}"));
    }

    #[test]
    fn compressed_text_has_no_long_space_runs(text in "[a-z ]{0,60}") {
        prop_assert!(!compress_spaces(&text).contains("   "));
    }

    #[test]
    fn substitution_replaces_all_without_recursion(
        count in 1usize..6,
        value in "[a-z]{1,8}",
    ) {
        let mut table = DefineTable::new();
        table.insert("FOO", format!("FOO{value}"), Rank::CommandLine).unwrap();
        let line = vec!["FOO"; count].join(" ");
        let out = compile(&format!("think {line}"), table).unwrap();
        let expected = vec![format!("FOO{value}"); count].join(" ");
        prop_assert_eq!(&out.lines[0], &format!("think {expected}"));
    }
}
