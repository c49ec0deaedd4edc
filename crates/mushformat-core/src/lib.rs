//! # mushformat-core
//!
//! Unformatter for MUSHcode. Softcode is written for humans across many lines,
//! with comments, indentation and blank separators; MUSH servers accept one
//! command per line. This crate reflows the former into the latter.
//!
//! ## Quick start
//!
//! ```rust
//! use mushformat_core::{compile, DefineTable};
//!
//! let source = "\
//! @@ A greeting command
//! &cmd_greet Greeter=$greet *:
//!     @pemit %#=
//!         Hello, %0!
//! -
//! \"  +--+
//!   |  |\"
//! ";
//! let out = compile(source, DefineTable::new()).unwrap();
//! assert_eq!(out.lines, vec![
//!     "&cmd_greet Greeter=$greet *:@pemit %#=Hello, %0!",
//!     "  +--+%r  |  |",
//! ]);
//! ```
//!
//! ## Source rules
//!
//! - `#:` lines are directives (`#:DEFINE NAME value`) and produce no output
//! - blank lines, `#` comments and `@@` lines are removed; `#//` starts a trailing comment
//! - a `-` at the start of a line ends the current command
//! - text in the first column starts a new command; indented text continues it
//! - a line starting with `"` opens a quoted block, closed by a line ending in `"`;
//!   spacing inside is preserved in compressed form
//!
//! ## Modules
//!
//! - [`compiler`] — the single-pass engine (`compile`, `Compiler`)
//! - [`classify`] — per-line classification
//! - [`quote`] — quoted block joining and whitespace compression
//! - [`defines`] — ranked define table
//! - [`substitute`] — define substitution
//! - [`directive`] — directive parsing
//! - [`builder`] — logical line assembly
//! - [`filter`] — output line filtering
//! - [`diagnostic`] — warning and error records
//! - [`error`] — fatal error types

pub mod builder;
pub mod classify;
pub mod compiler;
pub mod defines;
pub mod diagnostic;
pub mod directive;
pub mod error;
pub mod filter;
pub mod quote;
pub mod substitute;
pub mod types;

pub use classify::{classify, ClassifiedLine, LineKind, Mode, QuoteEdge};
pub use compiler::{compile, compile_lines, Compiled, Compiler};
pub use defines::{parse_assignment, DefineTable, InsertOutcome, Rank};
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use error::CompileError;
pub use filter::{filter_lines, LineFilter};
pub use quote::compress_spaces;
pub use types::{expand_tabs, RawLine};
