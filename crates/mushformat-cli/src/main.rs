//! `mushformat` CLI — compile formatted MUSHcode and manage stored defines.
//!
//! ## Usage
//!
//! ```sh
//! # Compile files to stdout
//! mushformat compile jobs/*.mush
//!
//! # Compile to a file with an extra define, keeping only attribute sets
//! mushformat compile -o build/jobs.txt -D JGO=#1234 --match '&' jobs/*.mush
//!
//! # Compile every target of a project file
//! mushformat compile -p project.yaml
//!
//! # Manage the defines store (./defines.yaml by default)
//! mushformat define set JGO '#1234'
//! mushformat define list
//! mushformat define delete JGO
//!
//! # Show how much the source shrinks
//! mushformat stats jobs/*.mush
//! ```

mod config;
mod sources;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mushformat_core::{
    filter_lines, parse_assignment, CompileError, Compiler, DefineTable, Diagnostic, Rank,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use config::{DefinesStore, Project, Target};
use sources::SourceSet;

#[derive(Parser)]
#[command(name = "mushformat", version, about = "MUSHcode (un)formatter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Defines store: a defines.yaml path, a directory containing one, or "off"
    #[arg(long, global = true, default_value = ".")]
    defines: String,

    /// Log progress (same as RUST_LOG=info)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile formatted source into one command per line
    Compile {
        /// Source files or glob patterns (reads stdin if omitted)
        #[arg(conflicts_with = "project")]
        sources: Vec<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long, conflicts_with = "project")]
        output: Option<PathBuf>,
        /// Compile all targets of a project file
        #[arg(short, long)]
        project: Option<PathBuf>,
        /// Define NAME=VALUE for this run only (repeatable)
        #[arg(short = 'D', value_name = "NAME=VALUE")]
        define: Vec<String>,
        /// Keep only output lines matching this regex (anchored at line start)
        #[arg(long = "match", value_name = "PATTERN", conflicts_with = "project")]
        match_pattern: Option<String>,
        /// How to print diagnostics on stderr
        #[arg(long, value_enum, default_value_t = DiagnosticFormat::Text)]
        diagnostics: DiagnosticFormat,
    },
    /// Manage the persistent defines store
    #[command(subcommand)]
    Define(DefineCommand),
    /// Show compile statistics (line counts, size reduction)
    Stats {
        /// Source files or glob patterns (reads stdin if omitted)
        sources: Vec<String>,
        /// Define NAME=VALUE for this run only (repeatable)
        #[arg(short = 'D', value_name = "NAME=VALUE")]
        define: Vec<String>,
    },
}

#[derive(Subcommand)]
enum DefineCommand {
    /// Store NAME=VALUE
    Set { name: String, value: String },
    /// List stored defines
    List,
    /// Remove a stored define
    Delete { name: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum DiagnosticFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();

    // --verbose forces INFO, otherwise RUST_LOG, defaulting to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("mushformat: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let store = DefinesStore::locate(&cli.defines);

    match cli.command {
        Commands::Compile {
            sources,
            output,
            project,
            define,
            match_pattern,
            diagnostics,
        } => {
            let defines = seed_defines(&store, &define)?;
            match project {
                Some(project) => compile_project(&project, &defines, diagnostics),
                None => {
                    let set = read_sources(&sources)?;
                    let lines = compile_set(&set, defines, diagnostics)?;
                    write_lines(output.as_deref(), &lines, match_pattern.as_deref())
                }
            }
        }
        Commands::Define(cmd) => run_define(&store, cmd),
        Commands::Stats { sources, define } => {
            let defines = seed_defines(&store, &define)?;
            let set = read_sources(&sources)?;
            let lines = compile_set(&set, defines, DiagnosticFormat::Text)?;
            let bytes_in = set.byte_len();
            let bytes_out: usize = lines.iter().map(|l| l.len() + 1).sum();
            let ratio = if bytes_in > 0 {
                (1.0 - (bytes_out as f64 / bytes_in as f64)) * 100.0
            } else {
                0.0
            };
            println!("Source files:  {}", set.file_count());
            println!("Input lines:   {}", set.lines().len());
            println!("Output lines:  {}", lines.len());
            println!("Input size:    {} bytes", bytes_in);
            println!("Output size:   {} bytes", bytes_out);
            println!("Reduction:     {:.1}%", ratio);
            Ok(())
        }
    }
}

/// Build the run's define table: built-ins, then the store, then `-D` flags.
fn seed_defines(store: &DefinesStore, cli_defines: &[String]) -> Result<DefineTable> {
    let mut table = DefineTable::with_builtins();
    table.extend_layer(Rank::File, store.load()?)?;

    let mut pairs = Vec::with_capacity(cli_defines.len());
    for item in cli_defines {
        match parse_assignment(item) {
            Some(pair) => pairs.push(pair),
            None => bail!("-D expects NAME=VALUE, got '{item}'"),
        }
    }
    table.extend_layer(Rank::CommandLine, pairs)?;
    Ok(table)
}

fn read_sources(patterns: &[String]) -> Result<SourceSet> {
    if patterns.is_empty() {
        SourceSet::from_stdin()
    } else {
        SourceSet::from_patterns(patterns, Path::new("."))
    }
}

/// Compile a combined source set, printing diagnostics with file positions.
fn compile_set(
    set: &SourceSet,
    defines: DefineTable,
    format: DiagnosticFormat,
) -> Result<Vec<String>> {
    let mut compiler = Compiler::new(defines);
    let result = set
        .lines()
        .iter()
        .try_for_each(|line| compiler.feed_str(line))
        .and_then(|()| compiler.finish());

    report(set, compiler.diagnostics(), format)?;

    match result {
        Ok(()) => Ok(compiler.into_compiled().lines),
        Err(err) => Err(locate_error(set, err)),
    }
}

fn locate_error(set: &SourceSet, err: CompileError) -> anyhow::Error {
    match err.line() {
        Some(line) => anyhow::Error::new(err).context(format!("Compile failed at {}", set.describe(line))),
        None => anyhow::Error::new(err).context("Compile failed"),
    }
}

/// Print diagnostics on stderr. In text form error-severity entries are
/// skipped: the fatal error itself is reported by `main`.
fn report(set: &SourceSet, diagnostics: &[Diagnostic], format: DiagnosticFormat) -> Result<()> {
    if diagnostics.is_empty() {
        return Ok(());
    }
    match format {
        DiagnosticFormat::Text => {
            for d in diagnostics.iter().filter(|d| !d.is_error()) {
                eprintln!("{}: {}: {}", set.describe(d.line), d.severity, d.message);
            }
        }
        DiagnosticFormat::Json => {
            let located: Vec<serde_json::Value> = diagnostics
                .iter()
                .map(|d| {
                    let mut value = serde_json::to_value(d)?;
                    if let Some((file, line)) = set.locate(d.line) {
                        value["file"] = file.into();
                        value["file_line"] = line.into();
                    }
                    Ok(value)
                })
                .collect::<serde_json::Result<_>>()?;
            eprintln!("{}", serde_json::to_string_pretty(&located)?);
        }
    }
    Ok(())
}

fn compile_project(path: &Path, defines: &DefineTable, format: DiagnosticFormat) -> Result<()> {
    let project = Project::load(path)?;
    let mut failed = Vec::new();

    for (name, target) in &project.targets {
        tracing::info!(target = %name, "Compiling target");
        if let Err(err) = compile_target(&project.root, target, defines.clone(), format) {
            eprintln!("mushformat: target '{name}': {err:#}");
            failed.push(name.as_str());
        }
    }

    if !failed.is_empty() {
        bail!("{} target(s) failed: {}", failed.len(), failed.join(", "));
    }
    Ok(())
}

fn compile_target(
    root: &Path,
    target: &Target,
    defines: DefineTable,
    format: DiagnosticFormat,
) -> Result<()> {
    let set = SourceSet::from_patterns(&target.files, root)?;
    let lines = compile_set(&set, defines, format)?;
    let output = root.join(&target.output);
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    write_lines(Some(&output), &lines, target.match_pattern.as_deref())
}

/// Write compiled lines, one per line, after optional filtering.
fn write_lines(path: Option<&Path>, lines: &[String], pattern: Option<&str>) -> Result<()> {
    let kept = filter_lines(lines, pattern)?;
    let mut content = kept.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
            tracing::info!(path = %path.display(), lines = kept.len(), "Wrote output");
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn run_define(store: &DefinesStore, cmd: DefineCommand) -> Result<()> {
    let Some(path) = store.path() else {
        println!("mushformat: defines disabled");
        return Ok(());
    };
    tracing::info!(path = %path.display(), "Using defines store");
    match cmd {
        DefineCommand::Set { name, value } => {
            // validate the name the same way the compiler will
            DefineTable::new().insert(name.as_str(), value.as_str(), Rank::File)?;
            store.set(&name, &value)?;
            println!("mushformat: defined '{name}' as '{value}'");
        }
        DefineCommand::List => {
            let defines = store.load()?;
            if defines.is_empty() {
                println!("mushformat: no defines set");
            } else {
                for (name, value) in &defines {
                    println!("{name} = {value}");
                }
            }
        }
        DefineCommand::Delete { name } => match store.delete(&name)? {
            Some(_) => println!("mushformat: '{name}' is no longer defined"),
            None => println!("mushformat: '{name}' is not currently defined"),
        },
    }
    Ok(())
}
