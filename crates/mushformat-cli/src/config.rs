//! On-disk configuration: the persistent defines store and project files.
//!
//! ## Defines store
//!
//! A YAML mapping of define name to value, by default `./defines.yaml`:
//!
//! ```yaml
//! JGO: "#1234"
//! PREFIX: "+job"
//! ```
//!
//! Unquoted numbers and booleans are accepted and used as their text form.
//! Note that an unquoted `#1234` is a YAML comment, so dbrefs need quotes.
//!
//! ## Project files
//!
//! ```yaml
//! root: src            # relative to the project file, default "."
//! targets:
//!   jobs:
//!     output: build/jobs.txt
//!     files: ["jobs/*.mush"]
//!     match: "&"       # optional output line filter
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name used when `--defines` points at a directory.
pub const DEFINES_FILENAME: &str = "defines.yaml";

/// Value of `--defines` that turns the store off.
pub const DEFINES_OFF: &str = "off";

/// A YAML scalar accepted as a define value.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Integer(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// The persistent defines store, or its absence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinesStore {
    path: Option<PathBuf>,
}

impl DefinesStore {
    /// Resolve a `--defines` argument: `off`, a directory, or a file path.
    pub fn locate(arg: &str) -> Self {
        if arg == DEFINES_OFF {
            return Self { path: None };
        }
        let path = PathBuf::from(arg);
        let path = if path.is_dir() {
            path.join(DEFINES_FILENAME)
        } else {
            path
        };
        Self { path: Some(path) }
    }

    /// The store file, or `None` when the store is off.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read all stored defines. A missing file is an empty store.
    pub fn load(&self) -> Result<BTreeMap<String, String>> {
        let Some(path) = &self.path else {
            return Ok(BTreeMap::new());
        };
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Defines store not found, using none");
                return Ok(BTreeMap::new());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read defines file: {}", path.display()))
            }
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        let raw: BTreeMap<String, Option<Scalar>> = serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse defines file: {}", path.display()))?;

        let mut defines = BTreeMap::new();
        for (name, value) in raw {
            let Some(value) = value else {
                bail!(
                    "Define '{}' in {} has no value (unquoted '#' starts a YAML comment)",
                    name,
                    path.display()
                );
            };
            defines.insert(name, value.into_text());
        }
        tracing::info!(path = %path.display(), count = defines.len(), "Loaded defines store");
        Ok(defines)
    }

    fn save(&self, defines: &BTreeMap<String, String>) -> Result<()> {
        let Some(path) = &self.path else {
            bail!("Defines store is disabled (--defines {DEFINES_OFF})");
        };
        let text = serde_yaml::to_string(defines).context("Failed to serialize defines")?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write defines file: {}", path.display()))
    }

    /// Store `name = value`, returning the previous value if any.
    pub fn set(&self, name: &str, value: &str) -> Result<Option<String>> {
        let mut defines = self.load()?;
        let previous = defines.insert(name.to_string(), value.to_string());
        self.save(&defines)?;
        Ok(previous)
    }

    /// Remove `name`, returning its value if it was defined.
    pub fn delete(&self, name: &str) -> Result<Option<String>> {
        let mut defines = self.load()?;
        let removed = defines.remove(name);
        if removed.is_some() {
            self.save(&defines)?;
        }
        Ok(removed)
    }
}

/// One output of a project.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Target {
    /// Where compiled lines are written, relative to the project root.
    pub output: PathBuf,
    /// Source files or glob patterns, compiled in order as one stream.
    pub files: Vec<String>,
    /// Optional output line filter.
    #[serde(default, rename = "match")]
    pub match_pattern: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectRaw {
    #[serde(default)]
    root: Option<PathBuf>,
    #[serde(default)]
    targets: BTreeMap<String, Target>,
}

/// A parsed project file with its root resolved.
#[derive(Debug)]
pub struct Project {
    pub root: PathBuf,
    pub targets: BTreeMap<String, Target>,
}

impl Project {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read project file: {}", path.display()))?;
        Self::parse(&text, path.parent().unwrap_or(Path::new(".")))
            .with_context(|| format!("Invalid project file: {}", path.display()))
    }

    /// Parse project YAML; a relative `root` is resolved against `base`.
    pub fn parse(text: &str, base: &Path) -> Result<Self> {
        let raw: ProjectRaw = serde_yaml::from_str(text)?;
        if raw.targets.is_empty() {
            bail!("project defines no targets");
        }
        for (name, target) in &raw.targets {
            if target.files.is_empty() {
                bail!("target '{name}' lists no files");
            }
        }
        let root = match raw.root {
            Some(root) if root.is_absolute() => root,
            Some(root) => base.join(root),
            None => base.to_path_buf(),
        };
        Ok(Self {
            root,
            targets: raw.targets,
        })
    }
}
