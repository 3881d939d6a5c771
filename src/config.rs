//! Workspace configuration loaded from `.stackref.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;

/// Name of the configuration file at the workspace root.
pub const CONFIG_FILE: &str = ".stackref.toml";

/// Project configuration.
///
/// Include/exclude patterns are path prefixes applied to C# source files,
/// relative to each project's root.
#[derive(Debug, Default)]
pub struct Config {
    /// Prefixes that remove a file even when included.
    exclude: Vec<String>,
    /// Prefixes that admit a file; empty admits everything.
    include: Vec<String>,
    /// Projects in search order.
    pub projects: Vec<ProjectEntry>,
}

/// One configured project: a named source root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectEntry {
    /// Name shown in output and used by `project remove`.
    pub name: String,
    /// Source root, relative to the configuration file's directory.
    pub path: PathBuf,
}

/// Raw TOML structure for `.stackref.toml`.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StackrefToml {
    /// Raw exclude prefixes.
    #[serde(default)]
    exclude: Vec<String>,
    /// Raw include prefixes.
    #[serde(default)]
    include: Vec<String>,
    /// Raw `[[projects]]` entries.
    #[serde(default)]
    projects: Vec<ProjectEntry>,
}

impl Config {
    /// A config with the given projects that admits every file.
    pub const fn from_projects(projects: Vec<ProjectEntry>) -> Self {
        return Self {
            exclude: Vec::new(),
            include: Vec::new(),
            projects,
        };
    }

    /// Load config from `.stackref.toml` in `root`.
    ///
    /// A missing file yields the default: no projects, every file admitted.
    /// A file that exists but is malformed is an error; it never silently
    /// falls back to defaults. Project paths are resolved against `root`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: StackrefToml = toml::from_str(&content)?;
        let projects = raw
            .projects
            .into_iter()
            .map(|p| {
                return ProjectEntry {
                    name: p.name,
                    path: root.join(p.path),
                };
            })
            .collect();

        return Ok(Self {
            exclude: raw.exclude,
            include: raw.include,
            projects,
        });
    }

    /// Check whether a source file should be loaded.
    ///
    /// A path is included if no include patterns are set, or if it starts with
    /// at least one include pattern. An included path is then dropped if it
    /// starts with any exclude pattern.
    pub fn should_load(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));
        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}
