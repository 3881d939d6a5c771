//! Workspace loading: configured projects to an ordered list of program models.

use std::path::Path;

use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::{Config, ProjectEntry};
use crate::csharp::CSharpLoader;
use crate::error::Error;
use crate::program::ProgramModel;

/// How to treat a source file that cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileErrors {
    /// Fail the whole load.
    Fail,
    /// Log and skip it; used by `watch`, where files change under us.
    Skip,
}

/// Build output and hidden directories are never loaded.
fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    return name == "bin" || name == "obj" || name.starts_with('.');
}

/// Load every configured project, in configuration order.
///
/// # Errors
///
/// Returns `Error::NoProjects` if none are configured, or any error from
/// [`load_project`].
pub fn load(config: &Config, file_errors: FileErrors) -> Result<Vec<ProgramModel>, Error> {
    if config.projects.is_empty() {
        return Err(Error::NoProjects);
    }
    return config
        .projects
        .iter()
        .map(|project| return load_project(project, config, file_errors))
        .collect();
}

/// Read and parse one file into the loader.
///
/// # Errors
///
/// Returns `Error::Io` on read failure, or the loader's errors.
fn load_file(loader: &mut CSharpLoader, path: &Path) -> Result<(), Error> {
    let source = std::fs::read_to_string(path)?;
    return loader.add_source(path, &source);
}

/// Load one project's `*.cs` files into a model named after the project.
///
/// Files are visited in name order so symbol order is stable across runs.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the project root is missing. With
/// [`FileErrors::Fail`], also `Error::Io`, `Error::FileTooLarge` or
/// `Error::ParseFailed` for the first file that cannot be loaded.
pub fn load_project(
    project: &ProjectEntry,
    config: &Config,
    file_errors: FileErrors,
) -> Result<ProgramModel, Error> {
    if !project.path.is_dir() {
        return Err(Error::FileNotFound {
            path: project.path.clone(),
        });
    }

    let mut loader = CSharpLoader::new(&project.name);
    let mut file_count: usize = 0;

    let walker = WalkDir::new(&project.path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| return !is_skipped_dir(e))
        .filter_map(Result::ok)
        .filter(|e| return e.file_type().is_file() && e.path().extension().is_some_and(|x| return x == "cs"));

    for entry in walker {
        let path = entry.path();
        if !config.should_load(&relative_path(&project.path, path)) {
            continue;
        }

        match load_file(&mut loader, path) {
            Ok(()) => file_count = file_count.saturating_add(1),
            Err(e) if file_errors == FileErrors::Skip => {
                warn!(file = %path.display(), error = %e, "skipping source file");
            },
            Err(e) => return Err(e),
        }
    }

    let model = loader.finish();
    info!(
        project = %project.name,
        files = file_count,
        symbols = model.symbol_count(),
        "project loaded"
    );
    return Ok(model);
}

/// Path of `path` relative to `root` with `/` separators, for include/exclude matching.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    return relative.to_string_lossy().replace('\\', "/");
}
