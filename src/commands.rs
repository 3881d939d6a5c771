//! Core CLI commands for stackref: explain, frames, resolve.

use std::io::{IsTerminal as _, Read as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::info;

use crate::config::{Config, ProjectEntry};
use crate::diagnostics;
use crate::error::Error;
use crate::model::SemanticModel;
use crate::program::ProgramModel;
use crate::render::{self, Format};
use crate::resolver;
use crate::workspace::{self, FileErrors};

/// Explain a trace: resolve every frame and print the rendered result.
///
/// # Errors
///
/// Returns errors from reading the trace, loading projects, or rendering.
pub fn explain(
    root: &Path,
    trace: Option<&Path>,
    sources: &[PathBuf],
    format: Format,
    plain: bool,
) -> Result<ExitCode, Error> {
    let text = read_trace(trace)?;
    let models = load_models(root, sources, FileErrors::Fail)?;
    let out = render::render(&text, &models, format, is_styled(format, plain))?;
    print_rendered(&out, format);
    return Ok(ExitCode::SUCCESS);
}

/// List recognized frames as JSON, without resolving anything.
///
/// # Errors
///
/// Returns errors from reading the trace or serializing.
pub fn frames(trace: Option<&Path>) -> Result<ExitCode, Error> {
    let text = read_trace(trace)?;
    let records = render::frames(&text);
    println!("{}", serde_json::to_string_pretty(&records)?);
    return Ok(ExitCode::SUCCESS);
}

/// Whether ANSI output should carry colour and hyperlinks.
pub fn is_styled(format: Format, plain: bool) -> bool {
    return format == Format::Ansi && !plain && std::io::stdout().is_terminal();
}

/// Load program models for `sources`, or for the configured projects when
/// no sources are given.
///
/// Each source directory becomes a project named after its last component.
/// Include/exclude prefixes from the config still apply.
///
/// # Errors
///
/// Returns errors from config loading or [`workspace::load`].
pub fn load_models(
    root: &Path,
    sources: &[PathBuf],
    file_errors: FileErrors,
) -> Result<Vec<ProgramModel>, Error> {
    let config = project_config(root, sources)?;
    return workspace::load(&config, file_errors);
}

/// Print rendered output; JSON gets a trailing newline, traces are printed as-is.
pub fn print_rendered(out: &str, format: Format) {
    if format == Format::Json {
        println!("{out}");
    } else {
        print!("{out}");
    }
}

/// The config to load from: `.stackref.toml`, with `sources` replacing its projects.
///
/// # Errors
///
/// Returns errors from [`Config::load`].
pub fn project_config(root: &Path, sources: &[PathBuf]) -> Result<Config, Error> {
    let mut config = Config::load(root)?;
    if !sources.is_empty() {
        config.projects = sources
            .iter()
            .map(|path| {
                let name = path.file_name().map_or_else(
                    || return path.display().to_string(),
                    |n| return n.to_string_lossy().into_owned(),
                );
                return ProjectEntry {
                    name,
                    path: path.clone(),
                };
            })
            .collect();
    }
    return Ok(config);
}

/// Read the trace from a file, or from stdin for `None` or `-`.
///
/// # Errors
///
/// Returns `Error::FileNotFound` for a missing file, or `Error::Io`.
pub fn read_trace(trace: Option<&Path>) -> Result<String, Error> {
    let Some(path) = trace.filter(|p| return p.as_os_str() != "-") else {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    };

    return match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(Error::Io(e)),
    };
}

/// Resolve one signature and print the symbol it names.
///
/// Resolution failures are reported as diagnostics with exit code 1;
/// everything else propagates.
///
/// # Errors
///
/// Returns errors from loading projects.
pub fn resolve(root: &Path, signature: &str, sources: &[PathBuf]) -> Result<ExitCode, Error> {
    let models = load_models(root, sources, FileErrors::Fail)?;

    let resolved = match resolver::resolve(&models, signature) {
        Ok(r) => r,
        Err(
            e @ (Error::AmbiguousMember { .. }
            | Error::MalformedSignature { .. }
            | Error::UnresolvedMember { .. }),
        ) => {
            diagnostics::print_error(&e);
            return Ok(ExitCode::from(1));
        },
        Err(e) => return Err(e),
    };

    let model = resolved.model;
    let symbol = resolved.symbol;
    info!(project = model.model_name(), "signature resolved");

    let display: String = model.display_parts(&symbol).iter().map(|p| return p.text.as_str()).collect();
    println!("{display}");
    println!("  name:     {}", model.qualified_name(symbol));
    println!("  kind:     {}", model.kind(&symbol).as_str());
    println!("  project:  {}", model.model_name());
    if let Some(location) = model.location(symbol) {
        println!(
            "  location: {}:{}:{}",
            location.file.display(),
            location.line,
            location.column
        );
    }
    return Ok(ExitCode::SUCCESS);
}
