//! File watcher: explains a trace on startup, then re-explains on trace or source changes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};
use tracing::warn;

use crate::commands;
use crate::config::CONFIG_FILE;
use crate::diagnostics;
use crate::error::Error;
use crate::render::{self, Format};
use crate::workspace::FileErrors;

/// Debounce delay between filesystem events and re-explain.
const DEBOUNCE_MS: u64 = 100;

/// Create a filesystem watcher that signals on changes to relevant files.
///
/// # Errors
///
/// Returns `Error::Watch` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<()>,
    trace: PathBuf,
) -> Result<notify::RecommendedWatcher, Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_) | notify::EventKind::Modify(_) | notify::EventKind::Remove(_)
            )
            && event.paths.iter().any(|p| return is_relevant(p, &trace))
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return Error::Watch {
            reason: format!("watcher setup failed: {e}"),
        };
    });
}

/// Explain the trace once, printing diagnostics instead of failing.
fn explain_once(root: &Path, trace: &Path, sources: &[PathBuf], format: Format, styled: bool) -> ExitCode {
    let result = commands::read_trace(Some(trace)).and_then(|text| {
        let models = commands::load_models(root, sources, FileErrors::Skip)?;
        return render::render(&text, &models, format, styled);
    });
    return match result {
        Ok(out) => {
            commands::print_rendered(&out, format);
            ExitCode::SUCCESS
        },
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(2_u8)
        },
    };
}

/// The trace itself, any C# source, or the config file.
fn is_relevant(path: &Path, trace: &Path) -> bool {
    return path == trace
        || path.extension().is_some_and(|x| return x == "cs")
        || path.file_name().is_some_and(|n| return n == CONFIG_FILE);
}

/// Entry point for the watch command.
///
/// Explains once, then watches the trace file's directory and every project
/// root, re-explaining after each debounced burst of changes. Sources are
/// reloaded from scratch each time; unreadable files are skipped with a warning.
///
/// # Errors
///
/// Returns errors from config loading or watcher setup.
pub fn run(root: &Path, trace: &Path, sources: &[PathBuf], format: Format, plain: bool) -> Result<ExitCode, Error> {
    let styled = commands::is_styled(format, plain);

    eprintln!("watch: initial explain");
    let mut last_code = explain_once(root, trace, sources, format, styled);

    let config = commands::project_config(root, sources)?;
    // Watched directories are canonical, so event paths are too.
    let trace_abs = std::fs::canonicalize(trace)?;
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx, trace_abs.clone())?;

    let trace_dir = trace_abs.parent().map_or_else(|| return root.to_path_buf(), Path::to_path_buf);
    let mut watched: usize = 0;
    let project_dirs = config.projects.iter().map(|p| {
        let dir = std::fs::canonicalize(&p.path).unwrap_or_else(|_| return p.path.clone());
        return (dir, RecursiveMode::Recursive);
    });
    let targets = std::iter::once((trace_dir, RecursiveMode::NonRecursive)).chain(project_dirs);
    for (dir, mode) in targets {
        if !dir.exists() {
            continue;
        }
        match watcher.watch(&dir, mode) {
            Ok(()) => watched = watched.saturating_add(1),
            Err(e) => warn!(dir = %dir.display(), error = %e, "cannot watch directory"),
        }
    }

    eprintln!("watch: monitoring {watched} directories, press Ctrl+C to stop");

    while rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        eprintln!("watch: change detected, re-explaining...");
        last_code = explain_once(root, trace, sources, format, styled);
    }

    return Ok(last_code);
}
