//! `stackref` binary: argument parsing, logging setup, and exit codes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use stackref::render::Format;
use stackref::{commands, diagnostics, projects, watch};
use tracing_subscriber::EnvFilter;

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "stackref", about = "Symbol-aware stack traces for C# projects", version)]
struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    command: Commands,
    /// Log more: `-v` for info, `-vv` for debug. `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Resolve every frame of a trace and print it with links
    Explain {
        /// Output format
        #[arg(long, value_enum, default_value = "ansi")]
        format: Format,
        /// Disable colour and hyperlinks
        #[arg(long)]
        plain: bool,
        /// C# source directory to resolve against; repeatable, searched in order
        #[arg(long = "source", value_name = "DIR")]
        sources: Vec<PathBuf>,
        /// Trace file, or `-` for stdin
        trace: Option<PathBuf>,
    },
    /// List the frames of a trace as JSON, without resolving them
    Frames {
        /// Trace file, or `-` for stdin
        trace: Option<PathBuf>,
    },
    /// Manage the projects searched for symbols
    Project {
        /// The project subcommand to run.
        #[command(subcommand)]
        action: ProjectAction,
    },
    /// Resolve one method signature and show its declaration
    Resolve {
        /// Signature as printed in a frame, e.g. `Program.Main(String[] args)`
        signature: String,
        /// C# source directory to resolve against; repeatable, searched in order
        #[arg(long = "source", value_name = "DIR")]
        sources: Vec<PathBuf>,
    },
    /// Explain a trace, then re-explain whenever it or the sources change
    Watch {
        /// Output format
        #[arg(long, value_enum, default_value = "ansi")]
        format: Format,
        /// Disable colour and hyperlinks
        #[arg(long)]
        plain: bool,
        /// C# source directory to resolve against; repeatable, searched in order
        #[arg(long = "source", value_name = "DIR")]
        sources: Vec<PathBuf>,
        /// Trace file to watch
        trace: PathBuf,
    },
}

/// Project management subcommands.
#[derive(Subcommand)]
enum ProjectAction {
    /// Append a project to the search order
    Add {
        /// Project name
        name: String,
        /// Source root, relative to the config file
        path: String,
    },
    /// List projects in search order
    List,
    /// Remove a project by name
    Remove {
        /// Project name
        name: String,
    },
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| return EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Parse arguments, run the command, map the outcome to an exit code.
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let root = Path::new(".");
    let result = match cli.command {
        Commands::Explain {
            format,
            plain,
            sources,
            trace,
        } => commands::explain(root, trace.as_deref(), &sources, format, plain),
        Commands::Frames { trace } => commands::frames(trace.as_deref()),
        Commands::Project { action } => run_project(root, action),
        Commands::Resolve { signature, sources } => commands::resolve(root, &signature, &sources),
        Commands::Watch {
            format,
            plain,
            sources,
            trace,
        } => watch::run(root, &trace, &sources, format, plain),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(2)
        },
    };
}

/// Dispatch a project subcommand.
///
/// # Errors
///
/// Returns errors from the project commands.
fn run_project(root: &Path, action: ProjectAction) -> Result<ExitCode, stackref::error::Error> {
    match action {
        ProjectAction::Add { name, path } => projects::cmd_add(root, &name, &path)?,
        ProjectAction::List => projects::cmd_list(root)?,
        ProjectAction::Remove { name } => projects::cmd_remove(root, &name)?,
    }
    return Ok(ExitCode::SUCCESS);
}
