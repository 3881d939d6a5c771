//! Crate-level error types for stackref diagnostics.
use std::path::PathBuf;

/// All errors in stackref carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the signature, file, or reason for failure.
#[allow(clippy::error_impl_error, reason = "single crate-wide error type")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two or more members matched one step of the signature path.
    #[error("ambiguous member: `{segment}` in `{signature}`, candidates: {}", candidates.join(", "))]
    AmbiguousMember {
        /// Display names of the members that matched.
        candidates: Vec<String>,
        /// Path segment or member name that matched more than once.
        segment: String,
        /// Full signature text being resolved.
        signature: String,
    },

    /// A referenced file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Source file exceeds the size limit.
    #[error("file too large ({size_bytes} bytes, max {max_bytes}): {}", file.display())]
    FileTooLarge {
        /// File that exceeded the size limit.
        file: PathBuf,
        /// Maximum allowed file size in bytes.
        max_bytes: u64,
        /// Actual file size in bytes.
        size_bytes: u64,
    },

    /// Underlying I/O error from the filesystem or standard streams.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of rendered output failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped serde_json error.
        #[from]
        serde_json::Error,
    ),

    /// Signature text does not have the shape of a method signature.
    #[error("malformed signature `{signature}`: {reason}")]
    MalformedSignature {
        /// What part of the signature could not be parsed.
        reason: String,
        /// The raw signature text.
        signature: String,
    },

    /// No project was configured or passed on the command line.
    #[error("no projects configured")]
    NoProjects,

    /// Tree-sitter or the config editor failed to parse a file.
    #[error("parse failed: {}: {reason}", file.display())]
    ParseFailed {
        /// File that failed to parse.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// Format-preserving TOML parse failed.
    #[error("toml edit: {0}")]
    TomlEdit(
        /// The wrapped toml_edit error.
        #[from]
        toml_edit::TomlError,
    ),

    /// No configured project has the given name.
    #[error("unknown project: `{name}`")]
    UnknownProject {
        /// Project name that was not found.
        name: String,
    },

    /// No member matched one step of the signature path in any model.
    #[error("unresolved member: `{segment}` in `{signature}`")]
    UnresolvedMember {
        /// Path segment or member name that found no match.
        segment: String,
        /// Full signature text being resolved.
        signature: String,
    },

    /// The filesystem watcher could not be set up.
    #[error("watch: {reason}")]
    Watch {
        /// Description of the watcher failure.
        reason: String,
    },
}
