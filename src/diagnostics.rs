//! Markdown diagnostics for errors, printed to stderr by the binary.

use std::fmt::Write as _;

use crate::config::CONFIG_FILE;
use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as markdown and print it to stderr, headings in bold.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is one,
/// how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::AmbiguousMember {
            candidates,
            segment,
            signature,
        } => render_ambiguous_member(candidates, segment, signature),
        Error::FileTooLarge {
            file,
            max_bytes,
            size_bytes,
        } => format!(
            "\
# Error: File Too Large

`{}` is {size_bytes} bytes (max {max_bytes}).

## Fix

Exclude it in `{CONFIG_FILE}`:

    exclude = [\"path/to/generated/\"]
",
            file.display()
        ),
        Error::MalformedSignature { reason, signature } => format!(
            "\
# Error: Malformed Signature

`{signature}` is not a method signature: {reason}.

Signatures look like runtime frames, with a name after every parameter type:

    Namespace.Type.Method(Int32 count, String[] names)
"
        ),
        Error::NoProjects => format!(
            "\
# Error: No Projects

There is no C# source to resolve against.

## Fix

Pass source directories:

    stackref explain trace.txt --source src/App

Or configure them in `{CONFIG_FILE}`:

    stackref project add app src/App
"
        ),
        Error::UnknownProject { name } => format!(
            "\
# Error: Unknown Project

Project `{name}` is not configured in `{CONFIG_FILE}`.

## Fix

List configured projects:

    stackref project list
"
        ),
        Error::UnresolvedMember { segment, signature } => format!(
            "\
# Error: Unresolved Member

No declaration named `{segment}` matches `{signature}`.

Namespaces match by name, types by name and generic arity (``Name`1``),
methods by name, arity and parameter types.
"
        ),
        _ => render_generic(e),
    };
}

/// Errors without specific advice: a heading and the message.
fn render_generic(e: &Error) -> String {
    return match e {
        Error::FileNotFound { path } => format!(
            "\
# Error: File Not Found

`{}` does not exist.
",
            path.display()
        ),
        Error::Io(err) => format!("# Error: I/O\n\n{err}\n"),
        Error::Json(err) => format!("# Error: JSON\n\n{err}\n"),
        Error::ParseFailed { file, reason } => format!(
            "\
# Error: Parse Failed

Could not parse `{}`: {reason}
",
            file.display()
        ),
        Error::TomlDe(err) => format!("# Error: Invalid TOML\n\n{err}\n"),
        Error::TomlEdit(err) => format!("# Error: Invalid TOML\n\n{err}\n"),
        Error::Watch { reason } => format!("# Error: Watch\n\n{reason}\n"),
        _ => format!("# Error\n\n{e}\n"),
    };
}

/// Ambiguity report listing every candidate.
fn render_ambiguous_member(candidates: &[String], segment: &str, signature: &str) -> String {
    let mut out = format!(
        "\
# Error: Ambiguous Member

`{segment}` in `{signature}` matches {} declarations.

## Candidates

",
        candidates.len()
    );
    for c in candidates {
        let _ = writeln!(out, "- `{c}`");
    }
    out.push_str(
        "\
\n## Fix

Remove the duplicate declaration, or order projects so the intended one is searched first.
",
    );
    return out;
}
