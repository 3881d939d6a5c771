//! Frame recognition: carve the method, path and line-number tokens out of one trace line.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::types::{FrameLocation, FrameMatch, TextRange};

/// Whole-line frame grammar.
///
/// Minimal leading text, then the method token (a dot-free, space-free head, a dot,
/// anything up to a parenthesized list with no dot inside), minimal trailing text,
/// and an optional drive-letter location ending in a line number at end of line.
const FRAME_PATTERN: &str =
    r"^.*?(?P<method>[^. ]+\..*\([^.]*\)).*?(?:(?P<path>[a-zA-Z]:.*?):.*?(?P<line>[0-9]+))?$";

/// Compiled once; the pattern is a constant.
#[allow(clippy::expect_used, reason = "constant pattern, checked by tests")]
static FRAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(FRAME_PATTERN).expect("valid frame pattern"));

/// Convert a capture into a range relative to the matched line.
fn capture_range(capture: regex::Match<'_>) -> TextRange {
    return TextRange {
        length: capture.len(),
        start: capture.start(),
    };
}

/// Recognize `line` as a stack frame.
///
/// Returns `None` when the line has no method token. The location is only
/// reported when both the path and a line number that fits in `u32` are present.
pub fn match_frame(line: &str) -> Option<FrameMatch> {
    let captures = FRAME_REGEX.captures(line)?;
    let method = capture_range(captures.name("method")?);

    let location = match (captures.name("path"), captures.name("line")) {
        (Some(path), Some(digits)) => parse_location(path, digits),
        _ => None,
    };

    return Some(FrameMatch { location, method });
}

/// Pair a path capture with its line number, dropping both if the number overflows.
fn parse_location(path: regex::Match<'_>, digits: regex::Match<'_>) -> Option<FrameLocation> {
    let Ok(line_number) = digits.as_str().parse::<u32>() else {
        debug!(digits = digits.as_str(), "line number out of range, location dropped");
        return None;
    };

    return Some(FrameLocation {
        line: capture_range(digits),
        line_number,
        path: capture_range(path),
    });
}
