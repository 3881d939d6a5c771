//! Output renderers: the explained trace as terminal text, markdown, or JSON segments.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;
use url::Url;

use crate::error::Error;
use crate::fragments::{ResolvingSink, SymbolSink};
use crate::model::{SemanticModel, SymbolKind};
use crate::program::{ProgramModel, SourceLocation, SymbolId};
use crate::writer::{TraceSink, write};

const RESET_COLOR: &str = "\x1b[39m";
const UNDERLINE: &str = "\x1b[4m";
const NO_UNDERLINE: &str = "\x1b[24m";

/// Output format of `explain` and `watch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Terminal text with hyperlinks.
    Ansi,
    /// Machine-readable segments.
    Json,
    /// Markdown with links.
    Markdown,
}

/// Terminal renderer: resolved symbols and paths become OSC-8 hyperlinks.
#[derive(Debug, Default)]
pub struct AnsiSink {
    /// Rendered output.
    out: String,
    /// Whether to emit escape sequences at all.
    styled: bool,
}

impl AnsiSink {
    /// Renderer with escape sequences on or off.
    pub const fn new(styled: bool) -> Self {
        return Self {
            out: String::new(),
            styled,
        };
    }

    /// Write `text` as an underlined hyperlink to `url` in `color`.
    fn link(&mut self, text: &str, url: &str, color: &str) {
        let _ = write!(
            self.out,
            "\x1b]8;;{url}\x1b\\{color}{UNDERLINE}{text}{NO_UNDERLINE}{RESET_COLOR}\x1b]8;;\x1b\\"
        );
    }

    /// The rendered trace.
    pub fn into_output(self) -> String {
        return self.out;
    }
}

impl TraceSink for AnsiSink {
    fn write_path(&mut self, path: &str, line_number: u32) {
        if !self.styled {
            self.out.push_str(path);
            return;
        }
        self.link(path, &file_url(path, line_number), "\x1b[36m");
    }

    fn write_text(&mut self, text: &str) {
        self.out.push_str(text);
    }
}

impl SymbolSink<ProgramModel> for AnsiSink {
    fn write_symbol(&mut self, text: &str, symbol: &SymbolId, model: &ProgramModel) {
        let location = model.location(*symbol);
        let (true, Some(location)) = (self.styled, location) else {
            self.out.push_str(text);
            return;
        };
        let color = match model.kind(symbol) {
            SymbolKind::Event | SymbolKind::Property => "\x1b[35m",
            SymbolKind::Method => "\x1b[33m",
            SymbolKind::Namespace | SymbolKind::Type => "\x1b[32m",
        };
        let url = file_url(&location.file.to_string_lossy(), location.line);
        self.link(text, &url, color);
    }
}

/// One frame as seen by the driver, before any resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameRecord {
    /// Source line number from the location suffix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    /// Method-signature token.
    pub method: String,
    /// Source path from the location suffix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// 1-based line of the trace the frame sits on.
    pub trace_line: usize,
}

/// Collects frames; a path always belongs to the method before it on the same line.
#[derive(Debug, Default)]
struct FrameCollector {
    /// Frames in trace order.
    frames: Vec<FrameRecord>,
    /// Line terminators seen so far.
    terminators: usize,
}

impl TraceSink for FrameCollector {
    fn write_method(&mut self, signature: &str) {
        self.frames.push(FrameRecord {
            line_number: None,
            method: signature.to_string(),
            path: None,
            trace_line: self.terminators.saturating_add(1),
        });
    }

    fn write_path(&mut self, path: &str, line_number: u32) {
        if let Some(frame) = self.frames.last_mut() {
            frame.line_number = Some(line_number);
            frame.path = Some(path.to_string());
        }
    }

    fn write_text(&mut self, text: &str) {
        let newlines = text.matches('\n').count();
        let lone_returns = text.matches('\r').count().saturating_sub(text.matches("\r\n").count());
        self.terminators = self.terminators.saturating_add(newlines).saturating_add(lone_returns);
    }
}

/// JSON renderer: the trace as a list of typed segments.
#[derive(Debug, Default)]
pub struct JsonSink {
    /// Segments in trace order; adjacent text is merged.
    segments: Vec<Segment>,
}

impl JsonSink {
    /// Collected segments.
    pub fn into_segments(self) -> Vec<Segment> {
        return self.segments;
    }
}

impl TraceSink for JsonSink {
    fn write_path(&mut self, path: &str, line_number: u32) {
        self.segments.push(Segment::Path {
            line: line_number,
            path: path.to_string(),
        });
    }

    fn write_text(&mut self, text: &str) {
        if let Some(Segment::Text { text: last }) = self.segments.last_mut() {
            last.push_str(text);
            return;
        }
        self.segments.push(Segment::Text {
            text: text.to_string(),
        });
    }
}

impl SymbolSink<ProgramModel> for JsonSink {
    fn write_symbol(&mut self, text: &str, symbol: &SymbolId, model: &ProgramModel) {
        self.segments.push(Segment::Symbol {
            location: model.location(*symbol).cloned(),
            name: model.qualified_name(*symbol),
            symbol_kind: model.kind(symbol),
            text: text.to_string(),
        });
    }
}

/// Markdown renderer: symbols and paths become links, everything else is escaped text.
#[derive(Debug, Default)]
pub struct MarkdownSink {
    /// Rendered output.
    out: String,
}

impl MarkdownSink {
    /// The rendered trace.
    pub fn into_output(self) -> String {
        return self.out;
    }
}

impl TraceSink for MarkdownSink {
    fn write_path(&mut self, path: &str, line_number: u32) {
        let _ = write!(
            self.out,
            "[{}](<{}#L{line_number}>)",
            escape_markdown(path),
            escape_destination(path)
        );
    }

    fn write_text(&mut self, text: &str) {
        self.out.push_str(&escape_markdown(text));
    }
}

impl SymbolSink<ProgramModel> for MarkdownSink {
    fn write_symbol(&mut self, text: &str, symbol: &SymbolId, model: &ProgramModel) {
        let Some(location) = model.location(*symbol) else {
            self.out.push_str(&escape_markdown(text));
            return;
        };
        let _ = write!(
            self.out,
            "[{}](<{}#L{}>)",
            escape_markdown(text),
            escape_destination(&location.file.to_string_lossy()),
            location.line
        );
    }
}

/// One piece of JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// A source location from the trace.
    Path {
        /// 1-based line number.
        line: u32,
        /// Path as written in the trace.
        path: String,
    },
    /// Text that denotes a resolved symbol.
    Symbol {
        /// Declaration site, when known.
        location: Option<SourceLocation>,
        /// Fully qualified name.
        name: String,
        /// What the symbol declares.
        symbol_kind: SymbolKind,
        /// Display text.
        text: String,
    },
    /// Verbatim trace text.
    Text {
        /// The text.
        text: String,
    },
}

/// Escape markdown punctuation; every line terminator becomes a hard break.
fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {},
            '\r' | '\n' => out.push_str("  \n"),
            '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '#' | '|' => {
                out.push('\\');
                out.push(c);
            },
            _ => out.push(c),
        }
    }
    return out;
}

/// Escape the brackets that would end a `<...>` link destination.
fn escape_destination(path: &str) -> String {
    return path.replace('<', "\\<").replace('>', "\\>");
}

/// Whether `path` starts with a drive letter, whatever the host platform.
fn has_drive_letter(path: &str) -> bool {
    return matches!(path.as_bytes(), [letter, b':', ..] if letter.is_ascii_alphabetic());
}

/// `path` made absolute against the working directory; drive paths are kept as written.
fn absolute_path(path: &str) -> String {
    if has_drive_letter(path) || Path::new(path).is_absolute() {
        return path.to_string();
    }
    return std::fs::canonicalize(path)
        .or_else(|_| return std::path::absolute(path))
        .map_or_else(|_| return path.to_string(), |p| return p.to_string_lossy().into_owned());
}

/// `file://` URL for a path, with a line fragment. Segments are percent-encoded.
fn file_url(path: &str, line: u32) -> String {
    let forward = absolute_path(path).replace('\\', "/");
    let Ok(mut url) = Url::parse("file:///") else {
        return format!("file:///{forward}#L{line}");
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().extend(forward.split('/').filter(|s| return !s.is_empty()));
    }
    url.set_fragment(Some(&format!("L{line}")));
    return url.into();
}

/// Recognized frames of a trace, without resolution.
pub fn frames(text: &str) -> Vec<FrameRecord> {
    let mut collector = FrameCollector::default();
    write(text, &mut collector);
    return collector.frames;
}

/// Explain `text` against `models` in the requested format.
///
/// `styled` only affects [`Format::Ansi`].
///
/// # Errors
///
/// Returns `Error::Json` if JSON serialization fails.
pub fn render(text: &str, models: &[ProgramModel], format: Format, styled: bool) -> Result<String, Error> {
    return match format {
        Format::Ansi => {
            let mut sink = ResolvingSink::new(models, AnsiSink::new(styled));
            write(text, &mut sink);
            Ok(sink.into_inner().into_output())
        },
        Format::Json => {
            let mut sink = ResolvingSink::new(models, JsonSink::default());
            write(text, &mut sink);
            Ok(serde_json::to_string_pretty(&sink.into_inner().into_segments())?)
        },
        Format::Markdown => {
            let mut sink = ResolvingSink::new(models, MarkdownSink::default());
            write(text, &mut sink);
            Ok(sink.into_inner().into_output())
        },
    };
}
