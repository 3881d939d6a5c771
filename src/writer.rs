//! Trace driver: walk the text line by line and feed verbatim text, method tokens
//! and source locations to a sink.

use crate::frame::match_frame;
use crate::lines::line_extents;
use crate::types::FrameMatch;

/// Receiver for the pieces of a trace.
///
/// Concatenating every `write_text` argument, every `write_method` signature and
/// every `write_path` path, in call order, reproduces the input text exactly.
pub trait TraceSink {
    /// A recognized method-signature token.
    ///
    /// Sinks that do not resolve signatures get them back as plain text.
    fn write_method(&mut self, signature: &str) {
        self.write_text(signature);
    }

    /// A source path and its 1-based line number.
    fn write_path(&mut self, path: &str, line_number: u32);

    /// Text that carries no frame meaning. Never called with an empty string.
    fn write_text(&mut self, text: &str);
}

/// Cursor over the trace text that tracks how much has been handed to the sink.
struct Emitter<'t, 's, S: TraceSink + ?Sized> {
    /// Offset of the first byte not yet emitted.
    last_emitted: usize,
    /// Destination of all emitted pieces.
    sink: &'s mut S,
    /// The full trace text.
    text: &'t str,
}

impl<S: TraceSink + ?Sized> Emitter<'_, '_, S> {
    /// Emit verbatim text from the cursor up to `position`. Backward or empty ranges emit nothing.
    fn flush_to(&mut self, position: usize) {
        if position <= self.last_emitted {
            return;
        }
        if let Some(pending) = self.text.get(self.last_emitted..position) {
            self.sink.write_text(pending);
        }
        self.last_emitted = position;
        return;
    }

    /// Emit one recognized frame. `line_start` and `line_end` bound the line in the full text.
    fn emit_frame(&mut self, frame: &FrameMatch, line_start: usize, line_end: usize) {
        let method = frame.method.offset_by(line_start);
        self.flush_to(method.start);
        self.sink.write_method(method.slice(self.text));
        self.last_emitted = method.end();

        if let Some(location) = &frame.location {
            let path = location.path.offset_by(line_start);
            self.flush_to(path.start);
            self.sink.write_path(path.slice(self.text), location.line_number);
            self.last_emitted = path.end();
        }

        self.flush_to(line_end);
        return;
    }
}

/// Split `text` into frames and plain text, feeding each piece to `sink` in order.
///
/// Lines that are not frames pass through untouched. Nothing here can fail: the
/// worst case is the whole text arriving as plain text.
pub fn write<S: TraceSink + ?Sized>(text: &str, sink: &mut S) {
    let mut emitter = Emitter {
        last_emitted: 0,
        sink,
        text,
    };

    for extent in line_extents(text) {
        let line = extent.slice(text);
        if let Some(frame) = match_frame(line) {
            emitter.emit_frame(&frame, extent.start, extent.end());
        }
    }

    emitter.flush_to(text.len());
    return;
}
