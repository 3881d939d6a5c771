//! Line segmentation over borrowed trace text.

use crate::types::LineExtent;

/// Lazy iterator over the lines of a text. `\r\n`, `\r` and `\n` each end one line.
///
/// Extents exclude the terminator, so the bytes between one extent's end and the
/// next extent's start are exactly that line's terminator.
#[derive(Debug, Clone)]
pub struct LineExtents<'t> {
    /// Offset where the next line starts.
    position: usize,
    /// The full text being segmented.
    text: &'t str,
}

impl<'t> LineExtents<'t> {
    /// Start segmenting `text` from its first byte.
    pub const fn new(text: &'t str) -> Self {
        return Self { position: 0, text };
    }
}

impl Iterator for LineExtents<'_> {
    type Item = LineExtent;

    fn next(&mut self) -> Option<LineExtent> {
        let bytes = self.text.as_bytes();
        let start = self.position;
        if start >= bytes.len() {
            return None;
        }

        let rest = bytes.get(start..).unwrap_or_default();
        let Some(offset) = rest.iter().position(|b| return *b == b'\r' || *b == b'\n') else {
            self.position = bytes.len();
            return Some(LineExtent { length: rest.len(), start });
        };

        let terminator_start = start.saturating_add(offset);
        let crlf = bytes.get(terminator_start) == Some(&b'\r')
            && bytes.get(terminator_start.saturating_add(1)) == Some(&b'\n');
        let terminator_len = if crlf { 2 } else { 1 };

        self.position = terminator_start.saturating_add(terminator_len);
        return Some(LineExtent { length: offset, start });
    }
}

/// Segment `text` into line extents. Empty input yields no extents.
pub const fn line_extents(text: &str) -> LineExtents<'_> {
    return LineExtents::new(text);
}
