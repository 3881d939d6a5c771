//! Core domain types: text ranges, frame matches, parsed signatures, fragments.

/// Offset/length view into the trace text. Never owns a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    /// Byte length of the range.
    pub length: usize,
    /// Byte offset of the first character.
    pub start: usize,
}

impl TextRange {
    /// Byte offset one past the last character.
    pub const fn end(&self) -> usize {
        return self.start.saturating_add(self.length);
    }

    /// Shift a range relative to a line into a range relative to the whole text.
    pub const fn offset_by(&self, base: usize) -> Self {
        return Self {
            length: self.length,
            start: self.start.saturating_add(base),
        };
    }

    /// Borrow the slice this range covers. Empty when the range is out of bounds.
    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        return text.get(self.start..self.end()).unwrap_or("");
    }
}

/// One line of the trace, excluding its terminator.
pub type LineExtent = TextRange;

/// A recognized frame line. Ranges are relative to the text the matcher was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMatch {
    /// Source position at the end of the frame, if the line carries one.
    pub location: Option<FrameLocation>,
    /// The method-signature token.
    pub method: TextRange,
}

/// Path and line number carved out of a frame line. Both are always present together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLocation {
    /// Decimal digits of the line number.
    pub line: TextRange,
    /// Parsed 1-based line number.
    pub line_number: u32,
    /// Drive-letter path up to the colon that precedes the line suffix.
    pub path: TextRange,
}

/// Method signature text broken into its container path, member and parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSignature {
    /// Namespace/type chain, outermost first, each with its generic arity.
    pub containers: Vec<PathSegment>,
    /// Member generic arity from the bracketed group, 0 when absent.
    pub member_arity: usize,
    /// Member name; constructors are normalized to `.ctor` / `.cctor`.
    pub member_name: String,
    /// Parameter types in source order.
    pub parameters: Vec<ParameterType>,
}

/// One step of the container chain, such as ``GenericType`1``.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// Generic arity from the backtick suffix, 0 when absent.
    pub arity: usize,
    /// Name without the arity suffix.
    pub name: String,
}

/// Parameter type token as it appears in a frame, such as `Int32[]&`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterType {
    /// Metadata name of the element, pointee, or plain type.
    pub base_name: String,
    /// Trailing `[]`.
    pub is_array: bool,
    /// Trailing `&`; ref, out and in all collapse to this.
    pub is_by_ref: bool,
    /// Trailing `*`.
    pub is_pointer: bool,
}

impl ParameterType {
    /// The canonical token form compared against model parameter encodings.
    pub fn encoded(&self) -> String {
        let mut out = self.base_name.clone();
        if self.is_array {
            out.push_str("[]");
        } else if self.is_pointer {
            out.push('*');
        }
        if self.is_by_ref {
            out.push('&');
        }
        return out;
    }
}

/// One piece of formatted output. Concatenated fragment texts reconstruct the signature display.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment<S> {
    /// Symbol this text denotes, if any.
    pub symbol: Option<S>,
    /// Display text.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_slices_within_bounds() {
        let range = TextRange { start: 3, length: 4 };
        assert_eq!(range.slice("at Program.Main()"), "Prog");
        assert_eq!(range.end(), 7);
    }

    #[test]
    fn range_out_of_bounds_is_empty() {
        let range = TextRange { start: 10, length: 4 };
        assert_eq!(range.slice("short"), "");
    }

    #[test]
    fn encodes_by_ref_array() {
        let ty = ParameterType {
            base_name: "Int32".to_string(),
            is_array: true,
            is_by_ref: true,
            is_pointer: false,
        };
        assert_eq!(ty.encoded(), "Int32[]&");
    }
}
