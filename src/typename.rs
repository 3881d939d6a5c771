//! C# type text to runtime metadata names: `int` to `Int32`, `List<T>` to ``List`1``.
//!
//! Frames spell parameter types the way the runtime does, so declared types
//! are decoded from source text into the same spelling before comparison.

use crate::model::TypeShape;

/// Characters that never need a space next to them in a normalized type.
const fn is_tight(c: char) -> bool {
    return matches!(c, '<' | '>' | '[' | ']' | '(' | ')' | '*' | '?' | ',' | '.' | ':');
}

/// Runtime name of a C# built-in type keyword.
pub fn framework_name(keyword: &str) -> Option<&'static str> {
    return match keyword {
        "bool" => Some("Boolean"),
        "byte" => Some("Byte"),
        "char" => Some("Char"),
        "decimal" => Some("Decimal"),
        "double" => Some("Double"),
        "dynamic" | "object" => Some("Object"),
        "float" => Some("Single"),
        "int" => Some("Int32"),
        "long" => Some("Int64"),
        "nint" => Some("IntPtr"),
        "nuint" => Some("UIntPtr"),
        "sbyte" => Some("SByte"),
        "short" => Some("Int16"),
        "string" => Some("String"),
        "uint" => Some("UInt32"),
        "ulong" => Some("UInt64"),
        "ushort" => Some("UInt16"),
        "void" => Some("Void"),
        _ => None,
    };
}

/// Whether `T?` over this text is `Nullable<T>` rather than a reference annotation.
fn is_value_type_text(text: &str) -> bool {
    if text.starts_with('(') {
        return true;
    }
    return matches!(
        text,
        "bool"
            | "byte"
            | "char"
            | "decimal"
            | "double"
            | "float"
            | "int"
            | "long"
            | "nint"
            | "nuint"
            | "sbyte"
            | "short"
            | "uint"
            | "ulong"
            | "ushort"
    );
}

/// Last segment of a qualified name (`System.Int32`, `global::Foo`).
fn last_segment(name: &str) -> &str {
    let after_alias = name.rsplit("::").next().unwrap_or(name);
    return after_alias.rsplit('.').next().unwrap_or(after_alias);
}

/// Metadata name of a whitespace-normalized C# type.
///
/// Arrays keep their rank suffix and pointers their `*`, applied to the
/// decoded element type.
pub fn metadata_name(text: &str) -> String {
    let text = text.trim();

    if let Some(inner) = text.strip_suffix('?') {
        if is_value_type_text(inner) {
            return "Nullable`1".to_string();
        }
        return metadata_name(inner);
    }

    if text.ends_with(']')
        && let Some(open) = text.rfind('[')
    {
        let (element, rank) = text.split_at(open);
        return format!("{}{}", metadata_name(element), rank.replace(' ', ""));
    }

    if let Some(pointee) = text.strip_suffix('*') {
        return format!("{}*", metadata_name(pointee));
    }

    if let Some(inner) = text.strip_prefix('(').and_then(|t| return t.strip_suffix(')')) {
        let elements = split_top_level(inner, ',').len().min(8);
        return format!("ValueTuple`{elements}");
    }

    if let Some(inner) = text.strip_suffix('>')
        && let Some(open) = inner.find('<')
    {
        let name = inner.get(..open).unwrap_or("");
        let arguments = inner.get(open.saturating_add(1)..).unwrap_or("");
        let arity = split_top_level(arguments, ',').len();
        return format!("{}`{arity}", last_segment(name));
    }

    if let Some(name) = framework_name(text) {
        return name.to_string();
    }
    return last_segment(text).to_string();
}

/// Collapse whitespace so equal types print equally: `Dictionary< string ,int >`
/// becomes `Dictionary<string, int>`. Tuple element names keep their separating space.
pub fn normalize(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(collapsed.len());
    let mut chars = collapsed.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ' ' {
            let after_tight = chars.peek().copied().is_some_and(is_tight);
            let before_tight = out.chars().last().is_none_or(|p| return is_tight(p) || p == ' ');
            if before_tight || after_tight {
                continue;
            }
        }
        out.push(c);
        if c == ',' {
            out.push(' ');
        }
    }
    return out;
}

/// Split at `separator` where it is not nested inside `<>`, `()` or `[]`.
///
/// Empty text yields no pieces.
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;
    for (index, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' => depth = depth.saturating_add(1),
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            _ if c == separator && depth == 0 => {
                pieces.push(text.get(start..index).unwrap_or(""));
                start = index.saturating_add(c.len_utf8());
            },
            _ => {},
        }
    }
    pieces.push(text.get(start..).unwrap_or(""));
    return pieces;
}

/// Parameter shape of a normalized type: arrays and pointers at the top, the rest by name.
pub fn type_shape(text: &str) -> TypeShape {
    let text = text.trim();
    let text = match text.strip_suffix('?') {
        Some(inner) if !is_value_type_text(inner) => inner,
        _ => text,
    };

    if let Some(element) = text.strip_suffix("[]") {
        return TypeShape::Array(metadata_name(element));
    }
    if let Some(pointee) = text.strip_suffix('*') {
        return TypeShape::Pointer(metadata_name(pointee));
    }
    return TypeShape::Named(metadata_name(text));
}
