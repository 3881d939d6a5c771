//! Signature parsing: `Outer+Inner`1.Method[T](Int32[] values, T& item)` into a structured path.

use crate::error::Error;
use crate::types::{ParameterType, ParsedSignature, PathSegment};

/// Canonical name of an instance constructor.
pub const CONSTRUCTOR_NAME: &str = ".ctor";

/// Canonical name of a static constructor.
pub const STATIC_CONSTRUCTOR_NAME: &str = ".cctor";

/// Build a `MalformedSignature` error for `signature`.
fn malformed(signature: &str, reason: impl Into<String>) -> Error {
    return Error::MalformedSignature {
        reason: reason.into(),
        signature: signature.to_string(),
    };
}

/// Generic arity from the bracketed group after the member name: commas + 1, 0 when absent.
fn member_arity(after_name: &str) -> usize {
    let Some(group) = after_name.strip_prefix('[') else {
        return 0;
    };
    let Some(close) = group.find(']') else {
        return 0;
    };
    let inner = group.get(..close).unwrap_or("");
    return inner.matches(',').count().saturating_add(1);
}

/// Parse one chain segment such as ``GenericType`1``.
///
/// # Errors
///
/// Returns `Error::MalformedSignature` for an empty segment or a non-numeric arity.
fn parse_segment(signature: &str, segment: &str) -> Result<PathSegment, Error> {
    if segment.is_empty() {
        return Err(malformed(signature, "empty path segment"));
    }

    let Some((name, arity_text)) = segment.split_once('`') else {
        return Ok(PathSegment {
            arity: 0,
            name: segment.to_string(),
        });
    };

    let arity = arity_text
        .parse::<usize>()
        .map_err(|_err| return malformed(signature, format!("bad arity in `{segment}`")))?;
    return Ok(PathSegment {
        arity,
        name: name.to_string(),
    });
}

/// Decode a parameter type token: trailing `&` is by-ref, then `[]` is array or `*` is pointer.
fn parse_parameter_type(token: &str) -> ParameterType {
    let (rest, is_by_ref) = match token.strip_suffix('&') {
        Some(rest) => (rest, true),
        None => (token, false),
    };

    if let Some(element) = rest.strip_suffix("[]") {
        return ParameterType {
            base_name: element.to_string(),
            is_array: true,
            is_by_ref,
            is_pointer: false,
        };
    }
    if let Some(pointee) = rest.strip_suffix('*') {
        return ParameterType {
            base_name: pointee.to_string(),
            is_array: false,
            is_by_ref,
            is_pointer: true,
        };
    }
    return ParameterType {
        base_name: rest.to_string(),
        is_array: false,
        is_by_ref,
        is_pointer: false,
    };
}

/// Parse the text between the parentheses. Each entry is `<type> <name>`; the name is discarded.
///
/// # Errors
///
/// Returns `Error::MalformedSignature` for a parameter without a space between type and name.
fn parse_parameters(signature: &str, list: &str) -> Result<Vec<ParameterType>, Error> {
    let mut parameters = Vec::new();
    for raw in list.split(',') {
        let parameter = raw.trim();
        if parameter.is_empty() {
            continue;
        }
        let Some((type_token, _name)) = parameter.split_once(' ') else {
            return Err(malformed(
                signature,
                format!("parameter `{parameter}` has no name after its type"),
            ));
        };
        parameters.push(parse_parameter_type(type_token));
    }
    return Ok(parameters);
}

/// Parse raw signature text from a frame into container path, member and parameters.
///
/// # Errors
///
/// Returns `Error::MalformedSignature` when there is no parenthesis pair, a path
/// segment is empty or carries a non-numeric arity, or a parameter has no name.
pub fn parse_signature(signature: &str) -> Result<ParsedSignature, Error> {
    let Some(open) = signature.find('(') else {
        return Err(malformed(signature, "no opening parenthesis"));
    };
    let head = signature.get(..open).unwrap_or("");
    let tail = signature.get(open.saturating_add(1)..).unwrap_or("");
    let Some(close) = tail.find(')') else {
        return Err(malformed(signature, "no closing parenthesis"));
    };
    let parameter_list = tail.get(..close).unwrap_or("");

    let (chain, member) = split_member(head);
    let name_end = member.find('[').unwrap_or(member.len());
    let member_name = member.get(..name_end).unwrap_or("");
    if member_name.is_empty() {
        return Err(malformed(signature, "empty member name"));
    }

    let containers = if chain.is_empty() {
        Vec::new()
    } else {
        chain
            .split(is_path_separator)
            .map(|segment| return parse_segment(signature, segment))
            .collect::<Result<Vec<_>, _>>()?
    };

    return Ok(ParsedSignature {
        containers,
        member_arity: member_arity(member.get(name_end..).unwrap_or("")),
        member_name: member_name.to_string(),
        parameters: parse_parameters(signature, parameter_list)?,
    });
}

/// `.` separates namespaces and types; `+` separates nested types.
const fn is_path_separator(c: char) -> bool {
    return c == '.' || c == '+';
}

/// Split the text before `(` into the container chain and the member token.
///
/// Constructor names start with a dot, so `Customer..ctor` splits into
/// `Customer` and `.ctor` rather than at the last dot.
fn split_member(head: &str) -> (&str, &str) {
    for constructor in [STATIC_CONSTRUCTOR_NAME, CONSTRUCTOR_NAME] {
        let Some(chain) = head.strip_suffix(constructor) else {
            continue;
        };
        if chain.is_empty() {
            return ("", constructor);
        }
        if let Some(chain) = chain.strip_suffix(is_path_separator) {
            return (chain, constructor);
        }
    }

    let name_end = head.find('[').unwrap_or(head.len());
    let name_part = head.get(..name_end).unwrap_or(head);
    return match name_part.rfind(is_path_separator) {
        None => ("", head),
        Some(separator) => (
            head.get(..separator).unwrap_or(""),
            head.get(separator.saturating_add(1)..).unwrap_or(""),
        ),
    };
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;

    fn segment(name: &str, arity: usize) -> PathSegment {
        return PathSegment {
            arity,
            name: name.to_string(),
        };
    }

    fn encoded(parsed: &ParsedSignature) -> Vec<String> {
        return parsed.parameters.iter().map(ParameterType::encoded).collect();
    }

    #[test]
    fn zero_parameter_method() {
        let parsed = parse_signature("Program.Main()").unwrap();
        assert_eq!(parsed.containers, vec![segment("Program", 0)]);
        assert_eq!(parsed.member_name, "Main");
        assert_eq!(parsed.member_arity, 0);
        assert!(parsed.parameters.is_empty());
    }

    #[test]
    fn namespaces_and_generic_type() {
        let parsed = parse_signature("Acme.Core.Outer`2.Run(Int32 x)").unwrap();
        assert_eq!(
            parsed.containers,
            vec![segment("Acme", 0), segment("Core", 0), segment("Outer", 2)]
        );
        assert_eq!(parsed.member_name, "Run");
    }

    #[test]
    fn nested_type_separator() {
        let parsed = parse_signature("Outer+Inner`1.Run()").unwrap();
        assert_eq!(parsed.containers, vec![segment("Outer", 0), segment("Inner", 1)]);
    }

    #[test]
    fn generic_method_arity() {
        let parsed = parse_signature("Program.Test[T](T x)").unwrap();
        assert_eq!(parsed.member_name, "Test");
        assert_eq!(parsed.member_arity, 1);
        assert_eq!(encoded(&parsed), vec!["T"]);

        let parsed = parse_signature("Program.Swap[TKey,TValue](TKey a, TValue b)").unwrap();
        assert_eq!(parsed.member_arity, 2);
    }

    #[test]
    fn constructors_are_normalized() {
        let parsed = parse_signature("Customer..ctor()").unwrap();
        assert_eq!(parsed.containers, vec![segment("Customer", 0)]);
        assert_eq!(parsed.member_name, CONSTRUCTOR_NAME);

        let parsed = parse_signature("Acme.Customer..cctor()").unwrap();
        assert_eq!(parsed.containers.len(), 2);
        assert_eq!(parsed.member_name, STATIC_CONSTRUCTOR_NAME);
    }

    #[test]
    fn parameter_encodings_keep_order() {
        let parsed = parse_signature(
            "Program.Test(Int32[] a, Int32* b, Int32& c, IEnumerable`1 d, Int32[]& e)",
        )
        .unwrap();
        assert_eq!(
            encoded(&parsed),
            vec!["Int32[]", "Int32*", "Int32&", "IEnumerable`1", "Int32[]&"]
        );
        let by_ref = parsed.parameters.get(4).unwrap();
        assert!(by_ref.is_array && by_ref.is_by_ref && !by_ref.is_pointer);
    }

    #[test]
    fn missing_parenthesis_is_malformed() {
        let err = parse_signature("Program.X.get").unwrap_err();
        assert!(matches!(err, Error::MalformedSignature { .. }));
        assert!(parse_signature("Program.Main(").is_err());
    }

    #[test]
    fn parameter_without_name_is_malformed() {
        let err = parse_signature("Program.Test(Int32)").unwrap_err();
        let Error::MalformedSignature { reason, .. } = err else {
            panic!("expected MalformedSignature");
        };
        assert!(reason.contains("Int32"));
    }

    #[test]
    fn bad_arity_is_malformed() {
        assert!(parse_signature("Generic`x.Run()").is_err());
        assert!(parse_signature("A..B()").is_err());
    }

    #[test]
    fn global_method_has_no_containers() {
        let parsed = parse_signature("Main()").unwrap();
        assert!(parsed.containers.is_empty());
        assert_eq!(parsed.member_name, "Main");
    }
}
