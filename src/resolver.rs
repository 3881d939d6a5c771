//! Symbol resolution: walk a parsed signature down through an ordered list of models.

use tracing::debug;

use crate::error::Error;
use crate::model::{SemanticModel, SymbolKind};
use crate::signature::parse_signature;
use crate::types::{ParsedSignature, PathSegment};

/// A symbol together with the model that owns it.
#[derive(Debug)]
pub struct Resolved<'m, M: SemanticModel> {
    /// Model the symbol was found in.
    pub model: &'m M,
    /// The method symbol.
    pub symbol: M::Symbol,
}

/// Display text of a symbol, used in ambiguity reports.
fn display_text<M: SemanticModel>(model: &M, symbol: &M::Symbol) -> String {
    return model.display_parts(symbol).iter().map(|p| return p.text.as_str()).collect();
}

/// Whether a method's declared parameters equal the frame's, position for position.
fn parameters_match<M: SemanticModel>(
    model: &M,
    method: &M::Symbol,
    parsed: &ParsedSignature,
) -> bool {
    let declared = model.parameters(method);
    if declared.len() != parsed.parameters.len() {
        return false;
    }
    return declared
        .iter()
        .zip(&parsed.parameters)
        .all(|(d, p)| return d.encoded() == p.encoded());
}

/// Resolve signature text against `models`, trying each in order.
///
/// # Errors
///
/// Returns `Error::MalformedSignature` if the text does not parse,
/// `Error::AmbiguousMember` if some model held several equally good candidates,
/// or `Error::UnresolvedMember` if no model held the method.
pub fn resolve<'m, M: SemanticModel>(
    models: &'m [M],
    signature: &str,
) -> Result<Resolved<'m, M>, Error> {
    let parsed = parse_signature(signature)?;
    return resolve_parsed(models, &parsed, signature);
}

/// Resolve an already parsed signature against a single model.
///
/// # Errors
///
/// Returns `Error::UnresolvedMember` naming the first path step that found
/// nothing, or `Error::AmbiguousMember` if the final step matched more than once.
pub fn resolve_in<M: SemanticModel>(
    model: &M,
    parsed: &ParsedSignature,
    signature: &str,
) -> Result<M::Symbol, Error> {
    let mut container = model.global_namespace();
    for segment in &parsed.containers {
        let found = model.members(&container, &segment.name).into_iter().find(|member| {
            return match model.kind(member) {
                SymbolKind::Namespace => true,
                SymbolKind::Type => model.generic_arity(member) == segment.arity,
                SymbolKind::Event | SymbolKind::Method | SymbolKind::Property => false,
            };
        });
        let Some(next) = found else {
            return Err(Error::UnresolvedMember {
                segment: segment_text(segment),
                signature: signature.to_string(),
            });
        };
        container = next;
    }

    let mut candidates: Vec<M::Symbol> = model
        .members(&container, &parsed.member_name)
        .into_iter()
        .filter(|member| {
            return model.kind(member) == SymbolKind::Method
                && model.generic_arity(member) == parsed.member_arity
                && parameters_match(model, member, parsed);
        })
        .collect();

    return match candidates.len() {
        0 => Err(Error::UnresolvedMember {
            segment: parsed.member_name.clone(),
            signature: signature.to_string(),
        }),
        1 => candidates.pop().ok_or_else(|| {
            return Error::UnresolvedMember {
                segment: parsed.member_name.clone(),
                signature: signature.to_string(),
            };
        }),
        _ => Err(Error::AmbiguousMember {
            candidates: candidates.iter().map(|c| return display_text(model, c)).collect(),
            segment: parsed.member_name.clone(),
            signature: signature.to_string(),
        }),
    };
}

/// Try each model in order; the first success wins.
///
/// When every model fails, an ambiguity is reported in preference to a miss,
/// and otherwise the first model's miss is reported.
///
/// # Errors
///
/// Returns `Error::AmbiguousMember` or `Error::UnresolvedMember` as described above.
pub fn resolve_parsed<'m, M: SemanticModel>(
    models: &'m [M],
    parsed: &ParsedSignature,
    signature: &str,
) -> Result<Resolved<'m, M>, Error> {
    let mut first_miss = None;
    let mut first_ambiguity = None;

    for (index, model) in models.iter().enumerate() {
        match resolve_in(model, parsed, signature) {
            Ok(symbol) => return Ok(Resolved { model, symbol }),
            Err(err) => {
                debug!(model = index, %err, "signature not resolved in model");
                if matches!(err, Error::AmbiguousMember { .. }) {
                    first_ambiguity.get_or_insert(err);
                } else {
                    first_miss.get_or_insert(err);
                }
            },
        }
    }

    return Err(first_ambiguity.or(first_miss).unwrap_or_else(|| {
        return Error::UnresolvedMember {
            segment: parsed.member_name.clone(),
            signature: signature.to_string(),
        };
    }));
}

/// Segment as it was written, arity suffix included.
fn segment_text(segment: &PathSegment) -> String {
    if segment.arity == 0 {
        return segment.name.clone();
    }
    return format!("{}`{}", segment.name, segment.arity);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;
    use crate::model::{Parameter, RefKind, TypeShape};
    use crate::program::tests::{method, param};
    use crate::program::{AccessorKind, ParameterDecl, ProgramModel, SymbolId};
    use crate::signature::CONSTRUCTOR_NAME;

    /// `Program` with overloads, a property, a nested generic type and a namespace.
    fn sample() -> (ProgramModel, Vec<SymbolId>) {
        let mut model = ProgramModel::new("sample");
        let root = model.global_namespace();
        let program = model.add_type(root, "Program", Vec::new(), None);
        let main = model.add_method(program, method("Main", Vec::new()));
        let by_int = model.add_method(program, method("Test", vec![param("Int32", "int")]));
        let by_string = model.add_method(program, method("Test", vec![param("String", "string")]));
        let by_ref = model.add_method(
            program,
            method(
                "Test",
                vec![ParameterDecl {
                    modifier: Some("out".to_string()),
                    parameter: Parameter {
                        ref_kind: RefKind::Out,
                        ty: TypeShape::Named("Int32".to_string()),
                    },
                    type_text: "int".to_string(),
                }],
            ),
        );
        let x = model.add_property(program, "X", None);
        let getter = model.add_accessor(x, AccessorKind::Get, Vec::new(), None);

        let ns = model.add_namespace(root, "Acme");
        let generic = model.add_type(ns, "Box", vec!["T".to_string()], None);
        let ctor = model.add_method(generic, method(CONSTRUCTOR_NAME, Vec::new()));
        let mut generic_method = method("Map", vec![param("T", "T")]);
        generic_method.type_parameters = vec!["U".to_string()];
        let map = model.add_method(generic, generic_method);

        return (model, vec![main, by_int, by_string, by_ref, getter, ctor, map]);
    }

    fn resolve_one(model: &ProgramModel, signature: &str) -> Result<SymbolId, Error> {
        let parsed = parse_signature(signature)?;
        return resolve_in(model, &parsed, signature);
    }

    #[test]
    fn overloads_resolve_by_parameter_types() {
        let (model, ids) = sample();
        assert_eq!(resolve_one(&model, "Program.Main()").unwrap(), ids[0]);
        assert_eq!(resolve_one(&model, "Program.Test(Int32 x)").unwrap(), ids[1]);
        assert_eq!(resolve_one(&model, "Program.Test(String s)").unwrap(), ids[2]);
        assert_eq!(resolve_one(&model, "Program.Test(Int32& x)").unwrap(), ids[3]);
    }

    #[test]
    fn accessor_and_constructor_resolve() {
        let (model, ids) = sample();
        assert_eq!(resolve_one(&model, "Program.get_X()").unwrap(), ids[4]);
        assert_eq!(resolve_one(&model, "Acme.Box`1..ctor()").unwrap(), ids[5]);
        assert_eq!(resolve_one(&model, "Acme.Box`1.Map[U](T value)").unwrap(), ids[6]);
    }

    #[test]
    fn arity_mismatch_is_unresolved() {
        let (model, _) = sample();
        let err = resolve_one(&model, "Acme.Box.Map[U](T value)").unwrap_err();
        let Error::UnresolvedMember { segment, .. } = err else {
            panic!("expected UnresolvedMember");
        };
        assert_eq!(segment, "Box");

        let err = resolve_one(&model, "Acme.Box`1.Map(T value)").unwrap_err();
        assert!(matches!(err, Error::UnresolvedMember { segment, .. } if segment == "Map"));
    }

    #[test]
    fn parameter_count_mismatch_is_unresolved() {
        let (model, _) = sample();
        assert!(resolve_one(&model, "Program.Main(Int32 x)").is_err());
        assert!(resolve_one(&model, "Program.Test()").is_err());
    }

    #[test]
    fn duplicate_members_are_ambiguous() {
        let mut model = ProgramModel::new("dupes");
        let root = model.global_namespace();
        let program = model.add_type(root, "Program", Vec::new(), None);
        model.add_method(program, method("Run", Vec::new()));
        model.add_method(program, method("Run", Vec::new()));

        let err = resolve_one(&model, "Program.Run()").unwrap_err();
        let Error::AmbiguousMember { candidates, .. } = err else {
            panic!("expected AmbiguousMember");
        };
        assert_eq!(candidates, vec!["Program.Run()", "Program.Run()"]);
    }

    #[test]
    fn models_are_tried_in_order() {
        let (first, _) = sample();
        let mut second = ProgramModel::new("second");
        let root = second.global_namespace();
        let other = second.add_type(root, "Other", Vec::new(), None);
        let run = second.add_method(other, method("Run", Vec::new()));
        let models = vec![first, second];

        let resolved = resolve(&models, "Other.Run()").unwrap();
        assert_eq!(resolved.symbol, run);
        assert_eq!(resolved.model.model_name(), "second");

        let resolved = resolve(&models, "Program.Main()").unwrap();
        assert_eq!(resolved.model.model_name(), "sample");
    }

    #[test]
    fn no_models_is_unresolved() {
        let models: Vec<ProgramModel> = Vec::new();
        let err = resolve(&models, "Program.Main()").unwrap_err();
        assert!(matches!(err, Error::UnresolvedMember { .. }));
    }

    #[test]
    fn malformed_text_is_reported() {
        let (model, _) = sample();
        let err = resolve(&[model], "Program.Test(Int32)").unwrap_err();
        assert!(matches!(err, Error::MalformedSignature { .. }));
    }
}
