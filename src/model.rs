//! The semantic program model a trace is resolved against.
//!
//! Implementations own their symbols; this crate only reads them through
//! [`SemanticModel`] and never outlives the model it was given.

use std::fmt::Debug;

use serde::Serialize;

/// What a symbol declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// An event with add/remove accessors.
    Event,
    /// A method, constructor, or accessor body.
    Method,
    /// A namespace; matched by name only.
    Namespace,
    /// A property with get/set accessors.
    Property,
    /// A class, struct, interface, record, or enum.
    Type,
}

impl SymbolKind {
    /// Lowercase name, as serialized.
    pub const fn as_str(self) -> &'static str {
        return match self {
            Self::Event => "event",
            Self::Method => "method",
            Self::Namespace => "namespace",
            Self::Property => "property",
            Self::Type => "type",
        };
    }
}

/// How a parameter is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefKind {
    /// `in`
    In,
    /// By value.
    #[default]
    None,
    /// `out`
    Out,
    /// `ref`
    Ref,
}

/// Shape of a parameter's type, reduced to metadata names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// Single-dimension array of the named element.
    Array(String),
    /// Any other type, by metadata name (``List`1``, `Int32`, `T`).
    Named(String),
    /// Pointer to the named type.
    Pointer(String),
}

/// One declared parameter of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// How the argument is passed.
    pub ref_kind: RefKind,
    /// Type of the parameter.
    pub ty: TypeShape,
}

impl Parameter {
    /// Encode the way runtime frames spell parameter types:
    /// `Int32`, `Int32[]`, `Int32*`, with a trailing `&` for any by-reference parameter.
    pub fn encoded(&self) -> String {
        let mut out = match &self.ty {
            TypeShape::Array(element) => format!("{element}[]"),
            TypeShape::Named(name) => name.clone(),
            TypeShape::Pointer(pointee) => format!("{pointee}*"),
        };
        if self.ref_kind != RefKind::None {
            out.push('&');
        }
        return out;
    }
}

/// Classification of a display part, for renderers that colour by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    /// Event name.
    EventName,
    /// Language keyword (`get`, `out`, `int`).
    Keyword,
    /// Method or constructor name.
    MethodName,
    /// Namespace name.
    NamespaceName,
    /// Parameter type that is not a keyword.
    ParameterType,
    /// Property name.
    PropertyName,
    /// `.`, `(`, `<`, `,` and friends.
    Punctuation,
    /// Whitespace.
    Space,
    /// Name of a declared type.
    TypeName,
    /// Generic type parameter.
    TypeParameterName,
}

/// One piece of a symbol's display form.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayPart<S> {
    /// Role of the text.
    pub kind: PartKind,
    /// Symbol the text names, if the model exposes one.
    pub symbol: Option<S>,
    /// Display text.
    pub text: String,
}

/// Read-only view of a compiled program's declarations.
///
/// This is the only seam between the resolver and whatever built the program
/// model. All lookups are by name within a container; nothing is global.
pub trait SemanticModel {
    /// Opaque handle to a declaration owned by the model.
    type Symbol: Clone + PartialEq + Debug;

    /// Symbol associated with an accessor method: its property or event.
    fn associated_symbol(&self, method: &Self::Symbol) -> Option<Self::Symbol>;

    /// Short display form: container types, member name, parameter types.
    fn display_parts(&self, symbol: &Self::Symbol) -> Vec<DisplayPart<Self::Symbol>>;

    /// Generic arity of a type or method; 0 for everything else.
    fn generic_arity(&self, symbol: &Self::Symbol) -> usize;

    /// The root namespace every lookup starts from.
    fn global_namespace(&self) -> Self::Symbol;

    /// What the symbol declares.
    fn kind(&self, symbol: &Self::Symbol) -> SymbolKind;

    /// Members of `container` named `name`, in declaration order.
    fn members(&self, container: &Self::Symbol, name: &str) -> Vec<Self::Symbol>;

    /// Metadata name (`get_X`, `.ctor`, `GenericType`).
    fn name(&self, symbol: &Self::Symbol) -> &str;

    /// Declared parameters of a method, empty for anything else.
    fn parameters(&self, method: &Self::Symbol) -> &[Parameter];
}
