//! In-memory program model: an arena of declarations implementing [`SemanticModel`].
//!
//! Front ends (see `csharp`) populate it; the resolver only reads it.

use std::path::PathBuf;

use serde::Serialize;

use crate::model::{DisplayPart, Parameter, PartKind, SemanticModel, SymbolKind};
use crate::signature::{CONSTRUCTOR_NAME, STATIC_CONSTRUCTOR_NAME};

/// Metadata name of a destructor.
pub const DESTRUCTOR_NAME: &str = "Finalize";

/// C# keywords that name framework types; rendered as keywords in display parts.
const TYPE_KEYWORDS: &[&str] = &[
    "bool", "byte", "char", "decimal", "double", "dynamic", "float", "int", "long", "nint",
    "nuint", "object", "sbyte", "short", "string", "uint", "ulong", "ushort", "void",
];

/// Which accessor an accessor method implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    /// Event `add`.
    Add,
    /// Property `get`.
    Get,
    /// Property `init`; compiled as a setter.
    Init,
    /// Event `remove`.
    Remove,
    /// Property `set`.
    Set,
}

impl AccessorKind {
    /// Accessor keyword as written in source.
    pub const fn keyword(self) -> &'static str {
        return match self {
            Self::Add => "add",
            Self::Get => "get",
            Self::Init => "init",
            Self::Remove => "remove",
            Self::Set => "set",
        };
    }

    /// Prefix of the compiled accessor method name (`get` in `get_X`).
    pub const fn metadata_prefix(self) -> &'static str {
        return match self {
            Self::Add => "add",
            Self::Get => "get",
            Self::Init | Self::Set => "set",
            Self::Remove => "remove",
        };
    }

    /// Parse an accessor keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        return match keyword {
            "add" => Some(Self::Add),
            "get" => Some(Self::Get),
            "init" => Some(Self::Init),
            "remove" => Some(Self::Remove),
            "set" => Some(Self::Set),
            _ => None,
        };
    }
}

/// A method parameter with the extra detail needed to display it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDecl {
    /// Modifier keyword shown before the type (`out`, `ref`, `in`, `params`, `this`).
    pub modifier: Option<String>,
    /// What the resolver compares.
    pub parameter: Parameter,
    /// Type as written in source, whitespace-normalized.
    pub type_text: String,
}

/// Everything needed to declare a method.
#[derive(Debug, Clone, Default)]
pub struct MethodDecl {
    /// Where the method is declared.
    pub location: Option<SourceLocation>,
    /// Metadata name; use [`CONSTRUCTOR_NAME`] and friends for special members.
    pub name: String,
    /// Parameters in declaration order.
    pub parameters: Vec<ParameterDecl>,
    /// Generic type parameter names.
    pub type_parameters: Vec<String>,
}

/// Position of a declaration in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// 1-based column.
    pub column: u32,
    /// File containing the declaration.
    pub file: PathBuf,
    /// 1-based line.
    pub line: u32,
}

/// Handle to a declaration in a [`ProgramModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(usize);

/// Stored declaration.
#[derive(Debug, Clone)]
struct SymbolData {
    /// Accessor role, for accessor methods.
    accessor: Option<AccessorKind>,
    /// Property or event an accessor belongs to.
    associated: Option<SymbolId>,
    /// Members in declaration order.
    children: Vec<SymbolId>,
    /// What the symbol declares.
    kind: SymbolKind,
    /// Declaration site.
    location: Option<SourceLocation>,
    /// Metadata name.
    name: String,
    /// Parameters with display detail.
    parameter_decls: Vec<ParameterDecl>,
    /// Parameters as the resolver sees them; parallel to `parameter_decls`.
    parameters: Vec<Parameter>,
    /// Containing namespace or type; `None` only for the global namespace.
    parent: Option<SymbolId>,
    /// Generic type parameter names.
    type_parameters: Vec<String>,
}

impl SymbolData {
    /// A declaration with no members, parameters or location.
    const fn new(kind: SymbolKind, name: String, parent: Option<SymbolId>) -> Self {
        return Self {
            accessor: None,
            associated: None,
            children: Vec::new(),
            kind,
            location: None,
            name,
            parameter_decls: Vec::new(),
            parameters: Vec::new(),
            parent,
            type_parameters: Vec::new(),
        };
    }
}

/// Declarations of one program, rooted at the global namespace.
#[derive(Debug, Clone)]
pub struct ProgramModel {
    /// Human-readable name, usually the project name.
    name: String,
    /// Arena; index 0 is the global namespace.
    symbols: Vec<SymbolData>,
}

impl ProgramModel {
    /// Declare an accessor method for a property or event.
    ///
    /// The method lands next to its owner, named `get_X` / `set_X` / `add_X` / `remove_X`.
    pub fn add_accessor(
        &mut self,
        owner: SymbolId,
        accessor: AccessorKind,
        parameters: Vec<ParameterDecl>,
        location: Option<SourceLocation>,
    ) -> SymbolId {
        let owner_name = self.name(&owner).to_string();
        let parent = self.parent(owner).unwrap_or_else(|| return self.global_namespace());
        let method = self.add_method(
            parent,
            MethodDecl {
                location,
                name: format!("{}_{owner_name}", accessor.metadata_prefix()),
                parameters,
                type_parameters: Vec::new(),
            },
        );
        if let Some(data) = self.symbols.get_mut(method.0) {
            data.accessor = Some(accessor);
            data.associated = Some(owner);
        }
        return method;
    }

    /// Declare an event in a type.
    pub fn add_event(
        &mut self,
        parent: SymbolId,
        name: &str,
        location: Option<SourceLocation>,
    ) -> SymbolId {
        return self.push(parent, SymbolKind::Event, name, location);
    }

    /// Declare a method in a type or namespace.
    pub fn add_method(&mut self, parent: SymbolId, decl: MethodDecl) -> SymbolId {
        let id = self.push(parent, SymbolKind::Method, &decl.name, decl.location);
        if let Some(data) = self.symbols.get_mut(id.0) {
            data.parameters = decl.parameters.iter().map(|p| return p.parameter.clone()).collect();
            data.parameter_decls = decl.parameters;
            data.type_parameters = decl.type_parameters;
        }
        return id;
    }

    /// Get or create the namespace `name` under `parent`.
    pub fn add_namespace(&mut self, parent: SymbolId, name: &str) -> SymbolId {
        let existing = self
            .members(&parent, name)
            .into_iter()
            .find(|id| return self.kind(id) == SymbolKind::Namespace);
        return existing.unwrap_or_else(|| return self.push(parent, SymbolKind::Namespace, name, None));
    }

    /// Declare a property in a type.
    pub fn add_property(
        &mut self,
        parent: SymbolId,
        name: &str,
        location: Option<SourceLocation>,
    ) -> SymbolId {
        return self.push(parent, SymbolKind::Property, name, location);
    }

    /// Get or create a type by name and generic arity, so partial declarations merge.
    ///
    /// The first declaration's location wins.
    pub fn add_type(
        &mut self,
        parent: SymbolId,
        name: &str,
        type_parameters: Vec<String>,
        location: Option<SourceLocation>,
    ) -> SymbolId {
        let arity = type_parameters.len();
        let existing = self.members(&parent, name).into_iter().find(|id| {
            return self.kind(id) == SymbolKind::Type && self.generic_arity(id) == arity;
        });
        if let Some(id) = existing {
            return id;
        }

        let id = self.push(parent, SymbolKind::Type, name, location);
        if let Some(data) = self.symbols.get_mut(id.0) {
            data.type_parameters = type_parameters;
        }
        return id;
    }

    /// Append type-parameter display parts (`<T, U>`).
    fn append_type_parameters(&self, id: SymbolId, parts: &mut Vec<DisplayPart<SymbolId>>) {
        let Some(data) = self.symbols.get(id.0) else {
            return;
        };
        if data.type_parameters.is_empty() {
            return;
        }
        parts.push(part(PartKind::Punctuation, "<", None));
        for (index, type_parameter) in data.type_parameters.iter().enumerate() {
            if index > 0 {
                parts.push(part(PartKind::Punctuation, ",", None));
                parts.push(part(PartKind::Space, " ", None));
            }
            parts.push(part(PartKind::TypeParameterName, type_parameter, None));
        }
        parts.push(part(PartKind::Punctuation, ">", None));
        return;
    }

    /// Containing types of `id` (outermost first), each followed by a dot. Namespaces are omitted.
    fn container_parts(&self, id: SymbolId) -> Vec<DisplayPart<SymbolId>> {
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(container) = current {
            if self.kind(&container) != SymbolKind::Type {
                break;
            }
            chain.push(container);
            current = self.parent(container);
        }

        let mut parts = Vec::new();
        for container in chain.into_iter().rev() {
            parts.push(part(PartKind::TypeName, self.name(&container), Some(container)));
            self.append_type_parameters(container, &mut parts);
            parts.push(part(PartKind::Punctuation, ".", None));
        }
        return parts;
    }

    /// Every method in the model, in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = SymbolId> + '_ {
        return self
            .symbols
            .iter()
            .enumerate()
            .filter(|(_, data)| return data.kind == SymbolKind::Method)
            .map(|(index, _)| return SymbolId(index));
    }

    /// Display parts of a method: name or accessor keyword, type parameters, parameter list.
    fn method_parts(&self, id: SymbolId, data: &SymbolData) -> Vec<DisplayPart<SymbolId>> {
        if let (Some(accessor), Some(owner)) = (data.accessor, data.associated) {
            let mut parts = self.container_parts(owner);
            let owner_kind = match self.kind(&owner) {
                SymbolKind::Event => PartKind::EventName,
                _ => PartKind::PropertyName,
            };
            parts.push(part(owner_kind, self.name(&owner), Some(owner)));
            parts.push(part(PartKind::Punctuation, ".", None));
            parts.push(part(PartKind::Keyword, accessor.keyword(), None));
            return parts;
        }

        let mut parts = self.container_parts(id);
        let type_name = data.parent.map_or("", |p| return self.name(&p));
        let shown_name = match data.name.as_str() {
            CONSTRUCTOR_NAME | STATIC_CONSTRUCTOR_NAME => type_name.to_string(),
            DESTRUCTOR_NAME => format!("~{type_name}"),
            other => other.to_string(),
        };
        parts.push(part(PartKind::MethodName, &shown_name, Some(id)));
        self.append_type_parameters(id, &mut parts);

        parts.push(part(PartKind::Punctuation, "(", None));
        for (index, decl) in data.parameter_decls.iter().enumerate() {
            if index > 0 {
                parts.push(part(PartKind::Punctuation, ",", None));
                parts.push(part(PartKind::Space, " ", None));
            }
            if let Some(modifier) = &decl.modifier {
                parts.push(part(PartKind::Keyword, modifier, None));
                parts.push(part(PartKind::Space, " ", None));
            }
            let kind = if TYPE_KEYWORDS.contains(&decl.type_text.as_str()) {
                PartKind::Keyword
            } else {
                PartKind::ParameterType
            };
            parts.push(part(kind, &decl.type_text, None));
        }
        parts.push(part(PartKind::Punctuation, ")", None));
        return parts;
    }

    /// Create an empty model containing only the global namespace.
    pub fn new(name: &str) -> Self {
        return Self {
            name: name.to_string(),
            symbols: vec![SymbolData::new(SymbolKind::Namespace, String::new(), None)],
        };
    }

    /// Name the model was created with.
    pub fn model_name(&self) -> &str {
        return &self.name;
    }

    /// Declaration site of a symbol, when known.
    pub fn location(&self, id: SymbolId) -> Option<&SourceLocation> {
        return self.symbols.get(id.0).and_then(|data| return data.location.as_ref());
    }

    /// Containing namespace or type.
    pub fn parent(&self, id: SymbolId) -> Option<SymbolId> {
        return self.symbols.get(id.0).and_then(|data| return data.parent);
    }

    /// Store a new symbol and register it with its parent.
    fn push(
        &mut self,
        parent: SymbolId,
        kind: SymbolKind,
        name: &str,
        location: Option<SourceLocation>,
    ) -> SymbolId {
        let id = SymbolId(self.symbols.len());
        let mut data = SymbolData::new(kind, name.to_string(), Some(parent));
        data.location = location;
        self.symbols.push(data);
        if let Some(parent_data) = self.symbols.get_mut(parent.0) {
            parent_data.children.push(id);
        }
        return id;
    }

    /// Fully qualified dotted name, for tooltips and JSON output.
    pub fn qualified_name(&self, id: SymbolId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(symbol) = current {
            let name = self.name(&symbol);
            if !name.is_empty() {
                names.push(name.to_string());
            }
            current = self.parent(symbol);
        }
        names.reverse();
        return names.join(".");
    }

    /// Number of declarations, the global namespace included.
    pub fn symbol_count(&self) -> usize {
        return self.symbols.len();
    }
}

impl SemanticModel for ProgramModel {
    type Symbol = SymbolId;

    fn associated_symbol(&self, method: &SymbolId) -> Option<SymbolId> {
        return self.symbols.get(method.0).and_then(|data| return data.associated);
    }

    fn display_parts(&self, symbol: &SymbolId) -> Vec<DisplayPart<SymbolId>> {
        let Some(data) = self.symbols.get(symbol.0) else {
            return Vec::new();
        };

        return match data.kind {
            SymbolKind::Method => self.method_parts(*symbol, data),
            SymbolKind::Namespace => {
                vec![part(PartKind::NamespaceName, &self.qualified_name(*symbol), Some(*symbol))]
            },
            SymbolKind::Event | SymbolKind::Property | SymbolKind::Type => {
                let mut parts = self.container_parts(*symbol);
                let kind = match data.kind {
                    SymbolKind::Event => PartKind::EventName,
                    SymbolKind::Property => PartKind::PropertyName,
                    _ => PartKind::TypeName,
                };
                parts.push(part(kind, &data.name, Some(*symbol)));
                self.append_type_parameters(*symbol, &mut parts);
                parts
            },
        };
    }

    fn generic_arity(&self, symbol: &SymbolId) -> usize {
        return self.symbols.get(symbol.0).map_or(0, |data| return data.type_parameters.len());
    }

    fn global_namespace(&self) -> SymbolId {
        return SymbolId(0);
    }

    fn kind(&self, symbol: &SymbolId) -> SymbolKind {
        return self.symbols.get(symbol.0).map_or(SymbolKind::Namespace, |data| return data.kind);
    }

    fn members(&self, container: &SymbolId, name: &str) -> Vec<SymbolId> {
        let Some(data) = self.symbols.get(container.0) else {
            return Vec::new();
        };
        return data
            .children
            .iter()
            .copied()
            .filter(|child| return self.name(child) == name)
            .collect();
    }

    fn name(&self, symbol: &SymbolId) -> &str {
        return self.symbols.get(symbol.0).map_or("", |data| return data.name.as_str());
    }

    fn parameters(&self, method: &SymbolId) -> &[Parameter] {
        return self.symbols.get(method.0).map_or(&[], |data| return data.parameters.as_slice());
    }
}

/// Build a display part.
fn part(kind: PartKind, text: &str, symbol: Option<SymbolId>) -> DisplayPart<SymbolId> {
    return DisplayPart {
        kind,
        symbol,
        text: text.to_string(),
    };
}
