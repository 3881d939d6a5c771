//! C# front end: build a [`ProgramModel`] from source files with tree-sitter.
//!
//! Declarations are found by walking the concrete syntax tree; parameter and
//! property types are decoded from their source text (see `typename`).

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;
use tree_sitter::{Node, Parser, Tree};

use crate::error::Error;
use crate::model::{Parameter, RefKind, SemanticModel};
use crate::program::{
    AccessorKind, DESTRUCTOR_NAME, MethodDecl, ParameterDecl, ProgramModel, SourceLocation,
    SymbolId,
};
use crate::signature::{CONSTRUCTOR_NAME, STATIC_CONSTRUCTOR_NAME};
use crate::typename::{normalize, split_top_level, type_shape};

/// Maximum source file size (16 MiB).
pub const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Node kinds that spell a type.
const TYPE_KINDS: &[&str] = &[
    "array_type",
    "generic_name",
    "identifier",
    "nullable_type",
    "pointer_type",
    "predefined_type",
    "qualified_name",
    "tuple_type",
];

/// Parameter modifiers; everything else before the name is the type.
const PARAMETER_MODIFIERS: &[&str] = &["in", "out", "params", "readonly", "ref", "scoped", "this"];

/// Accumulates declarations from many files into one program model.
///
/// Parameterless constructors the compiler would synthesize are only known once
/// every partial declaration has been seen, so they are added by [`CSharpLoader::finish`].
#[derive(Debug)]
pub struct CSharpLoader {
    /// Class types that get a default constructor unless they declare one.
    constructible: Vec<SymbolId>,
    /// The model under construction.
    model: ProgramModel,
    /// Types declared `static` in any of their parts.
    static_types: HashSet<SymbolId>,
}

impl CSharpLoader {
    /// Parse one file and add its declarations.
    ///
    /// Files with syntax errors contribute whatever tree-sitter recovered.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileTooLarge` if the source exceeds the size limit,
    /// or `Error::ParseFailed` if tree-sitter cannot parse it at all.
    pub fn add_source(&mut self, file: &Path, source: &str) -> Result<(), Error> {
        let source_len: u64 = source.len().try_into().unwrap_or(u64::MAX);
        if source_len > MAX_FILE_SIZE {
            return Err(Error::FileTooLarge {
                file: file.to_path_buf(),
                max_bytes: MAX_FILE_SIZE,
                size_bytes: source_len,
            });
        }

        let tree = parse_tree(file, source)?;
        let root = tree.root_node();
        if root.has_error() {
            debug!(file = %file.display(), "syntax errors, keeping recovered declarations");
        }

        let mut extractor = FileExtractor {
            file,
            loader: self,
            source,
        };
        extractor.compilation_unit(root);
        return Ok(());
    }

    /// Add synthesized constructors and hand over the model.
    pub fn finish(mut self) -> ProgramModel {
        for ty in self.constructible {
            if self.static_types.contains(&ty) || !self.model.members(&ty, CONSTRUCTOR_NAME).is_empty() {
                continue;
            }
            let location = self.model.location(ty).cloned();
            self.model.add_method(
                ty,
                MethodDecl {
                    location,
                    name: CONSTRUCTOR_NAME.to_string(),
                    ..MethodDecl::default()
                },
            );
        }
        return self.model;
    }

    /// Start an empty model named `name`.
    pub fn new(name: &str) -> Self {
        return Self {
            constructible: Vec::new(),
            model: ProgramModel::new(name),
            static_types: HashSet::new(),
        };
    }
}

/// Walks one file's tree, adding declarations to the loader's model.
struct FileExtractor<'l> {
    /// File being walked, recorded in locations.
    file: &'l Path,
    /// Destination model and bookkeeping.
    loader: &'l mut CSharpLoader,
    /// Source text the tree was parsed from.
    source: &'l str,
}

impl<'l> FileExtractor<'l> {
    /// Add accessors from an `accessor_list`, or a lone getter when there is none.
    fn accessors(
        &mut self,
        declaration: Node<'_>,
        owner: SymbolId,
        index_parameters: &[ParameterDecl],
        value_type: &str,
    ) {
        let Some(list) = child_of_kind(declaration, &["accessor_list"]) else {
            let location = self.location(declaration);
            self.loader
                .model
                .add_accessor(owner, AccessorKind::Get, index_parameters.to_vec(), location);
            return;
        };

        for accessor in named_children(list) {
            let Some(kind) = accessor_kind(accessor) else {
                continue;
            };
            let mut parameters = index_parameters.to_vec();
            if kind != AccessorKind::Get {
                parameters.push(value_parameter(value_type));
            }
            let location = self.location(accessor);
            self.loader.model.add_accessor(owner, kind, parameters, location);
        }
        return;
    }

    /// Top-level declarations; a file-scoped namespace captures every declaration after it.
    fn compilation_unit(&mut self, root: Node<'_>) {
        let global = self.loader.model.global_namespace();
        let mut scope = global;
        for child in named_children(root) {
            if child.kind() == "file_scoped_namespace_declaration" {
                scope = self.namespace_symbol(child, global);
                self.members(child, scope);
                continue;
            }
            self.declaration(child, scope);
        }
        return;
    }

    /// Instance or static constructor.
    fn constructor(&mut self, node: Node<'_>, container: SymbolId) {
        let name = if modifiers(node, self.source).contains(&"static") {
            STATIC_CONSTRUCTOR_NAME
        } else {
            CONSTRUCTOR_NAME
        };
        let decl = MethodDecl {
            location: self.location(node),
            name: name.to_string(),
            parameters: self.parameters(node),
            type_parameters: Vec::new(),
        };
        self.loader.model.add_method(container, decl);
        return;
    }

    /// Dispatch one member or top-level declaration by node kind.
    fn declaration(&mut self, node: Node<'_>, container: SymbolId) {
        match node.kind() {
            "class_declaration" | "delegate_declaration" | "enum_declaration"
            | "interface_declaration" | "record_declaration" | "record_struct_declaration"
            | "struct_declaration" => self.type_declaration(node, container),
            "constructor_declaration" => self.constructor(node, container),
            "conversion_operator_declaration" | "operator_declaration" => {
                self.operator(node, container);
            },
            "destructor_declaration" => self.destructor(node, container),
            "event_declaration" => self.event(node, container),
            "event_field_declaration" => self.event_fields(node, container),
            "indexer_declaration" => self.indexer(node, container),
            "method_declaration" => self.method(node, container),
            "namespace_declaration" => {
                let namespace = self.namespace_symbol(node, container);
                if let Some(body) = field_or_kind(node, "body", &["declaration_list"]) {
                    self.members(body, namespace);
                }
            },
            "property_declaration" => self.property(node, container),
            _ => {},
        }
        return;
    }

    /// `~Type()` compiles to `Finalize`.
    fn destructor(&mut self, node: Node<'_>, container: SymbolId) {
        let decl = MethodDecl {
            location: self.location(node),
            name: DESTRUCTOR_NAME.to_string(),
            parameters: Vec::new(),
            type_parameters: Vec::new(),
        };
        self.loader.model.add_method(container, decl);
        return;
    }

    /// Event with explicit `add`/`remove` accessors.
    fn event(&mut self, node: Node<'_>, container: SymbolId) {
        let Some(name) = self.member_name(node, &["accessor_list"]) else {
            return;
        };
        let event_type = self.type_text(node);
        let location = self.location(node);
        let event = self.loader.model.add_event(container, &name, location);
        self.accessors_or_field_pair(node, event, &event_type);
        return;
    }

    /// Explicit accessor list if present, else the field-like `add`/`remove` pair.
    fn accessors_or_field_pair(&mut self, node: Node<'_>, event: SymbolId, event_type: &str) {
        if child_of_kind(node, &["accessor_list"]).is_some() {
            self.accessors(node, event, &[], event_type);
            return;
        }
        for kind in [AccessorKind::Add, AccessorKind::Remove] {
            let location = self.location(node);
            self.loader
                .model
                .add_accessor(event, kind, vec![value_parameter(event_type)], location);
        }
        return;
    }

    /// `event EventHandler A, B;` declares one event per declarator.
    fn event_fields(&mut self, node: Node<'_>, container: SymbolId) {
        let Some(variables) = child_of_kind(node, &["variable_declaration"]) else {
            return;
        };
        let event_type = self.type_text(variables);
        for declarator in named_children(variables) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name_node) = field_or_kind(declarator, "name", &["identifier"]) else {
                continue;
            };
            let name = self.text(name_node).to_string();
            let location = self.location(declarator);
            let event = self.loader.model.add_event(container, &name, location);
            self.accessors_or_field_pair(declarator, event, &event_type);
        }
        return;
    }

    /// `this[...]` compiles to property `Item` with indexed accessors.
    fn indexer(&mut self, node: Node<'_>, container: SymbolId) {
        let index_parameters = child_of_kind(node, &["bracketed_parameter_list"])
            .map(|list| return parse_parameter_list(self.text(list)))
            .unwrap_or_default();
        let value_type = self.type_text(node);
        let location = self.location(node);
        let property = self.loader.model.add_property(container, "Item", location);
        self.accessors(node, property, &index_parameters, &value_type);
        return;
    }

    /// 1-based position of a node in the current file.
    fn location(&self, node: Node<'_>) -> Option<SourceLocation> {
        let position = node.start_position();
        return Some(SourceLocation {
            column: u32::try_from(position.column.saturating_add(1)).ok()?,
            file: self.file.to_path_buf(),
            line: u32::try_from(position.row.saturating_add(1)).ok()?,
        });
    }

    /// Name of a property, event or method: the `name` field, else the last
    /// identifier before any of `stop_kinds`.
    fn member_name(&self, node: Node<'_>, stop_kinds: &[&str]) -> Option<String> {
        if let Some(name) = node.child_by_field_name("name") {
            return Some(self.text(name).to_string());
        }
        let mut last = None;
        for child in named_children(node) {
            if stop_kinds.contains(&child.kind()) {
                break;
            }
            if child.kind() == "identifier" {
                last = Some(child);
            }
        }
        return last.map(|n| return self.text(n).to_string());
    }

    /// Walk a declaration list.
    fn members(&mut self, body: Node<'_>, container: SymbolId) {
        for child in named_children(body) {
            self.declaration(child, container);
        }
        return;
    }

    /// Ordinary method. The bodiless half of a partial method is skipped.
    fn method(&mut self, node: Node<'_>, container: SymbolId) {
        if modifiers(node, self.source).contains(&"partial") && !has_body(node) {
            return;
        }
        let Some(name) = self.member_name(node, &["parameter_list", "type_parameter_list"]) else {
            return;
        };
        let decl = MethodDecl {
            location: self.location(node),
            name,
            parameters: self.parameters(node),
            type_parameters: self.type_parameters(node),
        };
        self.loader.model.add_method(container, decl);
        return;
    }

    /// Get or create the (possibly dotted) namespace a declaration names.
    fn namespace_symbol(&mut self, node: Node<'_>, container: SymbolId) -> SymbolId {
        let Some(name_node) = field_or_kind(node, "name", &["identifier", "qualified_name"]) else {
            return container;
        };
        let name = self.text(name_node).to_string();
        let mut namespace = container;
        for part in name.split('.').map(str::trim).filter(|p| return !p.is_empty()) {
            namespace = self.loader.model.add_namespace(namespace, part);
        }
        return namespace;
    }

    /// User-defined operators compile to `op_*` methods.
    fn operator(&mut self, node: Node<'_>, container: SymbolId) {
        let parameters = self.parameters(node);
        let Some(name) = operator_name(node, parameters.len()) else {
            debug!(file = %self.file.display(), text = self.text(node), "unrecognized operator");
            return;
        };
        let decl = MethodDecl {
            location: self.location(node),
            name: name.to_string(),
            parameters,
            type_parameters: Vec::new(),
        };
        self.loader.model.add_method(container, decl);
        return;
    }

    /// Decoded parameters of a method-like declaration.
    fn parameters(&self, node: Node<'_>) -> Vec<ParameterDecl> {
        return field_or_kind(node, "parameters", &["parameter_list"])
            .map(|list| return parse_parameter_list(self.text(list)))
            .unwrap_or_default();
    }

    /// Property with accessors or an expression body.
    fn property(&mut self, node: Node<'_>, container: SymbolId) {
        let Some(name) = self.member_name(node, &["accessor_list", "arrow_expression_clause"]) else {
            return;
        };
        let property_type = self.type_text(node);
        let location = self.location(node);
        let property = self.loader.model.add_property(container, &name, location);
        self.accessors(node, property, &[], &property_type);
        return;
    }

    /// Record primary constructor parameters become `get`/`init` properties.
    fn record_properties(&mut self, parameters: &[ParameterDecl], container: SymbolId, node: Node<'_>) {
        let Some(list) = field_or_kind(node, "parameters", &["parameter_list"]) else {
            return;
        };
        let entries = split_top_level(strip_delimiters(self.text(list)), ',');
        for (decl, entry) in parameters.iter().zip(entries) {
            let Some(name) = parameter_name(entry) else {
                continue;
            };
            let location = self.location(list);
            let property = self.loader.model.add_property(container, &name, location.clone());
            self.loader.model.add_accessor(property, AccessorKind::Get, Vec::new(), location.clone());
            self.loader.model.add_accessor(
                property,
                AccessorKind::Init,
                vec![value_parameter(&decl.type_text)],
                location,
            );
        }
        return;
    }

    /// Source text of a node; empty if the bytes are not UTF-8.
    fn text(&self, node: Node<'_>) -> &'l str {
        return node.utf8_text(self.source.as_bytes()).unwrap_or("");
    }

    /// Class, struct, interface, record, enum or delegate, and its members.
    fn type_declaration(&mut self, node: Node<'_>, container: SymbolId) {
        let Some(name_node) = field_or_kind(node, "name", &["identifier"]) else {
            return;
        };
        let name = self.text(name_node).to_string();
        let type_parameters = self.type_parameters(node);
        let location = self.location(node);
        let ty = self.loader.model.add_type(container, &name, type_parameters, location);

        if modifiers(node, self.source).contains(&"static") {
            self.loader.static_types.insert(ty);
        }

        let is_struct_record = node.kind() == "record_struct_declaration"
            || (node.kind() == "record_declaration" && child_of_kind(node, &["struct"]).is_some());
        let is_class = node.kind() == "class_declaration"
            || (node.kind() == "record_declaration" && !is_struct_record);
        if is_class && !self.loader.constructible.contains(&ty) {
            self.loader.constructible.push(ty);
        }

        let is_record = node.kind().starts_with("record");
        if (is_class || is_record) && child_of_kind(node, &["parameter_list"]).is_some() {
            let parameters = self.parameters(node);
            if is_record {
                self.record_properties(&parameters, ty, node);
            }
            self.loader.model.add_method(
                ty,
                MethodDecl {
                    location: self.location(node),
                    name: CONSTRUCTOR_NAME.to_string(),
                    parameters,
                    type_parameters: Vec::new(),
                },
            );
        }

        if matches!(node.kind(), "delegate_declaration" | "enum_declaration") {
            return;
        }
        if let Some(body) = field_or_kind(node, "body", &["declaration_list"]) {
            self.members(body, ty);
        }
        return;
    }

    /// Names from a `type_parameter_list`, in order.
    fn type_parameters(&self, node: Node<'_>) -> Vec<String> {
        let Some(list) = field_or_kind(node, "type_parameters", &["type_parameter_list"]) else {
            return Vec::new();
        };
        return named_children(list)
            .into_iter()
            .filter(|p| return p.kind() == "type_parameter")
            .map(|p| {
                let name = field_or_kind(p, "name", &["identifier"]).unwrap_or(p);
                return self.text(name).to_string();
            })
            .collect();
    }

    /// Normalized text of the declaration's type.
    fn type_text(&self, node: Node<'_>) -> String {
        let type_node = node
            .child_by_field_name("type")
            .or_else(|| return child_of_kind(node, TYPE_KINDS));
        return type_node.map(|t| return normalize(self.text(t))).unwrap_or_default();
    }
}

/// Accessor role of an accessor declaration node.
fn accessor_kind(node: Node<'_>) -> Option<AccessorKind> {
    if let Some(prefix) = node.kind().strip_suffix("_accessor_declaration") {
        return AccessorKind::from_keyword(prefix);
    }
    if node.kind() != "accessor_declaration" {
        return None;
    }
    let mut cursor = node.walk();
    return node.children(&mut cursor).find_map(|c| return AccessorKind::from_keyword(c.kind()));
}

/// First direct child whose kind is in `kinds`.
fn child_of_kind<'t>(node: Node<'t>, kinds: &[&str]) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    return node.children(&mut cursor).find(|c| return kinds.contains(&c.kind()));
}

/// Child in field `field`, else the first child of one of `kinds`.
fn field_or_kind<'t>(node: Node<'t>, field: &str, kinds: &[&str]) -> Option<Node<'t>> {
    return node.child_by_field_name(field).or_else(|| return child_of_kind(node, kinds));
}

/// Whether a method has a block or expression body.
fn has_body(node: Node<'_>) -> bool {
    return node.child_by_field_name("body").is_some()
        || child_of_kind(node, &["arrow_expression_clause", "block"]).is_some();
}

/// Modifier keywords of a declaration.
fn modifiers<'s>(node: Node<'_>, source: &'s str) -> Vec<&'s str> {
    let mut cursor = node.walk();
    return node
        .children(&mut cursor)
        .filter(|c| return c.kind() == "modifier")
        .filter_map(|c| return c.utf8_text(source.as_bytes()).ok())
        .collect();
}

/// Named children, collected so callers can recurse while iterating.
fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    return node.named_children(&mut cursor).collect();
}

/// Metadata name of a user-defined operator, by token and parameter count.
fn operator_name(node: Node<'_>, parameter_count: usize) -> Option<&'static str> {
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();

    if node.kind() == "conversion_operator_declaration" {
        return children.iter().find_map(|c| {
            return match c.kind() {
                "explicit" => Some("op_Explicit"),
                "implicit" => Some("op_Implicit"),
                _ => None,
            };
        });
    }

    let token = node.child_by_field_name("operator").or_else(|| {
        let keyword = children.iter().position(|c| return c.kind() == "operator")?;
        return children.get(keyword.saturating_add(1)).copied();
    })?;
    let unary = parameter_count == 1;
    return match token.kind() {
        "!" => Some("op_LogicalNot"),
        "!=" => Some("op_Inequality"),
        "%" => Some("op_Modulus"),
        "&" => Some("op_BitwiseAnd"),
        "*" => Some("op_Multiply"),
        "+" if unary => Some("op_UnaryPlus"),
        "+" => Some("op_Addition"),
        "++" => Some("op_Increment"),
        "-" if unary => Some("op_UnaryNegation"),
        "-" => Some("op_Subtraction"),
        "--" => Some("op_Decrement"),
        "/" => Some("op_Division"),
        "<" => Some("op_LessThan"),
        "<<" => Some("op_LeftShift"),
        "<=" => Some("op_LessThanOrEqual"),
        "==" => Some("op_Equality"),
        ">" => Some("op_GreaterThan"),
        ">=" => Some("op_GreaterThanOrEqual"),
        ">>" => Some("op_RightShift"),
        "^" => Some("op_ExclusiveOr"),
        "false" => Some("op_False"),
        "true" => Some("op_True"),
        "|" => Some("op_BitwiseOr"),
        "~" => Some("op_OnesComplement"),
        _ => None,
    };
}

/// Decode one parameter entry such as `[In] ref readonly Span<int> data = default`.
///
/// Returns `None` for entries without a name (`__arglist`).
pub fn parse_parameter(entry: &str) -> Option<ParameterDecl> {
    let collapsed = parameter_tokens(entry);
    let mut tokens: Vec<&str> = split_top_level(&collapsed, ' ')
        .into_iter()
        .filter(|t| return !t.is_empty())
        .collect();
    if tokens.len() < 2 {
        return None;
    }
    tokens.pop();

    let modifier_count = tokens.iter().take_while(|t| return PARAMETER_MODIFIERS.contains(t)).count();
    let (modifier_tokens, type_tokens) = tokens.split_at(modifier_count);
    let type_text = normalize(&type_tokens.join(" "));
    if type_text.is_empty() {
        return None;
    }

    let ref_kind = if modifier_tokens.contains(&"out") {
        RefKind::Out
    } else if modifier_tokens.contains(&"ref") {
        RefKind::Ref
    } else if modifier_tokens.contains(&"in") {
        RefKind::In
    } else {
        RefKind::None
    };
    let shown: Vec<&str> = modifier_tokens.iter().copied().filter(|m| return *m != "scoped").collect();

    return Some(ParameterDecl {
        modifier: (!shown.is_empty()).then(|| return shown.join(" ")),
        parameter: Parameter {
            ref_kind,
            ty: type_shape(&type_text),
        },
        type_text,
    });
}

/// Decode a parenthesized or bracketed parameter list.
pub fn parse_parameter_list(text: &str) -> Vec<ParameterDecl> {
    return split_top_level(strip_delimiters(text), ',')
        .into_iter()
        .filter_map(parse_parameter)
        .collect();
}

/// Name of a parameter entry: its last top-level token.
fn parameter_name(entry: &str) -> Option<String> {
    let collapsed = parameter_tokens(entry);
    let tokens = split_top_level(&collapsed, ' ');
    if tokens.iter().filter(|t| return !t.is_empty()).count() < 2 {
        return None;
    }
    return tokens.last().map(|t| return (*t).to_string());
}

/// Parameter entry without attributes or default value, whitespace collapsed.
fn parameter_tokens(entry: &str) -> String {
    let mut rest = entry.trim();
    while rest.starts_with('[') {
        let mut depth: usize = 0;
        let mut end = rest.len();
        for (index, c) in rest.char_indices() {
            match c {
                '[' => depth = depth.saturating_add(1),
                ']' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        end = index.saturating_add(1);
                        break;
                    }
                },
                _ => {},
            }
        }
        rest = rest.get(end..).unwrap_or("").trim_start();
    }

    let without_default = split_top_level(rest, '=').into_iter().next().unwrap_or("");
    return without_default.split_whitespace().collect::<Vec<_>>().join(" ");
}

/// Parse source into a tree-sitter tree.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if the language cannot be set or parsing fails.
fn parse_tree(file: &Path, source: &str) -> Result<Tree, Error> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
        .map_err(|e| {
            return Error::ParseFailed {
                file: file.to_path_buf(),
                reason: e.to_string(),
            };
        })?;

    return parser.parse(source, None).ok_or_else(|| {
        return Error::ParseFailed {
            file: file.to_path_buf(),
            reason: "tree-sitter returned None".to_string(),
        };
    });
}

/// Drop the outer `(`/`)` or `[`/`]` of a parameter list.
fn strip_delimiters(text: &str) -> &str {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix(['(', '['])
        .and_then(|t| return t.strip_suffix([')', ']']));
    return inner.unwrap_or(trimmed);
}

/// The implicit `value` parameter of setters and event accessors.
fn value_parameter(type_text: &str) -> ParameterDecl {
    return ParameterDecl {
        modifier: None,
        parameter: Parameter {
            ref_kind: RefKind::None,
            ty: type_shape(type_text),
        },
        type_text: type_text.to_string(),
    };
}

/// Parse a single C# source text into a fresh model. Convenience for one-file programs.
///
/// # Errors
///
/// Returns the same errors as [`CSharpLoader::add_source`].
pub fn load_source(name: &str, file: &Path, source: &str) -> Result<ProgramModel, Error> {
    let mut loader = CSharpLoader::new(name);
    loader.add_source(file, source)?;
    return Ok(loader.finish());
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;
    use crate::model::{SymbolKind, TypeShape};
    use crate::resolver::resolve_in;
    use crate::signature::parse_signature;

    fn load(source: &str) -> ProgramModel {
        return load_source("test", Path::new("Program.cs"), source).unwrap();
    }

    fn resolves(model: &ProgramModel, signature: &str) -> SymbolId {
        let parsed = parse_signature(signature).unwrap();
        return resolve_in(model, &parsed, signature).unwrap();
    }

    fn display(model: &ProgramModel, id: SymbolId) -> String {
        return model.display_parts(&id).iter().map(|p| return p.text.as_str()).collect();
    }

    #[test]
    fn parameter_entries() {
        let decl = parse_parameter("[NotNull] ref readonly Span<int> data = default").unwrap();
        assert_eq!(decl.modifier.as_deref(), Some("ref readonly"));
        assert_eq!(decl.parameter.ref_kind, RefKind::Ref);
        assert_eq!(decl.type_text, "Span<int>");
        assert_eq!(decl.parameter.encoded(), "Span`1&");

        let decl = parse_parameter("params int[] values").unwrap();
        assert_eq!(decl.modifier.as_deref(), Some("params"));
        assert_eq!(decl.parameter.ty, TypeShape::Array("Int32".to_string()));

        let decl = parse_parameter("Dictionary<string, int> map").unwrap();
        assert_eq!(decl.parameter.encoded(), "Dictionary`2");

        assert!(parse_parameter("__arglist").is_none());
    }

    #[test]
    fn parameter_lists() {
        let decls = parse_parameter_list("(int a, (int x, int y) point, out string s)");
        let encoded: Vec<String> = decls.iter().map(|d| return d.parameter.encoded()).collect();
        assert_eq!(encoded, vec!["Int32", "ValueTuple`2", "String&"]);
        assert!(parse_parameter_list("()").is_empty());
    }

    #[test]
    fn methods_and_overloads() {
        let model = load(
            "namespace Acme.Tools {
                class Program {
                    static void Main() {}
                    static void Test(int value) {}
                    static void Test(out int value) { value = 0; }
                    static void Test<T>(T value) {}
                }
            }",
        );
        let main = resolves(&model, "Acme.Tools.Program.Main()");
        assert_eq!(display(&model, main), "Program.Main()");
        let by_out = resolves(&model, "Acme.Tools.Program.Test(Int32& value)");
        assert_eq!(display(&model, by_out), "Program.Test(out int)");
        let generic = resolves(&model, "Acme.Tools.Program.Test[T](T value)");
        assert_eq!(display(&model, generic), "Program.Test<T>(T)");
        assert_eq!(model.location(main).unwrap().line, 3);
    }

    #[test]
    fn file_scoped_namespace() {
        let model = load("namespace Acme;\nclass Widget { void Spin() {} }\n");
        resolves(&model, "Acme.Widget.Spin()");
    }

    #[test]
    fn implicit_and_static_constructors() {
        let model = load(
            "class Customer { }
             class Order { public Order(int id) {} static Order() {} }
             static class Helpers { }
             struct Point { }",
        );
        let ctor = resolves(&model, "Customer..ctor()");
        assert_eq!(display(&model, ctor), "Customer.Customer()");
        resolves(&model, "Order..ctor(Int32 id)");
        resolves(&model, "Order..cctor()");
        assert!(resolve_in(&model, &parse_signature("Order..ctor()").unwrap(), "Order..ctor()").is_err());
        assert!(
            resolve_in(&model, &parse_signature("Helpers..ctor()").unwrap(), "Helpers..ctor()").is_err()
        );
        assert!(resolve_in(&model, &parse_signature("Point..ctor()").unwrap(), "Point..ctor()").is_err());
    }

    #[test]
    fn partial_types_merge_across_files() {
        let mut loader = CSharpLoader::new("test");
        loader
            .add_source(Path::new("A.cs"), "partial class Program { void A() {} }")
            .unwrap();
        loader
            .add_source(Path::new("B.cs"), "partial class Program { public Program(int x) {} void B() {} }")
            .unwrap();
        let model = loader.finish();
        resolves(&model, "Program.A()");
        let b = resolves(&model, "Program.B()");
        assert_eq!(model.location(b).unwrap().file, Path::new("B.cs"));
        resolves(&model, "Program..ctor(Int32 x)");
        assert!(resolve_in(&model, &parse_signature("Program..ctor()").unwrap(), "Program..ctor()").is_err());
    }

    #[test]
    fn properties_and_events() {
        let model = load(
            "using System;
             class Program {
                 int X { get; set; }
                 int Y => 42;
                 string Z { get; init; }
                 event EventHandler Changed;
                 event EventHandler Explicit { add { } remove { } }
             }",
        );
        let getter = resolves(&model, "Program.get_X()");
        assert_eq!(display(&model, getter), "Program.X.get");
        resolves(&model, "Program.set_X(Int32 value)");
        resolves(&model, "Program.get_Y()");
        assert!(resolve_in(&model, &parse_signature("Program.set_Y(Int32 value)").unwrap(), "x").is_err());
        resolves(&model, "Program.set_Z(String value)");
        let add = resolves(&model, "Program.add_Changed(EventHandler value)");
        assert_eq!(display(&model, add), "Program.Changed.add");
        resolves(&model, "Program.remove_Explicit(EventHandler value)");
    }

    #[test]
    fn nested_generic_types_and_records() {
        let model = load(
            "class Outer {
                 class Inner<T> { void Run(T item) {} }
             }
             record Person(string Name, int Age);",
        );
        resolves(&model, "Outer+Inner`1.Run(T item)");
        resolves(&model, "Person..ctor(String Name, Int32 Age)");
        let getter = resolves(&model, "Person.get_Age()");
        assert_eq!(model.kind(&getter), SymbolKind::Method);
        resolves(&model, "Person.set_Name(String value)");
    }

    #[test]
    fn indexers_destructors_and_operators() {
        let model = load(
            "class Grid {
                 int this[int row, int column] { get => 0; set { } }
                 ~Grid() {}
                 public static Grid operator +(Grid a, Grid b) => a;
                 public static Grid operator -(Grid a) => a;
                 public static implicit operator int(Grid g) => 0;
             }",
        );
        resolves(&model, "Grid.get_Item(Int32 row, Int32 column)");
        resolves(&model, "Grid.set_Item(Int32 row, Int32 column, Int32 value)");
        let finalizer = resolves(&model, "Grid.Finalize()");
        assert_eq!(display(&model, finalizer), "Grid.~Grid()");
        resolves(&model, "Grid.op_Addition(Grid a, Grid b)");
        resolves(&model, "Grid.op_UnaryNegation(Grid a)");
        resolves(&model, "Grid.op_Implicit(Grid g)");
    }

    #[test]
    fn oversized_source_is_rejected() {
        let mut loader = CSharpLoader::new("test");
        let big = " ".repeat(usize::try_from(MAX_FILE_SIZE).unwrap().saturating_add(1));
        let err = loader.add_source(Path::new("Big.cs"), &big).unwrap_err();
        assert!(matches!(err, Error::FileTooLarge { .. }));
    }
}
