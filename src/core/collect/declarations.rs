//! Package-level declarations shared by all files of a compilation unit.

use std::collections::HashMap;

use tree_sitter::Node;

use super::FileImports;
use crate::core::parsers::go::{ParsedGoFile, node_text};
use crate::core::types::{GoType, Signature, TypeExprContext, TypeStubs};

/// A struct field. Embedded fields are named after their type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Option<GoType>,
    pub embedded: bool,
}

/// Declarations of one Go package (all files in a directory sharing a package clause).
#[derive(Debug, Clone, Default)]
pub struct PackageDecls {
    pub package: String,
    functions: HashMap<String, Signature>,
    /// (receiver type name, method name) → signature. Interface methods included.
    methods: HashMap<(String, String), Signature>,
    structs: HashMap<String, Vec<FieldDecl>>,
    vars: HashMap<String, GoType>,
}

impl PackageDecls {
    pub fn collect<'a>(
        package: &str,
        files: impl IntoIterator<Item = (&'a ParsedGoFile, &'a FileImports)>,
        stubs: &TypeStubs,
    ) -> Self {
        let mut decls = Self {
            package: package.to_string(),
            ..Self::default()
        };

        for (file, imports) in files {
            let ctx = TypeExprContext::new(package, imports, stubs);
            let source = file.source.as_bytes();
            let root = file.tree.root_node();
            let mut cursor = root.walk();
            for node in root.named_children(&mut cursor) {
                match node.kind() {
                    "function_declaration" => decls.add_function(node, source, &ctx),
                    "method_declaration" => decls.add_method(node, source, &ctx),
                    "type_declaration" => decls.add_types(node, source, &ctx),
                    "var_declaration" => decls.add_vars(node, source, &ctx),
                    _ => {}
                }
            }
        }

        decls
    }

    pub fn function(&self, name: &str) -> Option<&Signature> {
        self.functions.get(name)
    }

    pub fn method(&self, type_name: &str, method: &str) -> Option<&Signature> {
        self.methods
            .get(&(type_name.to_string(), method.to_string()))
    }

    pub fn fields(&self, type_name: &str) -> &[FieldDecl] {
        self.structs
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn var(&self, name: &str) -> Option<&GoType> {
        self.vars.get(name)
    }

    fn add_function(&mut self, node: Node, source: &[u8], ctx: &TypeExprContext) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let signature = signature_of(node.child_by_field_name("result"), source, ctx);
        self.functions
            .insert(node_text(name, source).to_string(), signature);
    }

    fn add_method(&mut self, node: Node, source: &[u8], ctx: &TypeExprContext) {
        let (Some(receiver), Some(name)) = (
            node.child_by_field_name("receiver"),
            node.child_by_field_name("name"),
        ) else {
            return;
        };
        let Some(type_name) = receiver_type_name(receiver, source) else {
            return;
        };
        let signature = signature_of(node.child_by_field_name("result"), source, ctx);
        self.methods.insert(
            (type_name.to_string(), node_text(name, source).to_string()),
            signature,
        );
    }

    fn add_types(&mut self, node: Node, source: &[u8], ctx: &TypeExprContext) {
        for spec in named_children_of_kind(node, &["type_spec"]) {
            let (Some(name), Some(ty)) = (
                spec.child_by_field_name("name"),
                spec.child_by_field_name("type"),
            ) else {
                continue;
            };
            let type_name = node_text(name, source).to_string();
            match ty.kind() {
                "struct_type" => {
                    let fields = struct_fields(ty, source, ctx);
                    self.structs.insert(type_name, fields);
                }
                "interface_type" => {
                    for elem in named_children_of_kind(ty, &["method_elem", "method_spec"]) {
                        let Some(method) = elem.child_by_field_name("name") else {
                            continue;
                        };
                        let signature =
                            signature_of(elem.child_by_field_name("result"), source, ctx);
                        self.methods.insert(
                            (type_name.clone(), node_text(method, source).to_string()),
                            signature,
                        );
                    }
                }
                _ => {}
            }
        }
    }

    fn add_vars(&mut self, node: Node, source: &[u8], ctx: &TypeExprContext) {
        for spec in var_specs(node) {
            let Some(ty) = spec
                .child_by_field_name("type")
                .and_then(|t| ctx.resolve(t, source))
            else {
                continue;
            };
            let mut cursor = spec.walk();
            for name in spec.children_by_field_name("name", &mut cursor) {
                self.vars
                    .insert(node_text(name, source).to_string(), ty.clone());
            }
        }
    }
}

/// Result types declared by a function's `result` node, one entry per value.
pub(crate) fn signature_of(result: Option<Node>, source: &[u8], ctx: &TypeExprContext) -> Signature {
    let Some(result) = result else {
        return Signature::default();
    };
    if result.kind() != "parameter_list" {
        return Signature::new(vec![ctx.resolve(result, source)]);
    }

    let mut results = Vec::new();
    let mut cursor = result.walk();
    for param in result.named_children(&mut cursor) {
        if param.kind() != "parameter_declaration" {
            continue;
        }
        let ty = param
            .child_by_field_name("type")
            .and_then(|t| ctx.resolve(t, source));
        let mut name_cursor = param.walk();
        let names = param
            .children_by_field_name("name", &mut name_cursor)
            .count()
            .max(1);
        results.extend(std::iter::repeat_n(ty, names));
    }
    Signature::new(results)
}

/// `var_spec` nodes of a `var` declaration, with or without parentheses.
pub(crate) fn var_specs(node: Node) -> Vec<Node> {
    let mut specs = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "var_spec" => specs.push(child),
            "var_spec_list" => specs.extend(named_children_of_kind(child, &["var_spec"])),
            _ => {}
        }
    }
    specs
}

fn named_children_of_kind<'t>(node: Node<'t>, kinds: &[&str]) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|n| kinds.contains(&n.kind()))
        .collect()
}

/// Name of the receiver's base type: `Repo` for `(r *Repo)` and `(r Repo[T])`.
fn receiver_type_name<'a>(receiver: Node, source: &'a [u8]) -> Option<&'a str> {
    let param = named_children_of_kind(receiver, &["parameter_declaration"])
        .into_iter()
        .next()?;
    let mut ty = param.child_by_field_name("type")?;
    loop {
        match ty.kind() {
            "pointer_type" | "parenthesized_type" => ty = ty.named_child(0)?,
            "generic_type" => ty = ty.child_by_field_name("type")?,
            "type_identifier" => return Some(node_text(ty, source)),
            _ => return None,
        }
    }
}

fn struct_fields(struct_type: Node, source: &[u8], ctx: &TypeExprContext) -> Vec<FieldDecl> {
    let Some(list) = named_children_of_kind(struct_type, &["field_declaration_list"])
        .into_iter()
        .next()
    else {
        return Vec::new();
    };

    let mut fields = Vec::new();
    for decl in named_children_of_kind(list, &["field_declaration"]) {
        let Some(type_node) = decl.child_by_field_name("type") else {
            continue;
        };
        let ty = ctx.resolve(type_node, source);

        let mut cursor = decl.walk();
        let names: Vec<String> = decl
            .children_by_field_name("name", &mut cursor)
            .map(|n| node_text(n, source).to_string())
            .collect();

        if names.is_empty() {
            let mut child_cursor = decl.walk();
            let is_pointer = decl
                .children(&mut child_cursor)
                .any(|c| !c.is_named() && c.kind() == "*");
            let name = embedded_field_name(type_node, source);
            fields.push(FieldDecl {
                name: name.to_string(),
                ty: if is_pointer { ty.map(GoType::pointer_to) } else { ty },
                embedded: true,
            });
        } else {
            fields.extend(names.into_iter().map(|name| FieldDecl {
                name,
                ty: ty.clone(),
                embedded: false,
            }));
        }
    }
    fields
}

fn embedded_field_name<'a>(type_node: Node, source: &'a [u8]) -> &'a str {
    match type_node.kind() {
        "qualified_type" => type_node
            .child_by_field_name("name")
            .map(|n| node_text(n, source))
            .unwrap_or_default(),
        "generic_type" => type_node
            .child_by_field_name("type")
            .map(|n| embedded_field_name(n, source))
            .unwrap_or_default(),
        _ => node_text(type_node, source),
    }
}
