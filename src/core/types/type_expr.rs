//! Resolution of Go type syntax to [`GoType`].

use tree_sitter::Node;

use super::{GoType, QualifiedName, TypeStubs};
use crate::core::collect::FileImports;
use crate::core::parsers::go::node_text;

const PREDECLARED_TYPES: &[&str] = &[
    "any",
    "bool",
    "byte",
    "comparable",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// What a type expression needs to be resolved: the package it is written in,
/// the imports of its file, and the stubs that name dot-imported types.
#[derive(Debug, Clone, Copy)]
pub struct TypeExprContext<'a> {
    pub package: &'a str,
    pub imports: &'a FileImports,
    stubs: &'a TypeStubs,
}

impl<'a> TypeExprContext<'a> {
    pub fn new(package: &'a str, imports: &'a FileImports, stubs: &'a TypeStubs) -> Self {
        Self {
            package,
            imports,
            stubs,
        }
    }

    /// Resolve a type node. Composite types other than pointers (slices, maps,
    /// channels, function types) are not modelled and resolve to `None`.
    pub fn resolve(&self, node: Node, source: &[u8]) -> Option<GoType> {
        match node.kind() {
            "pointer_type" => {
                let elem = node.named_child(0)?;
                self.resolve(elem, source).map(GoType::pointer_to)
            }
            "qualified_type" => {
                let package = node_text(node.child_by_field_name("package")?, source);
                let name = node_text(node.child_by_field_name("name")?, source);
                let path = self.imports.path_of(package)?;
                Some(GoType::Named(QualifiedName::new(path, name)))
            }
            "type_identifier" => Some(self.named(node_text(node, source))),
            "generic_type" => self.resolve(node.child_by_field_name("type")?, source),
            "parenthesized_type" => self.resolve(node.named_child(0)?, source),
            _ => None,
        }
    }

    /// A bare type name: predeclared, a stubbed type of a dot import, or
    /// declared in this package.
    pub fn named(&self, name: &str) -> GoType {
        if PREDECLARED_TYPES.contains(&name) {
            return GoType::Basic(name.to_string());
        }
        self.imports
            .dot_imports()
            .iter()
            .map(|path| QualifiedName::new(path.as_str(), name))
            .find(|qualified| self.stubs.declares_type(qualified))
            .map(GoType::Named)
            .unwrap_or_else(|| GoType::Named(QualifiedName::new(self.package, name)))
    }
}
