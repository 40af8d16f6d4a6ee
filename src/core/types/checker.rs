//! Phase 2: Type resolution
//!
//! Walks one file with lexical scopes and records the static type of every
//! expression it can resolve, keyed by syntax node id. This plays the role of
//! a type checker's `Types` map: later passes ask "what is the type of this
//! receiver?" without re-deriving scopes.
//!
//! Resolution is best effort. Anything the model does not cover (generics,
//! closures stored in variables, multi-value assignment from unknown calls)
//! stays unresolved, and unresolved expressions are never reported.

use std::collections::HashMap;

use tree_sitter::Node;

use super::{FullName, GoType, QualifiedName, Signature, TypeExprContext, TypeStubs};
use crate::core::collect::declarations::var_specs;
use crate::core::collect::{FileImports, PackageDecls};
use crate::core::parsers::go::{ParsedGoFile, node_text};

/// How deep method and field lookup follows embedded struct fields.
const MAX_EMBEDDING_DEPTH: usize = 4;

/// Node kinds that open a lexical scope.
const SCOPE_NODES: &[&str] = &[
    "block",
    "if_statement",
    "for_statement",
    "expression_switch_statement",
    "select_statement",
    "expression_case",
    "default_case",
    "communication_case",
];

/// Resolved types and call targets of one file.
#[derive(Debug, Default)]
pub struct TypeInfo {
    types: HashMap<usize, GoType>,
    callees: HashMap<usize, FullName>,
}

impl TypeInfo {
    /// Static type of an expression node, if it could be resolved.
    pub fn type_of(&self, node: Node) -> Option<&GoType> {
        self.types.get(&node.id())
    }

    /// Package-level function called by a call expression, when the callee
    /// was reached through an import.
    pub fn callee_of(&self, call: Node) -> Option<&FullName> {
        self.callees.get(&call.id())
    }

    /// Number of expressions with a resolved type.
    pub fn resolved_count(&self) -> usize {
        self.types.len()
    }
}

/// Run the type pass over a file.
pub fn check_file(
    file: &ParsedGoFile,
    imports: &FileImports,
    decls: &PackageDecls,
    stubs: &TypeStubs,
) -> TypeInfo {
    let mut checker = Checker {
        source: file.source.as_bytes(),
        ctx: TypeExprContext::new(&file.package_name, imports, stubs),
        decls,
        stubs,
        scopes: vec![HashMap::new()],
        cache: HashMap::new(),
        info: TypeInfo::default(),
    };
    checker.walk(file.tree.root_node());
    checker.info
}

type Scope = HashMap<String, Option<GoType>>;

struct Checker<'a> {
    source: &'a [u8],
    ctx: TypeExprContext<'a>,
    decls: &'a PackageDecls,
    stubs: &'a TypeStubs,
    /// Innermost scope last. A name bound to `None` is declared but untyped,
    /// which still shadows outer names and imports.
    scopes: Vec<Scope>,
    cache: HashMap<usize, Option<GoType>>,
    info: TypeInfo,
}

impl Checker<'_> {
    // ============================================================
    // Traversal
    // ============================================================

    fn walk(&mut self, node: Node) {
        match node.kind() {
            "function_declaration" | "method_declaration" | "func_literal" => {
                self.scopes.push(Scope::new());
                for field in ["receiver", "parameters", "result"] {
                    if let Some(list) = node.child_by_field_name(field) {
                        if list.kind() == "parameter_list" {
                            self.declare_params(list);
                        }
                    }
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.walk(body);
                }
                self.scopes.pop();
            }
            "type_switch_statement" => self.type_switch(node),
            "short_var_declaration" => self.short_var_declaration(node),
            "var_declaration" => self.var_declaration(node),
            "range_clause" => self.range_clause(node),
            "call_expression" => {
                self.expr_type(node);
                self.walk_children(node);
            }
            kind if SCOPE_NODES.contains(&kind) => {
                self.scopes.push(Scope::new());
                self.walk_children(node);
                self.scopes.pop();
            }
            _ => self.walk_children(node),
        }
    }

    fn walk_children(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.walk(child);
        }
    }

    // ============================================================
    // Declarations
    // ============================================================

    fn declare(&mut self, name: &str, ty: Option<GoType>) {
        if name == "_" {
            return;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), ty);
        }
    }

    fn lookup(&self, name: &str) -> Option<&Option<GoType>> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    fn declare_params(&mut self, list: Node) {
        let mut cursor = list.walk();
        for param in list.named_children(&mut cursor) {
            let ty = match param.kind() {
                "parameter_declaration" => param
                    .child_by_field_name("type")
                    .and_then(|t| self.ctx.resolve(t, self.source)),
                // `args ...T` is a slice
                "variadic_parameter_declaration" => None,
                _ => continue,
            };
            let mut name_cursor = param.walk();
            let names: Vec<Node> = param
                .children_by_field_name("name", &mut name_cursor)
                .collect();
            for name in names {
                let name = node_text(name, self.source);
                self.declare(name, ty.clone());
            }
        }
    }

    fn short_var_declaration(&mut self, node: Node) {
        let (Some(left), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) else {
            return;
        };
        self.walk(right);
        let values = expression_list(right);
        let names = expression_list(left);
        let types = self.value_types(&values, names.len());
        for (name, ty) in names.into_iter().zip(types) {
            if name.kind() == "identifier" {
                self.declare(node_text(name, self.source), ty);
            }
        }
    }

    fn var_declaration(&mut self, node: Node) {
        for spec in var_specs(node) {
            let value = spec.child_by_field_name("value");
            if let Some(value) = value {
                self.walk(value);
            }

            let mut cursor = spec.walk();
            let names: Vec<Node> = spec.children_by_field_name("name", &mut cursor).collect();

            let types = match spec.child_by_field_name("type") {
                Some(ty) => vec![self.ctx.resolve(ty, self.source); names.len()],
                None => {
                    let values = value.map(expression_list).unwrap_or_default();
                    self.value_types(&values, names.len())
                }
            };
            for (name, ty) in names.into_iter().zip(types) {
                self.declare(node_text(name, self.source), ty);
            }
        }
    }

    /// `for k, v := range xs`: the iteration variables are declared untyped.
    fn range_clause(&mut self, node: Node) {
        if let Some(right) = node.child_by_field_name("right") {
            self.walk(right);
        }
        let mut cursor = node.walk();
        let declares = node
            .children(&mut cursor)
            .any(|c| !c.is_named() && c.kind() == ":=");
        if !declares {
            return;
        }
        if let Some(left) = node.child_by_field_name("left") {
            for name in expression_list(left) {
                if name.kind() == "identifier" {
                    self.declare(node_text(name, self.source), None);
                }
            }
        }
    }

    /// `switch v := x.(type) { case *T: ... }`: in a single-type case `v` has that type.
    fn type_switch(&mut self, node: Node) {
        self.scopes.push(Scope::new());

        if let Some(init) = node.child_by_field_name("initializer") {
            self.walk(init);
        }
        if let Some(value) = node.child_by_field_name("value") {
            self.walk(value);
        }
        let alias: Vec<String> = node
            .child_by_field_name("alias")
            .map(expression_list)
            .unwrap_or_default()
            .into_iter()
            .filter(|n| n.kind() == "identifier")
            .map(|n| node_text(n, self.source).to_string())
            .collect();

        let mut cursor = node.walk();
        for clause in node.named_children(&mut cursor) {
            if !matches!(clause.kind(), "type_case" | "default_case") {
                continue;
            }
            self.scopes.push(Scope::new());
            let mut type_cursor = clause.walk();
            let case_types: Vec<Node> = clause
                .children_by_field_name("type", &mut type_cursor)
                .collect();
            let case_type = match case_types.as_slice() {
                [single] => self.ctx.resolve(*single, self.source),
                _ => None,
            };
            for name in &alias {
                self.declare(name, case_type.clone());
            }
            self.walk_children(clause);
            self.scopes.pop();
        }

        self.scopes.pop();
    }

    /// Types assigned to `count` names from a list of value expressions.
    fn value_types(&mut self, values: &[Node], count: usize) -> Vec<Option<GoType>> {
        if values.len() == count {
            return values.iter().map(|v| self.expr_type(*v)).collect();
        }
        if let [value] = values {
            let results = match value.kind() {
                "call_expression" => self.call_signature(*value).map(|sig| sig.results),
                "type_assertion_expression" => Some(vec![
                    self.expr_type(*value),
                    Some(GoType::Basic("bool".into())),
                ]),
                _ => None,
            };
            if let Some(results) = results {
                if results.len() == count {
                    return results;
                }
            }
        }
        vec![None; count]
    }

    // ============================================================
    // Expressions
    // ============================================================

    fn expr_type(&mut self, node: Node) -> Option<GoType> {
        if let Some(cached) = self.cache.get(&node.id()) {
            return cached.clone();
        }
        let ty = self.compute_type(node);
        self.cache.insert(node.id(), ty.clone());
        if let Some(ty) = &ty {
            self.info.types.insert(node.id(), ty.clone());
        }
        ty
    }

    fn compute_type(&mut self, node: Node) -> Option<GoType> {
        match node.kind() {
            "identifier" => {
                let name = node_text(node, self.source);
                match self.lookup(name) {
                    Some(ty) => ty.clone(),
                    None => self.decls.var(name).cloned(),
                }
            }
            "parenthesized_expression" => self.expr_type(node.named_child(0)?),
            "call_expression" => self.call_signature(node)?.single().cloned(),
            "selector_expression" => self.field_type(node),
            "unary_expression" => {
                let operand = node.child_by_field_name("operand")?;
                let operator = node.child_by_field_name("operator")?;
                match node_text(operator, self.source) {
                    "&" => self.expr_type(operand).map(GoType::pointer_to),
                    "*" => self.expr_type(operand)?.elem().cloned(),
                    _ => None,
                }
            }
            "composite_literal" | "type_assertion_expression" => self
                .ctx
                .resolve(node.child_by_field_name("type")?, self.source),
            _ => None,
        }
    }

    /// True if `name` refers to an import rather than a variable.
    fn is_package_name(&self, name: &str) -> bool {
        self.lookup(name).is_none()
            && self.decls.var(name).is_none()
            && self.ctx.imports.path_of(name).is_some()
    }

    fn call_signature(&mut self, call: Node) -> Option<Signature> {
        let function = call.child_by_field_name("function")?;
        match function.kind() {
            "selector_expression" => {
                let operand = function.child_by_field_name("operand")?;
                let method = node_text(function.child_by_field_name("field")?, self.source);

                if operand.kind() == "identifier" {
                    let name = node_text(operand, self.source);
                    if self.is_package_name(name) {
                        let path = self.ctx.imports.path_of(name)?;
                        let func = QualifiedName::new(path, method);
                        let signature = self.stubs.func(&func).cloned();
                        self.info.callees.insert(call.id(), FullName::Func(func));
                        return signature;
                    }
                }

                let receiver = self.expr_type(operand)?;
                let base = receiver.method_base()?.clone();
                self.method_signature(&base, method, 0)
            }
            "identifier" => {
                let name = node_text(function, self.source);
                if self.lookup(name).is_some() {
                    return None;
                }
                if let Some(signature) = self.decls.function(name) {
                    return Some(signature.clone());
                }
                if name == "new" {
                    let arg = call.child_by_field_name("arguments")?.named_child(0)?;
                    let ty = self.type_argument(arg)?;
                    return Some(Signature::new(vec![Some(GoType::pointer_to(ty))]));
                }
                self.dot_imported_call(call, name)
            }
            _ => None,
        }
    }

    /// A type written in argument position, as in `new(bun.UpdateQuery)`.
    /// The grammar parses such arguments as expressions.
    fn type_argument(&self, node: Node) -> Option<GoType> {
        match node.kind() {
            "identifier" => Some(self.ctx.named(node_text(node, self.source))),
            "selector_expression" => {
                let package = node_text(node.child_by_field_name("operand")?, self.source);
                let name = node_text(node.child_by_field_name("field")?, self.source);
                let path = self.ctx.imports.path_of(package)?;
                Some(GoType::Named(QualifiedName::new(path, name)))
            }
            _ => self.ctx.resolve(node, self.source),
        }
    }

    fn dot_imported_call(&mut self, call: Node, name: &str) -> Option<Signature> {
        let dot_imports = self.ctx.imports.dot_imports();
        for path in dot_imports {
            let func = QualifiedName::new(path.as_str(), name);
            if let Some(signature) = self.stubs.func(&func) {
                let signature = signature.clone();
                self.info.callees.insert(call.id(), FullName::Func(func));
                return Some(signature);
            }
        }
        if let [path] = dot_imports {
            let func = QualifiedName::new(path.as_str(), name);
            self.info.callees.insert(call.id(), FullName::Func(func));
        }
        None
    }

    fn method_signature(
        &self,
        base: &QualifiedName,
        method: &str,
        depth: usize,
    ) -> Option<Signature> {
        if base.package != self.ctx.package {
            return self.stubs.method(base, method).cloned();
        }
        if let Some(signature) = self.decls.method(&base.name, method) {
            return Some(signature.clone());
        }
        if depth >= MAX_EMBEDDING_DEPTH {
            return None;
        }
        self.decls
            .fields(&base.name)
            .iter()
            .filter(|field| field.embedded)
            .filter_map(|field| field.ty.as_ref()?.method_base())
            .find_map(|inner| self.method_signature(inner, method, depth + 1))
    }

    fn field_type(&mut self, selector: Node) -> Option<GoType> {
        let operand = selector.child_by_field_name("operand")?;
        let field = node_text(selector.child_by_field_name("field")?, self.source);
        if operand.kind() == "identifier" && self.is_package_name(node_text(operand, self.source)) {
            return None;
        }
        let ty = self.expr_type(operand)?;
        let base = ty.method_base()?.clone();
        self.lookup_field(&base, field, 0)
    }

    fn lookup_field(&self, base: &QualifiedName, field: &str, depth: usize) -> Option<GoType> {
        if base.package != self.ctx.package || depth > MAX_EMBEDDING_DEPTH {
            return None;
        }
        let fields = self.decls.fields(&base.name);
        if let Some(found) = fields.iter().find(|f| f.name == field) {
            return found.ty.clone();
        }
        fields
            .iter()
            .filter(|f| f.embedded)
            .filter_map(|f| f.ty.as_ref()?.method_base())
            .find_map(|inner| self.lookup_field(inner, field, depth + 1))
    }
}

/// Expressions of an `expression_list` (or the node itself for a single expression).
fn expression_list(node: Node) -> Vec<Node> {
    if node.kind() != "expression_list" {
        return vec![node];
    }
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect()
}
