//! Static type model for analyzed Go code.
//!
//! This is a deliberately small model: just enough to tell whether an
//! expression is a pointer to a particular named type.
//!
//! ## Module Structure
//!
//! - `type_expr`: Resolves Go type syntax (`*bun.UpdateQuery`) to a `GoType`
//! - `stubs`: Result types of external functions and methods
//! - `checker`: Per-file pass recording the static type of expressions

pub mod checker;
pub mod stubs;
pub mod type_expr;

use std::fmt;

pub use checker::{TypeInfo, check_file};
pub use stubs::TypeStubs;
pub use type_expr::TypeExprContext;

use crate::utils::{go_package_name, is_go_identifier};

/// A package-level Go object (type or function) identified by import path and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub package: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Parse `"github.com/uptrace/bun.UpdateQuery"`.
    ///
    /// The split happens at the last `.` after the last `/`, so domains in the
    /// import path are kept intact.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let slash = text.rfind('/').map(|i| i + 1).unwrap_or(0);
        let dot = slash + text[slash..].rfind('.')?;
        let (package, name) = (&text[..dot], &text[dot + 1..]);
        if package.is_empty() || !is_go_identifier(name) {
            return None;
        }
        Some(Self::new(package, name))
    }

    /// The name Go source uses for this object when its package is imported
    /// without an alias, e.g. `bun.UpdateQuery`.
    pub fn short_name(&self) -> String {
        format!("{}.{}", go_package_name(&self.package), self.name)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.name)
    }
}

/// Resolved static type of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GoType {
    Named(QualifiedName),
    Pointer(Box<GoType>),
    /// Predeclared types (`int`, `error`, ...).
    Basic(String),
}

impl GoType {
    pub fn pointer_to(inner: GoType) -> Self {
        GoType::Pointer(Box::new(inner))
    }

    /// Parse a type written with full import paths, e.g. `*github.com/uptrace/bun.UpdateQuery`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(rest) = text.strip_prefix('*') {
            return GoType::parse(rest).map(GoType::pointer_to);
        }
        if is_go_identifier(text) {
            return Some(GoType::Basic(text.to_string()));
        }
        QualifiedName::parse(text).map(GoType::Named)
    }

    /// Returns true for `*T` where `T` is exactly `name`.
    pub fn is_pointer_to(&self, name: &QualifiedName) -> bool {
        matches!(self, GoType::Pointer(inner) if matches!(inner.as_ref(), GoType::Named(n) if n == name))
    }

    /// The named type whose method set applies: `T` or `*T` (one level of indirection).
    pub fn method_base(&self) -> Option<&QualifiedName> {
        match self {
            GoType::Named(name) => Some(name),
            GoType::Pointer(inner) => match inner.as_ref() {
                GoType::Named(name) => Some(name),
                _ => None,
            },
            GoType::Basic(_) => None,
        }
    }

    /// The pointed-to type for `*T`.
    pub fn elem(&self) -> Option<&GoType> {
        match self {
            GoType::Pointer(inner) => Some(inner),
            _ => None,
        }
    }
}

impl fmt::Display for GoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoType::Named(name) => write!(f, "{}", name),
            GoType::Pointer(inner) => write!(f, "*{}", inner),
            GoType::Basic(name) => write!(f, "{}", name),
        }
    }
}

/// Result list of a function or method. `None` entries are results whose
/// type could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    pub results: Vec<Option<GoType>>,
}

impl Signature {
    pub fn new(results: Vec<Option<GoType>>) -> Self {
        Self { results }
    }

    /// The type of a call expression, which only exists for single-result functions.
    pub fn single(&self) -> Option<&GoType> {
        match self.results.as_slice() {
            [Some(ty)] => Some(ty),
            _ => None,
        }
    }
}

/// A function or method identity in Go's `types.Func.FullName` notation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FullName {
    /// `github.com/uptrace/bun.NewDB`
    Func(QualifiedName),
    /// `(*github.com/uptrace/bun.DB).NewUpdate`
    Method {
        receiver: QualifiedName,
        name: String,
    },
}

impl FullName {
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(rest) = text.strip_prefix('(') {
            let (receiver, method) = rest.split_once(").")?;
            let receiver = receiver.strip_prefix('*').unwrap_or(receiver);
            if !is_go_identifier(method) {
                return None;
            }
            return Some(FullName::Method {
                receiver: QualifiedName::parse(receiver)?,
                name: method.to_string(),
            });
        }
        QualifiedName::parse(text).map(FullName::Func)
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FullName::Func(name) => write!(f, "{}", name),
            FullName::Method { receiver, name } => write!(f, "(*{}).{}", receiver, name),
        }
    }
}
