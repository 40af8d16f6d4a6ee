//! Result types of functions and methods declared outside the analyzed code.
//!
//! The analyzer never loads dependencies, so every external call it needs to
//! follow is described here. The built-in table covers the bun query entry
//! points and the optimistic-lock wrapper; `signatures` in the config file
//! extends or overrides it.

use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::{Context, Result};

use super::{FullName, GoType, QualifiedName, Signature};

pub const BUN_PACKAGE: &str = "github.com/uptrace/bun";
pub const WRAPPER_PACKAGE: &str = "github.com/takaaa220/bunwithoptimistic";

/// Types that can start a query (`db.NewUpdate()`, `tx.NewUpdate()`, ...).
const BUN_QUERY_ROOTS: &[&str] = &["DB", "Tx", "Conn", "IDB", "IConn"];

/// `*bun.UpdateQuery` methods that return the query itself.
const UPDATE_QUERY_BUILDER_METHODS: &[&str] = &[
    "Apply",
    "Bulk",
    "Column",
    "Comment",
    "Conn",
    "ExcludeColumn",
    "Join",
    "JoinOn",
    "JoinOnOr",
    "Limit",
    "Model",
    "ModelTableExpr",
    "OmitZero",
    "Order",
    "OrderExpr",
    "Returning",
    "Set",
    "SetColumn",
    "Table",
    "TableExpr",
    "Value",
    "Where",
    "WhereAllWithDeleted",
    "WhereDeleted",
    "WhereGroup",
    "WhereOr",
    "WherePK",
    "With",
    "WithRecursive",
];

/// Lookup table from external function/method identities to their results.
#[derive(Debug, Clone, Default)]
pub struct TypeStubs {
    funcs: HashMap<QualifiedName, Signature>,
    methods: HashMap<(QualifiedName, String), Signature>,
    /// Receiver types of the known methods.
    types: HashSet<QualifiedName>,
}

impl TypeStubs {
    /// Stubs for bun and the optimistic-lock wrapper.
    pub fn builtin() -> Self {
        let mut stubs = Self::default();
        let bun = |name: &str| QualifiedName::new(BUN_PACKAGE, name);
        let ptr = |name: &str| Some(GoType::pointer_to(GoType::Named(bun(name))));

        stubs.insert(FullName::Func(bun("NewDB")), vec![ptr("DB")]);

        for root in BUN_QUERY_ROOTS {
            for (method, query) in [
                ("NewUpdate", "UpdateQuery"),
                ("NewSelect", "SelectQuery"),
                ("NewInsert", "InsertQuery"),
                ("NewDelete", "DeleteQuery"),
            ] {
                stubs.insert(
                    FullName::Method {
                        receiver: bun(root),
                        name: method.to_string(),
                    },
                    vec![ptr(query)],
                );
            }
        }

        for method in ["Begin", "BeginTx"] {
            stubs.insert(
                FullName::Method {
                    receiver: bun("DB"),
                    name: method.to_string(),
                },
                vec![Some(GoType::Named(bun("Tx"))), Some(GoType::Basic("error".into()))],
            );
        }

        for method in UPDATE_QUERY_BUILDER_METHODS {
            stubs.insert(
                FullName::Method {
                    receiver: bun("UpdateQuery"),
                    name: method.to_string(),
                },
                vec![ptr("UpdateQuery")],
            );
        }

        stubs.insert(
            FullName::Func(QualifiedName::new(WRAPPER_PACKAGE, "WithOptimistic")),
            vec![Some(GoType::pointer_to(GoType::Named(QualifiedName::new(
                WRAPPER_PACKAGE,
                "WithOptimisticUpdateQuery",
            ))))],
        );

        stubs
    }

    /// Built-in stubs extended with user-configured signatures.
    pub fn with_signatures(signatures: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut stubs = Self::builtin();
        for (key, results) in signatures {
            let name = FullName::parse(key)
                .with_context(|| format!("Invalid signature name: \"{}\"", key))?;
            let results = results
                .iter()
                .map(|ty| {
                    GoType::parse(ty)
                        .map(Some)
                        .with_context(|| format!("Invalid result type for \"{}\": \"{}\"", key, ty))
                })
                .collect::<Result<Vec<_>>>()?;
            stubs.insert(name, results);
        }
        Ok(stubs)
    }

    pub fn insert(&mut self, name: FullName, results: Vec<Option<GoType>>) {
        let signature = Signature::new(results);
        match name {
            FullName::Func(func) => {
                self.funcs.insert(func, signature);
            }
            FullName::Method { receiver, name } => {
                self.types.insert(receiver.clone());
                self.methods.insert((receiver, name), signature);
            }
        }
    }

    pub fn func(&self, name: &QualifiedName) -> Option<&Signature> {
        self.funcs.get(name)
    }

    pub fn method(&self, receiver: &QualifiedName, name: &str) -> Option<&Signature> {
        self.methods.get(&(receiver.clone(), name.to_string()))
    }

    /// Whether `name` is a receiver of some stubbed method.
    pub fn declares_type(&self, name: &QualifiedName) -> bool {
        self.types.contains(name)
    }
}
