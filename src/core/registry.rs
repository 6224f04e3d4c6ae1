// src/core/registry.rs
//! Snapshot of the loaded runtime: namespaces, their interned vars and the class table.
//!
//! Every resolver and builder takes a `&Registry` explicitly instead of reading
//! ambient global state, so collection is a pure function over this value.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A runtime value bound to a var, as far as documentation cares about it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Var has no root binding
    #[default]
    Unbound,
    Nil,
    Bool(bool),
    Int(i64),
    Str(String),
    Keyword(String),
    Symbol(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// Plain function object
    Fn,
    /// Multi-dispatch function object
    MultiFn,
    /// Reference to a class by name
    Class(String),
    /// Dereferencing the var failed; carries the failure message
    Unreadable(String),
}

impl Value {
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when the value is a mapping
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Textual content of string-like scalars
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Keyword(s) | Value::Symbol(s) | Value::Class(s) => Some(s),
            _ => None,
        }
    }
}

/// Metadata attached to an interned var
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VarMeta {
    pub doc: Option<String>,

    /// Secondary doc string used when `doc` is absent
    pub wiki_doc: Option<String>,

    #[serde(rename = "macro")]
    pub is_macro: bool,

    /// Declared parameter shapes, one list of parameter names per arity
    pub arglists: Option<Vec<Vec<String>>>,

    /// Alternate usage forms, carried by type-alias-like definitions
    pub forms: Option<Vec<String>>,

    pub file: Option<String>,
    pub line: Option<u32>,
    pub added: Option<String>,
    pub deprecated: Option<String>,
    pub dynamic: bool,
    pub private: bool,
    pub skip_wiki: bool,

    /// Qualified name (`ns/name`) of the interface this var is a member function of
    pub protocol: Option<String>,
}

impl VarMeta {
    /// Explicit doc string, falling back to the wiki doc
    pub fn effective_doc(&self) -> Option<&str> {
        self.doc.as_deref().or(self.wiki_doc.as_deref())
    }
}

/// A named interned binding within a namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Var {
    pub name: String,

    #[serde(default)]
    pub meta: VarMeta,

    #[serde(default)]
    pub value: Value,
}

/// Metadata attached to a namespace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceMeta {
    pub doc: Option<String>,
    pub wiki_doc: Option<String>,
    pub author: Option<String>,
    pub see_also: Option<Vec<String>>,
    pub added: Option<String>,
    pub deprecated: Option<String>,
    pub skip_wiki: bool,
}

impl NamespaceMeta {
    pub fn effective_doc(&self) -> Option<&str> {
        self.doc.as_deref().or(self.wiki_doc.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    /// Dotted full name
    pub name: String,

    #[serde(default)]
    pub meta: NamespaceMeta,

    #[serde(default)]
    pub interns: Vec<Var>,
}

impl Namespace {
    pub fn is_skipped(&self) -> bool {
        self.meta.skip_wiki
    }

    /// Qualified name of one of this namespace's vars
    pub fn qualify(&self, var: &Var) -> String {
        format!("{}/{}", self.name, var.name)
    }
}

/// Reflective information about a constructed class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    /// Fully qualified class name
    pub name: String,

    /// Declared base classes and interfaces
    #[serde(default)]
    pub bases: Vec<String>,

    /// Set when reflecting on the class failed at snapshot time
    #[serde(default)]
    pub reflect_error: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReflectError {
    #[error("class {0} is not loaded")]
    NotFound(String),

    #[error("reflection on {class} failed: {message}")]
    Failed { class: String, message: String },
}

/// Explicit snapshot of every loaded namespace and class
#[derive(Debug, Clone, Default)]
pub struct Registry {
    namespaces: BTreeMap<String, Namespace>,
    classes: BTreeMap<String, ClassInfo>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a namespace; the first registration of a name wins
    pub fn insert_namespace(&mut self, namespace: Namespace) -> bool {
        if self.namespaces.contains_key(&namespace.name) {
            return false;
        }
        self.namespaces.insert(namespace.name.clone(), namespace);
        true
    }

    pub fn insert_class(&mut self, class: ClassInfo) {
        self.classes.insert(class.name.clone(), class);
    }

    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.get(name)
    }

    /// All loaded namespaces in full-name order
    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.values()
    }

    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Resolve a class by name and return its declared bases
    pub fn reflect(&self, class_name: &str) -> std::result::Result<&ClassInfo, ReflectError> {
        let class = self.classes
            .get(class_name)
            .ok_or_else(|| ReflectError::NotFound(class_name.to_string()))?;

        match &class.reflect_error {
            Some(message) => Err(ReflectError::Failed {
                class: class_name.to_string(),
                message: message.clone(),
            }),
            None => Ok(class),
        }
    }
}
