// src/core/classifier.rs
use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use super::doc::normalize_doc;
use super::registry::{Value, Var};

/// Keys every interface descriptor mapping carries
pub const INTERFACE_SIGNATURE_KEYS: [&str; 6] = [
    "on",
    "on_interface",
    "sigs",
    "var",
    "method_map",
    "method_builders",
];

/// What kind of documentable thing a var is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    /// Plain value
    #[serde(rename = "var")]
    Value,
    Function,
    Macro,
    Multimethod,
    TypeAlias,
    Interface,
}

/// Documentation record for one var
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,

    pub doc: Option<String>,

    pub kind: SymbolKind,

    /// Declared parameter lists, one per arity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_shapes: Option<Vec<Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forms: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_line: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dynamic: bool,
}

/// Outcome of probing a value for the interface descriptor shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Yes,
    No,
    /// The value could not be inspected
    Indeterminate,
}

/// Structural test for an interface descriptor. Never fails: a value that
/// cannot be dereferenced is reported as indeterminate.
pub fn probe_interface(value: &Value) -> Probe {
    match value {
        Value::Unreadable(_) => Probe::Indeterminate,
        Value::Map(map) => {
            if INTERFACE_SIGNATURE_KEYS.iter().all(|key| map.contains_key(*key)) {
                Probe::Yes
            } else {
                Probe::No
            }
        }
        _ => Probe::No,
    }
}

/// Indeterminate probes count as "not an interface"
pub fn is_interface(value: &Value) -> bool {
    probe_interface(value) == Probe::Yes
}

/// Determine the kind of a var. First match wins.
pub fn classify_kind(var: &Var) -> SymbolKind {
    if var.meta.is_macro {
        SymbolKind::Macro
    } else if var.value == Value::MultiFn {
        SymbolKind::Multimethod
    } else if var.meta.arglists.is_some() {
        SymbolKind::Function
    } else if var.meta.forms.is_some() {
        SymbolKind::TypeAlias
    } else if is_interface(&var.value) {
        SymbolKind::Interface
    } else {
        SymbolKind::Value
    }
}

/// Build the documentation record of a var from its metadata and bound value
pub fn classify(var: &Var) -> SymbolInfo {
    let meta = &var.meta;

    SymbolInfo {
        name: var.name.clone(),
        doc: normalize_doc(meta.effective_doc()),
        kind: classify_kind(var),
        parameter_shapes: meta.arglists.clone(),
        forms: meta.forms.clone(),
        source_file: meta.file.clone(),
        source_line: meta.line,
        added: meta.added.clone(),
        deprecated: meta.deprecated.clone(),
        dynamic: meta.dynamic,
    }
}

/// Read-only view over an interface descriptor mapping
pub struct InterfaceDescriptor<'a> {
    map: &'a BTreeMap<String, Value>,
}

impl<'a> InterfaceDescriptor<'a> {
    /// Wrap a value that passes the structural interface test
    pub fn from_value(value: &'a Value) -> Option<Self> {
        if !is_interface(value) {
            return None;
        }
        value.as_map().map(|map| Self { map })
    }

    /// Class name of the interface generated for this descriptor
    pub fn on_interface(&self) -> Option<&'a str> {
        self.map.get("on_interface").and_then(Value::as_text)
    }

    /// Doc string of a declared member signature
    pub fn signature_doc(&self, name: &str) -> Option<&'a str> {
        self.map
            .get("sigs")
            .and_then(|sigs| sigs.get(name))
            .and_then(|sig| sig.get("doc"))
            .and_then(Value::as_text)
    }

    /// Whether any declared member signature carries a doc string
    pub fn has_signature_docs(&self) -> bool {
        self.map
            .get("sigs")
            .and_then(Value::as_map)
            .map_or(false, |sigs| {
                sigs.values().any(|sig| sig.get("doc").and_then(Value::as_text).is_some())
            })
    }

    /// Names of the classes extended with this interface, sorted
    pub fn implementers(&self) -> Vec<String> {
        let mut implementers: Vec<String> = self.map
            .get("impls")
            .and_then(Value::as_map)
            .map(|impls| impls.keys().cloned().collect())
            .unwrap_or_default();
        implementers.sort();
        implementers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::fixtures::*;

    #[test]
    fn test_kind_precedence() {
        let mut v = function("f", "doc", &["x"]);
        v.meta.is_macro = true;
        assert_eq!(classify_kind(&v), SymbolKind::Macro);

        let mut v = function("dispatch", "doc", &["x"]);
        v.value = Value::MultiFn;
        assert_eq!(classify_kind(&v), SymbolKind::Multimethod);

        let v = function("f", "doc", &["x"]);
        assert_eq!(classify_kind(&v), SymbolKind::Function);

        let mut v = documented_var("alias", "doc");
        v.meta.forms = Some(vec!["(alias name)".to_string()]);
        assert_eq!(classify_kind(&v), SymbolKind::TypeAlias);

        let v = interface_var("a", "P", Some("doc"), &[("m", None)], &[]);
        assert_eq!(classify_kind(&v), SymbolKind::Interface);

        let v = documented_var("x", "doc");
        assert_eq!(classify_kind(&v), SymbolKind::Value);
    }

    #[test]
    fn test_unreadable_value_is_not_an_interface() {
        let mut v = documented_var("weird", "doc");
        v.value = Value::Unreadable("deref unsupported".to_string());

        assert_eq!(probe_interface(&v.value), Probe::Indeterminate);
        assert!(!is_interface(&v.value));
        assert_eq!(classify_kind(&v), SymbolKind::Value);
    }

    #[test]
    fn test_partial_descriptor_is_not_an_interface() {
        let mut map = BTreeMap::new();
        for key in &INTERFACE_SIGNATURE_KEYS[..5] {
            map.insert(key.to_string(), Value::Nil);
        }
        assert_eq!(probe_interface(&Value::Map(map)), Probe::No);
        assert_eq!(probe_interface(&Value::Str("on".to_string())), Probe::No);
    }

    #[test]
    fn test_classify_copies_metadata() {
        let mut v = function("reduce", "Reduces.\n  Second line.", &["f", "coll"]);
        v.meta.file = Some("core.clj".to_string());
        v.meta.line = Some(42);
        v.meta.added = Some("1.0".to_string());
        v.meta.dynamic = true;

        let info = classify(&v);
        assert_eq!(info.name, "reduce");
        assert_eq!(info.doc.as_deref(), Some("Reduces.\nSecond line."));
        assert_eq!(info.kind, SymbolKind::Function);
        assert_eq!(info.parameter_shapes, Some(vec![vec!["f".to_string(), "coll".to_string()]]));
        assert_eq!(info.source_file.as_deref(), Some("core.clj"));
        assert_eq!(info.source_line, Some(42));
        assert!(info.dynamic);
    }

    #[test]
    fn test_descriptor_accessors() {
        let value = interface_value("my-lib.io", "Reader", &[("read", Some("Reads.")), ("close", None)], &["b.Y", "a.X"]);
        let descriptor = InterfaceDescriptor::from_value(&value).unwrap();

        assert_eq!(descriptor.on_interface(), Some("my_lib.io.Reader"));
        assert_eq!(descriptor.signature_doc("read"), Some("Reads."));
        assert_eq!(descriptor.signature_doc("close"), None);
        assert!(descriptor.has_signature_docs());
        assert_eq!(descriptor.implementers(), vec!["a.X", "b.Y"]);
    }

    #[test]
    fn test_kind_serializes_with_stable_names() {
        assert_eq!(serde_json::to_string(&SymbolKind::Value).unwrap(), "\"var\"");
        assert_eq!(serde_json::to_string(&SymbolKind::TypeAlias).unwrap(), "\"type-alias\"");
        assert_eq!(serde_json::to_string(&SymbolKind::Interface).unwrap(), "\"interface\"");
    }
}
