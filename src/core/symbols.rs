// src/core/symbols.rs
use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::CollectionConfig;
use super::classifier::{classify, is_interface, InterfaceDescriptor, SymbolInfo, SymbolKind};
use super::doc::normalize_doc;
use super::registry::{Namespace, ReflectError, Registry, Var};

/// Documented interface definition with its member functions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceInfo {
    pub name: String,
    pub doc: Option<String>,
    pub kind: SymbolKind,
    pub member_functions: Vec<SymbolInfo>,
    pub known_implementers: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Record,
    Type,
}

/// Structured record or type discovered through its factory function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    pub kind: TypeKind,

    /// Field names in declaration order
    pub fields: Vec<String>,

    /// Declared bases of the constructed class
    pub interfaces: Vec<String>,

    /// Documented interfaces (`ns/name`) the class implements
    pub protocols: Vec<String>,
}

/// Naming convention tying a factory var to the type it constructs.
///
/// The introspected ecosystem generates a factory named `prefix + TypeName`
/// for every record and type, and emits the class under a root derived from
/// the namespace name. Callers only go through this type, so swapping the
/// convention touches nothing else.
#[derive(Debug, Clone)]
pub struct FactoryConvention {
    prefix: String,
}

impl FactoryConvention {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    /// Type name constructed by a factory var, if the name follows the convention
    pub fn type_name<'a>(&self, var_name: &'a str) -> Option<&'a str> {
        var_name
            .strip_prefix(self.prefix.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Class name generated for a type defined in a namespace
    pub fn class_name(&self, namespace: &str, type_name: &str) -> String {
        let root = namespace.replace(['.', '-'], "_");
        format!("{}.{}", root, type_name)
    }
}

#[derive(Error, Debug)]
enum TypeResolveError {
    #[error(transparent)]
    Reflect(#[from] ReflectError),

    #[error("factory {0} declares no parameter list")]
    MissingFields(String),
}

/// Builds the members, interfaces and types views of a namespace
pub struct SymbolSetBuilder<'r> {
    registry: &'r Registry,
    convention: FactoryConvention,
    record_marker: String,

    /// Interface class name -> qualified name of its documented definition
    documented_interfaces: BTreeMap<String, String>,
}

impl<'r> SymbolSetBuilder<'r> {
    /// `documented` is the set of namespaces the tree covers; only their
    /// interfaces are eligible as a type's protocols
    pub fn new(registry: &'r Registry, documented: &[&Namespace], config: &CollectionConfig) -> Self {
        let mut documented_interfaces = BTreeMap::new();
        for ns in documented.iter().filter(|ns| !ns.is_skipped()) {
            for var in &ns.interns {
                if !is_documentable_interface(var) {
                    continue;
                }
                if let Some(class) = InterfaceDescriptor::from_value(&var.value)
                    .and_then(|descriptor| descriptor.on_interface())
                {
                    documented_interfaces.insert(class.to_string(), ns.qualify(var));
                }
            }
        }

        Self {
            registry,
            convention: FactoryConvention::new(&config.factory_prefix),
            record_marker: config.record_marker.clone(),
            documented_interfaces,
        }
    }

    /// Documented vars that are neither interfaces nor interface members
    pub fn members(&self, ns: &Namespace) -> Vec<SymbolInfo> {
        let mut members: Vec<SymbolInfo> = ns.interns
            .iter()
            .filter(|var| {
                var.meta.effective_doc().is_some()
                    && !is_interface(&var.value)
                    && var.meta.protocol.is_none()
                    && !is_hidden(var)
            })
            .map(classify)
            .collect();

        members.sort_by(|a, b| a.name.cmp(&b.name));
        members
    }

    /// Interface definitions carrying documentation of their own or on a signature
    pub fn interfaces(&self, ns: &Namespace) -> Vec<InterfaceInfo> {
        let mut interfaces: Vec<InterfaceInfo> = ns.interns
            .iter()
            .filter(|var| is_documentable_interface(var))
            .filter_map(|var| {
                let descriptor = InterfaceDescriptor::from_value(&var.value)?;
                Some(self.interface_info(ns, var, &descriptor))
            })
            .collect();

        interfaces.sort_by(|a, b| a.name.cmp(&b.name));
        interfaces
    }

    fn interface_info(&self, ns: &Namespace, var: &Var, descriptor: &InterfaceDescriptor) -> InterfaceInfo {
        let qualified = ns.qualify(var);

        let mut member_functions: Vec<SymbolInfo> = ns.interns
            .iter()
            .filter(|member| member.meta.protocol.as_deref() == Some(qualified.as_str()))
            .map(|member| {
                let mut info = classify(member);
                if info.doc.is_none() {
                    info.doc = normalize_doc(descriptor.signature_doc(&member.name));
                }
                info
            })
            .collect();
        member_functions.sort_by(|a, b| a.name.cmp(&b.name));

        InterfaceInfo {
            name: var.name.clone(),
            doc: normalize_doc(var.meta.effective_doc()),
            kind: SymbolKind::Interface,
            member_functions,
            known_implementers: descriptor.implementers(),
        }
    }

    /// Records and types found through factory vars. A candidate whose class
    /// cannot be resolved or reflected is left out.
    pub fn types(&self, ns: &Namespace) -> Vec<TypeInfo> {
        let mut types = Vec::new();

        for var in &ns.interns {
            let Some(type_name) = self.convention.type_name(&var.name) else {
                continue;
            };

            match self.type_info(ns, var, type_name) {
                Ok(info) => types.push(info),
                Err(e) => debug!("Skipping type candidate {}/{}: {}", ns.name, var.name, e),
            }
        }

        types.sort_by(|a: &TypeInfo, b: &TypeInfo| a.name.cmp(&b.name));
        types
    }

    fn type_info(&self, ns: &Namespace, factory: &Var, type_name: &str) -> Result<TypeInfo, TypeResolveError> {
        let class_name = self.convention.class_name(&ns.name, type_name);
        let class = self.registry.reflect(&class_name)?;

        let fields = factory.meta.arglists
            .as_ref()
            .and_then(|arglists| arglists.first())
            .cloned()
            .ok_or_else(|| TypeResolveError::MissingFields(factory.name.clone()))?;

        let mut interfaces = class.bases.clone();
        interfaces.sort();
        interfaces.dedup();

        let mut protocols: Vec<String> = interfaces
            .iter()
            .filter_map(|base| self.documented_interfaces.get(base).cloned())
            .collect();
        protocols.sort();

        let kind = if class.bases.iter().any(|base| *base == self.record_marker) {
            TypeKind::Record
        } else {
            TypeKind::Type
        };

        Ok(TypeInfo {
            name: type_name.to_string(),
            kind,
            fields,
            interfaces,
            protocols,
        })
    }
}

fn is_hidden(var: &Var) -> bool {
    var.meta.private || var.meta.skip_wiki
}

fn is_documentable_interface(var: &Var) -> bool {
    if is_hidden(var) {
        return false;
    }
    match InterfaceDescriptor::from_value(&var.value) {
        Some(descriptor) => var.meta.effective_doc().is_some() || descriptor.has_signature_docs(),
        None => false,
    }
}
