// src/core/hierarchy.rs
use tracing::debug;

use super::registry::{Namespace, Registry};

/// Whether a namespace name equals one of the roots or sits below one
pub fn matches_roots(name: &str, roots: &[String]) -> bool {
    roots.iter().any(|root| {
        name == root
            || name
                .strip_prefix(root.as_str())
                .map_or(false, |rest| rest.starts_with('.'))
    })
}

/// Infers the base/subspace hierarchy of the namespaces selected by a root list
pub struct NamespaceResolver<'r> {
    registry: &'r Registry,
    roots: Vec<String>,
}

impl<'r> NamespaceResolver<'r> {
    pub fn new(registry: &'r Registry, roots: &[String]) -> Self {
        Self {
            registry,
            roots: roots.to_vec(),
        }
    }

    pub fn is_relevant(&self, ns: &Namespace) -> bool {
        !ns.is_skipped() && matches_roots(&ns.name, &self.roots)
    }

    /// Selected namespaces in full-name order
    pub fn relevant(&self) -> Vec<&'r Namespace> {
        self.registry
            .namespaces()
            .filter(|ns| self.is_relevant(ns))
            .collect()
    }

    /// Shallowest loaded, relevant namespace along the dotted-name chain.
    /// Falls back to the namespace itself when no ancestor qualifies.
    pub fn base_of(&self, ns: &'r Namespace) -> &'r Namespace {
        let components: Vec<&str> = ns.name.split('.').collect();

        for depth in 1..=components.len() {
            let prefix = components[..depth].join(".");
            let Some(candidate) = self.registry.namespace(&prefix) else {
                continue;
            };

            if self.is_relevant(candidate) {
                return candidate;
            }

            if candidate.name != ns.name {
                debug!(
                    "Ancestor {} of {} is loaded but not selected; not using it as base",
                    candidate.name, ns.name
                );
            }
        }

        ns
    }

    /// Relevant namespaces that are their own base, in full-name order
    pub fn base_namespaces(&self) -> Vec<&'r Namespace> {
        self.relevant()
            .into_iter()
            .filter(|ns| self.base_of(*ns).name == ns.name)
            .collect()
    }

    /// Non-skipped namespaces nested below `ns`, in full-name order
    pub fn subspaces(&self, ns: &Namespace) -> Vec<&'r Namespace> {
        let prefix = format!("{}.", ns.name);
        self.registry
            .namespaces()
            .filter(|candidate| candidate.name.starts_with(&prefix) && !candidate.is_skipped())
            .collect()
    }
}
