// src/core/assembler.rs
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, info, info_span};

use crate::config::{CollectionConfig, ProjectConfig};
use super::classifier::SymbolInfo;
use super::doc::normalize_doc;
use super::hierarchy::NamespaceResolver;
use super::registry::{Namespace, Registry};
use super::symbols::{InterfaceInfo, SymbolSetBuilder, TypeInfo};

/// One documented namespace in the collected tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub full_name: String,

    /// Full name with the configured prefix stripped
    pub short_name: String,

    pub doc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub see_also: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,

    pub members: Vec<SymbolInfo>,
    pub interfaces: Vec<InterfaceInfo>,
    pub types: Vec<TypeInfo>,

    /// Nested namespaces documented under this base
    pub subspaces: Vec<ModuleEntry>,

    /// Short name of the top-level base this entry is grouped under
    pub base_name: String,
}

impl ModuleEntry {
    /// Whether the entry documents anything beyond its own name
    pub fn has_content(&self) -> bool {
        self.doc.is_some()
            || !self.members.is_empty()
            || !self.types.is_empty()
            || !self.interfaces.is_empty()
    }
}

/// Entry still tied to the registry namespace it was built from
struct DraftEntry<'r> {
    namespace: &'r Namespace,
    entry: ModuleEntry,
    subspaces: Vec<DraftEntry<'r>>,
}

impl DraftEntry<'_> {
    /// Drop the registry handle at every depth, leaving a plain value tree
    fn strip_handles(self) -> ModuleEntry {
        let mut entry = self.entry;
        entry.subspaces = self.subspaces
            .into_iter()
            .map(DraftEntry::strip_handles)
            .collect();
        entry
    }
}

/// Composes hierarchy and symbol views into the ordered documentation forest
pub struct TreeAssembler<'r> {
    resolver: NamespaceResolver<'r>,
    symbols: SymbolSetBuilder<'r>,
    prefix: String,
}

impl<'r> TreeAssembler<'r> {
    pub fn new(registry: &'r Registry, project: &ProjectConfig, collection: &CollectionConfig) -> Self {
        Self::with_roots(registry, &project.root_list(), &project.prefix, collection)
    }

    pub fn with_roots(
        registry: &'r Registry,
        roots: &[String],
        prefix: &str,
        collection: &CollectionConfig,
    ) -> Self {
        let resolver = NamespaceResolver::new(registry, roots);
        let symbols = SymbolSetBuilder::new(registry, &resolver.relevant(), collection);

        Self {
            resolver,
            symbols,
            prefix: prefix.to_string(),
        }
    }

    pub fn resolver(&self) -> &NamespaceResolver<'r> {
        &self.resolver
    }

    /// Build the full tree: base namespaces sorted by short name, each
    /// carrying its non-empty subspaces
    pub fn assemble(&self) -> Vec<ModuleEntry> {
        let span = info_span!("collect");
        let _guard = span.enter();

        let mut drafts: Vec<DraftEntry<'r>> = self.resolver
            .base_namespaces()
            .into_iter()
            .map(|ns| self.draft(ns))
            .collect();

        for draft in &mut drafts {
            self.attach_subspaces(draft);
        }

        drafts.sort_by(|a, b| a.entry.short_name.cmp(&b.entry.short_name));

        let tree: Vec<ModuleEntry> = drafts
            .into_iter()
            .map(DraftEntry::strip_handles)
            .collect();

        info!(
            "Collected {} base namespaces ({} subspaces)",
            tree.len(),
            tree.iter().map(|entry| entry.subspaces.len()).sum::<usize>()
        );
        tree
    }

    fn attach_subspaces(&self, base: &mut DraftEntry<'r>) {
        let base_name = base.entry.short_name.clone();

        base.subspaces = self.resolver
            .subspaces(base.namespace)
            .into_iter()
            .map(|ns| self.draft(ns))
            .filter(|draft| {
                let keep = draft.entry.has_content();
                if !keep {
                    debug!("Pruning empty subspace {}", draft.entry.full_name);
                }
                keep
            })
            .collect();

        base.entry.base_name = base_name.clone();
        for subspace in &mut base.subspaces {
            subspace.entry.base_name = base_name.clone();
        }
    }

    fn draft(&self, ns: &'r Namespace) -> DraftEntry<'r> {
        let span = debug_span!("namespace", name = %ns.name);
        let _guard = span.enter();

        let members = self.symbols.members(ns);
        let interfaces = self.symbols.interfaces(ns);
        let types = self.symbols.types(ns);
        debug!(
            "{} members, {} interfaces, {} types",
            members.len(),
            interfaces.len(),
            types.len()
        );

        let short_name = self.short_name(&ns.name);
        let meta = &ns.meta;

        DraftEntry {
            namespace: ns,
            entry: ModuleEntry {
                full_name: ns.name.clone(),
                base_name: short_name.clone(),
                short_name,
                doc: normalize_doc(meta.effective_doc()),
                author: meta.author.clone(),
                see_also: meta.see_also.clone(),
                added: meta.added.clone(),
                deprecated: meta.deprecated.clone(),
                members,
                interfaces,
                types,
                subspaces: vec![],
            },
            subspaces: vec![],
        }
    }

    fn short_name(&self, full_name: &str) -> String {
        full_name
            .strip_prefix(self.prefix.as_str())
            .filter(|rest| !rest.is_empty())
            .unwrap_or(full_name)
            .to_string()
    }
}
