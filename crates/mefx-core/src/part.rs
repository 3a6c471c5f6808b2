//! Part references and the catalog that owns them.
//!
//! A part is whatever the composition engine discovered: a unique name, the
//! contracts it exports and the imports it requires. mefx never looks past
//! these attributes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::node::CONSTRUCTOR_LABEL;

/// One import requirement declared by a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSite {
    /// Contract name the import is matched against.
    pub contract: String,
    /// Type name of the importing site, used to link the import back to a
    /// rejected part. Falls back to `contract` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_type: Option<String>,
    /// Importing member name; `None` for constructor parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Opaque constraint descriptions reported by the engine.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,
}

impl ImportSite {
    pub fn new(contract: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            site_type: None,
            field: None,
            constraints: Vec::new(),
        }
    }

    pub fn with_site_type(mut self, site_type: impl Into<String>) -> Self {
        self.site_type = Some(site_type.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Name of the part this import resolves to.
    pub fn target_key(&self) -> &str {
        self.site_type.as_deref().unwrap_or(&self.contract)
    }

    /// Label for edges created from this import.
    pub fn label(&self) -> &str {
        self.field.as_deref().unwrap_or(CONSTRUCTOR_LABEL)
    }
}

/// Read-only description of one discovered part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    #[serde(default)]
    pub exports: Vec<String>,
    #[serde(default)]
    pub imports: Vec<ImportSite>,
}

impl PartRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualified_name: None,
            exports: Vec::new(),
            imports: Vec::new(),
        }
    }

    pub fn with_export(mut self, contract: impl Into<String>) -> Self {
        self.exports.push(contract.into());
        self
    }

    pub fn with_import(mut self, import: ImportSite) -> Self {
        self.imports.push(import);
        self
    }

    pub fn with_qualified_name(mut self, qualified_name: impl Into<String>) -> Self {
        self.qualified_name = Some(qualified_name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The short name, or the fully qualified one when `verbose` is set.
    pub fn display_name(&self, verbose: bool) -> &str {
        if verbose {
            self.qualified_name.as_deref().unwrap_or(&self.name)
        } else {
            &self.name
        }
    }

    /// Exported contracts other than the part's own identity.
    pub fn non_identity_exports(&self) -> impl Iterator<Item = &str> {
        self.exports
            .iter()
            .map(String::as_str)
            .filter(move |contract| *contract != self.name)
    }

    pub fn exports_contract(&self, contract: &str) -> bool {
        self.exports.iter().any(|export| export == contract)
    }

    pub fn imports_contract(&self, contract: &str) -> bool {
        self.imports.iter().any(|import| import.contract == contract)
    }
}

/// All parts known to one run, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct PartCatalog {
    parts: Vec<PartRef>,
    by_name: HashMap<String, usize>,
}

impl PartCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a part. Returns false and keeps the existing entry if the name is taken.
    pub fn insert(&mut self, part: PartRef) -> bool {
        if self.by_name.contains_key(&part.name) {
            return false;
        }
        self.by_name.insert(part.name.clone(), self.parts.len());
        self.parts.push(part);
        true
    }

    pub fn get(&self, name: &str) -> Option<&PartRef> {
        self.by_name.get(name).map(|&index| &self.parts[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn parts(&self) -> &[PartRef] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Parts exporting the given contract.
    pub fn exporters_of<'a>(&'a self, contract: &'a str) -> impl Iterator<Item = &'a PartRef> {
        self.parts
            .iter()
            .filter(move |part| part.exports_contract(contract))
    }

    /// Parts declaring an import of the given contract.
    pub fn importers_of<'a>(&'a self, contract: &'a str) -> impl Iterator<Item = &'a PartRef> {
        self.parts
            .iter()
            .filter(move |part| part.imports_contract(contract))
    }
}

impl FromIterator<PartRef> for PartCatalog {
    fn from_iter<T: IntoIterator<Item = PartRef>>(iter: T) -> Self {
        let mut catalog = PartCatalog::new();
        for part in iter {
            catalog.insert(part);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger() -> PartRef {
        PartRef::new("Contoso.Logger")
            .with_export("Contoso.Logger")
            .with_export("Contoso.ILogger")
            .with_import(ImportSite::new("Contoso.ISink").with_field("Sink"))
            .with_import(ImportSite::new("Contoso.IClock"))
    }

    #[test]
    fn test_import_label_defaults_to_constructor() {
        let part = logger();
        assert_eq!(part.imports[0].label(), "Sink");
        assert_eq!(part.imports[1].label(), CONSTRUCTOR_LABEL);
    }

    #[test]
    fn test_import_target_key_prefers_site_type() {
        let import = ImportSite::new("Contoso.ISink");
        assert_eq!(import.target_key(), "Contoso.ISink");

        let import = import.with_site_type("Contoso.FileSink");
        assert_eq!(import.target_key(), "Contoso.FileSink");
    }

    #[test]
    fn test_non_identity_exports() {
        let part = logger();
        let exports: Vec<_> = part.non_identity_exports().collect();
        assert_eq!(exports, vec!["Contoso.ILogger"]);
    }

    #[test]
    fn test_display_name() {
        let part = logger().with_qualified_name("Contoso.Logger, Contoso, Version=1.0.0.0");
        assert_eq!(part.display_name(false), "Contoso.Logger");
        assert_eq!(
            part.display_name(true),
            "Contoso.Logger, Contoso, Version=1.0.0.0"
        );
        assert_eq!(PartRef::new("Bare").display_name(true), "Bare");
    }

    #[test]
    fn test_catalog_queries() {
        let sink = PartRef::new("Contoso.FileSink").with_export("Contoso.ISink");
        let catalog: PartCatalog = [logger(), sink].into_iter().collect();

        let exporters: Vec<_> = catalog.exporters_of("Contoso.ISink").map(PartRef::name).collect();
        assert_eq!(exporters, vec!["Contoso.FileSink"]);

        let importers: Vec<_> = catalog.importers_of("Contoso.ISink").map(PartRef::name).collect();
        assert_eq!(importers, vec!["Contoso.Logger"]);

        assert!(catalog.importers_of("Contoso.Unused").next().is_none());
    }

    #[test]
    fn test_catalog_keeps_first_definition() {
        let mut catalog = PartCatalog::new();
        assert!(catalog.insert(PartRef::new("A").with_export("X")));
        assert!(!catalog.insert(PartRef::new("A").with_export("Y")));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("A").map(|p| p.exports.clone()), Some(vec!["X".to_string()]));
    }
}
