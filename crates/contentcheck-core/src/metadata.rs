//! Type metadata lookup
//!
//! The validator resolves content types and data types through the
//! [`TypeMetadataProvider`] trait so that production stores and test fixtures
//! differ only in where the data comes from. [`MetadataCatalog`] is the
//! in-memory implementation, loadable from YAML or JSON.

use crate::loader::load_document;
use crate::types::{ContentType, DataType};
use crate::validation::ValidatorRegistry;
use crate::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

/// Read-only source of content type and data type definitions
pub trait TypeMetadataProvider: Send + Sync {
    /// Look up a content type by alias
    fn content_type(&self, alias: &str) -> Option<&ContentType>;

    /// Look up a data type by id
    fn data_type(&self, id: i32) -> Option<&DataType>;
}

/// In-memory collection of content types and data types
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataCatalog {
    #[serde(default)]
    pub content_types: Vec<ContentType>,
    #[serde(default)]
    pub data_types: Vec<DataType>,
}

impl MetadataCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_types.push(content_type);
        self
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_types.push(data_type);
        self
    }

    /// Load a catalog from a `.yaml`, `.yml` or `.json` file
    pub fn load(path: &Path) -> Result<Self> {
        let catalog: Self = load_document(path)?;
        tracing::info!(
            path = %path.display(),
            content_types = catalog.content_types.len(),
            data_types = catalog.data_types.len(),
            "Loaded metadata catalog"
        );
        Ok(catalog)
    }

    /// Check the catalog for inconsistencies that would make validation fault
    ///
    /// The registry is needed to know which editors are composite and which
    /// sub-types their configurations allow.
    pub fn check(&self, registry: &ValidatorRegistry) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        let mut seen = BTreeSet::new();
        for content_type in &self.content_types {
            if !seen.insert(content_type.alias.as_str()) {
                issues.push(CatalogIssue::DuplicateContentType {
                    alias: content_type.alias.clone(),
                });
            }

            let mut property_aliases = BTreeSet::new();
            for property in &content_type.property_types {
                if !property_aliases.insert(property.alias.as_str()) {
                    issues.push(CatalogIssue::DuplicateProperty {
                        content_type: content_type.alias.clone(),
                        property: property.alias.clone(),
                    });
                }

                if self.data_type(property.data_type_id).is_none() {
                    issues.push(CatalogIssue::DanglingDataType {
                        content_type: content_type.alias.clone(),
                        property: property.alias.clone(),
                        data_type_id: property.data_type_id,
                    });
                }

                if let Some(pattern) = property.effective_pattern() {
                    if let Err(e) = Regex::new(pattern) {
                        issues.push(CatalogIssue::InvalidPattern {
                            content_type: content_type.alias.clone(),
                            property: property.alias.clone(),
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        for data_type in &self.data_types {
            if !registry.is_registered(&data_type.editor_alias) {
                issues.push(CatalogIssue::UnknownEditor {
                    data_type_id: data_type.id,
                    editor_alias: data_type.editor_alias.clone(),
                });
            }
            if let Some(decoder) = registry.decoder_for(data_type) {
                for alias in decoder.allowed_sub_types(data_type) {
                    if self.content_type(&alias).is_none() {
                        issues.push(CatalogIssue::UnknownSubType {
                            data_type_id: data_type.id,
                            alias,
                        });
                    }
                }
            }
        }

        issues.extend(self.find_composite_cycles(registry));
        issues
    }

    /// Content types reachable in one step through composite properties
    fn composite_edges(&self, registry: &ValidatorRegistry) -> BTreeMap<&str, BTreeSet<String>> {
        let mut edges = BTreeMap::new();
        for content_type in &self.content_types {
            let targets: BTreeSet<String> = content_type
                .property_types
                .iter()
                .filter_map(|p| self.data_type(p.data_type_id))
                .filter_map(|dt| registry.decoder_for(dt).map(|d| d.allowed_sub_types(dt)))
                .flatten()
                .collect();
            edges.insert(content_type.alias.as_str(), targets);
        }
        edges
    }

    fn find_composite_cycles(&self, registry: &ValidatorRegistry) -> Vec<CatalogIssue> {
        let edges = self.composite_edges(registry);
        let mut issues = Vec::new();
        let mut reported = BTreeSet::new();

        for start in edges.keys() {
            let mut stack: Vec<(String, Vec<String>)> = vec![(start.to_string(), vec![start.to_string()])];
            let mut visited = BTreeSet::new();

            while let Some((current, chain)) = stack.pop() {
                if !visited.insert(current.clone()) {
                    continue;
                }
                let Some(targets) = edges.get(current.as_str()) else {
                    continue;
                };
                for target in targets {
                    if target == start {
                        let mut cycle = chain.clone();
                        cycle.push(target.clone());
                        let mut members: Vec<String> = chain.clone();
                        members.sort();
                        if reported.insert(members) {
                            issues.push(CatalogIssue::CompositeCycle { chain: cycle });
                        }
                    } else {
                        let mut next = chain.clone();
                        next.push(target.clone());
                        stack.push((target.clone(), next));
                    }
                }
            }
        }

        issues
    }
}

impl TypeMetadataProvider for MetadataCatalog {
    fn content_type(&self, alias: &str) -> Option<&ContentType> {
        self.content_types.iter().find(|c| c.alias == alias)
    }

    fn data_type(&self, id: i32) -> Option<&DataType> {
        self.data_types.iter().find(|d| d.id == id)
    }
}

/// A consistency problem found by [`MetadataCatalog::check`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "camelCase")]
pub enum CatalogIssue {
    DuplicateContentType {
        alias: String,
    },
    DuplicateProperty {
        content_type: String,
        property: String,
    },
    DanglingDataType {
        content_type: String,
        property: String,
        data_type_id: i32,
    },
    InvalidPattern {
        content_type: String,
        property: String,
        message: String,
    },
    UnknownEditor {
        data_type_id: i32,
        editor_alias: String,
    },
    UnknownSubType {
        data_type_id: i32,
        alias: String,
    },
    /// Composite configurations that can nest a content type inside itself
    CompositeCycle {
        chain: Vec<String>,
    },
}

impl CatalogIssue {
    /// Whether validation against this catalog can fault because of the issue
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            CatalogIssue::UnknownEditor { .. } | CatalogIssue::CompositeCycle { .. }
        )
    }
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::DuplicateContentType { alias } => {
                write!(f, "content type '{}' is declared more than once", alias)
            }
            CatalogIssue::DuplicateProperty { content_type, property } => write!(
                f,
                "property '{}' is declared more than once on '{}'",
                property, content_type
            ),
            CatalogIssue::DanglingDataType { content_type, property, data_type_id } => write!(
                f,
                "property '{}.{}' references missing data type {}",
                content_type, property, data_type_id
            ),
            CatalogIssue::InvalidPattern { content_type, property, message } => write!(
                f,
                "property '{}.{}' has an invalid pattern: {}",
                content_type, property, message
            ),
            CatalogIssue::UnknownEditor { data_type_id, editor_alias } => write!(
                f,
                "data type {} uses unregistered editor '{}'",
                data_type_id, editor_alias
            ),
            CatalogIssue::UnknownSubType { data_type_id, alias } => write!(
                f,
                "data type {} allows unknown sub-type '{}'",
                data_type_id, alias
            ),
            CatalogIssue::CompositeCycle { chain } => {
                write!(f, "composite nesting cycle: {}", chain.join(" -> "))
            }
        }
    }
}
