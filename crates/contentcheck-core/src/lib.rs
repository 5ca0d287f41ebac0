//! Contentcheck Core - Property validation for structured content items
//!
//! This crate validates the property values of a content item before it is
//! saved. Each property is checked against its property type (mandatory,
//! pattern) and against the rules its data type's editor contributes.
//! Composite properties hold a list of rows that are validated recursively,
//! with per-row failures reported as nested lists under the composite key.
//!
//! # Main Components
//!
//! - **Error Handling**: Fault types using `thiserror` and `anyhow`
//! - **Core Types**: Save models and type metadata
//! - **Metadata**: Type lookup trait and a loadable in-memory catalog
//! - **Validation**: Registry, composite decoding, recursion and reporting
//!
//! # Example
//!
//! ```no_run
//! use contentcheck_core::{
//!     ContentItemSave, ContentValidator, MetadataCatalog, ModelState, Result,
//!     StaticTextProvider, ValidatorRegistry,
//! };
//! use std::path::Path;
//!
//! fn example(save: &ContentItemSave) -> Result<bool> {
//!     let catalog = MetadataCatalog::load(Path::new("types.yaml"))?;
//!     let registry = ValidatorRegistry::with_builtin_editors();
//!     let text = StaticTextProvider::default();
//!     let validator = ContentValidator::new(&registry, &catalog, &text);
//!
//!     let mut state = ModelState::new();
//!     let mut valid = true;
//!     for variant in save.variants.iter().filter(|v| v.save) {
//!         valid &= validator.validate_properties(save, variant, &variant.properties, &mut state)?;
//!     }
//!     Ok(valid)
//! }
//! ```

pub mod error;
pub mod types;
pub mod loader;
pub mod localization;
pub mod metadata;
pub mod validation;

// Re-export main types for convenience
pub use error::{Error, FailureKind, Result};
pub use types::{
    // Save models
    ContentItemSave, ContentVariantSave, PropertyValue,

    // Type metadata
    ContentType, PropertyType, DataType, ValueStorageType,
};
pub use localization::{LocalizedTextProvider, StaticTextProvider};
pub use metadata::{CatalogIssue, MetadataCatalog, TypeMetadataProvider};
pub use validation::{
    ContentValidator, ErrorReport, ModelState, ModelStateSink, ReportEntry, ValidationConfig,
    ValidationFailure, ValidatorRegistry,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
