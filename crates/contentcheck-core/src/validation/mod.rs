//! Property validation for content items
//!
//! Validates the property values of content item variants against the rules
//! declared on their property types (mandatory, pattern) and the rules
//! contributed by each data type's editor. Composite editors hold lists of
//! rows; rows are validated recursively and their failures reported as
//! nested per-row lists under the composite property's key.
//!
//! The validator is organized into focused modules:
//! - `types`: Failure and report entry types
//! - `field_validators`: Required, pattern and editor rules
//! - `decoder`: Composite value decoding
//! - `registry`: Editor alias to validators lookup
//! - `report`: Keyed error report and model-state output
//! - `core`: Main ContentValidator struct and recursion

pub mod types;
pub mod core;
pub mod field_validators;
pub mod decoder;
pub mod registry;
pub mod report;

use serde::{Deserialize, Serialize};

// Re-export public API
pub use types::{FieldContext, NestedValidation, ReportEntry, ValidationFailure};
pub use core::ContentValidator;
pub use field_validators::{
    DecimalValidator, EmailValidator, IntegerValidator, PatternValidator, RequiredValidator,
    ValueValidator,
};
pub use decoder::{CompositeDecoder, DecodeError, NestedRowsDecoder, SubItem};
pub use registry::{editors, EditorRegistration, ValidatorRegistry, ValidatorRegistryBuilder};
pub use report::{ErrorReport, ModelState, ModelStateSink, ReportBuilder};

/// Default prefix of every report key
pub const DEFAULT_KEY_SCOPE: &str = "_content";

/// Default limit on composite nesting
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Validation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationConfig {
    /// Prefix of every report key
    pub key_scope: String,
    /// Deepest composite nesting validated before faulting
    pub max_depth: usize,
    /// Report saved variants with a blank name
    pub require_variant_names: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            key_scope: DEFAULT_KEY_SCOPE.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            require_variant_names: true,
        }
    }
}

impl ValidationConfig {
    pub fn with_key_scope(mut self, scope: impl Into<String>) -> Self {
        self.key_scope = scope.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_variant_names(mut self, required: bool) -> Self {
        self.require_variant_names = required;
        self
    }
}
