//! Validator registry
//!
//! Maps editor aliases to the rules and decoders they contribute, and builds
//! the ordered validator list for a property type: required, then pattern,
//! then editor rules.

use crate::types::{DataType, PropertyType};
use crate::{Error, Result};
use super::decoder::{CompositeDecoder, NestedRowsDecoder};
use super::field_validators::{
    DecimalValidator, EmailValidator, IntegerValidator, PatternValidator, RequiredValidator,
    ValueValidator,
};
use super::types::{FieldContext, ValidationFailure};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Editor aliases registered by [`ValidatorRegistry::with_builtin_editors`]
pub mod editors {
    pub const TEXTBOX: &str = "textbox";
    pub const TEXTAREA: &str = "textarea";
    pub const INTEGER: &str = "integer";
    pub const DECIMAL: &str = "decimal";
    pub const EMAIL: &str = "email";
    pub const BLOCK_LIST: &str = "blockList";
}

/// What one editor contributes to validation
#[derive(Clone, Default)]
pub struct EditorRegistration {
    validators: Vec<Arc<dyn ValueValidator>>,
    decoder: Option<Arc<dyn CompositeDecoder>>,
}

impl EditorRegistration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule run against every value of this editor
    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: ValueValidator + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Add a rule given as a function or closure
    pub fn with_rule<F>(self, rule: F) -> Self
    where
        F: Fn(&Value, &FieldContext<'_>) -> Vec<ValidationFailure> + Send + Sync + 'static,
    {
        self.with_validator(rule)
    }

    /// Mark the editor as composite, decoding values with `decoder`
    pub fn with_decoder<D>(mut self, decoder: D) -> Self
    where
        D: CompositeDecoder + 'static,
    {
        self.decoder = Some(Arc::new(decoder));
        self
    }

    pub fn is_composite(&self) -> bool {
        self.decoder.is_some()
    }
}

/// Immutable editor alias → registration lookup
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    editors: HashMap<String, EditorRegistration>,
}

impl ValidatorRegistry {
    pub fn builder() -> ValidatorRegistryBuilder {
        ValidatorRegistryBuilder::new()
    }

    /// Registry with the built-in editors and nothing else
    pub fn with_builtin_editors() -> Self {
        Self::builder().with_builtin_editors().build()
    }

    pub fn is_registered(&self, editor_alias: &str) -> bool {
        self.editors.contains_key(editor_alias)
    }

    /// Registered editor aliases, sorted
    pub fn editor_aliases(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.editors.keys().map(String::as_str).collect();
        aliases.sort_unstable();
        aliases
    }

    /// Ordered validators for a property type backed by `data_type`
    ///
    /// Fails only when the property's pattern does not compile.
    pub fn validators_for(
        &self,
        property_type: &PropertyType,
        data_type: &DataType,
    ) -> Result<Vec<Arc<dyn ValueValidator>>> {
        let mut validators: Vec<Arc<dyn ValueValidator>> = Vec::new();

        if property_type.mandatory {
            validators.push(Arc::new(RequiredValidator));
        }

        if let Some(pattern) = property_type.effective_pattern() {
            let validator = PatternValidator::new(pattern, property_type.pattern_message.clone())
                .map_err(|e| Error::InvalidPattern {
                    property: property_type.alias.clone(),
                    message: e.to_string(),
                    source: e,
                })?;
            validators.push(Arc::new(validator));
        }

        match self.editors.get(&data_type.editor_alias) {
            Some(registration) => validators.extend(registration.validators.iter().cloned()),
            None => tracing::warn!(
                editor = %data_type.editor_alias,
                data_type_id = data_type.id,
                "No editor registered for data type, skipping editor rules"
            ),
        }

        Ok(validators)
    }

    /// Decoder for `data_type` when its editor is composite
    pub fn decoder_for(&self, data_type: &DataType) -> Option<&dyn CompositeDecoder> {
        self.editors
            .get(&data_type.editor_alias)
            .and_then(|registration| registration.decoder.as_deref())
    }
}

/// Builder collecting editor registrations before the registry is frozen
#[derive(Default)]
pub struct ValidatorRegistryBuilder {
    editors: HashMap<String, EditorRegistration>,
}

impl ValidatorRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the built-in editors
    pub fn with_builtin_editors(self) -> Self {
        self.editor(editors::TEXTBOX, EditorRegistration::new())
            .editor(editors::TEXTAREA, EditorRegistration::new())
            .editor(editors::INTEGER, EditorRegistration::new().with_validator(IntegerValidator))
            .editor(editors::DECIMAL, EditorRegistration::new().with_validator(DecimalValidator))
            .editor(editors::EMAIL, EditorRegistration::new().with_validator(EmailValidator))
            .editor(
                editors::BLOCK_LIST,
                EditorRegistration::new().with_decoder(NestedRowsDecoder::new()),
            )
    }

    /// Register (or replace) an editor
    pub fn editor(mut self, alias: impl Into<String>, registration: EditorRegistration) -> Self {
        self.editors.insert(alias.into(), registration);
        self
    }

    pub fn build(self) -> ValidatorRegistry {
        ValidatorRegistry {
            editors: self.editors,
        }
    }
}
