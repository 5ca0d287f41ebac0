//! Content validator
//!
//! Walks the properties of a content item variant, runs each property's
//! validators, and recurses into the rows of composite properties. Rows are
//! validated by the same per-property logic as top-level properties; only
//! the way their results are keyed differs.

use crate::error::FailureKind;
use crate::localization::{keys, LocalizedTextProvider};
use crate::metadata::TypeMetadataProvider;
use crate::types::{ContentItemSave, ContentType, ContentVariantSave, PropertyValue};
use crate::{Error, Result};
use super::field_validators::RequiredValidator;
use super::registry::ValidatorRegistry;
use super::report::{property_key, variant_name_key, ErrorReport, ModelStateSink, ReportBuilder};
use super::types::{FieldContext, NestedValidation, ReportEntry, ValidationFailure};
use super::ValidationConfig;
use tracing::{debug, instrument, trace, warn};

/// Validation results of a single property
#[derive(Debug, Default)]
struct FieldOutcome {
    alias: String,
    /// Failures attributed to the property itself
    flat: Vec<ValidationFailure>,
    /// Per-row results of a composite property, when any row failed
    nested: Option<NestedValidation>,
}

impl FieldOutcome {
    fn into_entries(self) -> Vec<ReportEntry> {
        self.flat
            .into_iter()
            .map(ReportEntry::Failure)
            .chain(self.nested.map(ReportEntry::Nested))
            .collect()
    }
}

/// Where a list of properties sits: a top-level variant or a composite row
#[derive(Debug, Clone, Copy)]
struct Scope<'s> {
    /// Culture for message text; rows inherit their variant's culture
    culture: Option<&'s str>,
    depth: usize,
}

/// Validates content item properties against their type metadata
///
/// Holds only shared references; one validator can serve any number of
/// validation calls.
pub struct ContentValidator<'a> {
    registry: &'a ValidatorRegistry,
    metadata: &'a dyn TypeMetadataProvider,
    text: &'a dyn LocalizedTextProvider,
    config: ValidationConfig,
}

impl<'a> ContentValidator<'a> {
    /// Create a validator with the default configuration
    pub fn new(
        registry: &'a ValidatorRegistry,
        metadata: &'a dyn TypeMetadataProvider,
        text: &'a dyn LocalizedTextProvider,
    ) -> Self {
        Self::with_config(registry, metadata, text, ValidationConfig::default())
    }

    /// Create a validator with an explicit configuration
    pub fn with_config(
        registry: &'a ValidatorRegistry,
        metadata: &'a dyn TypeMetadataProvider,
        text: &'a dyn LocalizedTextProvider,
        config: ValidationConfig,
    ) -> Self {
        Self {
            registry,
            metadata,
            text,
            config,
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate `properties` of one variant and write failures into `sink`
    ///
    /// Returns whether every property is valid. On error nothing is written
    /// to the sink.
    pub fn validate_properties(
        &self,
        save: &ContentItemSave,
        variant: &ContentVariantSave,
        properties: &[PropertyValue],
        sink: &mut dyn ModelStateSink,
    ) -> Result<bool> {
        let mut builder = ReportBuilder::new();
        self.collect_variant(save, variant, properties, &mut builder)?;
        let report = builder.build();
        report.write_to(sink)?;
        Ok(report.is_valid())
    }

    /// Validate the properties of one variant into a report
    pub fn validate_variant(
        &self,
        save: &ContentItemSave,
        variant: &ContentVariantSave,
    ) -> Result<ErrorReport> {
        let mut builder = ReportBuilder::new();
        self.collect_variant(save, variant, &variant.properties, &mut builder)?;
        Ok(builder.build())
    }

    /// Validate every variant marked for saving
    #[instrument(skip(self, save), fields(content_type = %save.content_type_alias, variants = save.variants.len()))]
    pub fn validate_item(&self, save: &ContentItemSave) -> Result<ErrorReport> {
        let mut builder = ReportBuilder::new();

        for variant in save.variants.iter().filter(|v| v.save) {
            if self.config.require_variant_names && variant.name.trim().is_empty() {
                let key = variant_name_key(
                    &self.config.key_scope,
                    variant.culture_key(),
                    variant.segment_key(),
                );
                let message = self.text.localize(keys::INVALID_EMPTY, variant.culture.as_deref(), &[]);
                builder.add(
                    key,
                    ValidationFailure::new(FailureKind::EmptyOrNull, message, vec!["Name".to_string()])
                        .into(),
                );
            }
            self.collect_variant(save, variant, &variant.properties, &mut builder)?;
        }

        let report = builder.build();
        debug!(valid = report.is_valid(), keys = report.len(), "Content item validated");
        Ok(report)
    }

    fn collect_variant(
        &self,
        save: &ContentItemSave,
        variant: &ContentVariantSave,
        properties: &[PropertyValue],
        builder: &mut ReportBuilder,
    ) -> Result<()> {
        debug!(
            culture = variant.culture_key(),
            segment = variant.segment_key(),
            properties = properties.len(),
            "Validating variant"
        );

        let content_type = self.resolve_content_type(&save.content_type_alias)?;
        let scope = Scope {
            culture: variant.culture.as_deref(),
            depth: 0,
        };

        for outcome in self.validate_scope(content_type, properties, scope, &save.content_type_alias)? {
            let key = property_key(
                &self.config.key_scope,
                &outcome.alias,
                variant.culture_key(),
                variant.segment_key(),
            );
            builder.extend(key, outcome.into_entries());
        }
        Ok(())
    }

    /// Validate a list of properties against `content_type`
    ///
    /// Used both for variants and for composite rows.
    fn validate_scope(
        &self,
        content_type: &ContentType,
        properties: &[PropertyValue],
        scope: Scope<'_>,
        path: &str,
    ) -> Result<Vec<FieldOutcome>> {
        properties
            .iter()
            .map(|property| self.validate_field(content_type, property, scope, path))
            .collect()
    }

    fn validate_field(
        &self,
        content_type: &ContentType,
        property: &PropertyValue,
        scope: Scope<'_>,
        path: &str,
    ) -> Result<FieldOutcome> {
        let property_type = content_type.property_type(&property.alias).ok_or_else(|| {
            Error::PropertyTypeNotFound {
                content_type: content_type.alias.clone(),
                property: property.alias.clone(),
            }
        })?;
        let data_type = self
            .metadata
            .data_type(property_type.data_type_id)
            .ok_or(Error::DataTypeNotFound {
                id: property_type.data_type_id,
            })?;

        let decoder = self.registry.decoder_for(data_type);
        let context = FieldContext {
            alias: &property.alias,
            culture: scope.culture,
            value_type: data_type.value_type,
            configuration: &data_type.configuration,
            composite: decoder.is_some(),
            text: self.text,
        };

        let mut outcome = FieldOutcome {
            alias: property.alias.clone(),
            ..Default::default()
        };
        for validator in self.registry.validators_for(property_type, data_type)? {
            outcome.flat.extend(validator.validate(&property.value, &context));
        }
        trace!(path, property = %property.alias, failures = outcome.flat.len(), "Property validated");

        let Some(decoder) = decoder else {
            return Ok(outcome);
        };

        let field_path = format!("{}.{}", path, property.alias);
        let rows = match decoder.decode(&property.value, data_type, self.metadata) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(path = %field_path, error = %e, "Composite value could not be decoded");
                let reason = e.to_string();
                outcome.flat.push(ValidationFailure::new(
                    FailureKind::DecodeError,
                    context.localize(keys::INVALID_COMPOSITE, &[("reason", reason.as_str())]),
                    context.members(),
                ));
                return Ok(outcome);
            }
        };
        debug!(path = %field_path, rows = rows.len(), "Decoded composite value");

        if rows.is_empty() {
            let already_reported = outcome.flat.iter().any(|f| f.kind == FailureKind::EmptyOrNull);
            if property_type.mandatory && !already_reported {
                outcome.flat.push(RequiredValidator::failure(&property.value, &context));
            }
            return Ok(outcome);
        }

        if scope.depth >= self.config.max_depth {
            return Err(Error::RecursionLimit {
                max_depth: self.config.max_depth,
                path: field_path,
            });
        }

        let row_scope = Scope {
            culture: scope.culture,
            depth: scope.depth + 1,
        };
        let mut nested = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let sub_type = self.resolve_content_type(&row.sub_type_alias)?;
            let row_path = format!("{}[{}]", field_path, index);
            let row_entries: Vec<ReportEntry> = self
                .validate_scope(sub_type, &row.properties, row_scope, &row_path)?
                .into_iter()
                .flat_map(FieldOutcome::into_entries)
                .collect();
            nested.push(row_entries);
        }

        // Valid rows stay in place so row indices line up with the payload.
        if nested.iter().any(|row| !row.is_empty()) {
            outcome.nested = Some(NestedValidation {
                nested_validation: nested,
            });
        }

        Ok(outcome)
    }

    fn resolve_content_type(&self, alias: &str) -> Result<&'a ContentType> {
        self.metadata
            .content_type(alias)
            .ok_or_else(|| Error::ContentTypeNotFound {
                alias: alias.to_string(),
            })
    }
}
