//! Core validation types
//!
//! A [`ValidationFailure`] is a single plain failure. A [`ReportEntry`] is
//! what ends up under a property path key: either a plain failure or the
//! per-row failures of a composite field.

use crate::error::FailureKind;
use crate::localization::LocalizedTextProvider;
use super::field_validators::{is_empty_composite_value, is_empty_value};
use crate::types::ValueStorageType;
use crate::Result;
use serde::Serialize;
use serde_json::Value;

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    /// Failure classification, not part of the wire payload
    #[serde(skip)]
    pub kind: FailureKind,
    /// Human-readable message
    #[serde(rename = "errorMessage")]
    pub message: String,
    /// Members the failure is attributed to
    pub member_names: Vec<String>,
}

impl ValidationFailure {
    pub fn new<M>(kind: FailureKind, message: M, member_names: Vec<String>) -> Self
    where
        M: Into<String>,
    {
        Self {
            kind,
            message: message.into(),
            member_names,
        }
    }

    /// Failure produced by an editor-specific rule
    pub fn custom<M, I, S>(message: M, member_names: I) -> Self
    where
        M: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            FailureKind::CustomRuleFailed,
            message,
            member_names.into_iter().map(Into::into).collect(),
        )
    }
}

/// One entry in the list reported under a property path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportEntry {
    /// `{ "errorMessage": ..., "memberNames": [...] }`
    Failure(ValidationFailure),
    /// `{ "nestedValidation": [[...], ...] }`, one inner list per row
    Nested(NestedValidation),
}

impl ReportEntry {
    /// Serialize this entry to the text form written into a model-state sink
    pub fn to_text(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn as_failure(&self) -> Option<&ValidationFailure> {
        match self {
            ReportEntry::Failure(failure) => Some(failure),
            ReportEntry::Nested(_) => None,
        }
    }

    pub fn as_nested(&self) -> Option<&NestedValidation> {
        match self {
            ReportEntry::Failure(_) => None,
            ReportEntry::Nested(nested) => Some(nested),
        }
    }

    /// Number of plain failures contained in this entry, recursively
    pub fn failure_count(&self) -> usize {
        match self {
            ReportEntry::Failure(_) => 1,
            ReportEntry::Nested(nested) => nested.failure_count(),
        }
    }
}

impl From<ValidationFailure> for ReportEntry {
    fn from(failure: ValidationFailure) -> Self {
        ReportEntry::Failure(failure)
    }
}

/// Per-row failures of a composite field, in decode order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedValidation {
    pub nested_validation: Vec<Vec<ReportEntry>>,
}

impl NestedValidation {
    pub fn rows(&self) -> &[Vec<ReportEntry>] {
        &self.nested_validation
    }

    pub fn failure_count(&self) -> usize {
        self.nested_validation
            .iter()
            .flatten()
            .map(ReportEntry::failure_count)
            .sum()
    }
}

/// Everything a value validator may need to know about the field it checks
pub struct FieldContext<'a> {
    /// Alias of the property being validated
    pub alias: &'a str,
    /// Culture of the enclosing variant, used for message text only
    pub culture: Option<&'a str>,
    /// Storage hint of the field's editor
    pub value_type: ValueStorageType,
    /// Editor configuration of the field's data type
    pub configuration: &'a Value,
    /// Whether the field's editor decodes its value into rows
    pub composite: bool,
    /// Message text source
    pub text: &'a dyn LocalizedTextProvider,
}

impl<'a> FieldContext<'a> {
    /// Localize a message for this field's culture
    pub fn localize(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.text.localize(key, self.culture, params)
    }

    /// Whether `value` counts as missing for this field
    pub fn is_empty(&self, value: &Value) -> bool {
        if self.composite {
            is_empty_composite_value(value)
        } else {
            is_empty_value(value)
        }
    }

    /// Member list naming only this field
    pub fn members(&self) -> Vec<String> {
        vec![self.alias.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_failure_wire_shape() {
        let entry = ReportEntry::from(ValidationFailure::custom("WRONG!", ["innerFieldId"]));
        let value: Value = serde_json::from_str(&entry.to_text().unwrap()).unwrap();
        assert_eq!(value, json!({"errorMessage": "WRONG!", "memberNames": ["innerFieldId"]}));
    }

    #[test]
    fn test_nested_wire_shape() {
        let entry = ReportEntry::Nested(NestedValidation {
            nested_validation: vec![
                vec![ValidationFailure::custom("a", ["title"]).into()],
                vec![],
            ],
        });
        let value: Value = serde_json::from_str(&entry.to_text().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"nestedValidation": [[{"errorMessage": "a", "memberNames": ["title"]}], []]})
        );
        assert_eq!(entry.failure_count(), 1);
    }
}
