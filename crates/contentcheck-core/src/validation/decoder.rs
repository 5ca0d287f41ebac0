//! Composite value decoding
//!
//! A composite editor stores a list of rows in a single property value. The
//! decoder turns that value into [`SubItem`]s, each carrying the property
//! values of one row and the alias of the content type they are validated
//! against.

use crate::metadata::TypeMetadataProvider;
use crate::types::{DataType, PropertyValue};
use serde_json::{Map, Value};
use thiserror::Error;

/// One decoded row of a composite value
#[derive(Debug, Clone, PartialEq)]
pub struct SubItem {
    /// Row key, when the payload carries one
    pub key: Option<String>,
    /// Content type the row is validated against
    pub sub_type_alias: String,
    /// Row property values in the sub-type's declaration order
    pub properties: Vec<PropertyValue>,
}

/// Why a composite value could not be decoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("value is not valid JSON: {reason}")]
    Malformed { reason: String },

    #[error("value is not a list of rows")]
    NotAList,

    #[error("row {row} is not an object")]
    RowNotObject { row: usize },

    #[error("row {row} does not name its content type in '{field}'")]
    MissingSubType { row: usize, field: String },

    #[error("row {row} uses content type '{alias}' which is not allowed here")]
    UnknownSubType { row: usize, alias: String },
}

/// Decoder contributed by a composite editor
pub trait CompositeDecoder: Send + Sync {
    /// Decode a raw value into ordered sub-items
    fn decode(
        &self,
        raw: &Value,
        data_type: &DataType,
        metadata: &dyn TypeMetadataProvider,
    ) -> Result<Vec<SubItem>, DecodeError>;

    /// Content type aliases the data type configuration allows as rows
    fn allowed_sub_types(&self, data_type: &DataType) -> Vec<String>;
}

/// Decoder for list-of-rows payloads
///
/// The payload is a JSON array (or a string holding one) of objects. Each
/// object names its content type in `contentTypeAlias` and holds property
/// values keyed by property alias. The data type configuration lists the
/// allowed content types as `{"contentTypes": [{"alias": "..."}]}`.
#[derive(Debug, Clone)]
pub struct NestedRowsDecoder {
    type_field: String,
    key_field: String,
    include_missing_fields: bool,
}

impl Default for NestedRowsDecoder {
    fn default() -> Self {
        Self {
            type_field: "contentTypeAlias".to_string(),
            key_field: "key".to_string(),
            include_missing_fields: false,
        }
    }
}

impl NestedRowsDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different row field to name the row's content type
    pub fn with_type_field(mut self, field: impl Into<String>) -> Self {
        self.type_field = field.into();
        self
    }

    /// Emit sub-fields absent from a row as null values
    pub fn include_missing_fields(mut self, include: bool) -> Self {
        self.include_missing_fields = include;
        self
    }

    fn rows(raw: &Value) -> Result<Vec<Value>, DecodeError> {
        match raw {
            Value::Null => Ok(Vec::new()),
            Value::Array(rows) => Ok(rows.clone()),
            Value::String(text) if text.trim().is_empty() => Ok(Vec::new()),
            Value::String(text) => {
                let parsed: Value = serde_json::from_str(text).map_err(|e| DecodeError::Malformed {
                    reason: e.to_string(),
                })?;
                match parsed {
                    Value::Array(rows) => Ok(rows),
                    Value::Null => Ok(Vec::new()),
                    _ => Err(DecodeError::NotAList),
                }
            }
            _ => Err(DecodeError::NotAList),
        }
    }

    fn decode_row(
        &self,
        index: usize,
        row: &Map<String, Value>,
        allowed: &[String],
        metadata: &dyn TypeMetadataProvider,
    ) -> Result<SubItem, DecodeError> {
        let alias = row
            .get(&self.type_field)
            .and_then(Value::as_str)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| DecodeError::MissingSubType {
                row: index,
                field: self.type_field.clone(),
            })?;

        let unknown = || DecodeError::UnknownSubType {
            row: index,
            alias: alias.to_string(),
        };
        if !allowed.iter().any(|a| a == alias) {
            return Err(unknown());
        }
        let content_type = metadata.content_type(alias).ok_or_else(unknown)?;

        let properties = content_type
            .property_types
            .iter()
            .filter_map(|property_type| match row.get(&property_type.alias) {
                Some(value) => Some(PropertyValue::new(&property_type.alias, value.clone())),
                None if self.include_missing_fields => {
                    Some(PropertyValue::new(&property_type.alias, Value::Null))
                }
                None => None,
            })
            .collect();

        Ok(SubItem {
            key: row
                .get(&self.key_field)
                .and_then(Value::as_str)
                .map(str::to_string),
            sub_type_alias: alias.to_string(),
            properties,
        })
    }
}

impl CompositeDecoder for NestedRowsDecoder {
    fn decode(
        &self,
        raw: &Value,
        data_type: &DataType,
        metadata: &dyn TypeMetadataProvider,
    ) -> Result<Vec<SubItem>, DecodeError> {
        let allowed = self.allowed_sub_types(data_type);

        Self::rows(raw)?
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let object = row.as_object().ok_or(DecodeError::RowNotObject { row: index })?;
                self.decode_row(index, object, &allowed, metadata)
            })
            .collect()
    }

    fn allowed_sub_types(&self, data_type: &DataType) -> Vec<String> {
        data_type
            .configuration
            .get("contentTypes")
            .and_then(Value::as_array)
            .map(|types| {
                types
                    .iter()
                    .filter_map(|t| t.get("alias").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataCatalog;
    use crate::types::{ContentType, PropertyType};
    use serde_json::json;

    fn fixture() -> (MetadataCatalog, DataType) {
        let data_type = DataType::new(10, "blockList")
            .with_configuration(json!({"contentTypes": [{"alias": "feature"}]}));
        let catalog = MetadataCatalog::new()
            .with_data_type(DataType::new(1, "textbox"))
            .with_data_type(data_type.clone())
            .with_content_type(ContentType::new(
                "feature",
                vec![PropertyType::new("title", 1), PropertyType::new("summary", 1)],
            ))
            .with_content_type(ContentType::new("other", vec![PropertyType::new("title", 1)]));
        (catalog, data_type)
    }

    #[test]
    fn test_decode_rows_from_string_payload() {
        let (catalog, data_type) = fixture();
        let raw = json!(r#"[
            {"key": "c8df5136", "name": "Hello world", "contentTypeAlias": "feature", "title": "Hello world"},
            {"key": "f916104a", "contentTypeAlias": "feature", "summary": "Second", "title": "Again"}
        ]"#);

        let rows = NestedRowsDecoder::new().decode(&raw, &data_type, &catalog).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key.as_deref(), Some("c8df5136"));
        assert_eq!(rows[0].sub_type_alias, "feature");
        assert_eq!(rows[0].properties, vec![PropertyValue::new("title", json!("Hello world"))]);

        // Declaration order of the sub-type, not payload order
        let aliases: Vec<_> = rows[1].properties.iter().map(|p| p.alias.as_str()).collect();
        assert_eq!(aliases, vec!["title", "summary"]);
    }

    #[test]
    fn test_decode_array_payload_with_missing_fields() {
        let (catalog, data_type) = fixture();
        let raw = json!([{"contentTypeAlias": "feature", "title": "Only title"}]);

        let rows = NestedRowsDecoder::new()
            .include_missing_fields(true)
            .decode(&raw, &data_type, &catalog)
            .unwrap();
        assert_eq!(rows[0].properties.len(), 2);
        assert_eq!(rows[0].properties[1], PropertyValue::new("summary", Value::Null));
    }

    #[test]
    fn test_decode_empty_values() {
        let (catalog, data_type) = fixture();
        let decoder = NestedRowsDecoder::new();
        assert!(decoder.decode(&Value::Null, &data_type, &catalog).unwrap().is_empty());
        assert!(decoder.decode(&json!(""), &data_type, &catalog).unwrap().is_empty());
        assert!(decoder.decode(&json!("[]"), &data_type, &catalog).unwrap().is_empty());
        assert!(decoder.decode(&json!([]), &data_type, &catalog).unwrap().is_empty());
    }

    #[test]
    fn test_decode_errors() {
        let (catalog, data_type) = fixture();
        let decoder = NestedRowsDecoder::new();

        assert!(matches!(
            decoder.decode(&json!("[{not json"), &data_type, &catalog),
            Err(DecodeError::Malformed { .. })
        ));
        assert_eq!(decoder.decode(&json!(42), &data_type, &catalog), Err(DecodeError::NotAList));
        assert_eq!(
            decoder.decode(&json!(r#"{"a": 1}"#), &data_type, &catalog),
            Err(DecodeError::NotAList)
        );
        assert_eq!(
            decoder.decode(&json!([1]), &data_type, &catalog),
            Err(DecodeError::RowNotObject { row: 0 })
        );
        assert_eq!(
            decoder.decode(&json!([{"title": "x"}]), &data_type, &catalog),
            Err(DecodeError::MissingSubType { row: 0, field: "contentTypeAlias".to_string() })
        );
        // Known to the catalog but not allowed by the configuration
        assert_eq!(
            decoder.decode(&json!([{"contentTypeAlias": "other"}]), &data_type, &catalog),
            Err(DecodeError::UnknownSubType { row: 0, alias: "other".to_string() })
        );
    }

    #[test]
    fn test_allowed_but_undefined_sub_type() {
        let (catalog, _) = fixture();
        let data_type = DataType::new(11, "blockList")
            .with_configuration(json!({"contentTypes": [{"alias": "ghost"}]}));
        assert_eq!(
            NestedRowsDecoder::new().decode(&json!([{"contentTypeAlias": "ghost"}]), &data_type, &catalog),
            Err(DecodeError::UnknownSubType { row: 0, alias: "ghost".to_string() })
        );
    }

    #[test]
    fn test_custom_type_field() {
        let (catalog, data_type) = fixture();
        let raw = json!([{"ncContentTypeAlias": "feature", "title": "x"}]);
        let rows = NestedRowsDecoder::new()
            .with_type_field("ncContentTypeAlias")
            .decode(&raw, &data_type, &catalog)
            .unwrap();
        assert_eq!(rows.len(), 1);
    }
}
