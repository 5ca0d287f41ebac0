//! Core types for content items and their type metadata
//!
//! Save models (`ContentItemSave`, `ContentVariantSave`, `PropertyValue`) are
//! what a caller submits; type metadata (`ContentType`, `PropertyType`,
//! `DataType`) describes how each submitted value must be validated.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A content item being saved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItemSave {
    /// Persisted id, absent for new items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Alias of the content type the item is an instance of
    pub content_type_alias: String,

    /// Culture/segment variants submitted with the item
    #[serde(default)]
    pub variants: Vec<ContentVariantSave>,
}

/// One culture/segment variant of a content item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentVariantSave {
    /// Variant name
    #[serde(default)]
    pub name: String,

    /// Culture code, absent for invariant content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub culture: Option<String>,

    /// Segment, absent for unsegmented content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,

    /// Whether this variant is part of the save operation
    #[serde(default)]
    pub save: bool,

    /// Property values in declaration order
    #[serde(default)]
    pub properties: Vec<PropertyValue>,
}

impl ContentVariantSave {
    /// Create an invariant variant marked for saving
    pub fn invariant(name: impl Into<String>, properties: Vec<PropertyValue>) -> Self {
        Self {
            name: name.into(),
            culture: None,
            segment: None,
            save: true,
            properties,
        }
    }

    /// Culture used in property path keys, empty when invariant
    pub fn culture_key(&self) -> &str {
        self.culture.as_deref().unwrap_or("")
    }

    /// Segment used in property path keys, empty when unsegmented
    pub fn segment_key(&self) -> &str {
        self.segment.as_deref().unwrap_or("")
    }
}

/// A submitted property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyValue {
    /// Alias of the property type on the owning content type
    pub alias: String,

    /// Raw value, opaque until the owning editor interprets it
    #[serde(default)]
    pub value: Value,

    /// Persisted property id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl PropertyValue {
    pub fn new(alias: impl Into<String>, value: Value) -> Self {
        Self {
            alias: alias.into(),
            value,
            id: None,
        }
    }
}

/// Content type definition: the ordered set of property types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentType {
    /// Unique alias
    pub alias: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Property types in declaration order
    #[serde(default)]
    pub property_types: Vec<PropertyType>,
}

impl ContentType {
    pub fn new(alias: impl Into<String>, property_types: Vec<PropertyType>) -> Self {
        let alias = alias.into();
        Self {
            name: alias.clone(),
            alias,
            property_types,
        }
    }

    /// Look up a property type by alias
    pub fn property_type(&self, alias: &str) -> Option<&PropertyType> {
        self.property_types.iter().find(|p| p.alias == alias)
    }
}

/// Schema definition of a single property
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyType {
    /// Alias, unique within its content type
    pub alias: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Whether a value is required
    #[serde(default)]
    pub mandatory: bool,

    /// Pattern the textual value must fully match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Message reported when the pattern does not match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_message: Option<String>,

    /// Id of the data type (editor configuration) backing this property
    pub data_type_id: i32,
}

impl PropertyType {
    pub fn new(alias: impl Into<String>, data_type_id: i32) -> Self {
        let alias = alias.into();
        Self {
            name: alias.clone(),
            alias,
            mandatory: false,
            pattern: None,
            pattern_message: None,
            data_type_id,
        }
    }

    pub fn mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>, message: Option<&str>) -> Self {
        self.pattern = Some(pattern.into());
        self.pattern_message = message.map(str::to_string);
        self
    }

    /// The pattern, if one is configured and non-blank
    pub fn effective_pattern(&self) -> Option<&str> {
        self.pattern
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }
}

/// Storage type of an editor's values, passed to custom validators as a hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueStorageType {
    Integer,
    Decimal,
    Date,
    Nvarchar,
    #[default]
    Ntext,
}

impl fmt::Display for ValueStorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueStorageType::Integer => write!(f, "INTEGER"),
            ValueStorageType::Decimal => write!(f, "DECIMAL"),
            ValueStorageType::Date => write!(f, "DATE"),
            ValueStorageType::Nvarchar => write!(f, "NVARCHAR"),
            ValueStorageType::Ntext => write!(f, "NTEXT"),
        }
    }
}

/// Configured editor instance referenced by property types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataType {
    /// Unique id
    pub id: i32,

    /// Alias of the editor that owns values of this data type
    pub editor_alias: String,

    /// Storage hint for the editor's values
    #[serde(default)]
    pub value_type: ValueStorageType,

    /// Editor-specific configuration
    #[serde(default)]
    pub configuration: Value,
}

impl DataType {
    pub fn new(id: i32, editor_alias: impl Into<String>) -> Self {
        Self {
            id,
            editor_alias: editor_alias.into(),
            value_type: ValueStorageType::default(),
            configuration: Value::Null,
        }
    }

    pub fn with_configuration(mut self, configuration: Value) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn with_value_type(mut self, value_type: ValueStorageType) -> Self {
        self.value_type = value_type;
        self
    }
}
