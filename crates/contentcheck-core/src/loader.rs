//! Document loading for YAML and JSON inputs
//!
//! Metadata catalogs and content save documents may be authored in either
//! format; the format is chosen from the file extension.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl Format {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(Error::Metadata {
                message: format!(
                    "Unsupported file format for '{}'. Expected .yaml, .yml, or .json",
                    path.display()
                ),
                source: None,
            }),
        }
    }

    /// Parse content in this format
    pub fn parse<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        match self {
            Format::Yaml => Ok(serde_yaml::from_str(content)?),
            Format::Json => Ok(serde_json::from_str(content)?),
        }
    }
}

/// Read and deserialize a document, detecting its format from the extension
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = Format::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), ?format, bytes = content.len(), "Loading document");
    format.parse(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentItemSave;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path(&PathBuf::from("types.yaml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(&PathBuf::from("types.YML")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(&PathBuf::from("save.json")).unwrap(), Format::Json);
        assert!(Format::from_path(&PathBuf::from("save.txt")).is_err());
        assert!(Format::from_path(&PathBuf::from("save")).is_err());
    }

    #[test]
    fn test_load_yaml_document() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            "contentTypeAlias: textPage\nvariants:\n  - name: Home\n    save: true\n    properties:\n      - alias: title\n        value: Hello"
        )
        .unwrap();

        let save: ContentItemSave = load_document(file.path()).unwrap();
        assert_eq!(save.content_type_alias, "textPage");
        assert_eq!(save.variants.len(), 1);
        assert_eq!(save.variants[0].properties[0].alias, "title");
    }

    #[test]
    fn test_load_invalid_json_document() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(file, "{{ not json").unwrap();

        let result: Result<ContentItemSave> = load_document(file.path());
        assert!(matches!(result, Err(Error::Json { .. })));
    }
}
