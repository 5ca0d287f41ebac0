//! Check-types command handler

use super::load_catalog;
use crate::cli::CheckTypesArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use contentcheck_core::ValidatorRegistry;
use tracing::{info, instrument, warn};

/// Handle the check-types command
#[instrument(skip(_config, output), fields(catalog = %args.catalog.display()))]
pub fn handle_check_types(args: CheckTypesArgs, _config: &Config, output: &mut OutputWriter) -> Result<()> {
    output.info(&format!("Checking type catalog: {}", args.catalog.display()))?;

    let catalog = load_catalog(&args.catalog)?;
    let registry = ValidatorRegistry::with_builtin_editors();
    let issues = catalog.check(&registry);
    let blocking = issues.iter().filter(|i| i.is_fatal()).count();

    if issues.is_empty() {
        info!(
            content_types = catalog.content_types.len(),
            data_types = catalog.data_types.len(),
            "Catalog is consistent"
        );
        output.success(&format!(
            "✓ {} content type(s) and {} data type(s) are consistent",
            catalog.content_types.len(),
            catalog.data_types.len()
        ))?;
        if output.format() == crate::cli::OutputFormat::Human {
            return Ok(());
        }
    } else {
        warn!(issues = issues.len(), blocking, "Catalog has issues");
    }

    output.issues(&issues)?;

    if blocking > 0 {
        Err(Error::CatalogInvalid { issues: blocking })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use std::io;

    fn run(catalog: &str) -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("types.json");
        std::fs::write(&path, catalog).unwrap();
        let mut output = OutputWriter::with_writer(OutputFormat::Human, false, true, Box::new(io::sink()));
        handle_check_types(CheckTypesArgs { catalog: path }, &Config::default(), &mut output)
    }

    #[test]
    fn test_consistent_catalog() {
        let catalog = r#"{
            "dataTypes": [{"id": 1, "editorAlias": "textbox"}],
            "contentTypes": [{"alias": "page", "propertyTypes": [{"alias": "title", "dataTypeId": 1}]}]
        }"#;
        assert!(run(catalog).is_ok());
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let catalog = r#"{
            "dataTypes": [{"id": 1, "editorAlias": "colorPicker"}],
            "contentTypes": [{"alias": "page", "propertyTypes": [{"alias": "color", "dataTypeId": 1}]}]
        }"#;
        assert!(run(catalog).is_ok());
    }

    #[test]
    fn test_blocking_issues_fail() {
        let catalog = r#"{
            "dataTypes": [],
            "contentTypes": [{"alias": "page", "propertyTypes": [{"alias": "title", "dataTypeId": 9}]}]
        }"#;
        let err = run(catalog).unwrap_err();
        assert!(matches!(err, Error::CatalogInvalid { issues: 1 }));
    }
}
