//! Validate command handler

use super::{ensure_exists, load_catalog};
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use anyhow::Context;
use contentcheck_core::loader::load_document;
use contentcheck_core::{
    ContentItemSave, ContentValidator, ModelState, StaticTextProvider, ValidationConfig,
    ValidatorRegistry,
};
use tracing::{debug, info, instrument, warn};

/// Handle the validate command
#[instrument(skip(config, output), fields(content = %args.content.display(), types = %args.types.display()))]
pub fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &args.content.display().to_string());
    output.info(&format!("Validating content: {}", args.content.display()))?;

    let catalog = load_catalog(&args.types)?;
    ensure_exists(&args.content)?;
    let save: ContentItemSave = load_document(&args.content)
        .with_context(|| format!("failed to read content document {}", args.content.display()))?;
    debug!(
        content_type = %save.content_type_alias,
        variants = save.variants.len(),
        "Content document loaded"
    );

    let validation_config = effective_config(&args, &config.validation);
    let registry = ValidatorRegistry::with_builtin_editors();
    let text = StaticTextProvider::default();
    let validator = ContentValidator::with_config(&registry, &catalog, &text, validation_config);

    if args.model_state {
        return write_model_state(&validator, &save, output);
    }

    let report = {
        let _validation_timer = Timer::new("content_validation");
        validator.validate_item(&save)?
    };

    if report.is_valid() {
        info!("Content is valid");
        output.success("✓ Content is valid")?;
        if output.format() != crate::cli::OutputFormat::Human {
            output.report(&report)?;
        }
        return Ok(());
    }

    warn!(keys = report.len(), failures = report.failure_count(), "Content failed validation");
    output.error("✗ Content failed validation")?;
    output.section("Validation Report")?;
    output.report(&report)?;

    Err(Error::ContentInvalid {
        failures: report.failure_count(),
        keys: report.len(),
    })
}

/// Validate each saved variant into a model state and print it
fn write_model_state(
    validator: &ContentValidator<'_>,
    save: &ContentItemSave,
    output: &mut OutputWriter,
) -> Result<()> {
    let mut state = ModelState::new();
    let mut valid = true;
    for variant in save.variants.iter().filter(|v| v.save) {
        valid &= validator.validate_properties(save, variant, &variant.properties, &mut state)?;
    }

    output.data(&state)?;
    if valid {
        Ok(())
    } else {
        Err(Error::ContentInvalid {
            failures: state.iter().map(|(_, errors)| errors.len()).sum(),
            keys: state.len(),
        })
    }
}

/// Apply command-line overrides to the configured validation settings
fn effective_config(args: &ValidateArgs, base: &ValidationConfig) -> ValidationConfig {
    let mut config = base.clone();
    if let Some(max_depth) = args.max_depth {
        config = config.with_max_depth(max_depth);
    }
    if let Some(scope) = &args.key_scope {
        config = config.with_key_scope(scope.clone());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use serde_json::json;
    use std::io;
    use std::path::{Path, PathBuf};

    const CATALOG: &str = r#"
dataTypes:
  - id: 1
    editorAlias: textbox
  - id: 2
    editorAlias: blockList
    configuration:
      contentTypes:
        - alias: feature
contentTypes:
  - alias: page
    propertyTypes:
      - alias: title
        mandatory: true
        dataTypeId: 1
      - alias: features
        dataTypeId: 2
  - alias: feature
    propertyTypes:
      - alias: heading
        mandatory: true
        dataTypeId: 1
"#;

    fn write_fixture(dir: &Path, title: &str, heading: &str) -> (PathBuf, PathBuf) {
        let types = dir.join("types.yaml");
        std::fs::write(&types, CATALOG).unwrap();
        let content = dir.join("save.json");
        let save = json!({
            "contentTypeAlias": "page",
            "variants": [{
                "name": "Home",
                "save": true,
                "properties": [
                    {"alias": "title", "value": title},
                    {"alias": "features", "value": [{"contentTypeAlias": "feature", "heading": heading}]}
                ]
            }]
        });
        std::fs::write(&content, save.to_string()).unwrap();
        (types, content)
    }

    fn args(types: PathBuf, content: PathBuf) -> ValidateArgs {
        ValidateArgs {
            content,
            types,
            max_depth: None,
            key_scope: None,
            model_state: false,
        }
    }

    fn writer() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Json, false, false, Box::new(io::sink()))
    }

    #[test]
    fn test_valid_content() {
        let dir = tempfile::tempdir().unwrap();
        let (types, content) = write_fixture(dir.path(), "Home", "Feature");
        handle_validate(args(types, content), &Config::default(), &mut writer()).unwrap();
    }

    #[test]
    fn test_invalid_content_exits_non_zero() {
        let dir = tempfile::tempdir().unwrap();
        let (types, content) = write_fixture(dir.path(), "", "");
        let err = handle_validate(args(types, content), &Config::default(), &mut writer()).unwrap_err();
        assert!(matches!(err, Error::ContentInvalid { failures: 2, keys: 2 }));
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn test_model_state_mode() {
        let dir = tempfile::tempdir().unwrap();
        let (types, content) = write_fixture(dir.path(), "", "Feature");
        let mut args = args(types, content);
        args.model_state = true;
        let err = handle_validate(args, &Config::default(), &mut writer()).unwrap_err();
        assert!(matches!(err, Error::ContentInvalid { failures: 1, keys: 1 }));
    }

    #[test]
    fn test_recursion_limit_override_faults() {
        let dir = tempfile::tempdir().unwrap();
        let (types, content) = write_fixture(dir.path(), "Home", "Feature");
        let mut args = args(types, content);
        args.max_depth = Some(0);
        let err = handle_validate(args, &Config::default(), &mut writer()).unwrap_err();
        assert!(matches!(
            err,
            Error::Core(contentcheck_core::Error::RecursionLimit { max_depth: 0, .. })
        ));
    }

    #[test]
    fn test_missing_content_file() {
        let dir = tempfile::tempdir().unwrap();
        let (types, _) = write_fixture(dir.path(), "Home", "Feature");
        let err = handle_validate(
            args(types, dir.path().join("missing.json")),
            &Config::default(),
            &mut writer(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_effective_config_overrides() {
        let mut args = args(PathBuf::from("t.yaml"), PathBuf::from("c.json"));
        args.key_scope = Some("doc".to_string());
        let config = effective_config(&args, &ValidationConfig::default().with_max_depth(5));
        assert_eq!(config.key_scope, "doc");
        assert_eq!(config.max_depth, 5);
    }
}
