//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod check_types;
mod validate;

pub use check_types::handle_check_types;
pub use validate::handle_validate;

use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use contentcheck_core::MetadataCatalog;
use std::path::Path;

/// Fail with `FileNotFound` unless `path` exists
fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        tracing::error!(path = %path.display(), "File not found");
        Err(Error::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Load a type catalog from disk
fn load_catalog(path: &Path) -> Result<MetadataCatalog> {
    ensure_exists(path)?;
    let _timer = Timer::with_details("catalog_loading", &path.display().to_string());
    Ok(MetadataCatalog::load(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_catalog() {
        let result = load_catalog(Path::new("/nonexistent/types.yaml"));
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }
}
