//! Localized message text
//!
//! The validator never composes user-facing text itself; it asks a
//! [`LocalizedTextProvider`] for a message by key and treats the answer as
//! opaque.

use std::collections::HashMap;

/// Message keys used by the built-in validators
pub mod keys {
    pub const INVALID_NULL: &str = "validation/invalidNull";
    pub const INVALID_EMPTY: &str = "validation/invalidEmpty";
    pub const INVALID_PATTERN: &str = "validation/invalidPattern";
    pub const INVALID_INTEGER: &str = "validation/invalidInteger";
    pub const INVALID_NUMBER: &str = "validation/invalidNumber";
    pub const INVALID_EMAIL: &str = "validation/invalidEmail";
    pub const INVALID_COMPOSITE: &str = "validation/invalidComposite";
}

/// Source of localized message text
pub trait LocalizedTextProvider: Send + Sync {
    /// Resolve `key` for `culture`, substituting `{name}` tokens from `params`
    fn localize(&self, key: &str, culture: Option<&str>, params: &[(&str, &str)]) -> String;
}

/// Text provider backed by in-memory tables
///
/// Lookups try the culture-specific table first, then the default table,
/// and finally fall back to the key itself.
#[derive(Debug, Clone)]
pub struct StaticTextProvider {
    defaults: HashMap<String, String>,
    cultures: HashMap<String, HashMap<String, String>>,
}

impl StaticTextProvider {
    /// Provider with no entries; every lookup returns its key
    pub fn empty() -> Self {
        Self {
            defaults: HashMap::new(),
            cultures: HashMap::new(),
        }
    }

    /// Set a default (culture-independent) entry
    pub fn with_text(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.defaults.insert(key.into(), text.into());
        self
    }

    /// Set an entry for a single culture
    pub fn with_culture_text(
        mut self,
        culture: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.cultures
            .entry(culture.into().to_lowercase())
            .or_default()
            .insert(key.into(), text.into());
        self
    }

    fn lookup(&self, key: &str, culture: Option<&str>) -> Option<&str> {
        culture
            .filter(|c| !c.is_empty())
            .and_then(|c| self.cultures.get(&c.to_lowercase()))
            .and_then(|table| table.get(key))
            .or_else(|| self.defaults.get(key))
            .map(String::as_str)
    }
}

impl Default for StaticTextProvider {
    fn default() -> Self {
        Self::empty()
            .with_text(keys::INVALID_NULL, "Value cannot be null")
            .with_text(keys::INVALID_EMPTY, "Value cannot be empty")
            .with_text(keys::INVALID_PATTERN, "Value is invalid, it does not match the correct pattern")
            .with_text(keys::INVALID_INTEGER, "Value is not a valid integer")
            .with_text(keys::INVALID_NUMBER, "Value is not a valid number")
            .with_text(keys::INVALID_EMAIL, "Value is not a valid email address")
            .with_text(keys::INVALID_COMPOSITE, "Value could not be read: {reason}")
    }
}

impl LocalizedTextProvider for StaticTextProvider {
    fn localize(&self, key: &str, culture: Option<&str>, params: &[(&str, &str)]) -> String {
        let template = self.lookup(key, culture).unwrap_or(key);
        substitute(template, params)
    }
}

/// Replace `{name}` tokens in one pass over `template`
///
/// Substituted values are copied verbatim and never rescanned for tokens.
fn substitute(template: &str, params: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        output.push_str(&rest[..start]);
        let tail = &rest[start..];
        let value = tail.find('}').and_then(|end| {
            let name = &tail[1..end];
            params
                .iter()
                .find(|(param, _)| *param == name)
                .map(|(_, value)| (*value, end))
        });
        match value {
            Some((value, end)) => {
                output.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                output.push('{');
                rest = &tail[1..];
            }
        }
    }

    output.push_str(rest);
    output
}
