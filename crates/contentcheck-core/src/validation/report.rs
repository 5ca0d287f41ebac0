//! Error report construction
//!
//! Failures are collected per property path key by a [`ReportBuilder`] and
//! frozen into an [`ErrorReport`]. Keys keep the order in which they were
//! first reported, which follows property declaration order.

use crate::Result;
use super::types::ReportEntry;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Key under which a property's failures are reported
///
/// `<scope>.Properties.<alias>.<culture>.<segment>`, culture and segment
/// empty when invariant.
pub fn property_key(scope: &str, alias: &str, culture: &str, segment: &str) -> String {
    format!("{}.Properties.{}.{}.{}", scope, alias, culture, segment)
}

/// Key under which a variant-level name failure is reported
pub fn variant_name_key(scope: &str, culture: &str, segment: &str) -> String {
    format!("{}.Variants.{}.{}.Name", scope, culture, segment)
}

/// Caller-owned destination for serialized failures
pub trait ModelStateSink {
    fn add_error(&mut self, key: &str, message: String);
}

/// Ordered in-memory model state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelState {
    entries: Vec<(String, Vec<String>)>,
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of keys with at least one error
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Errors recorded under `key`, empty when there are none
    pub fn errors(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, errors)| errors.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl Serialize for ModelState {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, errors) in &self.entries {
            map.serialize_entry(key, errors)?;
        }
        map.end()
    }
}

impl ModelStateSink for ModelState {
    fn add_error(&mut self, key: &str, message: String) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, errors)) => errors.push(message),
            None => self.entries.push((key.to_string(), vec![message])),
        }
    }
}

/// Finished validation report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorReport {
    entries: Vec<(String, Vec<ReportEntry>)>,
}

impl ErrorReport {
    /// True iff nothing was reported
    pub fn is_valid(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of keys in the report
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&[ReportEntry]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, entries)| entries.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ReportEntry])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Total plain failures, counting inside nested entries
    pub fn failure_count(&self) -> usize {
        self.entries
            .iter()
            .flat_map(|(_, entries)| entries)
            .map(ReportEntry::failure_count)
            .sum()
    }

    /// Serialize every entry and hand it to `sink`
    ///
    /// All entries are serialized before the sink is touched, so a
    /// serialization error leaves the sink unchanged.
    pub fn write_to(&self, sink: &mut dyn ModelStateSink) -> Result<()> {
        let mut serialized = Vec::new();
        for (key, entries) in &self.entries {
            for entry in entries {
                serialized.push((key.as_str(), entry.to_text()?));
            }
        }
        for (key, text) in serialized {
            sink.add_error(key, text);
        }
        Ok(())
    }

    /// Merge another report into this one, appending to existing keys
    pub fn merge(&mut self, other: ErrorReport) {
        let mut builder = ReportBuilder { entries: std::mem::take(&mut self.entries) };
        for (key, entries) in other.entries {
            builder.extend(key, entries);
        }
        *self = builder.build();
    }
}

impl Serialize for ErrorReport {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entries) in &self.entries {
            map.serialize_entry(key, entries)?;
        }
        map.end()
    }
}

/// Collects entries per key before freezing them into a report
#[derive(Debug, Default)]
pub struct ReportBuilder {
    entries: Vec<(String, Vec<ReportEntry>)>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry under `key`
    pub fn add(&mut self, key: impl Into<String>, entry: ReportEntry) {
        self.extend(key, std::iter::once(entry));
    }

    /// Append entries under `key`; a key with no entries is not recorded
    pub fn extend<I>(&mut self, key: impl Into<String>, entries: I)
    where
        I: IntoIterator<Item = ReportEntry>,
    {
        let mut entries = entries.into_iter().peekable();
        if entries.peek().is_none() {
            return;
        }
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.extend(entries),
            None => self.entries.push((key, entries.collect())),
        }
    }

    pub fn build(self) -> ErrorReport {
        ErrorReport {
            entries: self.entries,
        }
    }
}

/// Build a report from failures grouped by property path
pub fn build<I>(failures_by_path: I) -> ErrorReport
where
    I: IntoIterator<Item = (String, Vec<ReportEntry>)>,
{
    let mut builder = ReportBuilder::new();
    for (key, entries) in failures_by_path {
        builder.extend(key, entries);
    }
    builder.build()
}

/// True iff the report holds no failures
pub fn is_valid(report: &ErrorReport) -> bool {
    report.is_valid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::types::{NestedValidation, ValidationFailure};
    use serde_json::{json, Value};

    fn failure(message: &str) -> ReportEntry {
        ValidationFailure::custom(message, ["value"]).into()
    }

    #[test]
    fn test_property_key_format() {
        assert_eq!(property_key("_content", "title", "", ""), "_content.Properties.title..");
        assert_eq!(
            property_key("_content", "title", "en-US", "mobile"),
            "_content.Properties.title.en-US.mobile"
        );
        assert_eq!(variant_name_key("_content", "da-DK", ""), "_content.Variants.da-DK..Name");
    }

    #[test]
    fn test_build_preserves_order_and_drops_empty_keys() {
        let report = build(vec![
            ("b".to_string(), vec![failure("1")]),
            ("empty".to_string(), vec![]),
            ("a".to_string(), vec![failure("2"), failure("3")]),
            ("b".to_string(), vec![failure("4")]),
        ]);

        assert_eq!(report.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(report.get("b").unwrap().len(), 2);
        assert_eq!(report.failure_count(), 4);
        assert!(!is_valid(&report));
        assert!(is_valid(&build(Vec::new())));
    }

    #[test]
    fn test_write_to_sink() {
        let report = build(vec![(
            "k".to_string(),
            vec![
                failure("flat"),
                ReportEntry::Nested(NestedValidation {
                    nested_validation: vec![vec![failure("row")]],
                }),
            ],
        )]);

        let mut state = ModelState::new();
        report.write_to(&mut state).unwrap();

        let errors = state.errors("k");
        assert_eq!(errors.len(), 2);
        let nested: Value = serde_json::from_str(&errors[1]).unwrap();
        assert_eq!(nested["nestedValidation"][0][0]["errorMessage"], "row");
        assert!(state.errors("missing").is_empty());
    }

    #[test]
    fn test_report_serialization() {
        let report = build(vec![
            ("z".to_string(), vec![failure("last")]),
            ("a".to_string(), vec![failure("first")]),
        ]);
        let text = serde_json::to_string(&report).unwrap();
        assert!(text.find("\"z\"").unwrap() < text.find("\"a\"").unwrap());
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["a"], json!([{"errorMessage": "first", "memberNames": ["value"]}]));
    }

    #[test]
    fn test_merge() {
        let mut report = build(vec![("a".to_string(), vec![failure("1")])]);
        report.merge(build(vec![
            ("a".to_string(), vec![failure("2")]),
            ("b".to_string(), vec![failure("3")]),
        ]));
        assert_eq!(report.len(), 2);
        assert_eq!(report.get("a").unwrap().len(), 2);
    }
}
