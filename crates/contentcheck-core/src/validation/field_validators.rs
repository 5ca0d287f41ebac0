//! Value validators
//!
//! [`RequiredValidator`] and [`PatternValidator`] are attached by the registry
//! from a property type's own settings. The remaining validators are
//! editor-contributed rules registered against an editor alias.

use crate::error::FailureKind;
use crate::localization::keys;
use super::types::{FieldContext, ValidationFailure};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// A rule applied to one raw property value
///
/// Implementations return every failure they find; an empty vector means the
/// value passed.
pub trait ValueValidator: Send + Sync {
    fn validate(&self, value: &Value, context: &FieldContext<'_>) -> Vec<ValidationFailure>;
}

impl<F> ValueValidator for F
where
    F: Fn(&Value, &FieldContext<'_>) -> Vec<ValidationFailure> + Send + Sync,
{
    fn validate(&self, value: &Value, context: &FieldContext<'_>) -> Vec<ValidationFailure> {
        self(value, context)
    }
}

/// Render a raw value as the text patterns are matched against
pub fn value_as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Whether a raw value counts as "no value"
///
/// Null, blank strings, and empty JSON arrays or objects are empty. Text is
/// taken literally; see [`is_empty_composite_value`] for composite payloads.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Emptiness for composite payloads, which may arrive as JSON text
///
/// A string holding only `[]` or `{}` is also empty.
pub fn is_empty_composite_value(value: &Value) -> bool {
    match value {
        Value::String(s) => is_empty_json_text(s.trim()) || is_empty_value(value),
        _ => is_empty_value(value),
    }
}

fn is_empty_json_text(text: &str) -> bool {
    if !(text.starts_with('[') || text.starts_with('{')) {
        return false;
    }
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    compact == "[]" || compact == "{}"
}

/// Fails with `EmptyOrNull` when the value is missing
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredValidator;

impl RequiredValidator {
    /// The failure reported for a missing value
    pub fn failure(value: &Value, context: &FieldContext<'_>) -> ValidationFailure {
        let key = if value.is_null() {
            keys::INVALID_NULL
        } else {
            keys::INVALID_EMPTY
        };
        ValidationFailure::new(
            FailureKind::EmptyOrNull,
            context.localize(key, &[("alias", context.alias)]),
            context.members(),
        )
    }
}

impl ValueValidator for RequiredValidator {
    fn validate(&self, value: &Value, context: &FieldContext<'_>) -> Vec<ValidationFailure> {
        if context.is_empty(value) {
            vec![Self::failure(value, context)]
        } else {
            Vec::new()
        }
    }
}

/// Fails with `PatternMismatch` when the textual value does not fully match
///
/// Empty values are skipped; reporting them is the required validator's job.
#[derive(Debug, Clone)]
pub struct PatternValidator {
    regex: Regex,
    message: Option<String>,
}

impl PatternValidator {
    /// Compile a pattern anchored at both ends
    ///
    /// The pattern must compile on its own; wrapping must not be able to
    /// rebalance a stray group.
    pub fn new(pattern: &str, message: Option<String>) -> Result<Self, regex::Error> {
        Regex::new(pattern)?;
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(Self { regex, message })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl ValueValidator for PatternValidator {
    fn validate(&self, value: &Value, context: &FieldContext<'_>) -> Vec<ValidationFailure> {
        if context.is_empty(value) {
            return Vec::new();
        }
        if self.is_match(&value_as_text(value)) {
            return Vec::new();
        }

        let message = match self.message.as_deref().filter(|m| !m.trim().is_empty()) {
            Some(message) => message.to_string(),
            None => context.localize(keys::INVALID_PATTERN, &[("alias", context.alias)]),
        };
        vec![ValidationFailure::new(
            FailureKind::PatternMismatch,
            message,
            context.members(),
        )]
    }
}

/// Editor rule: the value must be a whole number
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerValidator;

impl ValueValidator for IntegerValidator {
    fn validate(&self, value: &Value, context: &FieldContext<'_>) -> Vec<ValidationFailure> {
        let valid = match value {
            Value::Null => true,
            Value::Number(n) => n.is_i64() || n.is_u64(),
            Value::String(s) => s.trim().is_empty() || s.trim().parse::<i64>().is_ok(),
            _ => false,
        };
        if valid {
            Vec::new()
        } else {
            vec![ValidationFailure::custom(
                context.localize(keys::INVALID_INTEGER, &[]),
                context.members(),
            )]
        }
    }
}

/// Editor rule: the value must be a number
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalValidator;

impl ValueValidator for DecimalValidator {
    fn validate(&self, value: &Value, context: &FieldContext<'_>) -> Vec<ValidationFailure> {
        let valid = match value {
            Value::Null | Value::Number(_) => true,
            Value::String(s) => {
                let s = s.trim();
                s.is_empty() || s.parse::<f64>().map(f64::is_finite).unwrap_or(false)
            }
            _ => false,
        };
        if valid {
            Vec::new()
        } else {
            vec![ValidationFailure::custom(
                context.localize(keys::INVALID_NUMBER, &[]),
                context.members(),
            )]
        }
    }
}

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

/// Editor rule: the value must look like an e-mail address
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidator;

impl ValueValidator for EmailValidator {
    fn validate(&self, value: &Value, context: &FieldContext<'_>) -> Vec<ValidationFailure> {
        if context.is_empty(value) {
            return Vec::new();
        }
        if email_regex().is_match(value_as_text(value).trim()) {
            Vec::new()
        } else {
            vec![ValidationFailure::custom(
                context.localize(keys::INVALID_EMAIL, &[]),
                context.members(),
            )]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::StaticTextProvider;
    use crate::types::ValueStorageType;
    use serde_json::json;

    fn with_context<T>(f: impl FnOnce(&FieldContext<'_>) -> T) -> T {
        let text = StaticTextProvider::default();
        let configuration = Value::Null;
        let context = FieldContext {
            alias: "title",
            culture: None,
            value_type: ValueStorageType::Ntext,
            configuration: &configuration,
            composite: false,
            text: &text,
        };
        f(&context)
    }

    #[test]
    fn test_is_empty_value() {
        assert!(is_empty_value(&Value::Null));
        assert!(is_empty_value(&json!("")));
        assert!(is_empty_value(&json!("   ")));
        assert!(is_empty_value(&json!([])));
        assert!(is_empty_value(&json!({})));
        assert!(!is_empty_value(&json!(" [ ] ")));
        assert!(!is_empty_value(&json!("{}")));
        assert!(!is_empty_value(&json!("[1]")));
        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(false)));
    }

    #[test]
    fn test_is_empty_composite_value() {
        assert!(is_empty_composite_value(&Value::Null));
        assert!(is_empty_composite_value(&json!(" [ ] ")));
        assert!(is_empty_composite_value(&json!("{}")));
        assert!(is_empty_composite_value(&json!([])));
        assert!(!is_empty_composite_value(&json!("[{}]")));
    }

    #[test]
    fn test_required_takes_json_text_literally_on_plain_fields() {
        with_context(|ctx| {
            assert!(RequiredValidator.validate(&json!("{}"), ctx).is_empty());
            assert!(RequiredValidator.validate(&json!("[]"), ctx).is_empty());
        });
    }

    #[test]
    fn test_value_as_text() {
        assert_eq!(value_as_text(&json!("abc")), "abc");
        assert_eq!(value_as_text(&json!(42)), "42");
        assert_eq!(value_as_text(&json!(true)), "true");
        assert_eq!(value_as_text(&json!([1, 2])), "[1,2]");
        assert_eq!(value_as_text(&Value::Null), "");
    }

    #[test]
    fn test_required_null_vs_empty() {
        with_context(|ctx| {
            let null = RequiredValidator.validate(&Value::Null, ctx);
            assert_eq!(null.len(), 1);
            assert_eq!(null[0].kind, FailureKind::EmptyOrNull);
            assert_eq!(null[0].message, "Value cannot be null");
            assert_eq!(null[0].member_names, vec!["title".to_string()]);

            let empty = RequiredValidator.validate(&json!(""), ctx);
            assert_eq!(empty[0].message, "Value cannot be empty");

            assert!(RequiredValidator.validate(&json!("x"), ctx).is_empty());
        });
    }

    #[test]
    fn test_pattern_full_match() {
        let validator = PatternValidator::new("[a-z]+", None).unwrap();
        assert!(validator.is_match("abc"));
        assert!(!validator.is_match("abc1"));
        assert!(!validator.is_match("1abc"));
    }

    #[test]
    fn test_pattern_rejects_groups_balanced_only_by_anchoring() {
        assert!(PatternValidator::new("a)|(?:b", None).is_err());
        assert!(PatternValidator::new("(a", None).is_err());
    }

    #[test]
    fn test_pattern_alternation_is_anchored_as_a_whole() {
        let validator = PatternValidator::new("a|b", None).unwrap();
        assert!(validator.is_match("a"));
        assert!(!validator.is_match("ab"));
    }

    #[test]
    fn test_pattern_skips_empty_and_uses_message() {
        let validator = PatternValidator::new("^donotmatch$", Some("Does not match!".to_string())).unwrap();
        with_context(|ctx| {
            assert!(validator.validate(&json!(""), ctx).is_empty());
            assert!(validator.validate(&Value::Null, ctx).is_empty());

            let failures = validator.validate(&json!("Hello world"), ctx);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].kind, FailureKind::PatternMismatch);
            assert_eq!(failures[0].message, "Does not match!");
            assert_eq!(failures[0].member_names.len(), 1);
        });
    }

    #[test]
    fn test_pattern_default_message() {
        let validator = PatternValidator::new("x", None).unwrap();
        with_context(|ctx| {
            let failures = validator.validate(&json!("y"), ctx);
            assert_eq!(
                failures[0].message,
                "Value is invalid, it does not match the correct pattern"
            );
        });
    }

    #[test]
    fn test_integer_validator() {
        with_context(|ctx| {
            assert!(IntegerValidator.validate(&json!(12), ctx).is_empty());
            assert!(IntegerValidator.validate(&json!(" 12 "), ctx).is_empty());
            assert!(IntegerValidator.validate(&json!(""), ctx).is_empty());
            let failures = IntegerValidator.validate(&json!("12.5"), ctx);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].kind, FailureKind::CustomRuleFailed);
            assert_eq!(IntegerValidator.validate(&json!(1.5), ctx).len(), 1);
        });
    }

    #[test]
    fn test_decimal_validator() {
        with_context(|ctx| {
            assert!(DecimalValidator.validate(&json!("3.14"), ctx).is_empty());
            assert!(DecimalValidator.validate(&json!(2), ctx).is_empty());
            assert_eq!(DecimalValidator.validate(&json!("pi"), ctx).len(), 1);
            assert_eq!(DecimalValidator.validate(&json!("NaN"), ctx).len(), 1);
        });
    }

    #[test]
    fn test_email_validator() {
        with_context(|ctx| {
            assert!(EmailValidator.validate(&json!("someone@example.com"), ctx).is_empty());
            assert!(EmailValidator.validate(&json!(""), ctx).is_empty());
            assert_eq!(EmailValidator.validate(&json!("not-an-email"), ctx).len(), 1);
        });
    }

    fn always_fails(_: &Value, _: &FieldContext<'_>) -> Vec<ValidationFailure> {
        vec![ValidationFailure::custom("WRONG!", ["innerFieldId"])]
    }

    #[test]
    fn test_function_validator() {
        with_context(|ctx| {
            let failures = always_fails.validate(&json!("anything"), ctx);
            assert_eq!(failures[0].member_names, vec!["innerFieldId".to_string()]);
        });
    }
}
