use crate::core::document::is_empty_value;
use crate::core::field::FieldDescriptor;
use indexmap::IndexSet;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::warn;

/// A single validation rule with its parameters, as attached to a field
/// descriptor at construction time.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationRule {
    IsNotEmpty,
    IsEmpty,
    IsLength { min: Option<usize>, max: Option<usize> },
    IsId,
    IsKey,
    IsLabel,
    IsEmail,
    IsUrl,
    Matches(String),
}

impl ValidationRule {
    pub fn length(min: usize, max: usize) -> Self {
        Self::IsLength {
            min: Some(min),
            max: Some(max),
        }
    }
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("static pattern")
    })
}

fn id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("static pattern"))
}

fn key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_./-]+$").expect("static pattern"))
}

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://\S+$").expect("static pattern"))
}

/// Checks one value against one rule. Array values pass only when every
/// element passes, so list fields (e.g. email recipients) validate per entry.
pub fn validate(rule: &ValidationRule, value: &Value) -> bool {
    match rule {
        ValidationRule::IsEmpty => is_empty_value(value),
        ValidationRule::IsNotEmpty => !is_empty_value(value),
        ValidationRule::IsLabel => validate_label(value),
        _ => validate_scalar(rule, value),
    }
}

fn validate_scalar(rule: &ValidationRule, value: &Value) -> bool {
    if let Value::Array(items) = value {
        return items.iter().all(|item| validate_scalar(rule, item));
    }

    let text = match text_of(value) {
        Some(text) => text,
        None => return false,
    };

    match rule {
        ValidationRule::IsLength { min, max } => {
            let len = text.chars().count();
            min.map_or(true, |min| len >= min) && max.map_or(true, |max| len <= max)
        }
        ValidationRule::IsId => id_re().is_match(&text),
        ValidationRule::IsKey => key_re().is_match(&text),
        ValidationRule::IsEmail => email_re().is_match(&text),
        ValidationRule::IsUrl => url_re().is_match(&text),
        ValidationRule::Matches(pattern) => match Regex::new(pattern) {
            Ok(re) => re.is_match(&text),
            Err(err) => {
                warn!(%pattern, %err, "unusable validation pattern, treating value as invalid");
                false
            }
        },
        ValidationRule::IsEmpty | ValidationRule::IsNotEmpty | ValidationRule::IsLabel => {
            unreachable!("handled in validate")
        }
    }
}

fn validate_label(value: &Value) -> bool {
    let Value::Object(map) = value else {
        return false;
    };
    map.iter().all(|(key, entry)| {
        key_re().is_match(key) && matches!(entry, Value::String(text) if key_re().is_match(text))
    })
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// A field is valid when every rule in its spec passes. An empty value is
/// exempt from scalar rules unless the spec says `IsNotEmpty`; required-ness
/// is enforced separately via the shared emptiness predicate.
pub fn validate_item(item: &FieldDescriptor, value: &Value) -> bool {
    item.validator.iter().all(|rule| {
        if is_empty_value(value) && !matches!(rule, ValidationRule::IsNotEmpty) {
            return true;
        }
        validate(rule, value)
    })
}

/// The set of field ids currently failing validation. Insertion order is
/// preserved so the first offending field can be reported deterministically.
/// A field id appears at most once; membership alone drives error display
/// and save blocking.
#[derive(Debug, Clone, Default)]
pub struct InvalidSet {
    items: IndexSet<String>,
}

impl InvalidSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.items.contains(field_id)
    }

    pub fn insert(&mut self, field_id: impl Into<String>) {
        self.items.insert(field_id.into());
    }

    pub fn remove(&mut self, field_id: &str) {
        self.items.shift_remove(field_id);
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.items.retain(|id| keep(id.as_str()));
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn first(&self) -> Option<&str> {
        self.items.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}

/// Incremental invalid-set maintenance: a field is invalid when its spec
/// fails, or when it is required and its value is empty. Fields are added
/// when they start failing and removed when they start passing. Marker rows
/// never validate.
pub fn update_invalid_list(invalid_items: &mut InvalidSet, item: &FieldDescriptor, value: &Value) {
    if !item.holds_value() {
        return;
    }

    let mut make_invalid = !validate_item(item, value);
    if !make_invalid && item.is_required && is_empty_value(value) {
        make_invalid = true;
    }

    if make_invalid {
        invalid_items.insert(item.field_id.clone());
    } else {
        invalid_items.remove(&item.field_id);
    }
}
