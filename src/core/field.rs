use crate::core::document::Document;
use crate::core::validation::{InvalidSet, ValidationRule};
use crate::core::value_path::Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire-level type of the value a field edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    String,
    Number,
    Integer,
    Float,
    Boolean,
    Object,
    ArrayString,
    ArrayNumber,
    ArrayBoolean,
    ArrayObject,
}

/// Kind of control a field renders as. The renderer itself is an external
/// collaborator; the engine only dispatches on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    TextArea,
    Password,
    Number,
    Checkbox,
    Switch,
    Labels,
    KeyValueMap,
    VariablesMap,
    DynamicArray,
    ConditionsArrayMap,
    Divider,
    Select,
    SelectTypeAhead,
    SelectTypeAheadMultiple,
    SelectTypeAheadAsync,
    ScriptEditor,
    DatePicker,
    TimePicker,
    ToggleButtonGroup,
    SliderSimple,
}

/// One entry of a select-style field's option list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidatedState {
    #[default]
    Default,
    Success,
    Error,
}

/// One editable projection of the document. Descriptors are ephemeral:
/// recomputed from the current document shape on every pass.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Dotted path into the document. Divider rows use a `!`-prefixed marker
    /// id that never addresses the document.
    pub field_id: String,
    pub label: String,
    pub field_type: FieldType,
    pub data_type: DataType,
    pub value: Value,
    pub is_required: bool,
    pub is_disabled: bool,
    pub validator: Vec<ValidationRule>,
    pub options: Vec<SelectOption>,
    pub reset_fields: IndexMap<String, Value>,
    pub helper_text: String,
    pub helper_text_invalid: String,
    pub validated: ValidatedState,
}

impl FieldDescriptor {
    pub fn new(
        field_id: impl Into<String>,
        label: impl Into<String>,
        field_type: FieldType,
        data_type: DataType,
    ) -> Self {
        Self {
            field_id: field_id.into(),
            label: label.into(),
            field_type,
            data_type,
            value: default_value(data_type),
            is_required: false,
            is_disabled: false,
            validator: Vec::new(),
            options: Vec::new(),
            reset_fields: IndexMap::new(),
            helper_text: String::new(),
            helper_text_invalid: String::new(),
            validated: ValidatedState::Default,
        }
    }

    pub fn divider(marker_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(marker_id, label, FieldType::Divider, DataType::String)
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.is_disabled = disabled;
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }

    pub fn with_validator(mut self, rule: ValidationRule) -> Self {
        self.validator.push(rule);
        self
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_reset_field(mut self, path: impl Into<String>, value: Value) -> Self {
        self.reset_fields.insert(path.into(), value);
        self
    }

    pub fn with_helper_text(mut self, text: impl Into<String>) -> Self {
        self.helper_text = text.into();
        self
    }

    pub fn with_invalid_text(mut self, text: impl Into<String>) -> Self {
        self.helper_text_invalid = text.into();
        self
    }

    pub fn is_divider(&self) -> bool {
        self.field_type == FieldType::Divider
    }

    /// Dividers and similar marker rows carry no document value.
    pub fn holds_value(&self) -> bool {
        !self.is_divider() && !self.field_id.starts_with('!')
    }

    pub fn path(&self) -> Option<Path> {
        if !self.holds_value() {
            return None;
        }
        Path::parse(&self.field_id).ok()
    }
}

fn default_value(data_type: DataType) -> Value {
    match data_type {
        DataType::String => Value::String(String::new()),
        DataType::Boolean => Value::Bool(false),
        DataType::Object => Value::Object(serde_json::Map::new()),
        DataType::ArrayString
        | DataType::ArrayNumber
        | DataType::ArrayBoolean
        | DataType::ArrayObject => Value::Array(Vec::new()),
        DataType::Number | DataType::Integer | DataType::Float => Value::String(String::new()),
    }
}

/// Refreshes each descriptor's `value` from the document at its path,
/// leaving the declared default in place when the document has no entry.
pub fn update_items(document: &Document, items: &mut [FieldDescriptor]) {
    for item in items.iter_mut() {
        let Some(path) = item.path() else { continue };
        if let Some(value) = document.get(&path) {
            item.value = value.clone();
        }
    }
}

/// Marks each descriptor according to its membership in the invalid set.
pub fn update_validations(items: &mut [FieldDescriptor], invalid_items: &InvalidSet) {
    for item in items.iter_mut() {
        item.validated = if invalid_items.contains(&item.field_id) {
            ValidatedState::Error
        } else {
            ValidatedState::Default
        };
    }
}

/// Coerces a raw control value into the field's wire type. Text controls
/// hand over strings even for numeric fields; the document should carry
/// real numbers and booleans.
pub fn coerce_value(data_type: DataType, value: Value) -> Value {
    match data_type {
        DataType::Integer => match &value {
            Value::String(text) => text
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or(value),
            _ => value,
        },
        DataType::Float | DataType::Number => match &value {
            Value::String(text) => {
                let trimmed = text.trim();
                if let Ok(int) = trimmed.parse::<i64>() {
                    Value::from(int)
                } else if let Ok(float) = trimmed.parse::<f64>() {
                    Value::from(float)
                } else {
                    value
                }
            }
            _ => value,
        },
        DataType::Boolean => match &value {
            Value::String(text) => match text.trim() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => value,
            },
            _ => value,
        },
        _ => value,
    }
}
