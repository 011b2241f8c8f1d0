use crate::core::document::Document;
use crate::core::field::{DataType, FieldDescriptor, FieldType, SelectOption};
use crate::core::validation::ValidationRule;
use crate::core::value_path::Path;
use serde_json::json;

/// Dampening strategies for task triggering.
pub mod dampening {
    pub const NONE: &str = "";
    pub const CONSECUTIVE: &str = "consecutive";
    pub const LAST_N_EVALUATIONS: &str = "last_n_evaluations";
    pub const ACTIVE_TIME: &str = "active_time";
}

fn dampening_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new(dampening::NONE, "None"),
        SelectOption::new(dampening::CONSECUTIVE, "Consecutive"),
        SelectOption::new(dampening::LAST_N_EVALUATIONS, "Last N Evaluations"),
        SelectOption::new(dampening::ACTIVE_TIME, "Active Time"),
    ]
}

fn resource_event_type_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("gateway", "Gateway"),
        SelectOption::new("node", "Node"),
        SelectOption::new("source", "Source"),
        SelectOption::new("field", "Field"),
    ]
}

/// Field derivation for the task editor page. Conditional sections follow
/// the document shape: event filters appear only for event-triggered tasks,
/// dampening sub-fields follow the dampening type, and the rule section is
/// omitted for remote-call tasks.
pub fn form_items(root_object: &Document, resource_id: Option<&str>) -> Vec<FieldDescriptor> {
    let is_existing = resource_id.is_some_and(|id| !id.is_empty());

    let mut items = vec![
        FieldDescriptor::new("id", "ID", FieldType::Text, DataType::String)
            .required()
            .disabled(is_existing)
            .with_invalid_text("Invalid name. chars: min=4, max=100, and space not allowed")
            .with_validator(ValidationRule::length(4, 100))
            .with_validator(ValidationRule::IsNotEmpty)
            .with_validator(ValidationRule::IsId),
        FieldDescriptor::new("description", "Description", FieldType::Text, DataType::String),
        FieldDescriptor::new("enabled", "Enabled", FieldType::Switch, DataType::Boolean),
        FieldDescriptor::new(
            "ignoreDuplicate",
            "Ignore Duplicate",
            FieldType::Switch,
            DataType::Boolean,
        ),
        FieldDescriptor::new("autoDisable", "Auto Disable", FieldType::Switch, DataType::Boolean),
        FieldDescriptor::divider("!labels", "Labels"),
        FieldDescriptor::new("labels", "", FieldType::Labels, DataType::Object)
            .with_validator(ValidationRule::IsLabel),
        FieldDescriptor::divider("!execution_mode", "Execution Mode"),
        FieldDescriptor::new(
            "triggerOnEvent",
            "Trigger On Event",
            FieldType::Switch,
            DataType::Boolean,
        ),
    ];

    let trigger_on_event = root_object
        .get(&Path::parse("triggerOnEvent").expect("static path"))
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);

    if trigger_on_event {
        items.push(FieldDescriptor::divider("!event_filters", "Event Filters"));
        items.push(
            FieldDescriptor::new(
                "eventFilter.resourceTypes",
                "Resource Types",
                FieldType::SelectTypeAheadMultiple,
                DataType::ArrayString,
            )
            .with_options(resource_event_type_options()),
        );
        items.push(FieldDescriptor::new(
            "eventFilter.selectors",
            "Selectors",
            FieldType::KeyValueMap,
            DataType::Object,
        ));
    } else {
        items.push(FieldDescriptor::new(
            "executionInterval",
            "Execution Interval",
            FieldType::Text,
            DataType::String,
        ));
    }

    items.push(FieldDescriptor::divider("!dampening", "Dampening"));
    items.push(
        FieldDescriptor::new("dampening.type", "Type", FieldType::Select, DataType::String)
            .with_options(dampening_options())
            .with_reset_field("dampening.occurrences", json!(0))
            .with_reset_field("dampening.evaluations", json!(0))
            .with_reset_field("dampening.activeTime", json!("")),
    );

    let dampening_type = root_object
        .get_str(&Path::parse("dampening.type").expect("static path"))
        .unwrap_or("");
    match dampening_type {
        dampening::CONSECUTIVE => {
            items.push(FieldDescriptor::new(
                "dampening.occurrences",
                "Occurrences",
                FieldType::Text,
                DataType::Integer,
            ));
        }
        dampening::LAST_N_EVALUATIONS => {
            items.push(FieldDescriptor::new(
                "dampening.evaluations",
                "Evaluations",
                FieldType::Text,
                DataType::Integer,
            ));
            items.push(FieldDescriptor::new(
                "dampening.occurrences",
                "Occurrences",
                FieldType::Text,
                DataType::Integer,
            ));
        }
        dampening::ACTIVE_TIME => {
            items.push(FieldDescriptor::new(
                "dampening.activeTime",
                "Active Time",
                FieldType::Text,
                DataType::String,
            ));
        }
        _ => {}
    }

    items.push(FieldDescriptor::divider("!variables", "Variables"));
    items.push(FieldDescriptor::new(
        "variables",
        "",
        FieldType::VariablesMap,
        DataType::Object,
    ));

    let remote_call = root_object
        .get(&Path::parse("remoteCall").expect("static path"))
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);
    if !remote_call {
        items.push(FieldDescriptor::divider("!rule", "Rule"));
        items.push(FieldDescriptor::new(
            "rule.matchAll",
            "Match All",
            FieldType::Switch,
            DataType::Boolean,
        ));
        items.push(FieldDescriptor::new(
            "rule.conditions",
            "Conditions",
            FieldType::ConditionsArrayMap,
            DataType::ArrayObject,
        ));
    }

    items.push(FieldDescriptor::divider("!parameters", "Parameters to Handler"));
    items.push(FieldDescriptor::new(
        "handlerParameters",
        "",
        FieldType::VariablesMap,
        DataType::Object,
    ));
    items.push(FieldDescriptor::divider("!handlers", "Handlers"));
    items.push(FieldDescriptor::new(
        "handlers",
        "",
        FieldType::DynamicArray,
        DataType::ArrayString,
    ));

    items
}
