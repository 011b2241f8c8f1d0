use crate::core::document::Document;
use crate::core::field::{DataType, FieldDescriptor, FieldType, SelectOption};
use crate::core::validation::ValidationRule;
use crate::core::value_path::Path;
use crate::picker::CallerType;
use crate::picker::options::resource_type_options;
use serde_json::json;

/// Discriminant values for the `type` field of a dynamic-value document.
pub mod kind {
    pub const STRING: &str = "string";
    pub const RESOURCE_BY_QUICK_ID: &str = "resource_by_quick_id";
    pub const RESOURCE_BY_LABELS: &str = "resource_by_labels";
    pub const EMAIL: &str = "email";
    pub const TELEGRAM: &str = "telegram";
    pub const EXPORTER: &str = "exporter";
}

pub mod exporter_type {
    pub const DISK: &str = "disk";
}

fn kind_options(caller_type: CallerType) -> Vec<SelectOption> {
    let all = vec![
        SelectOption::new(kind::STRING, "String"),
        SelectOption::new(kind::RESOURCE_BY_QUICK_ID, "Resource By Quick ID"),
        SelectOption::new(kind::RESOURCE_BY_LABELS, "Resource By Labels"),
        SelectOption::new(kind::EMAIL, "Email"),
        SelectOption::new(kind::TELEGRAM, "Telegram"),
        SelectOption::new(kind::EXPORTER, "Exporter"),
    ];
    match caller_type {
        // variables hold plain values or resource references, never
        // notification payloads
        CallerType::Variable => all
            .into_iter()
            .filter(|option| {
                matches!(
                    option.value.as_str(),
                    kind::STRING | kind::RESOURCE_BY_QUICK_ID | kind::RESOURCE_BY_LABELS
                )
            })
            .collect(),
        CallerType::Parameter => all,
    }
}

fn telegram_parse_mode_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("Text", "Text"),
        SelectOption::new("Markdown", "Markdown"),
        SelectOption::new("MarkdownV2", "Markdown V2"),
        SelectOption::new("HTML", "HTML"),
    ]
}

fn exporter_type_options() -> Vec<SelectOption> {
    vec![SelectOption::new(exporter_type::DISK, "Disk")]
}

fn export_format_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("yaml", "YAML"),
        SelectOption::new("json", "JSON"),
    ]
}

/// Field derivation for the dynamic-value editor. The field list branches
/// on the `type` discriminant; changing it resets both payload slots.
pub fn picker_items(root_object: &Document, caller_type: CallerType) -> Vec<FieldDescriptor> {
    let mut items = vec![
        FieldDescriptor::new("type", "Data Type", FieldType::SelectTypeAhead, DataType::String)
            .required()
            .with_invalid_text("Invalid type")
            .with_options(kind_options(caller_type))
            .with_validator(ValidationRule::IsNotEmpty)
            .with_reset_field("data", json!({}))
            .with_reset_field("string", json!("")),
    ];

    let type_path = Path::parse("type").expect("static path");
    let data_type = root_object.get_str(&type_path).unwrap_or(kind::STRING);

    match data_type {
        kind::RESOURCE_BY_QUICK_ID | kind::RESOURCE_BY_LABELS => {
            items.extend(resource_data_items(root_object, data_type, caller_type));
        }
        kind::EMAIL => items.extend(email_data_items()),
        kind::TELEGRAM => items.extend(telegram_data_items()),
        kind::EXPORTER => items.extend(exporter_items(root_object)),
        _ => items.push(FieldDescriptor::new(
            "string",
            "Value",
            FieldType::Text,
            DataType::String,
        )),
    }

    items
}

fn resource_data_items(
    root_object: &Document,
    data_type: &str,
    caller_type: CallerType,
) -> Vec<FieldDescriptor> {
    let mut items = vec![
        FieldDescriptor::new(
            "data.resourceType",
            "Resource Type",
            FieldType::SelectTypeAhead,
            DataType::String,
        )
        .required()
        .with_invalid_text("Invalid type")
        .with_options(resource_type_options())
        .with_validator(ValidationRule::IsNotEmpty),
    ];

    match data_type {
        kind::RESOURCE_BY_QUICK_ID => {
            let resource_type_path = Path::parse("data.resourceType").expect("static path");
            let resource_type = root_object.get_str(&resource_type_path).unwrap_or("");
            // the resource selector only appears once a type is chosen; its
            // option list comes from the caller's OptionsProvider
            if !resource_type.is_empty() {
                items.push(
                    FieldDescriptor::new(
                        "data.quickId",
                        "Resource",
                        FieldType::SelectTypeAheadAsync,
                        DataType::String,
                    )
                    .required()
                    .with_invalid_text("Invalid resource")
                    .with_validator(ValidationRule::IsNotEmpty),
                );
            }
        }
        kind::RESOURCE_BY_LABELS => {
            items.push(FieldDescriptor::new(
                "data.labels",
                "Labels",
                FieldType::Labels,
                DataType::Object,
            ));
        }
        _ => {}
    }

    match caller_type {
        CallerType::Parameter => {
            items.push(FieldDescriptor::new(
                "data.payload",
                "Payload",
                FieldType::Text,
                DataType::String,
            ));
            items.push(FieldDescriptor::new(
                "data.preDelay",
                "Pre Delay",
                FieldType::Text,
                DataType::String,
            ));
        }
        CallerType::Variable => {
            items.push(FieldDescriptor::new(
                "data.selector",
                "Selector",
                FieldType::Text,
                DataType::String,
            ));
        }
    }

    items
}

fn email_data_items() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("data.from", "From", FieldType::Text, DataType::String),
        FieldDescriptor::new("data.to", "To", FieldType::DynamicArray, DataType::ArrayString)
            .with_validator(ValidationRule::IsEmail),
        FieldDescriptor::new("data.subject", "Subject", FieldType::Text, DataType::String),
        FieldDescriptor::new("data.body", "Body", FieldType::TextArea, DataType::String),
    ]
}

fn telegram_data_items() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new(
            "data.chatIds",
            "Chat IDs",
            FieldType::DynamicArray,
            DataType::ArrayString,
        ),
        FieldDescriptor::new(
            "data.parseMode",
            "Parse Mode",
            FieldType::SelectTypeAhead,
            DataType::String,
        )
        .with_options(telegram_parse_mode_options()),
        FieldDescriptor::new("data.text", "Text", FieldType::TextArea, DataType::String)
            .required()
            .with_invalid_text("Enter a valid text")
            .with_validator(ValidationRule::IsNotEmpty),
    ]
}

fn exporter_items(root_object: &Document) -> Vec<FieldDescriptor> {
    let mut items = vec![
        FieldDescriptor::new(
            "data.exporterType",
            "Exporter Type",
            FieldType::SelectTypeAhead,
            DataType::String,
        )
        .required()
        .with_options(exporter_type_options())
        .with_reset_field("data.spec", json!({}))
        .with_validator(ValidationRule::IsNotEmpty),
    ];

    let exporter_type_path = Path::parse("data.exporterType").expect("static path");
    if root_object.get_str(&exporter_type_path) == Some(exporter_type::DISK) {
        items.push(
            FieldDescriptor::new(
                "data.spec.exportType",
                "Export Type",
                FieldType::SelectTypeAhead,
                DataType::String,
            )
            .with_options(export_format_options()),
        );
        items.push(FieldDescriptor::new(
            "data.spec.targetDirectory",
            "Target Directory",
            FieldType::Text,
            DataType::String,
        ));
    }

    items
}

#[cfg(test)]
mod tests {
    use super::{kind, picker_items};
    use crate::core::document::Document;
    use crate::picker::CallerType;
    use serde_json::json;

    fn field_ids(document: &Document, caller_type: CallerType) -> Vec<String> {
        picker_items(document, caller_type)
            .into_iter()
            .map(|item| item.field_id)
            .collect()
    }

    #[test]
    fn default_shape_is_plain_string() {
        let document = Document::new();
        assert_eq!(
            field_ids(&document, CallerType::Parameter),
            vec!["type", "string"]
        );
    }

    #[test]
    fn variable_caller_sees_reduced_kind_list() {
        let items = picker_items(&Document::new(), CallerType::Variable);
        let kinds: Vec<&str> = items[0].options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(
            kinds,
            vec![kind::STRING, kind::RESOURCE_BY_QUICK_ID, kind::RESOURCE_BY_LABELS]
        );
    }

    #[test]
    fn quick_id_selector_appears_after_resource_type_chosen() {
        let before = Document::from_value(json!({ "type": kind::RESOURCE_BY_QUICK_ID }));
        assert!(!field_ids(&before, CallerType::Parameter).contains(&"data.quickId".to_string()));

        let after = Document::from_value(json!({
            "type": kind::RESOURCE_BY_QUICK_ID,
            "data": { "resourceType": "gateway" },
        }));
        let ids = field_ids(&after, CallerType::Parameter);
        assert!(ids.contains(&"data.quickId".to_string()));
        assert!(ids.contains(&"data.payload".to_string()));
        assert!(ids.contains(&"data.preDelay".to_string()));
    }

    #[test]
    fn labels_branch_and_variable_selector() {
        let document = Document::from_value(json!({ "type": kind::RESOURCE_BY_LABELS }));
        let ids = field_ids(&document, CallerType::Variable);
        assert!(ids.contains(&"data.labels".to_string()));
        assert!(ids.contains(&"data.selector".to_string()));
        assert!(!ids.contains(&"data.payload".to_string()));
    }

    #[test]
    fn exporter_spec_fields_follow_exporter_type() {
        let bare = Document::from_value(json!({ "type": kind::EXPORTER }));
        assert_eq!(
            field_ids(&bare, CallerType::Parameter),
            vec!["type", "data.exporterType"]
        );

        let disk = Document::from_value(json!({
            "type": kind::EXPORTER,
            "data": { "exporterType": "disk" },
        }));
        let ids = field_ids(&disk, CallerType::Parameter);
        assert!(ids.contains(&"data.spec.exportType".to_string()));
        assert!(ids.contains(&"data.spec.targetDirectory".to_string()));
    }

    #[test]
    fn type_field_resets_both_payload_slots() {
        let items = picker_items(&Document::new(), CallerType::Parameter);
        let type_field = &items[0];
        assert_eq!(type_field.reset_fields.get("data"), Some(&json!({})));
        assert_eq!(type_field.reset_fields.get("string"), Some(&json!("")));
    }
}
