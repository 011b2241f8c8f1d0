use crate::core::document::Document;
use crate::core::field::{DataType, FieldDescriptor, FieldType};
use crate::core::validation::ValidationRule;

/// Field derivation for the data-repository entry editor. The entry's
/// payload is itself an embedded document, edited through a nested
/// script-editor field.
pub fn form_items(_root_object: &Document, resource_id: Option<&str>) -> Vec<FieldDescriptor> {
    let is_existing = resource_id.is_some_and(|id| !id.is_empty());

    vec![
        FieldDescriptor::new("id", "ID", FieldType::Text, DataType::String)
            .required()
            .disabled(is_existing)
            .with_invalid_text("Invalid name. chars: min=4, max=100, and space not allowed")
            .with_validator(ValidationRule::length(4, 100))
            .with_validator(ValidationRule::IsNotEmpty)
            .with_validator(ValidationRule::IsId),
        FieldDescriptor::new("description", "Description", FieldType::Text, DataType::String),
        FieldDescriptor::new("readOnly", "Read Only", FieldType::Switch, DataType::Boolean),
        FieldDescriptor::divider("!labels", "Labels"),
        FieldDescriptor::new("labels", "", FieldType::Labels, DataType::Object)
            .with_validator(ValidationRule::IsLabel),
        FieldDescriptor::new("data", "Data", FieldType::ScriptEditor, DataType::Object),
    ]
}

#[cfg(test)]
mod tests {
    use super::form_items;
    use crate::core::editor::Editor;
    use crate::core::event::EditorEvent;
    use crate::core::surface::BufferSurface;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[test]
    fn entry_with_valid_id_saves() {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let sink = saved.clone();
        let mut surface = BufferSurface::new();
        let mut editor = Editor::new(|document| form_items(document, None))
            .with_on_save(move |document| sink.lock().unwrap().push(document.as_value().clone()));
        editor.load(&mut surface);

        let items = editor.form_items();
        let id_field = items.iter().find(|item| item.field_id == "id").expect("id");
        editor.set_field_value(id_field, json!("room-temps"));
        let data_field = items.iter().find(|item| item.field_id == "data").expect("data");
        editor.set_field_value(data_field, json!({ "cellar": 17.5 }));

        assert_eq!(editor.save(&mut surface), vec![EditorEvent::Saved]);
        assert_eq!(
            saved.lock().unwrap().as_slice(),
            &[json!({ "id": "room-temps", "data": { "cellar": 17.5 } })]
        );
    }

    #[test]
    fn bad_label_key_blocks_save() {
        let mut surface = BufferSurface::new();
        let mut editor = Editor::new(|document| form_items(document, None)).with_on_save(|_| {});
        editor.load(&mut surface);

        let items = editor.form_items();
        let id_field = items.iter().find(|item| item.field_id == "id").expect("id");
        editor.set_field_value(id_field, json!("room-temps"));
        let labels = items.iter().find(|item| item.field_id == "labels").expect("labels");
        editor.set_field_value(labels, json!({ "bad key!": "x" }));

        assert_eq!(editor.save(&mut surface), vec![EditorEvent::SaveRefused]);
        assert!(editor.invalid_items().contains("labels"));
    }
}
