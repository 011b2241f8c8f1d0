use crate::core::document::Document;
use crate::core::event::{EditorEvent, ViewMode};
use crate::core::field::{self, FieldDescriptor};
use crate::core::language::{self, Language};
use crate::core::surface::TextSurface;
use crate::core::validation::{InvalidSet, update_invalid_list};
use crate::core::value_path::Path;
use crate::remote::{Completion, RemoteExecutor, SharedApi};
use serde_json::Value;
use tracing::{debug, warn};

pub type GetFormItems = Box<dyn Fn(&Document) -> Vec<FieldDescriptor> + Send>;
pub type OnChange = Box<dyn Fn(&Document) + Send>;
pub type OnSave = Box<dyn Fn(&Document) + Send>;
pub type OnRedirect = Box<dyn Fn() + Send>;

/// The dual-mode resource editor engine. Owns the document for one edit
/// session and orchestrates load, display (form or raw text), edit,
/// validate and save. Field descriptors are recomputed from the document
/// by the caller-supplied derivation after every mutation.
pub struct Editor {
    resource_id: Option<String>,
    initial_object: Option<Document>,
    language: Language,
    get_form_items: GetFormItems,
    api: Option<SharedApi>,
    on_save: Option<OnSave>,
    on_change: Option<OnChange>,
    on_save_redirect: Option<OnRedirect>,
    executor: RemoteExecutor,

    loading: bool,
    is_reloadable: bool,
    root_object: Document,
    view: ViewMode,
    invalid_items: InvalidSet,
    save_error: Option<String>,
    parse_error: Option<String>,
}

impl Editor {
    pub fn new<F>(get_form_items: F) -> Self
    where
        F: Fn(&Document) -> Vec<FieldDescriptor> + Send + 'static,
    {
        Self {
            resource_id: None,
            initial_object: None,
            language: Language::default(),
            get_form_items: Box::new(get_form_items),
            api: None,
            on_save: None,
            on_change: None,
            on_save_redirect: None,
            executor: RemoteExecutor::new(),
            loading: true,
            is_reloadable: false,
            root_object: Document::new(),
            view: ViewMode::Form,
            invalid_items: InvalidSet::new(),
            save_error: None,
            parse_error: None,
        }
    }

    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    pub fn with_initial_object(mut self, document: Document) -> Self {
        self.initial_object = Some(document);
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_api(mut self, api: SharedApi) -> Self {
        self.api = Some(api);
        self
    }

    pub fn with_on_save<F>(mut self, on_save: F) -> Self
    where
        F: Fn(&Document) + Send + 'static,
    {
        self.on_save = Some(Box::new(on_save));
        self
    }

    pub fn with_on_change<F>(mut self, on_change: F) -> Self
    where
        F: Fn(&Document) + Send + 'static,
    {
        self.on_change = Some(Box::new(on_change));
        self
    }

    pub fn with_on_save_redirect<F>(mut self, redirect: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        self.on_save_redirect = Some(Box::new(redirect));
        self
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_reloadable(&self) -> bool {
        self.is_reloadable
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn root_object(&self) -> &Document {
        &self.root_object
    }

    pub fn invalid_items(&self) -> &InvalidSet {
        &self.invalid_items
    }

    pub fn save_error(&self) -> Option<&str> {
        self.save_error.as_deref()
    }

    pub fn parse_error(&self) -> Option<&str> {
        self.parse_error.as_deref()
    }

    /// The save control is disabled while any form field is invalid.
    pub fn is_save_blocked(&self) -> bool {
        self.view == ViewMode::Form && !self.invalid_items.is_empty()
    }

    /// Current descriptors for the renderer: derived from the document,
    /// values refreshed, error markers applied. Does not touch engine state.
    pub fn form_items(&self) -> Vec<FieldDescriptor> {
        let mut items = (self.get_form_items)(&self.root_object);
        field::update_items(&self.root_object, &mut items);
        field::update_validations(&mut items, &self.invalid_items);
        items
    }

    /// Starts an edit session. Exactly one of three paths runs: fetch by
    /// resource id (asynchronous, resolved by `poll`), install the supplied
    /// initial document, or install an empty document.
    pub fn load(&mut self, surface: &mut dyn TextSurface) -> Vec<EditorEvent> {
        self.loading = true;
        self.parse_error = None;
        self.save_error = None;

        if let (Some(id), Some(api)) = (self.resource_id.clone(), self.api.clone()) {
            debug!(resource_id = %id, "fetching record");
            self.executor.spawn_get(api, id);
            return Vec::new();
        }

        let document = self.initial_object.clone().unwrap_or_default();
        self.install_root_object(document, surface);
        vec![EditorEvent::Loaded]
    }

    /// Drains completions of outstanding remote calls. Completions apply in
    /// arrival order; a stale response simply overwrites newer state.
    pub fn poll(&mut self, surface: &mut dyn TextSurface) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        for completion in self.executor.drain_ready() {
            match completion {
                Completion::Loaded(document) => {
                    self.install_root_object(document, surface);
                    events.push(EditorEvent::Loaded);
                }
                Completion::LoadFailed(err) => {
                    warn!(%err, "record fetch failed, offering reload");
                    self.loading = false;
                    self.is_reloadable = true;
                    self.root_object = Document::new();
                    events.push(EditorEvent::LoadFailed);
                }
                Completion::Saved => {
                    self.save_error = None;
                    if let Some(redirect) = &self.on_save_redirect {
                        redirect();
                    }
                    events.push(EditorEvent::Saved);
                }
                Completion::SaveFailed(err) => {
                    warn!(%err, "record save failed");
                    let message = err.to_string();
                    self.save_error = Some(message.clone());
                    events.push(EditorEvent::SaveFailed(message));
                }
            }
        }
        events
    }

    /// Switches between the structured form and the raw-text document.
    /// Raw-to-form conversion is fallible: on a parse error the engine stays
    /// in raw view with the surface text untouched, so edits are never
    /// silently discarded.
    pub fn toggle_view(&mut self, surface: &mut dyn TextSurface) -> Vec<EditorEvent> {
        match self.view {
            ViewMode::Form => match language::to_text(self.language, &self.root_object) {
                Ok(text) => {
                    surface.set_value(&text);
                    self.view = ViewMode::Raw;
                    vec![EditorEvent::ViewChanged(ViewMode::Raw)]
                }
                Err(err) => {
                    let message = err.to_string();
                    self.parse_error = Some(message.clone());
                    vec![EditorEvent::ParseFailed(message)]
                }
            },
            ViewMode::Raw => match language::to_document(self.language, &surface.get_value()) {
                Ok(document) => {
                    self.parse_error = None;
                    self.root_object = document;
                    self.revalidate_all();
                    self.view = ViewMode::Form;
                    vec![EditorEvent::ViewChanged(ViewMode::Form)]
                }
                Err(err) => {
                    let message = err.to_string();
                    warn!(%err, "raw text does not parse, staying in raw view");
                    self.parse_error = Some(message.clone());
                    vec![EditorEvent::ParseFailed(message)]
                }
            },
        }
    }

    /// Applies one field edit: writes the value at the field's path, runs
    /// the field's reset cascade, revalidates the field and notifies the
    /// change observer.
    pub fn set_field_value(&mut self, item: &FieldDescriptor, new_value: Value) -> Vec<EditorEvent> {
        let Some(path) = item.path() else {
            return Vec::new();
        };

        let value = field::coerce_value(item.data_type, new_value);
        self.root_object.set(&path, value.clone());

        for (reset_path, reset_value) in &item.reset_fields {
            match Path::parse(reset_path) {
                Ok(reset) => self.root_object.set(&reset, reset_value.clone()),
                Err(err) => warn!(%reset_path, %err, "skipping unparseable reset path"),
            }
        }

        update_invalid_list(&mut self.invalid_items, item, &value);
        self.prune_vanished_fields();

        if let Some(on_change) = &self.on_change {
            on_change(&self.root_object);
        }

        vec![EditorEvent::DocumentChanged {
            field_id: item.field_id.clone(),
        }]
    }

    /// Validates, then hands the document to exactly one persistence
    /// strategy: the remote API if configured, else the local save callback.
    /// Both views run the full field validation pass before persisting.
    pub fn save(&mut self, surface: &mut dyn TextSurface) -> Vec<EditorEvent> {
        if self.api.is_none() && self.on_save.is_none() {
            return Vec::new();
        }

        let data = match self.view {
            ViewMode::Form => {
                self.revalidate_all();
                if !self.invalid_items.is_empty() {
                    debug!(invalid = self.invalid_items.len(), "save refused");
                    return vec![EditorEvent::SaveRefused];
                }
                self.root_object.clone()
            }
            ViewMode::Raw => {
                let document = match language::to_document(self.language, &surface.get_value()) {
                    Ok(document) => document,
                    Err(err) => {
                        let message = err.to_string();
                        warn!(%err, "raw text does not parse, save refused");
                        self.parse_error = Some(message.clone());
                        return vec![EditorEvent::ParseFailed(message)];
                    }
                };
                self.parse_error = None;
                self.root_object = document;
                self.revalidate_all();
                if !self.invalid_items.is_empty() {
                    debug!(invalid = self.invalid_items.len(), "save refused");
                    return vec![EditorEvent::SaveRefused];
                }
                self.root_object.clone()
            }
        };

        if let Some(api) = &self.api {
            self.executor.spawn_save(api.clone(), data);
            return vec![EditorEvent::SaveSubmitted];
        }

        if let Some(on_save) = &self.on_save {
            on_save(&data);
        }
        self.save_error = None;
        if let Some(redirect) = &self.on_save_redirect {
            redirect();
        }
        vec![EditorEvent::Saved]
    }

    fn install_root_object(&mut self, document: Document, surface: &mut dyn TextSurface) {
        self.root_object = document;
        self.loading = false;
        self.is_reloadable = false;
        self.revalidate_all();

        match language::to_text(self.language, &self.root_object) {
            Ok(text) => surface.set_value(&text),
            Err(err) => warn!(%err, "document does not serialize for the raw view"),
        }
    }

    /// Full-form validation pass: recompute descriptors from the current
    /// document and rebuild the invalid set from them, so entries for fields
    /// the derivation no longer produces are dropped.
    fn revalidate_all(&mut self) {
        let mut items = (self.get_form_items)(&self.root_object);
        field::update_items(&self.root_object, &mut items);
        let mut invalid = InvalidSet::new();
        for item in &items {
            update_invalid_list(&mut invalid, item, &item.value);
        }
        self.invalid_items = invalid;
    }

    /// A mutation can remove conditional fields from the derivation, usually
    /// through a reset cascade. Their invalid entries must not linger and
    /// block saving.
    fn prune_vanished_fields(&mut self) {
        let items = (self.get_form_items)(&self.root_object);
        self.invalid_items
            .retain(|id| items.iter().any(|item| item.field_id == id));
    }
}

#[cfg(test)]
mod tests {
    use super::Editor;
    use crate::core::document::Document;
    use crate::core::event::{EditorEvent, ViewMode};
    use crate::core::field::{DataType, FieldDescriptor, FieldType};
    use crate::core::language::Language;
    use crate::core::surface::{BufferSurface, TextSurface};
    use crate::core::validation::ValidationRule;
    use crate::core::value_path::Path;
    use crate::remote::{ApiError, ResourceApi};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    fn simple_items(_document: &Document) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id", "ID", FieldType::Text, DataType::String)
                .required()
                .with_validator(ValidationRule::length(4, 100))
                .with_validator(ValidationRule::IsNotEmpty)
                .with_validator(ValidationRule::IsId),
            FieldDescriptor::new("description", "Description", FieldType::Text, DataType::String),
        ]
    }

    fn wait_for_events(editor: &mut Editor, surface: &mut dyn TextSurface) -> Vec<EditorEvent> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let events = editor.poll(surface);
            if !events.is_empty() {
                return events;
            }
            if Instant::now() > deadline {
                panic!("no completion arrived in time");
            }
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    struct FakeApi {
        record: Option<Value>,
        fail_save: bool,
        saved: Mutex<Vec<Value>>,
    }

    impl FakeApi {
        fn with_record(record: Value) -> Self {
            Self {
                record: Some(record),
                fail_save: false,
                saved: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                record: None,
                fail_save: true,
                saved: Mutex::new(Vec::new()),
            }
        }
    }

    impl ResourceApi for FakeApi {
        fn get_record(&self, id: &str) -> Result<Document, ApiError> {
            match &self.record {
                Some(record) => Ok(Document::from_value(record.clone())),
                None => Err(ApiError::NotFound(id.to_string())),
            }
        }

        fn save_record(&self, document: &Document) -> Result<(), ApiError> {
            if self.fail_save {
                return Err(ApiError::Status {
                    code: 503,
                    message: "backend unavailable".to_string(),
                });
            }
            self.saved.lock().unwrap().push(document.as_value().clone());
            Ok(())
        }
    }

    #[test]
    fn load_without_id_installs_empty_document() {
        let mut surface = BufferSurface::new();
        let mut editor = Editor::new(simple_items);
        let events = editor.load(&mut surface);
        assert_eq!(events, vec![EditorEvent::Loaded]);
        assert!(!editor.is_loading());
        assert!(!editor.is_reloadable());
        assert!(editor.root_object().is_empty());
        // the required id field is empty, so the form starts blocked
        assert!(editor.is_save_blocked());
    }

    #[test]
    fn load_with_initial_object_skips_fetch() {
        let mut surface = BufferSurface::new();
        let mut editor = Editor::new(simple_items)
            .with_initial_object(Document::from_value(json!({ "id": "pump" })));
        editor.load(&mut surface);
        assert_eq!(
            editor.root_object().as_value(),
            &json!({ "id": "pump" })
        );
    }

    #[test]
    fn remote_load_installs_fetched_record() {
        let api = Arc::new(FakeApi::with_record(json!({ "id": "tank-level" })));
        let mut surface = BufferSurface::new();
        let mut editor = Editor::new(simple_items)
            .with_resource_id("tank-level")
            .with_api(api);

        assert!(editor.load(&mut surface).is_empty());
        assert!(editor.is_loading());

        let events = wait_for_events(&mut editor, &mut surface);
        assert_eq!(events, vec![EditorEvent::Loaded]);
        assert_eq!(
            editor.root_object().as_value(),
            &json!({ "id": "tank-level" })
        );
        assert!(!editor.is_save_blocked());
        // the raw surface was primed with the serialized document
        assert!(surface.get_value().contains("tank-level"));
    }

    #[test]
    fn failed_load_enters_reloadable_state_and_retry_recovers() {
        let failing = Arc::new(FakeApi::failing());
        let mut surface = BufferSurface::new();
        let mut editor = Editor::new(simple_items)
            .with_resource_id("gone")
            .with_api(failing);

        editor.load(&mut surface);
        let events = wait_for_events(&mut editor, &mut surface);
        assert_eq!(events, vec![EditorEvent::LoadFailed]);
        assert!(editor.is_reloadable());
        assert!(editor.root_object().is_empty());

        // retry against a healthy backend
        editor = editor.with_api(Arc::new(FakeApi::with_record(json!({ "id": "back" }))));
        editor.load(&mut surface);
        let events = wait_for_events(&mut editor, &mut surface);
        assert_eq!(events, vec![EditorEvent::Loaded]);
        assert!(!editor.is_reloadable());
    }

    #[test]
    fn set_field_value_is_idempotent_for_invalid_set() {
        let mut surface = BufferSurface::new();
        let mut editor = Editor::new(simple_items);
        editor.load(&mut surface);

        let items = editor.form_items();
        let item = &items[0];
        editor.set_field_value(item, json!("abcd"));
        assert!(editor.invalid_items().is_empty());

        editor.set_field_value(item, json!("abcd"));
        assert!(editor.invalid_items().is_empty());

        editor.set_field_value(item, json!("ab"));
        assert_eq!(editor.invalid_items().len(), 1);
        editor.set_field_value(item, json!("ab"));
        assert_eq!(editor.invalid_items().len(), 1);
    }

    #[test]
    fn reset_cascade_overwrites_dependent_paths() {
        let mut surface = BufferSurface::new();
        let mut editor = Editor::new(simple_items)
            .with_initial_object(Document::from_value(json!({
                "data": { "labels": { "zone": "a", "rack": "7" } },
            })));
        editor.load(&mut surface);

        let type_field = FieldDescriptor::new("type", "Type", FieldType::Select, DataType::String)
            .with_reset_field("data.labels", json!({}));
        editor.set_field_value(&type_field, json!("resource_by_labels"));

        let labels = Path::parse("data.labels").expect("path");
        assert_eq!(editor.root_object().get(&labels), Some(&json!({})));
    }

    #[test]
    fn change_observer_sees_every_mutation() {
        let seen: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut surface = BufferSurface::new();
        let mut editor = Editor::new(simple_items)
            .with_on_change(move |document| sink.lock().unwrap().push(document.as_value().clone()));
        editor.load(&mut surface);

        let items = editor.form_items();
        let item = &items[1];
        editor.set_field_value(item, json!("first"));
        editor.set_field_value(item, json!("second"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], json!({ "description": "second" }));
    }

    #[test]
    fn save_refused_while_required_field_empty_then_proceeds() {
        let saved: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = saved.clone();
        let redirected = Arc::new(Mutex::new(0usize));
        let redirect_count = redirected.clone();

        let mut surface = BufferSurface::new();
        let mut editor = Editor::new(simple_items)
            .with_on_save(move |document| sink.lock().unwrap().push(document.as_value().clone()))
            .with_on_save_redirect(move || *redirect_count.lock().unwrap() += 1);
        editor.load(&mut surface);

        assert_eq!(editor.save(&mut surface), vec![EditorEvent::SaveRefused]);
        assert!(editor.invalid_items().contains("id"));
        assert!(saved.lock().unwrap().is_empty());

        let items = editor.form_items();
        editor.set_field_value(&items[0], json!("abcd"));
        assert!(!editor.invalid_items().contains("id"));

        assert_eq!(editor.save(&mut surface), vec![EditorEvent::Saved]);
        assert_eq!(saved.lock().unwrap().as_slice(), &[json!({ "id": "abcd" })]);
        assert_eq!(*redirected.lock().unwrap(), 1);
    }

    // a discriminant field whose value decides which branch of the form exists
    fn conditional_items(document: &Document) -> Vec<FieldDescriptor> {
        let type_path = Path::parse("type").expect("path");
        let mut items = vec![
            FieldDescriptor::new("type", "Type", FieldType::Select, DataType::String)
                .required()
                .with_reset_field("data", json!({}))
                .with_reset_field("string", json!("")),
        ];
        if document.get_str(&type_path) == Some("resource") {
            items.push(
                FieldDescriptor::new(
                    "data.resourceType",
                    "Resource type",
                    FieldType::Select,
                    DataType::String,
                )
                .required(),
            );
        } else {
            items.push(
                FieldDescriptor::new("string", "Value", FieldType::Text, DataType::String)
                    .required(),
            );
        }
        items
    }

    #[test]
    fn vanished_field_leaves_invalid_set_and_unblocks_save() {
        let saved = Arc::new(Mutex::new(0usize));
        let count = saved.clone();
        let mut surface = BufferSurface::new();
        let mut editor = Editor::new(conditional_items)
            .with_initial_object(Document::from_value(json!({ "type": "resource", "data": {} })))
            .with_on_save(move |_| *count.lock().unwrap() += 1);
        editor.load(&mut surface);

        // the resource branch has a required empty field, so save is refused
        assert_eq!(editor.save(&mut surface), vec![EditorEvent::SaveRefused]);
        assert!(editor.invalid_items().contains("data.resourceType"));

        // switching the discriminant removes the branch along with its entry
        let items = editor.form_items();
        let type_field = items
            .iter()
            .find(|item| item.field_id == "type")
            .expect("type field");
        editor.set_field_value(type_field, json!("string"));
        assert!(!editor.invalid_items().contains("data.resourceType"));

        let items = editor.form_items();
        let value_field = items
            .iter()
            .find(|item| item.field_id == "string")
            .expect("value field");
        editor.set_field_value(value_field, json!("hello"));
        assert!(editor.invalid_items().is_empty());

        assert_eq!(editor.save(&mut surface), vec![EditorEvent::Saved]);
        assert_eq!(*saved.lock().unwrap(), 1);
    }

    #[test]
    fn email_validator_blocks_save() {
        let items = |_document: &Document| {
            vec![
                FieldDescriptor::new("data.to", "To", FieldType::DynamicArray, DataType::ArrayString)
                    .with_validator(ValidationRule::IsEmail),
            ]
        };
        let mut surface = BufferSurface::new();
        let mut editor = Editor::new(items)
            .with_initial_object(Document::from_value(json!({ "type": "email" })))
            .with_on_save(|_| {});
        editor.load(&mut surface);

        let items = editor.form_items();
        editor.set_field_value(&items[0], json!(["not-an-email"]));
        assert!(editor.invalid_items().contains("data.to"));
        assert_eq!(editor.save(&mut surface), vec![EditorEvent::SaveRefused]);
    }

    #[test]
    fn view_toggle_round_trip_preserves_document() {
        let original = json!({
            "id": "tank-level",
            "dampening": { "type": "consecutive", "occurrences": 3 },
            "handlers": ["email_handler"],
        });
        let mut surface = BufferSurface::new();
        let mut editor = Editor::new(simple_items)
            .with_language(Language::Yaml)
            .with_initial_object(Document::from_value(original.clone()));
        editor.load(&mut surface);

        editor.toggle_view(&mut surface);
        assert_eq!(editor.view(), ViewMode::Raw);
        editor.toggle_view(&mut surface);
        assert_eq!(editor.view(), ViewMode::Form);
        assert_eq!(editor.root_object().as_value(), &original);
    }

    #[test]
    fn raw_parse_failure_is_surfaced_and_keeps_edits() {
        let mut surface = BufferSurface::new();
        let mut editor = Editor::new(simple_items)
            .with_initial_object(Document::from_value(json!({ "id": "abcd" })));
        editor.load(&mut surface);
        editor.toggle_view(&mut surface);

        surface.set_value("id: [unterminated");
        let events = editor.toggle_view(&mut surface);
        assert!(matches!(events.as_slice(), [EditorEvent::ParseFailed(_)]));
        assert_eq!(editor.view(), ViewMode::Raw);
        assert!(editor.parse_error().is_some());
        assert_eq!(surface.get_value(), "id: [unterminated");

        // save in raw view is refused on the same grounds
        let mut editor = editor.with_on_save(|_| {});
        let events = editor.save(&mut surface);
        assert!(matches!(events.as_slice(), [EditorEvent::ParseFailed(_)]));
    }

    #[test]
    fn raw_save_runs_field_validation() {
        let saved = Arc::new(Mutex::new(0usize));
        let count = saved.clone();
        let mut surface = BufferSurface::new();
        let mut editor = Editor::new(simple_items)
            .with_initial_object(Document::from_value(json!({ "id": "abcd" })))
            .with_on_save(move |_| *count.lock().unwrap() += 1);
        editor.load(&mut surface);
        editor.toggle_view(&mut surface);

        surface.set_value("id: ab\n");
        assert_eq!(editor.save(&mut surface), vec![EditorEvent::SaveRefused]);
        assert_eq!(*saved.lock().unwrap(), 0);

        surface.set_value("id: abcd\n");
        assert_eq!(editor.save(&mut surface), vec![EditorEvent::Saved]);
        assert_eq!(*saved.lock().unwrap(), 1);
    }

    #[test]
    fn remote_save_failure_sets_retryable_error() {
        let api = Arc::new(FakeApi::failing());
        let mut surface = BufferSurface::new();
        let mut editor = Editor::new(simple_items)
            .with_initial_object(Document::from_value(json!({ "id": "abcd" })))
            .with_api(api);
        editor.load(&mut surface);

        assert_eq!(editor.save(&mut surface), vec![EditorEvent::SaveSubmitted]);
        let events = wait_for_events(&mut editor, &mut surface);
        assert!(matches!(events.as_slice(), [EditorEvent::SaveFailed(_)]));
        assert!(editor.save_error().is_some());

        // retry against a healthy backend clears the error and redirects
        let redirected = Arc::new(Mutex::new(0usize));
        let redirect_count = redirected.clone();
        let healthy = Arc::new(FakeApi::with_record(json!({})));
        let mut editor = editor
            .with_api(healthy.clone())
            .with_on_save_redirect(move || *redirect_count.lock().unwrap() += 1);
        assert_eq!(editor.save(&mut surface), vec![EditorEvent::SaveSubmitted]);
        let events = wait_for_events(&mut editor, &mut surface);
        assert_eq!(events, vec![EditorEvent::Saved]);
        assert!(editor.save_error().is_none());
        assert_eq!(*redirected.lock().unwrap(), 1);
        assert_eq!(
            healthy.saved.lock().unwrap().as_slice(),
            &[json!({ "id": "abcd" })]
        );
    }

    #[test]
    fn save_without_persistence_is_a_no_op() {
        let mut surface = BufferSurface::new();
        let mut editor = Editor::new(simple_items)
            .with_initial_object(Document::from_value(json!({ "id": "abcd" })));
        editor.load(&mut surface);
        assert!(editor.save(&mut surface).is_empty());
    }
}
