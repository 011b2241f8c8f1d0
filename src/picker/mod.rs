pub mod items;
pub mod options;

pub use options::OptionsProvider;

use crate::core::document::Document;
use crate::core::editor::Editor;
use crate::core::event::EditorEvent;
use crate::core::field::SelectOption;
use crate::core::language::{self, Language, LanguageError};
use crate::core::surface::BufferSurface;
use crate::core::value_path::Path;
use crate::remote::ApiError;
use serde_json::json;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use tracing::warn;

/// Who is editing the dynamic value. Variables and handler parameters offer
/// different sets of value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerType {
    Variable,
    Parameter,
}

pub type OnValueChange = Box<dyn Fn(&str) + Send>;

/// Expands a flattened dynamic value into the typed document the nested
/// editor works on. Tagged payloads round-trip through YAML; anything else
/// is wrapped as a plain string value.
pub fn root_object_from_value(value: &str) -> Document {
    if !value.trim().is_empty() {
        if let Ok(document) = language::to_document(Language::Yaml, value) {
            let has_kind_tag = document
                .get_str(&Path::parse("type").expect("static path"))
                .is_some_and(|tag| tag != items::kind::STRING);
            if has_kind_tag {
                return document;
            }
        }
    }
    Document::from_value(json!({ "type": items::kind::STRING, "string": value }))
}

/// Collapses the edited document back into the single value the parent form
/// expects: plain strings flatten to the bare string, tagged kinds keep
/// their YAML form.
pub fn flatten_value(document: &Document) -> Result<String, LanguageError> {
    let type_path = Path::parse("type").expect("static path");
    match document.get_str(&type_path) {
        None | Some(items::kind::STRING) => {
            let string_path = Path::parse("string").expect("static path");
            Ok(document.get_str(&string_path).unwrap_or_default().to_string())
        }
        Some(_) => language::to_text(Language::Yaml, document),
    }
}

struct PickerSession {
    editor: Editor,
    surface: BufferSurface,
    committed_rx: Receiver<Document>,
}

/// Modal-scoped nested editor for one dynamic value. The session's document
/// is isolated from the parent form: the parent is only ever touched through
/// the single `on_change` callback at commit time.
pub struct ResourcePicker {
    name: String,
    caller_type: CallerType,
    on_change: OnValueChange,
    options_provider: Option<Arc<dyn OptionsProvider>>,
    session: Option<PickerSession>,
}

impl ResourcePicker {
    pub fn new<F>(name: impl Into<String>, caller_type: CallerType, on_change: F) -> Self
    where
        F: Fn(&str) + Send + 'static,
    {
        Self {
            name: name.into(),
            caller_type,
            on_change: Box::new(on_change),
            options_provider: None,
            session: None,
        }
    }

    pub fn with_options_provider(mut self, provider: Arc<dyn OptionsProvider>) -> Self {
        self.options_provider = Some(provider);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Opens the modal over the current flattened value and starts a fresh
    /// nested edit session.
    pub fn open(&mut self, value: &str) {
        let (committed_tx, committed_rx) = mpsc::channel::<Document>();
        let caller_type = self.caller_type;

        let mut editor = Editor::new(move |document| items::picker_items(document, caller_type))
            .with_language(Language::Yaml)
            .with_initial_object(root_object_from_value(value))
            .with_on_save(move |document| {
                let _ = committed_tx.send(document.clone());
            });

        let mut surface = BufferSurface::new();
        editor.load(&mut surface);

        self.session = Some(PickerSession {
            editor,
            surface,
            committed_rx,
        });
    }

    /// Discards the session without touching the parent value.
    pub fn close(&mut self) {
        self.session = None;
    }

    pub fn editor_mut(&mut self) -> Option<&mut Editor> {
        self.session.as_mut().map(|session| &mut session.editor)
    }

    /// Split borrow for operations that need both the nested editor and its
    /// raw-text surface, e.g. toggling the nested view.
    pub fn session_mut(&mut self) -> Option<(&mut Editor, &mut BufferSurface)> {
        self.session
            .as_mut()
            .map(|session| (&mut session.editor, &mut session.surface))
    }

    /// Option lookup for resource-reference fields, forwarded to the
    /// caller's provider.
    pub fn lookup_options(
        &self,
        resource_type: &str,
        query: &str,
    ) -> Result<Vec<SelectOption>, ApiError> {
        match &self.options_provider {
            Some(provider) => provider.options(resource_type, query),
            None => Ok(Vec::new()),
        }
    }

    /// Commits the session: saves the nested editor, flattens the edited
    /// document and hands it to the parent exactly once, then closes the
    /// modal. Returns false (and stays open) when the nested save was
    /// refused.
    pub fn save(&mut self) -> bool {
        let Some(session) = &mut self.session else {
            return false;
        };

        let events = session.editor.save(&mut session.surface);
        if !events.contains(&EditorEvent::Saved) {
            return false;
        }

        let Ok(document) = session.committed_rx.try_recv() else {
            return false;
        };

        match flatten_value(&document) {
            Ok(value) => {
                (self.on_change)(&value);
                self.session = None;
                true
            }
            Err(err) => {
                warn!(%err, "dynamic value does not flatten, keeping the modal open");
                false
            }
        }
    }
}
