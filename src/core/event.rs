/// Which of the two convertible representations is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Form,
    Raw,
}

/// Notifications emitted by editor operations, for the embedding surface
/// to react to (re-render, redirect, show a toast, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    Loaded,
    LoadFailed,
    ViewChanged(ViewMode),
    DocumentChanged { field_id: String },
    ParseFailed(String),
    SaveRefused,
    SaveSubmitted,
    Saved,
    SaveFailed(String),
}
