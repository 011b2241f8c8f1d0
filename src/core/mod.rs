pub mod document;
pub mod editor;
pub mod event;
pub mod field;
pub mod language;
pub mod surface;
pub mod validation;
pub mod value_path;
