pub mod core;
pub mod forms;
pub mod picker;
pub mod remote;

pub use crate::core::document::{Document, is_empty_value};
pub use crate::core::editor::Editor;
pub use crate::core::event::{EditorEvent, ViewMode};
pub use crate::core::field::{DataType, FieldDescriptor, FieldType, SelectOption, ValidatedState};
pub use crate::core::language::{Language, LanguageError};
pub use crate::core::surface::{BufferSurface, TextSurface};
pub use crate::core::validation::{InvalidSet, ValidationRule};
pub use crate::core::value_path::{Path, PathParseError, Segment};

pub use crate::picker::{CallerType, OptionsProvider, ResourcePicker};
pub use crate::remote::{ApiError, ResourceApi};
