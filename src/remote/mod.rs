mod executor;

pub use executor::{Completion, RemoteExecutor};

use crate::core::document::Document;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned {code}: {message}")]
    Status { code: u16, message: String },
    #[error("record not found: {0}")]
    NotFound(String),
}

/// Backend persistence for one resource kind. Implementations wrap whatever
/// HTTP client the embedding application uses; the engine only sees records
/// in and out.
pub trait ResourceApi: Send + Sync {
    fn get_record(&self, id: &str) -> Result<Document, ApiError>;
    fn save_record(&self, document: &Document) -> Result<(), ApiError>;
}

pub type SharedApi = Arc<dyn ResourceApi>;
