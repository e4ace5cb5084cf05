//! Ingestdesk engine: backend client and effect execution.
mod backend;
mod engine;
mod picker;
mod types;

pub use backend::{
    BackendSettings, IngestionBackend, ReqwestBackend, DEFAULT_BACKEND_URL, UPLOAD_FIELD,
};
pub use engine::{EngineError, EngineEvents, EngineHandle};
pub use picker::{load_document, load_documents, PickError};
pub use types::{
    BackendError, EngineEvent, FailureKind, FetchId, UploadDocument, UploadId, UploadReceipt,
};
