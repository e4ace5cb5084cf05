use crate::{FetchId, FileHandle, UploadId};

/// Side-effect intents produced by [`crate::update`]. The caller executes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the backend for the current registry snapshot. Results of older
    /// fetches than the newest applied one are discarded.
    FetchRegistry { fetch_id: FetchId },
    /// Send every file as one multipart upload.
    UploadFiles {
        upload_id: UploadId,
        files: Vec<FileHandle>,
    },
    CancelUpload { upload_id: UploadId },
    PurgeAll,
    Notify(Notification),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient user feedback for the notification layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}
