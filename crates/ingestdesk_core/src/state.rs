use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::registry::sort_registry;
use crate::view_model::{ingested_list_view, pending_selection_view, AppViewModel};

pub type UploadId = u64;
pub type FetchId = u64;

/// A picked file: display name plus its full content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,
    pub content: Bytes,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading { upload_id: UploadId },
}

/// Result of the most recent completed upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadOutcome {
    Succeeded,
    Failed,
}

/// Everything one session knows. Only [`crate::update`] mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionState {
    initialized: bool,
    /// `None` is "none selected"; never holds an empty vector.
    selected: Option<Vec<FileHandle>>,
    upload: UploadStatus,
    next_upload_id: UploadId,
    last_upload: Option<UploadOutcome>,
    /// Sorted snapshot of the backend registry.
    registry: Vec<String>,
    next_fetch_id: FetchId,
    /// Newest fetch whose result reached the registry; 0 before the first.
    applied_fetch_id: FetchId,
    pending_fetches: u32,
    purge_in_flight: bool,
    #[serde(skip)]
    dirty: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let idle = self.upload == UploadStatus::Idle;
        AppViewModel {
            upload_status: self.upload,
            pending_selection: pending_selection_view(self.selected.as_deref()),
            ingested_list: ingested_list_view(&self.registry, self.purge_in_flight),
            can_submit: idle && self.selected.is_some(),
            can_cancel: !idle,
            last_upload: self.last_upload,
            dirty: self.dirty,
        }
    }

    pub fn selected_files(&self) -> Option<&[FileHandle]> {
        self.selected.as_deref()
    }

    pub fn upload_status(&self) -> UploadStatus {
        self.upload
    }

    pub fn registry(&self) -> &[String] {
        &self.registry
    }

    pub fn last_upload(&self) -> Option<UploadOutcome> {
        self.last_upload
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_purging(&self) -> bool {
        self.purge_in_flight
    }

    /// True when no backend call issued by this session is still outstanding.
    pub fn is_settled(&self) -> bool {
        self.upload == UploadStatus::Idle && !self.purge_in_flight && self.pending_fetches == 0
    }

    /// Returns whether the view changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    pub(crate) fn select(&mut self, files: Vec<FileHandle>) {
        self.selected = if files.is_empty() { None } else { Some(files) };
        self.dirty = true;
    }

    /// Moves to `Uploading` and returns the new upload id with a copy of the
    /// selection, or `None` if the precondition does not hold.
    pub(crate) fn begin_upload(&mut self) -> Option<(UploadId, Vec<FileHandle>)> {
        if self.upload != UploadStatus::Idle {
            return None;
        }
        let files = self.selected.clone()?;
        self.next_upload_id += 1;
        let upload_id = self.next_upload_id;
        self.upload = UploadStatus::Uploading { upload_id };
        self.dirty = true;
        Some((upload_id, files))
    }

    /// Unwinds to idle with no selection. Returns `false` for a completion that
    /// does not belong to the in-flight upload.
    pub(crate) fn finish_upload(&mut self, upload_id: UploadId, outcome: UploadOutcome) -> bool {
        if self.upload != (UploadStatus::Uploading { upload_id }) {
            return false;
        }
        self.upload = UploadStatus::Idle;
        self.selected = None;
        self.last_upload = Some(outcome);
        self.dirty = true;
        true
    }

    pub(crate) fn begin_purge(&mut self) -> bool {
        if self.purge_in_flight {
            return false;
        }
        self.purge_in_flight = true;
        self.dirty = true;
        true
    }

    pub(crate) fn finish_purge(&mut self) -> bool {
        if !self.purge_in_flight {
            return false;
        }
        self.purge_in_flight = false;
        self.dirty = true;
        true
    }

    pub(crate) fn begin_fetch(&mut self) -> FetchId {
        self.pending_fetches += 1;
        self.next_fetch_id += 1;
        self.next_fetch_id
    }

    /// Settles one outstanding fetch. Returns `false` when a newer snapshot
    /// has already been applied and this result must be dropped.
    pub(crate) fn finish_fetch(&mut self, fetch_id: FetchId) -> bool {
        self.pending_fetches = self.pending_fetches.saturating_sub(1);
        if fetch_id <= self.applied_fetch_id {
            return false;
        }
        self.applied_fetch_id = fetch_id;
        true
    }

    pub(crate) fn replace_registry(&mut self, names: Vec<String>) {
        self.registry = sort_registry(names);
        self.dirty = true;
    }
}
