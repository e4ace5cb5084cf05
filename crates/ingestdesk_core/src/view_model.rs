use crate::{FileHandle, UploadOutcome, UploadStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub upload_status: UploadStatus,
    /// `None` renders nothing.
    pub pending_selection: Option<PendingSelectionView>,
    /// `None` renders neither the list nor the purge control.
    pub ingested_list: Option<IngestedListView>,
    pub can_submit: bool,
    pub can_cancel: bool,
    pub last_upload: Option<UploadOutcome>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSelectionView {
    pub file_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedListView {
    pub file_names: Vec<String>,
    /// The purge control is always shown with the list; it is disabled while a
    /// purge is pending.
    pub purge_enabled: bool,
}

pub fn pending_selection_view(selected: Option<&[FileHandle]>) -> Option<PendingSelectionView> {
    let files = selected.filter(|files| !files.is_empty())?;
    Some(PendingSelectionView {
        file_names: files.iter().map(|file| file.name.clone()).collect(),
    })
}

pub fn ingested_list_view(registry: &[String], purge_in_flight: bool) -> Option<IngestedListView> {
    if registry.is_empty() {
        return None;
    }
    Some(IngestedListView {
        file_names: registry.to_vec(),
        purge_enabled: !purge_in_flight,
    })
}
