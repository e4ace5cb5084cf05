//! Ingestdesk core: pure session state machine and view-model helpers.
mod effect;
mod msg;
mod registry;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Notification, NotificationLevel};
pub use msg::{Msg, UploadResult};
pub use registry::sort_registry;
pub use state::{FetchId, FileHandle, SessionState, UploadId, UploadOutcome, UploadStatus};
pub use update::update;
pub use view_model::{
    ingested_list_view, pending_selection_view, AppViewModel, IngestedListView,
    PendingSelectionView,
};
