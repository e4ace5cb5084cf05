use chrono::NaiveTime;
use ingestdesk_core::{
    AppViewModel, IngestedListView, Notification, NotificationLevel, PendingSelectionView,
    UploadOutcome, UploadStatus,
};

/// Renders the whole session view as terminal lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    match view.upload_status {
        UploadStatus::Idle => {
            let last = match view.last_upload {
                Some(UploadOutcome::Succeeded) => " (last upload succeeded)",
                Some(UploadOutcome::Failed) => " (last upload failed)",
                None => "",
            };
            lines.push(format!("Upload: idle{last}"));
        }
        UploadStatus::Uploading { upload_id } => {
            lines.push(format!("Upload: uploading #{upload_id}... (`cancel` to abort)"));
        }
    }

    if let Some(selection) = &view.pending_selection {
        lines.extend(render_selection(selection));
        if view.can_submit {
            lines.push("  run `ingest` to upload".to_string());
        }
    }
    if let Some(list) = &view.ingested_list {
        lines.extend(render_ingested(list));
    }
    lines
}

fn render_selection(selection: &PendingSelectionView) -> Vec<String> {
    let mut lines = vec!["File(s) selected:".to_string()];
    lines.extend(selection.file_names.iter().map(|name| format!("  - {name}")));
    lines
}

fn render_ingested(list: &IngestedListView) -> Vec<String> {
    let mut lines = vec![format!("Ingested files ({}):", list.file_names.len())];
    lines.extend(list.file_names.iter().map(|name| format!("  - {name}")));
    if list.purge_enabled {
        lines.push("  run `purge` to remove all ingested files".to_string());
    } else {
        lines.push("  removing all ingested files...".to_string());
    }
    lines
}

pub fn format_notification(notification: &Notification, at: NaiveTime) -> String {
    let tag = match notification.level {
        NotificationLevel::Success => "OK ",
        NotificationLevel::Error => "ERR",
    };
    format!("[{}] {tag} {}", at.format("%H:%M:%S"), notification.message)
}
