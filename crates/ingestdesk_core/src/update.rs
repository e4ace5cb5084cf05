use crate::{
    Effect, Msg, Notification, SessionState, UploadId, UploadOutcome, UploadResult, UploadStatus,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: SessionState, msg: Msg) -> (SessionState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted => {
            if state.is_initialized() {
                Vec::new()
            } else {
                state.mark_initialized();
                vec![request_fetch(&mut state)]
            }
        }
        Msg::FilesSelected(files) => {
            // Allowed while uploading; the new selection is simply not submittable
            // until the in-flight upload resolves (and is then cleared with it).
            state.select(files);
            Vec::new()
        }
        Msg::UploadClicked => match state.begin_upload() {
            Some((upload_id, files)) => vec![Effect::UploadFiles { upload_id, files }],
            None => Vec::new(),
        },
        Msg::CancelUploadClicked => match state.upload_status() {
            UploadStatus::Uploading { upload_id } => vec![Effect::CancelUpload { upload_id }],
            UploadStatus::Idle => Vec::new(),
        },
        Msg::RefreshClicked => vec![request_fetch(&mut state)],
        Msg::PurgeClicked => {
            if state.begin_purge() {
                vec![Effect::PurgeAll]
            } else {
                Vec::new()
            }
        }
        Msg::UploadFinished { upload_id, result } => {
            apply_upload_result(&mut state, upload_id, result)
        }
        Msg::PurgeFinished { result } => {
            if !state.finish_purge() {
                return (state, Vec::new());
            }
            let mut effects = Vec::with_capacity(2);
            if let Err(reason) = result {
                effects.push(Effect::Notify(Notification::error(format!(
                    "Error removing ingested files: {reason}"
                ))));
            }
            effects.push(request_fetch(&mut state));
            effects
        }
        Msg::RegistryFetched { fetch_id, result } => {
            if !state.finish_fetch(fetch_id) {
                return (state, Vec::new());
            }
            apply_registry(&mut state, result)
        }
    };

    (state, effects)
}

fn apply_registry(state: &mut SessionState, result: Result<Vec<String>, String>) -> Vec<Effect> {
    match result {
        Ok(names) => {
            state.replace_registry(names);
            Vec::new()
        }
        Err(reason) => {
            state.replace_registry(Vec::new());
            vec![Effect::Notify(Notification::error(format!(
                "Could not load ingested files: {reason}"
            )))]
        }
    }
}

fn apply_upload_result(
    state: &mut SessionState,
    upload_id: UploadId,
    result: UploadResult,
) -> Vec<Effect> {
    let (outcome, notification) = match result {
        UploadResult::Accepted => (
            UploadOutcome::Succeeded,
            Notification::success("Document upload successful"),
        ),
        UploadResult::Rejected { status, detail } => {
            let message = match detail.as_deref().map(str::trim) {
                Some(text) if !text.is_empty() => {
                    format!("Error uploading document (HTTP {status}): {text}")
                }
                _ => format!("Error uploading document (HTTP {status})"),
            };
            (UploadOutcome::Failed, Notification::error(message))
        }
        UploadResult::TransportFailed { .. } => (
            UploadOutcome::Failed,
            Notification::error("Error uploading document"),
        ),
        UploadResult::Cancelled => (
            UploadOutcome::Failed,
            Notification::error("Document upload cancelled"),
        ),
    };

    if !state.finish_upload(upload_id, outcome) {
        return Vec::new();
    }
    vec![Effect::Notify(notification), request_fetch(state)]
}

fn request_fetch(state: &mut SessionState) -> Effect {
    Effect::FetchRegistry {
        fetch_id: state.begin_fetch(),
    }
}
