use std::sync::Once;

use ingestdesk_core::{
    update, Effect, FileHandle, Msg, Notification, NotificationLevel, SessionState, UploadOutcome,
    UploadResult, UploadStatus,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(ingestdesk_logging::initialize_for_tests);
}

fn file(name: &str) -> FileHandle {
    FileHandle::new(name, format!("contents of {name}").into_bytes())
}

fn select(state: SessionState, names: &[&str]) -> SessionState {
    let files = names.iter().map(|name| file(name)).collect();
    let (state, effects) = update(state, Msg::FilesSelected(files));
    assert!(effects.is_empty());
    state
}

fn selected_names(state: &SessionState) -> Option<Vec<String>> {
    state
        .selected_files()
        .map(|files| files.iter().map(|f| f.name.clone()).collect())
}

fn count_fetches(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, Effect::FetchRegistry { .. }))
        .count()
}

fn notifications(effects: &[Effect]) -> Vec<Notification> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Notify(notification) => Some(notification.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn mounted_fetches_registry_once() {
    init_logging();
    let (state, effects) = update(SessionState::new(), Msg::Mounted);
    assert_eq!(effects, vec![Effect::FetchRegistry { fetch_id: 1 }]);
    assert!(!state.is_settled());

    let (_state, effects) = update(state, Msg::Mounted);
    assert!(effects.is_empty());
}

#[test]
fn second_selection_replaces_the_first() {
    init_logging();
    let state = select(SessionState::new(), &["a.pdf", "b.pdf"]);
    let mut state = select(state, &["c.txt"]);

    assert_eq!(selected_names(&state), Some(vec!["c.txt".to_string()]));
    assert!(state.consume_dirty());
}

#[test]
fn empty_selection_means_none_selected() {
    init_logging();
    let state = select(SessionState::new(), &["a.pdf"]);
    let state = select(state, &[]);

    assert_eq!(state.selected_files(), None);
    assert_eq!(state.view().pending_selection, None);
    assert!(!state.view().can_submit);
}

#[test]
fn submit_packages_the_whole_selection() {
    init_logging();
    let state = select(SessionState::new(), &["a.pdf", "b.pdf"]);
    assert!(state.view().can_submit);

    let (state, effects) = update(state, Msg::UploadClicked);

    assert_eq!(
        effects,
        vec![Effect::UploadFiles {
            upload_id: 1,
            files: vec![file("a.pdf"), file("b.pdf")],
        }]
    );
    assert_eq!(
        state.upload_status(),
        UploadStatus::Uploading { upload_id: 1 }
    );
    let view = state.view();
    assert!(!view.can_submit);
    assert!(view.can_cancel);
    // The selection stays visible while the upload is in flight.
    assert_eq!(
        view.pending_selection.unwrap().file_names,
        vec!["a.pdf".to_string(), "b.pdf".to_string()]
    );
}

#[test]
fn no_double_submit_while_uploading() {
    init_logging();
    let state = select(SessionState::new(), &["a.pdf"]);
    let (state, _effects) = update(state, Msg::UploadClicked);

    let (state, effects) = update(state, Msg::UploadClicked);
    assert!(effects.is_empty());

    // A fresh selection during the upload is accepted but still not submittable.
    let state = select(state, &["b.pdf"]);
    let (state, effects) = update(state, Msg::UploadClicked);
    assert!(effects.is_empty());
    assert_eq!(
        state.upload_status(),
        UploadStatus::Uploading { upload_id: 1 }
    );
}

#[test]
fn successful_upload_notifies_clears_and_refreshes() {
    init_logging();
    let state = select(SessionState::new(), &["report.pdf"]);
    let (state, _effects) = update(state, Msg::UploadClicked);

    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            upload_id: 1,
            result: UploadResult::Accepted,
        },
    );

    assert_eq!(
        effects,
        vec![
            Effect::Notify(Notification::success("Document upload successful")),
            Effect::FetchRegistry { fetch_id: 1 },
        ]
    );
    assert_eq!(state.selected_files(), None);
    assert_eq!(state.upload_status(), UploadStatus::Idle);
    assert_eq!(state.last_upload(), Some(UploadOutcome::Succeeded));
}

#[test]
fn rejected_upload_includes_backend_text() {
    init_logging();
    let state = select(SessionState::new(), &["a.pdf", "b.pdf"]);
    let (state, _effects) = update(state, Msg::UploadClicked);

    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            upload_id: 1,
            result: UploadResult::Rejected {
                status: 500,
                detail: Some("disk full".to_string()),
            },
        },
    );

    let notes = notifications(&effects);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    assert!(notes[0].message.contains("disk full"));
    assert_eq!(count_fetches(&effects), 1);
    assert_eq!(state.selected_files(), None);
    assert_eq!(state.upload_status(), UploadStatus::Idle);
    assert_eq!(state.last_upload(), Some(UploadOutcome::Failed));
}

#[test]
fn rejected_upload_without_readable_body_still_notifies() {
    init_logging();
    let state = select(SessionState::new(), &["a.pdf"]);
    let (state, _effects) = update(state, Msg::UploadClicked);

    let (_state, effects) = update(
        state,
        Msg::UploadFinished {
            upload_id: 1,
            result: UploadResult::Rejected {
                status: 502,
                detail: None,
            },
        },
    );

    assert_eq!(
        notifications(&effects),
        vec![Notification::error("Error uploading document (HTTP 502)")]
    );
}

#[test]
fn transport_failure_unwinds_like_any_failure() {
    init_logging();
    let state = select(SessionState::new(), &["a.pdf"]);
    let (state, _effects) = update(state, Msg::UploadClicked);

    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            upload_id: 1,
            result: UploadResult::TransportFailed {
                reason: "connection refused".to_string(),
            },
        },
    );

    assert_eq!(
        effects,
        vec![
            Effect::Notify(Notification::error("Error uploading document")),
            Effect::FetchRegistry { fetch_id: 1 },
        ]
    );
    assert_eq!(state.selected_files(), None);
    assert_eq!(state.upload_status(), UploadStatus::Idle);

    // The session stays usable.
    let state = select(state, &["retry.pdf"]);
    let (_state, effects) = update(state, Msg::UploadClicked);
    assert_eq!(
        effects,
        vec![Effect::UploadFiles {
            upload_id: 2,
            files: vec![file("retry.pdf")],
        }]
    );
}

#[test]
fn selection_made_during_upload_is_cleared_on_completion() {
    init_logging();
    let state = select(SessionState::new(), &["a.pdf"]);
    let (state, _effects) = update(state, Msg::UploadClicked);
    let state = select(state, &["late.pdf"]);

    let (state, _effects) = update(
        state,
        Msg::UploadFinished {
            upload_id: 1,
            result: UploadResult::Accepted,
        },
    );
    assert_eq!(state.selected_files(), None);
}

#[test]
fn cancel_requests_cancellation_of_the_inflight_upload() {
    init_logging();
    let state = select(SessionState::new(), &["big.iso"]);
    let (state, _effects) = update(state, Msg::UploadClicked);

    let (state, effects) = update(state, Msg::CancelUploadClicked);
    assert_eq!(effects, vec![Effect::CancelUpload { upload_id: 1 }]);
    // Cancelling is only a request; the status changes when the upload resolves.
    assert_eq!(
        state.upload_status(),
        UploadStatus::Uploading { upload_id: 1 }
    );

    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            upload_id: 1,
            result: UploadResult::Cancelled,
        },
    );
    assert_eq!(
        notifications(&effects),
        vec![Notification::error("Document upload cancelled")]
    );
    assert_eq!(count_fetches(&effects), 1);
    assert_eq!(state.upload_status(), UploadStatus::Idle);
}

#[test]
fn stale_upload_completion_is_ignored() {
    init_logging();
    let state = select(SessionState::new(), &["a.pdf"]);
    let (state, _effects) = update(state, Msg::UploadClicked);

    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            upload_id: 99,
            result: UploadResult::Accepted,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.upload_status(),
        UploadStatus::Uploading { upload_id: 1 }
    );
}
