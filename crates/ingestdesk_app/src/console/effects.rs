use std::sync::mpsc;
use std::thread;

use ingestdesk_core::{Effect, FileHandle, Msg, UploadResult};
use ingestdesk_engine::{
    BackendError, EngineEvent, EngineEvents, EngineHandle, FailureKind, UploadDocument,
};
use ingestdesk_logging::{desk_debug, desk_info, desk_warn};

use super::app::AppInput;

/// Executes backend effects on the engine. Notifications are not handled here.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    /// Wires the engine's completion events back into the app's input channel.
    pub fn new(
        engine: EngineHandle,
        events: EngineEvents,
        input_tx: mpsc::Sender<AppInput>,
    ) -> Self {
        spawn_event_forwarder(events, input_tx);
        Self { engine }
    }

    pub fn run(&self, effect: Effect) {
        match effect {
            Effect::FetchRegistry { fetch_id } => {
                desk_debug!("FetchRegistry fetch_id={}", fetch_id);
                self.engine.fetch_registry(fetch_id);
            }
            Effect::UploadFiles { upload_id, files } => {
                desk_info!(
                    "UploadFiles upload_id={} files={}",
                    upload_id,
                    files.len()
                );
                self.engine
                    .upload(upload_id, files.into_iter().map(to_document).collect());
            }
            Effect::CancelUpload { upload_id } => {
                desk_info!("CancelUpload upload_id={}", upload_id);
                self.engine.cancel_upload(upload_id);
            }
            Effect::PurgeAll => {
                desk_info!("PurgeAll");
                self.engine.purge();
            }
            Effect::Notify(notification) => {
                desk_warn!(
                    "notification reached the effect runner: {}",
                    notification.message
                );
            }
        }
    }
}

fn to_document(file: FileHandle) -> UploadDocument {
    UploadDocument::new(file.name, file.content)
}

pub(crate) fn to_file_handle(document: UploadDocument) -> FileHandle {
    FileHandle::new(document.file_name, document.content)
}

fn spawn_event_forwarder(events: EngineEvents, input_tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if input_tx.send(AppInput::Msg(map_event(event))).is_err() {
                break;
            }
        }
    });
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::RegistryFetched { fetch_id, result } => Msg::RegistryFetched {
            fetch_id,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::UploadCompleted { upload_id, result } => Msg::UploadFinished {
            upload_id,
            result: match result {
                Ok(receipt) => {
                    desk_debug!("upload {} accepted: {}", upload_id, receipt.body);
                    UploadResult::Accepted
                }
                Err(err) => map_upload_failure(err),
            },
        },
        EngineEvent::PurgeCompleted { result } => Msg::PurgeFinished {
            result: result.map_err(|err| err.to_string()),
        },
    }
}

fn map_upload_failure(err: BackendError) -> UploadResult {
    match err.kind {
        FailureKind::HttpStatus(status) => UploadResult::Rejected {
            status,
            detail: err.body,
        },
        FailureKind::Cancelled => UploadResult::Cancelled,
        _ => UploadResult::TransportFailed {
            reason: err.to_string(),
        },
    }
}
