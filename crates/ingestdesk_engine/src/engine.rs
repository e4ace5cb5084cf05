use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use ingestdesk_logging::{desk_debug, desk_info, desk_warn};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::backend::{BackendSettings, IngestionBackend, ReqwestBackend};
use crate::{BackendError, EngineEvent, FetchId, UploadDocument, UploadId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(std::io::Error),
    #[error("failed to spawn engine thread: {0}")]
    Thread(std::io::Error),
    #[error("backend setup failed: {0}")]
    Backend(#[from] BackendError),
}

enum EngineCommand {
    FetchRegistry {
        fetch_id: FetchId,
    },
    Upload {
        upload_id: UploadId,
        documents: Vec<UploadDocument>,
    },
    CancelUpload {
        upload_id: UploadId,
    },
    Purge,
}

type ActiveUploads = Arc<Mutex<HashMap<UploadId, CancellationToken>>>;

/// Sends backend work to the engine thread. Cheap to clone.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Receiving side for [`EngineEvent`]s, one per completed backend call.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn with_settings(settings: BackendSettings) -> Result<(Self, EngineEvents), EngineError> {
        let backend = ReqwestBackend::new(settings)?;
        Self::spawn(Arc::new(backend))
    }

    /// Starts the engine thread and its runtime. The thread exits once every
    /// handle has been dropped.
    pub fn spawn(
        backend: Arc<dyn IngestionBackend>,
    ) -> Result<(Self, EngineEvents), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(EngineError::Runtime)?;

        thread::Builder::new()
            .name("ingestdesk-engine".to_string())
            .spawn(move || {
                let active: ActiveUploads = Arc::default();
                while let Ok(command) = cmd_rx.recv() {
                    dispatch(&runtime, &backend, &active, &event_tx, command);
                }
                desk_debug!("engine command channel closed");
            })
            .map_err(EngineError::Thread)?;

        Ok((Self { cmd_tx }, EngineEvents { event_rx }))
    }

    /// The resulting event echoes `fetch_id` so the caller can order snapshots.
    pub fn fetch_registry(&self, fetch_id: FetchId) {
        self.send(EngineCommand::FetchRegistry { fetch_id });
    }

    pub fn upload(&self, upload_id: UploadId, documents: Vec<UploadDocument>) {
        self.send(EngineCommand::Upload {
            upload_id,
            documents,
        });
    }

    pub fn cancel_upload(&self, upload_id: UploadId) {
        self.send(EngineCommand::CancelUpload { upload_id });
    }

    pub fn purge(&self) {
        self.send(EngineCommand::Purge);
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            desk_warn!("engine thread is gone; command dropped");
        }
    }
}

impl EngineEvents {
    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Blocks until the next event. `None` once the engine has shut down.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

fn dispatch(
    runtime: &Runtime,
    backend: &Arc<dyn IngestionBackend>,
    active: &ActiveUploads,
    event_tx: &mpsc::Sender<EngineEvent>,
    command: EngineCommand,
) {
    let backend = backend.clone();
    let event_tx = event_tx.clone();
    match command {
        EngineCommand::FetchRegistry { fetch_id } => {
            runtime.spawn(async move {
                let result = backend.list_ingested().await;
                if let Err(err) = &result {
                    desk_warn!("registry fetch {} failed: {}", fetch_id, err);
                }
                let _ = event_tx.send(EngineEvent::RegistryFetched { fetch_id, result });
            });
        }
        EngineCommand::Upload {
            upload_id,
            documents,
        } => {
            // Registered before the task starts so an immediate cancel is not lost.
            let token = CancellationToken::new();
            lock_active(active).insert(upload_id, token.clone());
            let active = active.clone();
            runtime.spawn(async move {
                let result = tokio::select! {
                    _ = token.cancelled() => Err(BackendError::cancelled()),
                    result = backend.upload(documents) => result,
                };
                lock_active(&active).remove(&upload_id);
                if let Err(err) = &result {
                    desk_warn!("upload {} failed: {}", upload_id, err);
                }
                let _ = event_tx.send(EngineEvent::UploadCompleted { upload_id, result });
            });
        }
        EngineCommand::CancelUpload { upload_id } => cancel_upload(active, upload_id),
        EngineCommand::Purge => {
            runtime.spawn(async move {
                let result = backend.purge().await;
                if let Err(err) = &result {
                    desk_warn!("purge failed: {}", err);
                }
                let _ = event_tx.send(EngineEvent::PurgeCompleted { result });
            });
        }
    }
}

fn lock_active(active: &ActiveUploads) -> MutexGuard<'_, HashMap<UploadId, CancellationToken>> {
    active.lock().unwrap_or_else(PoisonError::into_inner)
}

fn cancel_upload(active: &ActiveUploads, upload_id: UploadId) {
    match lock_active(active).get(&upload_id) {
        Some(token) => {
            desk_info!("cancelling upload {}", upload_id);
            token.cancel();
        }
        None => desk_debug!("cancel for unknown upload {}", upload_id),
    }
}
