#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The controlling view was mounted; loads the registry once per session.
    Mounted,
    /// The file picker produced a new selection (replaces the previous one).
    FilesSelected(Vec<crate::FileHandle>),
    /// User asked to ingest the pending selection.
    UploadClicked,
    /// User asked to abort the in-flight upload.
    CancelUploadClicked,
    /// User asked for a fresh registry snapshot.
    RefreshClicked,
    /// User clicked "Remove all ingested files".
    PurgeClicked,
    /// Backend resolved an upload.
    UploadFinished {
        upload_id: crate::UploadId,
        result: UploadResult,
    },
    /// Backend resolved a purge. `Err` carries a human-readable reason.
    PurgeFinished { result: Result<(), String> },
    /// Backend resolved a registry fetch. `Err` carries a human-readable reason.
    RegistryFetched {
        fetch_id: crate::FetchId,
        result: Result<Vec<String>, String>,
    },
}

/// How an upload attempt ended, as seen by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    /// Backend answered with a success status.
    Accepted,
    /// Backend answered with a non-success status. `detail` is the response
    /// text when it could be read.
    Rejected { status: u16, detail: Option<String> },
    /// The request never produced a response.
    TransportFailed { reason: String },
    Cancelled,
}
