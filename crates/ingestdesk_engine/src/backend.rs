use std::time::Duration;

use ingestdesk_logging::{desk_debug, desk_info, desk_warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, Url};
use serde::Deserialize;

use crate::{BackendError, FailureKind, UploadDocument, UploadReceipt};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5555";

const LIST_ENDPOINT: &str = "get_ingested_files";
const UPLOAD_ENDPOINT: &str = "upload_files";
const PURGE_ENDPOINT: &str = "purge";
/// Multipart part name repeated once per uploaded file.
pub const UPLOAD_FIELD: &str = "documents";

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// `None` lets a request wait for the backend indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// The three operations the ingestion service exposes.
#[async_trait::async_trait]
pub trait IngestionBackend: Send + Sync {
    async fn list_ingested(&self) -> Result<Vec<String>, BackendError>;

    async fn upload(&self, documents: Vec<UploadDocument>) -> Result<UploadReceipt, BackendError>;

    async fn purge(&self) -> Result<(), BackendError>;
}

#[derive(Debug, Deserialize)]
struct IngestedFilesResponse {
    ingested_files: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let mut base_url = Url::parse(&settings.base_url)
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }
        // Endpoints are joined relative to the base path.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, name: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(name)
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl IngestionBackend for ReqwestBackend {
    async fn list_ingested(&self) -> Result<Vec<String>, BackendError> {
        let url = self.endpoint(LIST_ENDPOINT)?;
        desk_debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;

        let text = response.text().await.map_err(map_reqwest_error)?;
        let parsed: IngestedFilesResponse = serde_json::from_str(&text)
            .map_err(|err| BackendError::new(FailureKind::MalformedResponse, err.to_string()))?;
        desk_debug!("registry holds {} file(s)", parsed.ingested_files.len());
        Ok(parsed.ingested_files)
    }

    async fn upload(&self, documents: Vec<UploadDocument>) -> Result<UploadReceipt, BackendError> {
        let url = self.endpoint(UPLOAD_ENDPOINT)?;
        let count = documents.len();
        let mut form = Form::new();
        for document in documents {
            let length = document.content.len() as u64;
            let part = Part::stream_with_length(document.content, length)
                .file_name(document.file_name)
                .mime_str("application/octet-stream")
                .map_err(map_reqwest_error)?;
            form = form.part(UPLOAD_FIELD, part);
        }

        desk_info!("POST {} with {} document(s)", url, count);
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;

        let status = response.status().as_u16();
        // The success payload is opaque; an unreadable body does not turn it into a failure.
        let body = response.text().await.unwrap_or_default();
        Ok(UploadReceipt { status, body })
    }

    async fn purge(&self) -> Result<(), BackendError> {
        let url = self.endpoint(PURGE_ENDPOINT)?;
        desk_info!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.ok().filter(|text| !text.is_empty());
    desk_warn!(
        "backend answered {} (body: {})",
        status,
        body.as_deref().unwrap_or("<none>")
    );
    Err(
        BackendError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
            .with_body(body),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}
