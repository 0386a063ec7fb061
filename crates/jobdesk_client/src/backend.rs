use std::time::Duration;

use bytes::Bytes;
use jobdesk_core::{
    ApplicationRecord, ApplyJob, ApplyReceipt, DraftRecord, HealthReport, JobPosting, OpaqueId,
    SearchRequest, TailorResult,
};
use jobdesk_logging::desk_debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::{ClientError, FailureKind, Operation};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Per-request timeout. `None` leaves hung requests to the transport.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// The job-search / auto-apply backend.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn list_applications(&self) -> Result<Vec<ApplicationRecord>, ClientError>;

    async fn enqueue_apply(&self, jobs: &[ApplyJob]) -> Result<ApplyReceipt, ClientError>;

    async fn search_jobs(&self, request: &SearchRequest) -> Result<Vec<JobPosting>, ClientError>;

    async fn tailor(&self, job: &JobPosting) -> Result<TailorResult, ClientError>;

    /// Response is opaque; callers re-fetch the drafts list.
    async fn create_draft(&self, job: &JobPosting) -> Result<serde_json::Value, ClientError>;

    async fn list_drafts(&self) -> Result<Vec<DraftRecord>, ClientError>;

    async fn resume_draft(&self, id: &OpaqueId) -> Result<serde_json::Value, ClientError>;

    async fn delete_draft(&self, id: &OpaqueId) -> Result<serde_json::Value, ClientError>;

    async fn health(&self) -> Result<HealthReport, ClientError>;
}

#[derive(Serialize)]
struct JobEnvelope<'a> {
    job: &'a JobPosting,
}

#[derive(Serialize)]
struct ApplyEnvelope<'a> {
    jobs: &'a [ApplyJob],
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    base_url: Url,
    client: reqwest::Client,
    settings: ClientSettings,
}

impl ReqwestBackend {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let base_url = Url::parse(settings.base_url.trim()).map_err(|err| {
            ClientError::new(Operation::Health, FailureKind::InvalidUrl, err.to_string())
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::new(
                Operation::Health,
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be used as a base url"),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| {
                ClientError::new(Operation::Health, FailureKind::Network, err.to_string())
            })?;

        Ok(Self {
            base_url,
            client,
            settings,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, operation: Operation, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::new(operation, FailureKind::InvalidUrl, "base url has no path")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        operation: Operation,
        method: reqwest::Method,
        segments: &[&str],
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let url = self.endpoint(operation, segments)?;
        desk_debug!("{method} {url}");
        let mut builder = self.client.request(method, url);
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder)
    }

    async fn send(
        &self,
        operation: Operation,
        builder: reqwest::RequestBuilder,
    ) -> Result<Bytes, ClientError> {
        let response = builder
            .send()
            .await
            .map_err(|err| map_reqwest_error(operation, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::new(
                operation,
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        response
            .bytes()
            .await
            .map_err(|err| map_reqwest_error(operation, err))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let body = self.send(operation, builder).await?;
        decode_body(operation, &body)
    }

    async fn send_opaque(
        &self,
        operation: Operation,
        builder: reqwest::RequestBuilder,
    ) -> Result<serde_json::Value, ClientError> {
        let body = self.send(operation, builder).await?;
        Ok(serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn list_applications(&self) -> Result<Vec<ApplicationRecord>, ClientError> {
        let op = Operation::ListApplications;
        let builder = self.request(op, reqwest::Method::GET, &["applications"])?;
        self.send_json(op, builder).await
    }

    async fn enqueue_apply(&self, jobs: &[ApplyJob]) -> Result<ApplyReceipt, ClientError> {
        let op = Operation::EnqueueApply;
        let builder = self
            .request(op, reqwest::Method::POST, &["apply"])?
            .json(&ApplyEnvelope { jobs });
        self.send_json(op, builder).await
    }

    async fn search_jobs(&self, request: &SearchRequest) -> Result<Vec<JobPosting>, ClientError> {
        let op = Operation::SearchJobs;
        let builder = self
            .request(op, reqwest::Method::POST, &["search", "jobs"])?
            .json(request);
        self.send_json(op, builder).await
    }

    async fn tailor(&self, job: &JobPosting) -> Result<TailorResult, ClientError> {
        let op = Operation::Tailor;
        let builder = self
            .request(op, reqwest::Method::POST, &["jobs", "tailor"])?
            .json(&JobEnvelope { job });
        self.send_json(op, builder).await
    }

    async fn create_draft(&self, job: &JobPosting) -> Result<serde_json::Value, ClientError> {
        let op = Operation::CreateDraft;
        let builder = self
            .request(op, reqwest::Method::POST, &["applications", "draft"])?
            .json(&JobEnvelope { job });
        self.send_opaque(op, builder).await
    }

    async fn list_drafts(&self) -> Result<Vec<DraftRecord>, ClientError> {
        let op = Operation::ListDrafts;
        let builder = self.request(op, reqwest::Method::GET, &["applications", "drafts"])?;
        self.send_json(op, builder).await
    }

    async fn resume_draft(&self, id: &OpaqueId) -> Result<serde_json::Value, ClientError> {
        let op = Operation::ResumeDraft;
        let id = id.to_string();
        let builder = self.request(op, reqwest::Method::POST, &["applications", "resume", &id])?;
        self.send_opaque(op, builder).await
    }

    async fn delete_draft(&self, id: &OpaqueId) -> Result<serde_json::Value, ClientError> {
        let op = Operation::DeleteDraft;
        let id = id.to_string();
        let builder = self.request(op, reqwest::Method::DELETE, &["applications", &id])?;
        self.send_opaque(op, builder).await
    }

    async fn health(&self) -> Result<HealthReport, ClientError> {
        let op = Operation::Health;
        let builder = self.request(op, reqwest::Method::GET, &["health"])?;
        self.send_json(op, builder).await
    }
}

/// Bodies that do not match the expected shape (for example an object where
/// a list is expected) are reported as [`FailureKind::MalformedBody`].
fn decode_body<T: DeserializeOwned>(operation: Operation, body: &[u8]) -> Result<T, ClientError> {
    serde_json::from_slice(body)
        .map_err(|err| ClientError::new(operation, FailureKind::MalformedBody, err.to_string()))
}

fn map_reqwest_error(operation: Operation, err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(operation, FailureKind::Timeout, err.to_string());
    }
    ClientError::new(operation, FailureKind::Network, err.to_string())
}
