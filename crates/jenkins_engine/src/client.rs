use std::time::Duration;

use jenkins_core::{JobConfig, JobStatus};
use jenkins_logging::{jenkins_debug, jenkins_warn};
use serde::Deserialize;

const API_SUFFIX: &str = "/api/json";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Largest `api/json` body accepted; anything bigger fails the poll.
    pub max_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 1024 * 1024,
        }
    }
}

/// Everything needed for one poll of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRequest {
    pub url: String,
    /// Basic auth is only sent when this is non-empty.
    pub username: String,
    pub password: String,
    /// `false` skips certificate verification for this request only.
    pub strict_tls: bool,
}

impl StatusRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: String::new(),
            password: String::new(),
            strict_tls: true,
        }
    }

    pub fn for_job(config: &JobConfig) -> Self {
        Self {
            url: config.url.clone(),
            username: config.username_or_empty().to_string(),
            password: config.password_or_empty().to_string(),
            strict_tls: config.verifies_tls(),
        }
    }

    fn api_url(&self) -> String {
        format!("{}{API_SUFFIX}", self.url.trim_end_matches('/'))
    }
}

/// Polls a job endpoint. Implementations never fail: every error is folded
/// into the returned `JobStatus`.
#[async_trait::async_trait]
pub trait StatusClient: Send + Sync {
    async fn fetch_status(&self, request: &StatusRequest) -> JobStatus;
}

#[derive(Debug, thiserror::Error)]
enum PollError {
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Body(#[from] serde_json::Error),
    #[error("response too large (limit {max_bytes} bytes, got {actual})")]
    TooLarge { max_bytes: u64, actual: u64 },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobResponse {
    color: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    last_build: Option<LastBuild>,
}

#[derive(Debug, Deserialize)]
struct LastBuild {
    number: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestStatusClient {
    settings: ClientSettings,
}

impl ReqwestStatusClient {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self, strict_tls: bool) -> Result<reqwest::Client, PollError> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .danger_accept_invalid_certs(!strict_tls)
            .build()?;
        Ok(client)
    }

    async fn read_body(&self, mut response: reqwest::Response) -> Result<Vec<u8>, PollError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(actual) = response.content_length() {
            if actual > max_bytes {
                return Err(PollError::TooLarge { max_bytes, actual });
            }
        }
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let actual = body.len() as u64 + chunk.len() as u64;
            if actual > max_bytes {
                return Err(PollError::TooLarge { max_bytes, actual });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    async fn poll(&self, request: &StatusRequest) -> Result<JobStatus, PollError> {
        let api_url = request.api_url();
        let parsed = url::Url::parse(&api_url).map_err(|source| PollError::InvalidUrl {
            url: api_url.clone(),
            source,
        })?;
        let client = self.build_client(request.strict_tls)?;

        let mut builder = client.get(parsed);
        if !request.username.is_empty() {
            builder = builder.basic_auth(&request.username, Some(&request.password));
        }
        let response = builder.send().await?;

        let status = match response.status().as_u16() {
            200 => {
                let body = self.read_body(response).await?;
                let job: JobResponse = serde_json::from_slice(&body)?;
                JobStatus::connected(
                    job.display_name,
                    job.url,
                    &job.color,
                    job.last_build.map_or(0, |build| build.number),
                )
            }
            code @ (401 | 403) => JobStatus::authentication_required(&request.url, code),
            code => JobStatus::invalid_address(&request.url, code),
        };
        Ok(status)
    }
}

#[async_trait::async_trait]
impl StatusClient for ReqwestStatusClient {
    async fn fetch_status(&self, request: &StatusRequest) -> JobStatus {
        match self.poll(request).await {
            Ok(status) => {
                jenkins_debug!(
                    "Polled {} connection={} status={:?} build={} code={}",
                    request.url,
                    status.connection_status,
                    status.status,
                    status.build_number,
                    status.http_code
                );
                status
            }
            Err(err) => {
                jenkins_warn!("Polling {} failed: {}", request.url, err);
                JobStatus::unreachable(&request.url, err)
            }
        }
    }
}
