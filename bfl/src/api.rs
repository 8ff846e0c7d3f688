use std::{fmt, path::Path, time::Duration};

use bytes::Bytes;
use log::{debug, info};
use reqwest::{
    Url,
    header::{self, HeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, ser::PrettyFormatter};
use tokio::time::sleep;

mod error;
pub use error::{BflError, ErrorKind, Stage};

use crate::request::GenerationRequest;

pub type Result<T, E = BflError> = std::result::Result<T, E>;

pub const DEFAULT_BASE_URL: &str = "https://api.bfl.ml";
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

const API_TIMEOUT: Duration = Duration::from_secs(10);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(20);

/// Opaque id of a submitted generation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a finished image can be downloaded from. Only valid for a short while.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub url: String,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Ready,
    Pending,
    TaskNotFound,
    RequestModerated,
    ContentModerated,
    Error,
    /// Anything the service reports that isn't listed above, verbatim.
    Other(String),
}

impl From<&str> for JobStatus {
    fn from(status: &str) -> Self {
        match status {
            "Ready" => Self::Ready,
            "Pending" => Self::Pending,
            "Task not found" => Self::TaskNotFound,
            "Request Moderated" => Self::RequestModerated,
            "Content Moderated" => Self::ContentModerated,
            "Error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Self::Ready => "Ready",
            Self::Pending => "Pending",
            Self::TaskNotFound => "Task not found",
            Self::RequestModerated => "Request Moderated",
            Self::ContentModerated => "Content Moderated",
            Self::Error => "Error",
            Self::Other(other) => other,
        };
        f.write_str(status)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl SubmitResponse {
    /// The `id` and `status` fields, for echoing back to the user.
    pub fn details(&self) -> Value {
        let mut details = Map::new();
        if let Some(id) = &self.id {
            details.insert("id".into(), id.clone().into());
        }
        if let Some(status) = &self.status {
            details.insert("status".into(), status.clone().into());
        }
        Value::Object(details)
    }

    /// [`Self::details`] as JSON indented by four spaces.
    pub fn details_pretty(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.details().serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn job_handle(&self) -> Result<JobHandle> {
        match &self.id {
            Some(id) if !id.is_empty() => Ok(JobHandle(id.clone())),
            _ => Err(BflError::MissingJobId {
                response: format!("{self:#?}"),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
}

impl PollResponse {
    pub fn status(&self) -> Option<JobStatus> {
        self.status.as_deref().map(JobStatus::from)
    }

    /// The sample URL of a finished job.
    pub fn artifact(&self) -> Result<Artifact> {
        self.result
            .as_ref()
            .and_then(|result| result.get("sample"))
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(|url| Artifact {
                url: url.to_string(),
            })
            .ok_or_else(|| BflError::MissingSample {
                response: format!("{self:#?}"),
            })
    }
}

/// Client for the Black Forest Labs image generation API
#[derive(Debug, Clone)]
pub struct BflClient {
    api_key: String,
    /// Without trailing slash.
    base_url: String,
    poll_interval: Duration,
    client: reqwest::Client,
}

impl BflClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: POLL_INTERVAL,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        Url::parse(base_url).map_err(|e| BflError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Starts a generation job for `request.model`.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<SubmitResponse> {
        let url = self.endpoint(&request.model.endpoint_path());
        debug!("Submitting to {url}: {request:#?}");

        let resp = self
            .client
            .post(url)
            .timeout(API_TIMEOUT)
            .header(header::ACCEPT, HeaderValue::from_static("application/json"))
            .header("x-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(transport(Stage::Submit))?;

        let response = read_json::<SubmitResponse>(Stage::Submit, resp).await?;
        debug!("Submit response: {response:#?}");
        Ok(response)
    }

    /// Fetches the current state of a job once.
    pub async fn get_result(&self, job: &JobHandle) -> Result<PollResponse> {
        let url = self.endpoint("v1/get_result");

        let resp = self
            .client
            .get(url)
            .timeout(API_TIMEOUT)
            .query(&[("id", job.as_str())])
            .header(header::ACCEPT, HeaderValue::from_static("application/json"))
            .header("x-key", &self.api_key)
            .send()
            .await
            .map_err(transport(Stage::Poll))?;

        read_json(Stage::Poll, resp).await
    }

    /// Polls a job until it is `Ready` and returns its sample URL.
    ///
    /// Every other status is logged and polled again after the poll interval.
    /// There is no upper bound on the number of attempts.
    pub async fn poll(&self, job: &JobHandle) -> Result<Artifact> {
        info!("Polling for result...");
        loop {
            let response = self.get_result(job).await?;
            debug!("Poll response: {response:#?}");

            match response.status() {
                Some(JobStatus::Ready) => return response.artifact(),
                Some(status) => info!("Status: {status}"),
                None => info!("Status: none"),
            }

            sleep(self.poll_interval).await;
        }
    }

    /// Downloads the image behind a sample URL.
    pub async fn fetch(&self, artifact: &Artifact) -> Result<Bytes> {
        let resp = self
            .client
            .get(&artifact.url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
            .map_err(transport(Stage::Download))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.map_err(transport(Stage::Download))?;
            return Err(BflError::Status {
                stage: Stage::Download,
                status,
                body,
            });
        }

        resp.bytes().await.map_err(transport(Stage::Download))
    }

    /// Downloads the artifact to `path`, replacing whatever is there. Returns the
    /// number of bytes written.
    pub async fn download(&self, artifact: &Artifact, path: &Path) -> Result<usize> {
        let data = self.fetch(artifact).await?;
        save(path, &data).await?;
        Ok(data.len())
    }
}

/// Writes `data` to `path`, overwriting any existing file.
pub async fn save(path: &Path, data: &[u8]) -> Result<()> {
    tokio::fs::write(path, data)
        .await
        .map_err(|source| BflError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn transport(stage: Stage) -> impl FnOnce(reqwest::Error) -> BflError {
    move |source| BflError::Request { stage, source }
}

async fn read_json<T: DeserializeOwned>(stage: Stage, resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await.map_err(transport(stage))?;

    if !status.is_success() {
        return Err(BflError::Status {
            stage,
            status,
            body,
        });
    }

    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(source) => Err(BflError::Decode {
            stage,
            body,
            source,
        }),
    }
}
