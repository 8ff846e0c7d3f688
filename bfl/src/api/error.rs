use std::path::PathBuf;

use reqwest::StatusCode;
use strum::Display;
use thiserror::Error;

/// The remote call an error happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    Submit,
    Poll,
    Download,
}

/// Coarse classification of a [`BflError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    Configuration,
    Transport,
    Data,
    Io,
}

/// Errors returned while talking to the Black Forest Labs API
#[derive(Debug, Error)]
pub enum BflError {
    #[error(
        "API key not found. Provide it via the '--api-key' argument or set the BFL_API_KEY environment variable."
    )]
    MissingApiKey,

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Error during {stage} request: {source}")]
    Request {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("{stage} request failed ({status}): {body}")]
    Status {
        stage: Stage,
        status: StatusCode,
        body: String,
    },

    #[error("Could not decode {stage} response: {source}\n{body}")]
    Decode {
        stage: Stage,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No request ID found in the response:\n{response}")]
    MissingJobId { response: String },

    #[error("Result is ready but no sample found:\n{response}")]
    MissingSample { response: String },

    #[error("Error saving image to '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BflError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingApiKey | Self::InvalidBaseUrl { .. } => ErrorKind::Configuration,
            Self::Request { .. } | Self::Status { .. } => ErrorKind::Transport,
            Self::Decode { .. } | Self::MissingJobId { .. } | Self::MissingSample { .. } => {
                ErrorKind::Data
            }
            Self::Io { .. } => ErrorKind::Io,
        }
    }
}
