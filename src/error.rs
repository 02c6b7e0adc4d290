//! Failure kinds for provisioning steps.

use crate::types::ProvisionStep;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while talking to the platform or preparing a request.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("environment variable {0} is not set")]
    MissingCredential(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}: {body}")]
    Http {
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response from {endpoint} is missing 'id'")]
    MissingId { endpoint: String },
}

/// Coarse classification of a [`ProvisionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Credential,
    Config,
    Io,
    Network,
    Response,
}

impl ProvisionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MissingCredential(_) => FailureKind::Credential,
            Self::Config(_) => FailureKind::Config,
            Self::Io { .. } => FailureKind::Io,
            Self::Transport { .. } | Self::Http { .. } => FailureKind::Network,
            Self::Decode { .. } | Self::MissingId { .. } => FailureKind::Response,
        }
    }

    /// HTTP status of a rejected request, if the platform answered at all.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A [`ProvisionError`] tagged with the step that produced it.
#[derive(Debug, Error)]
#[error("{}: {source}", .step.error_prefix())]
pub struct StepError {
    pub step: ProvisionStep,
    #[source]
    pub source: ProvisionError,
}

impl StepError {
    pub fn new(step: ProvisionStep, source: ProvisionError) -> Self {
        Self { step, source }
    }

    pub fn kind(&self) -> FailureKind {
        self.source.kind()
    }
}

pub type ProvisionResult<T> = Result<T, ProvisionError>;
