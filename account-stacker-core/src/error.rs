//! Error types for the account integration workflow.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The IAM call that failed while provisioning the target account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IamStep {
    AssumeRole,
    CreateRole,
    CreatePolicy,
    AttachRolePolicy,
}

impl fmt::Display for IamStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AssumeRole => "sts:AssumeRole",
            Self::CreateRole => "iam:CreateRole",
            Self::CreatePolicy => "iam:CreatePolicy",
            Self::AttachRolePolicy => "iam:AttachRolePolicy",
        };
        f.write_str(name)
    }
}

/// Coarse classification of a [`StackerError`], stable across stage wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    SecretResolution,
    UnrecognizedEvent,
    ArtifactRead,
    VendorApi,
    IamProvisioning,
}

/// Errors produced by the workflow. All of them are terminal for an invocation.
#[derive(Debug, Error)]
pub enum StackerError {
    /// One or more required environment variables are unset or empty.
    #[error("{}", format_missing(.missing))]
    Configuration { missing: Vec<String> },

    /// The parameter store lookup for a secret failed.
    #[error("unable to resolve secret '{name}': {message}")]
    SecretResolution { name: String, message: String },

    /// The event is not an account creation event we know how to read.
    #[error("unable to determine target account: {0}")]
    UnrecognizedEvent(String),

    /// A policy artifact could not be read or is malformed.
    #[error("unable to read {}: {message}", .path.display())]
    ArtifactRead { path: PathBuf, message: String },

    /// The vendor API answered with an unexpected status code.
    #[error("got {status} from api, body: {body}")]
    VendorApi { status: u16, body: String },

    /// The vendor API could not be reached or its answer could not be decoded.
    #[error("vendor request failed: {0}")]
    VendorRequest(String),

    /// An STS or IAM call against the target account failed.
    #[error("{step} failed: {message}")]
    IamProvisioning { step: IamStep, message: String },

    /// Any of the above, prefixed with the workflow stage that produced it.
    #[error("{stage}: {source}")]
    Stage {
        stage: String,
        source: Box<StackerError>,
    },
}

fn format_missing(missing: &[String]) -> String {
    missing
        .iter()
        .map(|name| format!("missing ${name}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl StackerError {
    pub fn configuration(missing: Vec<String>) -> Self {
        Self::Configuration { missing }
    }

    pub fn secret_resolution(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SecretResolution {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn unrecognized_event(message: impl Into<String>) -> Self {
        Self::UnrecognizedEvent(message.into())
    }

    pub fn artifact_read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ArtifactRead {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn vendor_request(message: impl Into<String>) -> Self {
        Self::VendorRequest(message.into())
    }

    pub fn iam(step: IamStep, message: impl Into<String>) -> Self {
        Self::IamProvisioning {
            step,
            message: message.into(),
        }
    }

    /// Prefix this error with the name of the stage that failed.
    #[must_use]
    pub fn context(self, stage: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.into(),
            source: Box::new(self),
        }
    }

    /// The underlying error with all stage prefixes removed.
    pub fn root(&self) -> &Self {
        match self {
            Self::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::SecretResolution { .. } => ErrorKind::SecretResolution,
            Self::UnrecognizedEvent(_) => ErrorKind::UnrecognizedEvent,
            Self::ArtifactRead { .. } => ErrorKind::ArtifactRead,
            Self::VendorApi { .. } | Self::VendorRequest(_) => ErrorKind::VendorApi,
            Self::IamProvisioning { .. } => ErrorKind::IamProvisioning,
            Self::Stage { .. } => unreachable!("root() never returns a stage wrapper"),
        }
    }
}

pub type StackerResult<T> = Result<T, StackerError>;
