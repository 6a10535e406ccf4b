// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestEnvError {
    #[error("Failed to read {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {}: {source}", path.display())]
    WalkError {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to decode manifest {}: {source}", path.display())]
    DecodeError {
        path: PathBuf,
        #[source]
        source: DecodeFailure,
    },

    #[error("Failed to create {} {}: {source}", gvk_display(group, version, kind), object_ref(namespace.as_deref(), name))]
    CreateError {
        group: String,
        version: String,
        kind: String,
        namespace: Option<String>,
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("Operation cancelled")]
    CancelledError,

    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to build client: {0}")]
    KubeconfigError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("CRD path does not exist: {}", .0.display())]
    CrdPathMissing(PathBuf),

    #[error("Timed out waiting for CRDs: {0}")]
    CrdTimeoutError(String),
}

/// Underlying cause of a [`TestEnvError::DecodeError`]
#[derive(Error, Debug)]
pub enum DecodeFailure {
    #[error(transparent)]
    Syntax(#[from] serde_yaml::Error),

    #[error(transparent)]
    Shape(#[from] serde_json::Error),

    #[error("found {0} documents, a manifest file holds exactly one")]
    MultipleDocuments(usize),
}

impl TestEnvError {
    /// True for the filesystem family: unreadable files and traversal failures
    pub fn is_read_error(&self) -> bool {
        matches!(self, Self::ReadError { .. } | Self::WalkError { .. })
    }

    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::DecodeError { .. })
    }

    pub fn is_create_error(&self) -> bool {
        matches!(self, Self::CreateError { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::CancelledError)
    }

    /// True when the cluster rejected a create because the object already exists
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            Self::CreateError {
                source: kube::Error::Api(err),
                ..
            } if err.code == 409
        )
    }
}

fn gvk_display(group: &str, version: &str, kind: &str) -> String {
    if group.is_empty() {
        format!("{}/{}", version, kind)
    } else {
        format!("{}/{}/{}", group, version, kind)
    }
}

fn object_ref(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) => format!("{}/{}", ns, name),
        None => name.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, TestEnvError>;
