//! # Cluster Error Types
//!
//! Errors raised by [`ClusterClient`](crate::ClusterClient) implementations and by
//! client construction in [`connection`](crate::connection).

use kube::config::InClusterError;
use thiserror::Error;

/// Cluster operation result type
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Errors from a single Kubernetes API call.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("{kind} \"{name}\" not found")]
    NotFound { kind: &'static str, name: String },

    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    #[error(transparent)]
    Kube(#[from] kube::Error),
}

impl ClusterError {
    /// Create a not-found error for a resource kind (plural, lowercase).
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Create an invalid selector error
    pub fn invalid_selector(message: impl Into<String>) -> Self {
        Self::InvalidSelector(message.into())
    }
}

/// Errors building the long-lived Kubernetes client.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to create in-cluster config: {0}")]
    InCluster(#[source] InClusterError),

    #[error(
        "could not find valid authentication method: kubeconfig file {path:?} is invalid or missing and in-cluster config failed: {source}"
    )]
    NoAuthentication {
        path: String,
        #[source]
        source: InClusterError,
    },

    #[error("failed to create Kubernetes client: {0}")]
    Client(#[from] kube::Error),
}
