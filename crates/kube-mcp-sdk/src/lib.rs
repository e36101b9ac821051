//! Cluster access layer for the Kubernetes MCP bridge.
//!
//! This crate owns everything that talks to the Kubernetes API so the MCP server
//! crate only deals in tool parameters and protocol envelopes.
//!
//! # Modules
//!
//! - [`cluster`]: The [`ClusterClient`] seam: one method per Kubernetes call a tool makes
//! - [`kube_client`]: [`KubeClusterClient`], the production implementation over `kube::Client`
//! - [`connection`]: Kubeconfig / in-cluster resolution for the long-lived client
//! - [`error`]: Error types for cluster calls and connection setup
//! - `testing`: [`InMemoryCluster`](testing::InMemoryCluster), a fake cluster (feature `test-utils`)

pub mod cluster;
pub mod connection;
pub mod error;
pub mod kube_client;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use cluster::{ClusterClient, LogOptions, Selectors, SharedCluster};
pub use connection::{connect, default_kubeconfig_path, ConfigSource, ConnectionOptions};
pub use error::{ClusterError, ClusterResult, ConnectionError};
pub use kube_client::KubeClusterClient;
