//! Kubernetes client construction.
//!
//! Resolution order:
//!
//! 1. `in_cluster` set explicitly: in-cluster service account config, no fallback.
//! 2. A kubeconfig file that exists, is non-empty and parses.
//! 3. In-cluster config as a fallback; failing that, an error naming both attempts.

use std::fmt;
use std::path::{Path, PathBuf};

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use tracing::{debug, info};

use crate::error::ConnectionError;

/// Options for building the long-lived cluster client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context; `None` uses the file's current context.
    pub context: Option<String>,
    pub in_cluster: bool,
    /// Namespace applied when a request does not name one.
    pub default_namespace: Option<String>,
}

/// Where the client configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    InClusterExplicit,
    Kubeconfig(PathBuf),
    InClusterFallback,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InClusterExplicit => write!(f, "in-cluster (explicitly configured)"),
            Self::Kubeconfig(path) => write!(f, "kubeconfig file: {}", path.display()),
            Self::InClusterFallback => write!(f, "in-cluster (fallback)"),
        }
    }
}

/// `$HOME/.kube/config`, when a home directory is known.
pub fn default_kubeconfig_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(".kube").join("config"))
}

/// Build a `kube::Client` according to [`ConnectionOptions`].
pub async fn connect(options: &ConnectionOptions) -> Result<Client, ConnectionError> {
    let (config, source) = resolve_config(options).await?;
    let client = Client::try_from(config)?;
    info!(source = %source, "Kubernetes client initialized");
    Ok(client)
}

/// Resolve the client configuration without opening any connection.
pub async fn resolve_config(
    options: &ConnectionOptions,
) -> Result<(Config, ConfigSource), ConnectionError> {
    let (mut config, source) = if options.in_cluster {
        let config = Config::incluster().map_err(ConnectionError::InCluster)?;
        (config, ConfigSource::InClusterExplicit)
    } else {
        match load_kubeconfig(options).await {
            Some((config, path)) => (config, ConfigSource::Kubeconfig(path)),
            None => {
                let config = Config::incluster().map_err(|source| {
                    ConnectionError::NoAuthentication {
                        path: options
                            .kubeconfig
                            .as_deref()
                            .map(|p| p.display().to_string())
                            .unwrap_or_default(),
                        source,
                    }
                })?;
                (config, ConfigSource::InClusterFallback)
            }
        }
    };

    if let Some(namespace) = options.default_namespace.as_deref().filter(|ns| !ns.is_empty()) {
        config.default_namespace = namespace.to_string();
    }

    Ok((config, source))
}

async fn load_kubeconfig(options: &ConnectionOptions) -> Option<(Config, PathBuf)> {
    let path = options.kubeconfig.as_deref()?;
    if !is_non_empty_file(path) {
        debug!(path = %path.display(), "kubeconfig missing or empty");
        return None;
    }

    let kubeconfig = match Kubeconfig::read_from(path) {
        Ok(kubeconfig) => kubeconfig,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "kubeconfig unreadable");
            return None;
        }
    };

    let kube_options = KubeConfigOptions {
        context: options.context.clone(),
        ..KubeConfigOptions::default()
    };
    match Config::from_custom_kubeconfig(kubeconfig, &kube_options).await {
        Ok(config) => Some((config, path.to_path_buf())),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "kubeconfig invalid");
            None
        }
    }
}

fn is_non_empty_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}
