//! Server configuration.
//!
//! Values are resolved in precedence order:
//! 1. command-line flags and `K8S_MCP_*` environment variables
//! 2. the config file: `--config`, else `./.kube-mcp.toml`, else `~/.config/kube-mcp.toml`
//! 3. built-in defaults

use std::path::{Path, PathBuf};

use kube_mcp_sdk::{default_kubeconfig_path, ConnectionOptions};
use serde::Deserialize;
use thiserror::Error;

use crate::cli::{Cli, Command, GlobalArgs};
use crate::toolsets::{ResourceType, ALL};

const CONFIG_FILENAME: &str = ".kube-mcp.toml";
const GLOBAL_CONFIG_DIR: &str = ".config";
const GLOBAL_CONFIG_FILENAME: &str = "kube-mcp.toml";

pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("namespace must not be empty")]
    EmptyNamespace,

    #[error("at least one resource type must be enabled")]
    NoResourceTypes,

    #[error("at least one toolset must be enabled")]
    NoToolsets,

    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("port must be non-zero")]
    InvalidPort,
}

/// Contents of a `kube-mcp.toml` file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    pub namespace: Option<String>,
    pub in_cluster: Option<bool>,
    pub read_only: Option<bool>,
    pub resource_types: Option<Vec<String>>,
    pub toolsets: Option<Vec<String>>,
    pub export_translations: Option<bool>,
    pub log_file: Option<PathBuf>,
    pub log_commands: Option<bool>,
    pub port: Option<u16>,
}

impl FileConfig {
    /// Read and parse a config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config file.
    ///
    /// An explicit path must load. A discovered file that fails to load is
    /// skipped: defaults are returned together with the error so the caller
    /// can report it once logging is set up.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<ConfigError>), ConfigError> {
        if let Some(path) = explicit {
            let config = Self::from_path(path)?;
            tracing::debug!(?path, "Loaded config file");
            return Ok((config, None));
        }
        Ok(Self::load_discovered(find_config_file()))
    }

    fn load_discovered(path: Option<PathBuf>) -> (Self, Option<ConfigError>) {
        let Some(path) = path else {
            return (Self::default(), None);
        };
        match Self::from_path(&path) {
            Ok(config) => {
                tracing::debug!(?path, "Loaded config file");
                (config, None)
            }
            Err(e) => (Self::default(), Some(e)),
        }
    }
}

fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.is_file() {
        return Some(local);
    }

    let home = std::env::var("HOME").ok().map(PathBuf::from)?;
    let global = home.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILENAME);
    global.is_file().then_some(global)
}

/// Fully resolved configuration of a server run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    pub namespace: String,
    pub in_cluster: bool,
    pub read_only: bool,
    pub resource_types: Vec<String>,
    pub toolsets: Vec<String>,
    pub export_translations: bool,
    pub log_file: Option<PathBuf>,
    pub log_commands: bool,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            context: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            in_cluster: false,
            read_only: true,
            resource_types: vec![ALL.to_string()],
            toolsets: vec![ALL.to_string()],
            export_translations: false,
            log_file: None,
            log_commands: false,
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Load the config file named by `--config` (or a discovered one) and merge the CLI over it.
    ///
    /// The second value is the error of a discovered config file that was skipped.
    pub fn load(cli: &Cli) -> Result<(Self, Option<ConfigError>), ConfigError> {
        let (file, skipped) = FileConfig::load(cli.global.config.as_deref())?;
        Ok((Self::merge(cli, file), skipped))
    }

    /// Merge CLI values over file values over defaults.
    pub fn merge(cli: &Cli, file: FileConfig) -> Self {
        let GlobalArgs {
            kubeconfig,
            context,
            namespace,
            in_cluster,
            read_only,
            resource_types,
            toolsets,
            export_translations,
            config: _,
        } = cli.global.clone();
        let defaults = Self::default();

        let (log_file, log_commands, port) = match &cli.command {
            Command::Stdio(args) => (args.log_file.clone(), args.log_commands, None),
            Command::Sse(args) => (None, None, args.port),
        };

        Self {
            kubeconfig: kubeconfig.or(file.kubeconfig),
            context: context.or(file.context),
            namespace: namespace.or(file.namespace).unwrap_or(defaults.namespace),
            in_cluster: in_cluster.or(file.in_cluster).unwrap_or(defaults.in_cluster),
            read_only: read_only.or(file.read_only).unwrap_or(defaults.read_only),
            resource_types: clean_list(resource_types.or(file.resource_types))
                .unwrap_or(defaults.resource_types),
            toolsets: clean_list(toolsets.or(file.toolsets)).unwrap_or(defaults.toolsets),
            export_translations: export_translations
                .or(file.export_translations)
                .unwrap_or(defaults.export_translations),
            log_file: log_file.or(file.log_file),
            log_commands: log_commands
                .or(file.log_commands)
                .unwrap_or(defaults.log_commands),
            port: port.or(file.port).unwrap_or(defaults.port),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.trim().is_empty() {
            return Err(ConfigError::EmptyNamespace);
        }
        if self.resource_types.is_empty() {
            return Err(ConfigError::NoResourceTypes);
        }
        if self.toolsets.is_empty() {
            return Err(ConfigError::NoToolsets);
        }
        for name in &self.resource_types {
            if !name.eq_ignore_ascii_case(ALL) && name.parse::<ResourceType>().is_err() {
                return Err(ConfigError::UnknownResourceType(name.clone()));
            }
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        Ok(())
    }

    /// Options for building the Kubernetes client.
    ///
    /// Without an explicit kubeconfig the default `$HOME/.kube/config` is tried.
    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            kubeconfig: self.kubeconfig.clone().or_else(default_kubeconfig_path),
            context: self.context.clone(),
            in_cluster: self.in_cluster,
            default_namespace: Some(self.namespace.clone()),
        }
    }
}

/// Trim entries and drop empty ones. `Some(vec![])` survives so validation can reject it.
fn clean_list(list: Option<Vec<String>>) -> Option<Vec<String>> {
    list.map(|items| {
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.namespace, "default");
        assert!(config.read_only);
        assert!(!config.in_cluster);
        assert_eq!(config.resource_types, vec!["all"]);
        assert_eq!(config.toolsets, vec!["all"]);
        assert_eq!(config.port, 8080);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_file_config() {
        let toml_str = r#"
namespace = "apps"
read-only = false
resource-types = ["pods", "deployments"]
port = 9090
"#;
        let file: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(file.namespace.as_deref(), Some("apps"));
        assert_eq!(file.read_only, Some(false));
        assert_eq!(file.port, Some(9090));
        assert!(file.context.is_none());
    }

    #[test]
    fn test_unknown_file_keys_are_rejected() {
        assert!(toml::from_str::<FileConfig>("namespaces = \"apps\"").is_err());
    }

    #[test]
    #[serial]
    fn test_cli_overrides_file() {
        let file = FileConfig {
            namespace: Some("from-file".to_string()),
            context: Some("file-ctx".to_string()),
            read_only: Some(false),
            port: Some(9090),
            ..Default::default()
        };
        let cli = parse(&["kube-mcp", "sse", "--namespace", "from-cli", "--port", "7000"]);
        let config = ServerConfig::merge(&cli, file);

        assert_eq!(config.namespace, "from-cli");
        assert_eq!(config.context.as_deref(), Some("file-ctx"));
        assert!(!config.read_only);
        assert_eq!(config.port, 7000);
    }

    #[test]
    #[serial]
    fn test_file_fills_transport_settings() {
        let file = FileConfig {
            log_commands: Some(true),
            log_file: Some(PathBuf::from("/tmp/kube-mcp.log")),
            ..Default::default()
        };
        let config = ServerConfig::merge(&parse(&["kube-mcp", "stdio"]), file);
        assert!(config.log_commands);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/kube-mcp.log")));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    #[serial]
    fn test_list_entries_are_trimmed() {
        let cli = parse(&["kube-mcp", "stdio", "--resource-types", " pods, ,nodes "]);
        let config = ServerConfig::merge(&cli, FileConfig::default());
        assert_eq!(config.resource_types, vec!["pods", "nodes"]);
    }

    #[test]
    fn test_validate() {
        let mut config = ServerConfig {
            namespace: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyNamespace)));

        config.namespace = "default".to_string();
        config.resource_types = vec![];
        assert!(matches!(config.validate(), Err(ConfigError::NoResourceTypes)));

        config.resource_types = vec!["pods".to_string(), "secrets".to_string()];
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "unknown resource type: secrets");

        config.resource_types = vec!["all".to_string()];
        config.toolsets = vec![];
        assert!(matches!(config.validate(), Err(ConfigError::NoToolsets)));

        config.toolsets = vec!["all".to_string()];
        config.port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPort)));
    }

    #[test]
    fn test_explicit_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "context = \"staging\"\nin-cluster = true").unwrap();

        let (config, skipped) = FileConfig::load(Some(file.path())).unwrap();
        assert!(skipped.is_none());
        assert_eq!(config.context.as_deref(), Some("staging"));
        assert_eq!(config.in_cluster, Some(true));
    }

    #[test]
    fn test_explicit_config_file_errors_propagate() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();
        assert!(matches!(
            FileConfig::load(Some(file.path())),
            Err(ConfigError::Parse { .. })
        ));

        let missing = PathBuf::from("/nonexistent/kube-mcp.toml");
        assert!(matches!(
            FileConfig::load(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_broken_discovered_file_falls_back_with_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "read-only = \"sometimes\"").unwrap();

        let (config, skipped) = FileConfig::load_discovered(Some(file.path().to_path_buf()));
        assert_eq!(config, FileConfig::default());
        assert!(matches!(skipped, Some(ConfigError::Parse { .. })));

        let (config, skipped) = FileConfig::load_discovered(None);
        assert_eq!(config, FileConfig::default());
        assert!(skipped.is_none());
    }

    #[test]
    fn test_connection_options() {
        let config = ServerConfig {
            kubeconfig: Some(PathBuf::from("/etc/kube/config")),
            context: Some("prod".to_string()),
            namespace: "apps".to_string(),
            ..Default::default()
        };
        let options = config.connection_options();
        assert_eq!(options.kubeconfig, Some(PathBuf::from("/etc/kube/config")));
        assert_eq!(options.context.as_deref(), Some("prod"));
        assert_eq!(options.default_namespace.as_deref(), Some("apps"));
        assert!(!options.in_cluster);
    }
}
