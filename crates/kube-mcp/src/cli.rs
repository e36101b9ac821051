//! Command-line interface of the `kube-mcp` binary.
//!
//! Every flag can also be set through a `K8S_MCP_*` environment variable.
//! Values left unset here fall back to the config file and then to the
//! defaults in [`crate::config`].

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand};

/// Kubernetes MCP server
#[derive(Debug, Parser)]
#[command(name = "kube-mcp")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every transport.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Path to the kubeconfig file (defaults to $HOME/.kube/config)
    #[arg(long, global = true, env = "K8S_MCP_KUBECONFIG")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use (defaults to the current context)
    #[arg(long, global = true, env = "K8S_MCP_CONTEXT")]
    pub context: Option<String>,

    /// Default namespace of the Kubernetes client
    #[arg(long, global = true, env = "K8S_MCP_NAMESPACE")]
    pub namespace: Option<String>,

    /// Use the in-cluster service account configuration
    #[arg(
        long,
        global = true,
        env = "K8S_MCP_IN_CLUSTER",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub in_cluster: Option<bool>,

    /// Only register read tools (pass `--read-only=false` to enable writes)
    #[arg(
        long,
        global = true,
        env = "K8S_MCP_READ_ONLY",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub read_only: Option<bool>,

    /// Resource types to expose, comma separated (pod, deployment, ... or all)
    #[arg(long, global = true, env = "K8S_MCP_RESOURCE_TYPES", value_delimiter = ',')]
    pub resource_types: Option<Vec<String>>,

    /// Toolsets to enable, comma separated (k8s_resources or all)
    #[arg(long, global = true, env = "K8S_MCP_TOOLSETS", value_delimiter = ',')]
    pub toolsets: Option<Vec<String>>,

    /// Write the tool description translations to k8s-mcp-server-config.json
    #[arg(
        long,
        global = true,
        env = "K8S_MCP_EXPORT_TRANSLATIONS",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub export_translations: Option<bool>,

    /// Config file (defaults to ./.kube-mcp.toml, then ~/.config/kube-mcp.toml)
    #[arg(long, global = true, env = "K8S_MCP_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve MCP over stdin/stdout
    Stdio(StdioArgs),

    /// Serve MCP over HTTP with SSE response streams
    Sse(SseArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct StdioArgs {
    /// Write logs to this file (JSON) instead of stderr
    #[arg(long, env = "K8S_MCP_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log every protocol message read from stdin and written to stdout
    #[arg(
        long,
        env = "K8S_MCP_LOG_COMMANDS",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub log_commands: Option<bool>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct SseArgs {
    /// Port to listen on
    #[arg(long, env = "K8S_MCP_PORT")]
    pub port: Option<u16>,
}
