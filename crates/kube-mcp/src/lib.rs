//! Kubernetes MCP server
//!
//! Model Context Protocol server exposing Kubernetes pods, deployments,
//! services, configmaps, namespaces and nodes to LLM agents. Write tools
//! (`delete_pod`, `scale_deployment`) are only registered when the server is
//! not read-only.

pub mod cli;
pub mod config;
pub mod io_logger;
pub mod resources;
pub mod server;
pub mod tools;
pub mod toolsets;
pub mod transport;
pub mod translations;

pub use server::KubeMcpServer;
