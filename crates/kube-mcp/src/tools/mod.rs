//! MCP tool plumbing: argument helpers, parameter schemas, and result builders.
//!
//! Parameter structs derive `Deserialize + JsonSchema` for MCP tool registration.

pub mod helpers;
pub mod params;
pub mod schemas;

pub use helpers::{cluster_tool, finish, json_result, text_result, tool, ToolError};
pub use params::*;
pub use schemas::*;
