//! Workspace root for the Kubernetes MCP bridge.
//!
//! The root crate carries no library code. The server lives in `crates/kube-mcp`
//! and the cluster access layer in `crates/kube-mcp-sdk`; this package only hosts
//! the live-cluster E2E suite under `tests/` (enabled with `--features test-cluster`).
