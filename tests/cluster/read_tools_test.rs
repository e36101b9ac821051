//! Read tools against a live cluster.

use serde_json::json;

use super::harness::ClusterTestHarness;

#[tokio::test]
async fn test_list_namespaces_includes_default() -> anyhow::Result<()> {
    let harness = ClusterTestHarness::setup().await?;

    let namespaces = harness.call_tool("list_namespaces", json!({})).await?;
    assert_eq!(namespaces["kind"], "NamespaceList");
    let names: Vec<&str> = namespaces["items"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|ns| ns["metadata"]["name"].as_str())
        .collect();
    assert!(names.contains(&"default"), "got: {names:?}");
    assert!(names.contains(&"kube-system"), "got: {names:?}");

    harness.teardown().await?;
    Ok(())
}

#[tokio::test]
async fn test_get_namespace_and_field_selector() -> anyhow::Result<()> {
    let harness = ClusterTestHarness::setup().await?;

    let ns = harness
        .call_tool("get_namespace", json!({"name": "kube-system"}))
        .await?;
    assert_eq!(ns["metadata"]["name"], "kube-system");

    let filtered = harness
        .call_tool(
            "list_namespaces",
            json!({"fieldSelector": "metadata.name=default"}),
        )
        .await?;
    assert_eq!(filtered["items"].as_array().map(Vec::len), Some(1));

    harness.teardown().await?;
    Ok(())
}

#[tokio::test]
async fn test_list_nodes() -> anyhow::Result<()> {
    let harness = ClusterTestHarness::setup().await?;

    let nodes = harness.call_tool("list_nodes", json!({})).await?;
    assert_eq!(nodes["kind"], "NodeList");
    assert!(
        !nodes["items"].as_array().map(Vec::is_empty).unwrap_or(true),
        "cluster should have at least one node"
    );

    harness.teardown().await?;
    Ok(())
}

#[tokio::test]
async fn test_list_pods_in_kube_system() -> anyhow::Result<()> {
    let harness = ClusterTestHarness::setup().await?;

    let pods = harness
        .call_tool("list_pods", json!({"namespace": "kube-system"}))
        .await?;
    assert_eq!(pods["kind"], "PodList");
    for pod in pods["items"].as_array().into_iter().flatten() {
        assert_eq!(pod["metadata"]["namespace"], "kube-system");
    }

    harness.teardown().await?;
    Ok(())
}

#[tokio::test]
async fn test_missing_pod_is_tool_error() -> anyhow::Result<()> {
    let harness = ClusterTestHarness::setup().await?;

    let result = harness
        .call_tool_raw(
            "get_pod",
            json!({"namespace": "default", "name": "kube-mcp-does-not-exist"}),
        )
        .await?;
    assert_eq!(result.is_error, Some(true));

    let err = harness
        .call_tool_raw("delete_pod", json!({"namespace": "default", "name": "x"}))
        .await;
    assert!(err.is_err(), "delete_pod must not be served read-only");

    harness.teardown().await?;
    Ok(())
}
