// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the NodeResourceTopology client
//!
//! These tests require:
//! 1. Access to a Kubernetes cluster (kubectl configured)
//! 2. Permission to create CustomResourceDefinitions and cluster-scoped objects
//!
//! Run with: cargo test --test cluster_integration -- --ignored --nocapture

use std::time::Duration;

use anyhow::Result;
use topology_api::v1alpha1::{NodeResourceTopology, ResourceInfo, Zone, ZoneType};
use topology_api::{TopologyClient, TopologyConfig};

const TEST_LABEL: (&str, &str) = ("topology-api-test", "true");

fn test_object(name: &str) -> NodeResourceTopology {
    let mut topo = NodeResourceTopology::new(
        name,
        vec![
            Zone::new("node-0", ZoneType::NODE)
                .with_cost("node-0", 10)
                .with_cost("node-1", 20)
                .with_resource(ResourceInfo::parse("cpu", "4", "4", "2").unwrap())
                .with_resource(ResourceInfo::parse("memory", "8Gi", "7Gi", "3Gi").unwrap()),
            Zone::new("node-1", ZoneType::NODE)
                .with_cost("node-0", 20)
                .with_cost("node-1", 10),
        ],
    )
    .with_attribute("topologyManagerPolicy", "single-numa-node");
    topo.metadata.labels = Some([(TEST_LABEL.0.to_string(), TEST_LABEL.1.to_string())].into());
    topo
}

async fn client() -> Result<TopologyClient> {
    let config = TopologyConfig {
        field_manager: "topology-api-tests".to_string(),
        ..Default::default()
    };
    let client = TopologyClient::try_default(config).await?;
    client.install_crd(Duration::from_secs(60)).await?;
    Ok(client)
}

#[tokio::test]
#[ignore] // Run manually with: cargo test --test cluster_integration test_apply_get_delete -- --ignored
async fn test_apply_get_delete() -> Result<()> {
    let client = client().await?;
    let name = "nrt-it-apply";
    let _ = client.delete(name).await;

    let applied = client.apply(&test_object(name)).await?;
    assert_eq!(applied.metadata.name.as_deref(), Some(name));
    assert!(applied.metadata.resource_version.is_some());

    let fetched = client.get(name).await?;
    assert_eq!(fetched.zones, test_object(name).zones);
    assert_eq!(fetched.attributes, test_object(name).attributes);
    let memory = fetched.zones[0].resource("memory").unwrap();
    assert_eq!(memory.capacity.as_str(), "8Gi");

    // re-apply with a changed resource
    let mut updated = fetched.clone();
    updated.zone_mut("node-0").unwrap().resources[0].available = "1".parse()?;
    let reapplied = client.apply(&updated).await?;
    assert_eq!(reapplied.zones[0].resources[0].available.as_str(), "1");

    assert!(client.delete(name).await?);
    assert!(!client.delete(name).await?);
    assert!(client.get_opt(name).await?.is_none());
    Ok(())
}

#[tokio::test]
#[ignore] // Run manually with: cargo test --test cluster_integration test_list_by_label -- --ignored
async fn test_list_by_label() -> Result<()> {
    let client = client().await?;
    let names = ["nrt-it-list-a", "nrt-it-list-b"];
    for name in names {
        client.apply(&test_object(name)).await?;
    }

    let selector = format!("{}={}", TEST_LABEL.0, TEST_LABEL.1);
    let list = client.list(Some(&selector)).await?;
    for name in names {
        assert!(list.get(name).is_some(), "{name} missing from list");
    }

    for name in names {
        client.delete(name).await?;
    }
    Ok(())
}

#[tokio::test]
#[ignore] // Run manually with: cargo test --test cluster_integration test_invalid_object_is_rejected -- --ignored
async fn test_invalid_object_is_rejected() -> Result<()> {
    let client = client().await?;
    let mut topo = test_object("nrt-it-invalid");
    topo.zones.push(Zone::new("core-0", ZoneType::CORE).with_parent("socket-9"));

    let err = client.apply(&topo).await.unwrap_err();
    assert!(err.to_string().contains("Refusing to apply"), "{err:#}");
    assert!(client.get_opt("nrt-it-invalid").await?.is_none());
    Ok(())
}
