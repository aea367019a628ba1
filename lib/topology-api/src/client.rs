// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Typed cluster client for NodeResourceTopology objects.
//!
//! Objects are cluster scoped, one per node, named after the node. Writes go
//! through server-side apply so that an exporter owns exactly the fields it
//! publishes.

use std::time::Duration;

use anyhow::{Context as _, Result};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::{
    api::{DeleteParams, ListParams, Patch, PatchParams},
    Api, Client as KubeClient,
};

use crate::config::TopologyConfig;
use crate::crd;
use crate::v1alpha1::{NodeResourceTopology, NodeResourceTopologyList};
use crate::validation;

/// Interval between polls while waiting for the CRD to be established
const CRD_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Clone)]
pub struct TopologyClient {
    kube_client: KubeClient,
    api: Api<NodeResourceTopology>,
    config: TopologyConfig,
}

impl TopologyClient {
    pub fn new(kube_client: KubeClient, config: TopologyConfig) -> Self {
        let api = Api::all(kube_client.clone());
        Self {
            kube_client,
            api,
            config,
        }
    }

    /// Connect with the inferred kubeconfig / in-cluster config, applying the
    /// configured request timeout.
    pub async fn try_default(config: TopologyConfig) -> Result<Self> {
        let mut kube_config = kube::Config::infer()
            .await
            .context("Failed to infer Kubernetes client configuration")?;
        kube_config.read_timeout = Some(config.request_timeout());
        kube_config.write_timeout = Some(config.request_timeout());

        let kube_client = KubeClient::try_from(kube_config)
            .context("Failed to create Kubernetes client")?;
        Ok(Self::new(kube_client, config))
    }

    pub fn config(&self) -> &TopologyConfig {
        &self.config
    }

    pub fn kube_client(&self) -> &KubeClient {
        &self.kube_client
    }

    pub async fn get(&self, node_name: &str) -> Result<NodeResourceTopology> {
        self.api
            .get(node_name)
            .await
            .with_context(|| format!("Failed to get NodeResourceTopology {node_name}"))
    }

    /// Like [`get`](Self::get) but returns `None` when the object does not exist.
    pub async fn get_opt(&self, node_name: &str) -> Result<Option<NodeResourceTopology>> {
        self.api
            .get_opt(node_name)
            .await
            .with_context(|| format!("Failed to get NodeResourceTopology {node_name}"))
    }

    pub async fn list(&self, label_selector: Option<&str>) -> Result<NodeResourceTopologyList> {
        let mut list_params = ListParams::default();
        if let Some(selector) = label_selector {
            list_params = list_params.labels(selector);
        }

        let objects = self
            .api
            .list(&list_params)
            .await
            .context("Failed to list NodeResourceTopology objects")?;

        tracing::debug!(
            count = objects.items.len(),
            selector = label_selector.unwrap_or_default(),
            "listed NodeResourceTopology objects"
        );
        Ok(NodeResourceTopologyList::from(objects))
    }

    /// Create or update an object with server-side apply.
    ///
    /// Server-populated metadata (`managedFields`, `resourceVersion`, `uid`,
    /// timestamps) is dropped from the applied configuration. When
    /// `validate_before_apply` is set, objects that fail [`validation::validate`]
    /// are rejected before anything is sent.
    pub async fn apply(&self, topology: &NodeResourceTopology) -> Result<NodeResourceTopology> {
        let name = topology
            .metadata
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| anyhow::anyhow!("NodeResourceTopology must have a name"))?;

        if self.config.validate_before_apply {
            validation::validate(topology)
                .with_context(|| format!("Refusing to apply invalid NodeResourceTopology {name}"))?;
        }

        let applied = apply_configuration(topology);
        let mut params = PatchParams::apply(&self.config.field_manager);
        if self.config.force_apply {
            params = params.force();
        }

        let result = self
            .api
            .patch(name, &params, &Patch::Apply(&applied))
            .await
            .with_context(|| format!("Failed to apply NodeResourceTopology {name}"))?;

        tracing::debug!(
            name,
            field_manager = %self.config.field_manager,
            zones = applied.zones.len(),
            resource_version = result.metadata.resource_version.as_deref().unwrap_or_default(),
            "applied NodeResourceTopology"
        );
        Ok(result)
    }

    /// Delete an object. Returns `false` if it did not exist.
    pub async fn delete(&self, node_name: &str) -> Result<bool> {
        match self.api.delete(node_name, &DeleteParams::default()).await {
            Ok(_) => {
                tracing::debug!(name = node_name, "deleted NodeResourceTopology");
                Ok(true)
            }
            Err(kube::Error::Api(response)) if response.code == 404 => Ok(false),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to delete NodeResourceTopology {node_name}")),
        }
    }

    /// Server-side apply the CRD and wait until the API server reports it
    /// established.
    pub async fn install_crd(&self, timeout: Duration) -> Result<CustomResourceDefinition> {
        let crd = crd::crd().context("Failed to build CustomResourceDefinition")?;
        let name = crd::crd_name();
        let crds: Api<CustomResourceDefinition> = Api::all(self.kube_client.clone());

        let params = PatchParams::apply(&self.config.field_manager).force();
        crds.patch(&name, &params, &Patch::Apply(&crd))
            .await
            .with_context(|| format!("Failed to apply CustomResourceDefinition {name}"))?;
        tracing::info!(crd = %name, "applied CustomResourceDefinition");

        tokio::time::timeout(timeout, wait_established(&crds, &name))
            .await
            .with_context(|| format!("Timed out waiting for {name} to be established"))?
    }
}

async fn wait_established(
    crds: &Api<CustomResourceDefinition>,
    name: &str,
) -> Result<CustomResourceDefinition> {
    loop {
        let current = crds
            .get(name)
            .await
            .with_context(|| format!("Failed to get CustomResourceDefinition {name}"))?;
        if is_established(&current) {
            return Ok(current);
        }
        tracing::trace!(crd = name, "waiting for CustomResourceDefinition");
        tokio::time::sleep(CRD_POLL_INTERVAL).await;
    }
}

fn is_established(crd: &CustomResourceDefinition) -> bool {
    crd.status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .is_some_and(|conditions| {
            conditions
                .iter()
                .any(|c| c.type_ == "Established" && c.status == "True")
        })
}

/// The object as an apply configuration: identity, labels, annotations and
/// owners plus the topology content.
fn apply_configuration(topology: &NodeResourceTopology) -> NodeResourceTopology {
    let mut applied = topology.clone();
    let metadata = &mut applied.metadata;
    metadata.managed_fields = None;
    metadata.resource_version = None;
    metadata.uid = None;
    metadata.creation_timestamp = None;
    metadata.deletion_timestamp = None;
    metadata.deletion_grace_period_seconds = None;
    metadata.generation = None;
    metadata.self_link = None;
    applied
}
