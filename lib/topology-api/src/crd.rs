// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! CustomResourceDefinition for NodeResourceTopology
//!
//! The object keeps `zones` and `attributes` at the top level rather than
//! under `.spec`, so the structural schema is written out here instead of
//! being derived.

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use serde_json::{json, Value};

use crate::v1alpha1::{GROUP, KIND, LIST_KIND, PLURAL, SHORT_NAME, SINGULAR, VERSION};

/// Annotation the API server requires for CRDs in `*.k8s.io` groups.
pub const API_APPROVED_ANNOTATION: &str = "api-approved.kubernetes.io";
pub const API_APPROVED_URL: &str = "https://github.com/kubernetes/enhancements/pull/1870";

/// `<plural>.<group>`
pub fn crd_name() -> String {
    format!("{PLURAL}.{GROUP}")
}

fn quantity_schema() -> Value {
    json!({
        "anyOf": [{ "type": "integer" }, { "type": "string" }],
        "pattern": r"^(\+|-)?(([0-9]+(\.[0-9]*)?)|(\.[0-9]+))(([KMGTPE]i)|[numkMGTPE]|([eE](\+|-)?(([0-9]+(\.[0-9]*)?)|(\.[0-9]+))))?$",
        "x-kubernetes-int-or-string": true
    })
}

fn attribute_list_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "required": ["name", "value"],
            "properties": {
                "name": { "type": "string" },
                "value": { "type": "string" }
            }
        }
    })
}

fn zone_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "type"],
        "properties": {
            "name": { "type": "string" },
            "type": { "type": "string" },
            "parent": { "type": "string" },
            "costs": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["name", "value"],
                    "properties": {
                        "name": { "type": "string" },
                        "value": { "type": "integer", "format": "int64" }
                    }
                }
            },
            "attributes": attribute_list_schema(),
            "resources": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["name", "capacity", "allocatable", "available"],
                    "properties": {
                        "name": { "type": "string" },
                        "capacity": quantity_schema(),
                        "allocatable": quantity_schema(),
                        "available": quantity_schema()
                    }
                }
            }
        }
    })
}

/// The structural schema of one NodeResourceTopology object.
pub fn openapi_schema() -> Value {
    json!({
        "type": "object",
        "description": "NodeResourceTopology describes node resources and their topology.",
        "required": ["zones"],
        "properties": {
            "apiVersion": { "type": "string" },
            "kind": { "type": "string" },
            "metadata": { "type": "object" },
            "zones": { "type": "array", "items": zone_schema() },
            "attributes": attribute_list_schema()
        }
    })
}

/// Build the cluster-scoped CRD, served and stored at `v1alpha1`.
pub fn crd() -> Result<CustomResourceDefinition, serde_json::Error> {
    serde_json::from_value(json!({
        "apiVersion": "apiextensions.k8s.io/v1",
        "kind": "CustomResourceDefinition",
        "metadata": {
            "name": crd_name(),
            "annotations": { API_APPROVED_ANNOTATION: API_APPROVED_URL }
        },
        "spec": {
            "group": GROUP,
            "scope": "Cluster",
            "names": {
                "plural": PLURAL,
                "singular": SINGULAR,
                "kind": KIND,
                "listKind": LIST_KIND,
                "shortNames": [SHORT_NAME]
            },
            "versions": [{
                "name": VERSION,
                "served": true,
                "storage": true,
                "schema": { "openAPIV3Schema": openapi_schema() }
            }]
        }
    }))
}

/// The CRD as a YAML manifest, ready for `kubectl apply -f`.
pub fn crd_yaml() -> anyhow::Result<String> {
    let crd = crd()?;
    Ok(serde_yaml::to_string(&crd)?)
}
