// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Producer-side checks of the topology invariants.
//!
//! The schema accepts and round-trips any content. Exporters that want to
//! publish well-formed objects call [`validate`] before writing; codecs never
//! do. All violations are collected, not only the first.

use std::collections::HashSet;

use thiserror::Error;

use crate::index::ZoneIndex;
use crate::v1alpha1::NodeResourceTopology;

/// One broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("zone at position {position} has an empty name")]
    EmptyZoneName { position: usize },

    #[error("zone name {zone:?} is used more than once")]
    DuplicateZone { zone: String },

    #[error("zone {zone:?} names unknown parent {parent:?}")]
    UnknownParent { zone: String, parent: String },

    #[error("zone {zone:?} is its own parent")]
    SelfParent { zone: String },

    #[error("zone {zone:?} has a parent cycle among its ancestors")]
    ParentCycle { zone: String },

    #[error("zone {zone:?} lists resource {resource:?} more than once")]
    DuplicateResource { zone: String, resource: String },

    #[error("resource {resource:?} in zone {zone:?} has negative {field}")]
    NegativeQuantity {
        zone: String,
        resource: String,
        field: &'static str,
    },

    #[error("resource {resource:?} in zone {zone:?}: {smaller} exceeds {larger}")]
    QuantityOrder {
        zone: String,
        resource: String,
        smaller: &'static str,
        larger: &'static str,
    },

    #[error("zone {zone:?} has a cost towards unknown zone {target:?}")]
    UnknownCostTarget { zone: String, target: String },

    #[error("attribute with empty name in {owner}")]
    EmptyAttributeName { owner: String },
}

/// Every violation found in one object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} topology violation(s){}", .violations.len(), join(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

fn join(violations: &[Violation]) -> String {
    violations.iter().map(|v| format!("; {v}")).collect()
}

/// Check the zone forest, resource accounting, cost targets and attributes.
pub fn validate(topology: &NodeResourceTopology) -> Result<(), ValidationError> {
    let violations = violations(topology);
    if violations.is_empty() {
        Ok(())
    } else {
        tracing::debug!(
            name = topology.metadata.name.as_deref().unwrap_or_default(),
            count = violations.len(),
            "topology failed validation"
        );
        Err(ValidationError { violations })
    }
}

/// Same checks as [`validate`], returning the raw list.
pub fn violations(topology: &NodeResourceTopology) -> Vec<Violation> {
    let mut found = Vec::new();
    let index = topology.index();

    check_zone_names(topology, &mut found);
    check_parents(topology, &index, &mut found);

    for zone in &topology.zones {
        check_resources(&zone.name, zone.resources.as_slice(), &mut found);

        for cost in &zone.costs {
            if !index.contains(&cost.name) {
                found.push(Violation::UnknownCostTarget {
                    zone: zone.name.clone(),
                    target: cost.name.clone(),
                });
            }
        }

        if zone.attributes.iter().any(|a| a.name.is_empty()) {
            found.push(Violation::EmptyAttributeName {
                owner: format!("zone {:?}", zone.name),
            });
        }
    }

    if topology.attributes.iter().any(|a| a.name.is_empty()) {
        found.push(Violation::EmptyAttributeName {
            owner: "topology".to_string(),
        });
    }

    found
}

fn check_zone_names(topology: &NodeResourceTopology, found: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for (position, zone) in topology.zones.iter().enumerate() {
        if zone.name.is_empty() {
            found.push(Violation::EmptyZoneName { position });
            continue;
        }
        if !seen.insert(zone.name.as_str()) && reported.insert(zone.name.as_str()) {
            found.push(Violation::DuplicateZone {
                zone: zone.name.clone(),
            });
        }
    }
}

fn check_parents(topology: &NodeResourceTopology, index: &ZoneIndex<'_>, found: &mut Vec<Violation>) {
    for zone in &topology.zones {
        let Some(parent) = zone.parent_name() else {
            continue;
        };
        if parent == zone.name {
            found.push(Violation::SelfParent {
                zone: zone.name.clone(),
            });
        } else if !index.contains(parent) {
            found.push(Violation::UnknownParent {
                zone: zone.name.clone(),
                parent: parent.to_string(),
            });
        } else if index.in_cycle(&zone.name) {
            found.push(Violation::ParentCycle {
                zone: zone.name.clone(),
            });
        }
    }
}

fn check_resources(
    zone: &str,
    resources: &[crate::v1alpha1::ResourceInfo],
    found: &mut Vec<Violation>,
) {
    let mut seen = HashSet::new();
    for resource in resources {
        if !seen.insert(resource.name.as_str()) {
            found.push(Violation::DuplicateResource {
                zone: zone.to_string(),
                resource: resource.name.clone(),
            });
        }

        let quantities = [
            ("capacity", &resource.capacity),
            ("allocatable", &resource.allocatable),
            ("available", &resource.available),
        ];
        for (field, quantity) in quantities {
            if quantity.is_negative() {
                found.push(Violation::NegativeQuantity {
                    zone: zone.to_string(),
                    resource: resource.name.clone(),
                    field,
                });
            }
        }

        if resource.allocatable > resource.capacity {
            found.push(Violation::QuantityOrder {
                zone: zone.to_string(),
                resource: resource.name.clone(),
                smaller: "allocatable",
                larger: "capacity",
            });
        }
        if resource.available > resource.allocatable {
            found.push(Violation::QuantityOrder {
                zone: zone.to_string(),
                resource: resource.name.clone(),
                smaller: "available",
                larger: "allocatable",
            });
        }
    }
}
