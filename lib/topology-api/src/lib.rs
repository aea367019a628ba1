// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! NodeResourceTopology API
//!
//! Schema types for the cluster-scoped `NodeResourceTopology` custom resource
//! (`topology.node.k8s.io/v1alpha1`), which describes a node's NUMA zones,
//! their resources and the distances between them. Alongside the types:
//! JSON/YAML and protobuf codecs, the CRD manifest, an on-demand zone index,
//! an opt-in validator and a typed cluster client.

pub use anyhow::{
    anyhow as error, bail as raise, Context as ErrorContext, Error, Ok as OK, Result,
};

pub mod client;
pub mod codec;
pub mod config;
pub mod crd;
pub mod error;
pub mod index;
pub mod logging;
pub mod quantity;
pub mod v1alpha1;
pub mod validation;

pub use client::TopologyClient;
pub use codec::Encoding;
pub use config::TopologyConfig;
pub use error::{ConfigError, DecodeError, EncodeError, QuantityError};
pub use index::ZoneIndex;
pub use quantity::Quantity;
pub use v1alpha1::{
    AttributeInfo, CostInfo, NodeResourceTopology, NodeResourceTopologyList, ResourceInfo, Zone,
    ZoneType,
};
pub use validation::{validate, ValidationError, Violation};
