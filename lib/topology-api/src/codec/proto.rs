// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Protobuf wire messages.
//!
//! Field tags follow the Kubernetes `generated.proto` files for the
//! `topology.node.k8s.io/v1alpha1` group and for `apimachinery`. Messages are
//! proto2: scalar fields are `optional`, so a missing required field can be
//! told apart from an empty one on decode. Unknown tags are skipped by prost.
//!
//! Tag numbers are a wire contract. Never renumber an existing field.

use std::collections::BTreeMap;

/// `k8s.io.apimachinery.pkg.api.resource.Quantity`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Quantity {
    #[prost(string, optional, tag = "1")]
    pub string: ::core::option::Option<::prost::alloc::string::String>,
}

/// `k8s.io.apimachinery.pkg.apis.meta.v1.Time`
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Time {
    #[prost(int64, optional, tag = "1")]
    pub seconds: ::core::option::Option<i64>,
    #[prost(int32, optional, tag = "2")]
    pub nanos: ::core::option::Option<i32>,
}

/// `k8s.io.apimachinery.pkg.apis.meta.v1.OwnerReference`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OwnerReference {
    #[prost(string, optional, tag = "1")]
    pub kind: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "3")]
    pub name: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "4")]
    pub uid: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "5")]
    pub api_version: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(bool, optional, tag = "6")]
    pub controller: ::core::option::Option<bool>,
    #[prost(bool, optional, tag = "7")]
    pub block_owner_deletion: ::core::option::Option<bool>,
}

/// `k8s.io.apimachinery.pkg.apis.meta.v1.ObjectMeta`
///
/// `managedFields` (17) is not carried.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ObjectMeta {
    #[prost(string, optional, tag = "1")]
    pub name: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "2")]
    pub generate_name: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "3")]
    pub namespace: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "4")]
    pub self_link: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "5")]
    pub uid: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "6")]
    pub resource_version: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(int64, optional, tag = "7")]
    pub generation: ::core::option::Option<i64>,
    #[prost(message, optional, tag = "8")]
    pub creation_timestamp: ::core::option::Option<Time>,
    #[prost(message, optional, tag = "9")]
    pub deletion_timestamp: ::core::option::Option<Time>,
    #[prost(int64, optional, tag = "10")]
    pub deletion_grace_period_seconds: ::core::option::Option<i64>,
    #[prost(btree_map = "string, string", tag = "11")]
    pub labels: BTreeMap<::prost::alloc::string::String, ::prost::alloc::string::String>,
    #[prost(btree_map = "string, string", tag = "12")]
    pub annotations: BTreeMap<::prost::alloc::string::String, ::prost::alloc::string::String>,
    #[prost(message, repeated, tag = "13")]
    pub owner_references: ::prost::alloc::vec::Vec<OwnerReference>,
    #[prost(string, repeated, tag = "14")]
    pub finalizers: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

/// `k8s.io.apimachinery.pkg.apis.meta.v1.ListMeta`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListMeta {
    #[prost(string, optional, tag = "1")]
    pub self_link: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "2")]
    pub resource_version: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "3")]
    pub r#continue: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(int64, optional, tag = "4")]
    pub remaining_item_count: ::core::option::Option<i64>,
}

/// `k8s.io.apimachinery.pkg.runtime.TypeMeta`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TypeMeta {
    #[prost(string, optional, tag = "1")]
    pub api_version: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "2")]
    pub kind: ::core::option::Option<::prost::alloc::string::String>,
}

/// `k8s.io.apimachinery.pkg.runtime.Unknown`, the envelope that follows the
/// protobuf magic prefix.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Unknown {
    #[prost(message, optional, tag = "1")]
    pub type_meta: ::core::option::Option<TypeMeta>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub raw: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    #[prost(string, optional, tag = "3")]
    pub content_encoding: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "4")]
    pub content_type: ::core::option::Option<::prost::alloc::string::String>,
}

/// `topology.node.k8s.io.v1alpha1.NodeResourceTopology`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeResourceTopology {
    #[prost(message, optional, tag = "1")]
    pub metadata: ::core::option::Option<ObjectMeta>,
    #[prost(message, repeated, tag = "2")]
    pub zones: ::prost::alloc::vec::Vec<Zone>,
    #[prost(message, repeated, tag = "3")]
    pub attributes: ::prost::alloc::vec::Vec<AttributeInfo>,
}

/// `topology.node.k8s.io.v1alpha1.NodeResourceTopologyList`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeResourceTopologyList {
    #[prost(message, optional, tag = "1")]
    pub metadata: ::core::option::Option<ListMeta>,
    #[prost(message, repeated, tag = "2")]
    pub items: ::prost::alloc::vec::Vec<NodeResourceTopology>,
}

/// `topology.node.k8s.io.v1alpha1.Zone`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Zone {
    #[prost(string, optional, tag = "1")]
    pub name: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "2")]
    pub r#type: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "3")]
    pub parent: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(message, repeated, tag = "4")]
    pub costs: ::prost::alloc::vec::Vec<CostInfo>,
    #[prost(message, repeated, tag = "5")]
    pub attributes: ::prost::alloc::vec::Vec<AttributeInfo>,
    #[prost(message, repeated, tag = "6")]
    pub resources: ::prost::alloc::vec::Vec<ResourceInfo>,
}

/// `topology.node.k8s.io.v1alpha1.ResourceInfo`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResourceInfo {
    #[prost(string, optional, tag = "1")]
    pub name: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(message, optional, tag = "2")]
    pub capacity: ::core::option::Option<Quantity>,
    #[prost(message, optional, tag = "3")]
    pub allocatable: ::core::option::Option<Quantity>,
    #[prost(message, optional, tag = "4")]
    pub available: ::core::option::Option<Quantity>,
}

/// `topology.node.k8s.io.v1alpha1.CostInfo`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CostInfo {
    #[prost(string, optional, tag = "1")]
    pub name: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(int64, optional, tag = "2")]
    pub value: ::core::option::Option<i64>,
}

/// `topology.node.k8s.io.v1alpha1.AttributeInfo`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AttributeInfo {
    #[prost(string, optional, tag = "1")]
    pub name: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "2")]
    pub value: ::core::option::Option<::prost::alloc::string::String>,
}
