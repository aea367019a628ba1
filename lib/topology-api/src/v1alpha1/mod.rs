// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! NodeResourceTopology `topology.node.k8s.io/v1alpha1`
//!
//! A cluster-scoped resource describing the hardware topology of one node:
//! its zones (sockets, NUMA nodes, dies, cores), the resources available in
//! each zone, and the distances between zones. The object is named after the
//! node it describes and is written by a topology exporter running on that
//! node.
//!
//! Unlike most custom resources, `zones` and `attributes` sit at the top level
//! of the object next to `metadata`, not under a `.spec` field, so the
//! [`kube::Resource`] implementation here is written by hand instead of
//! derived.

use std::borrow::Cow;
use std::fmt;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ListMeta, ObjectMeta};
use k8s_openapi::ClusterResourceScope;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DecodeError, QuantityError};
use crate::index::ZoneIndex;
use crate::quantity::Quantity;

pub const GROUP: &str = "topology.node.k8s.io";
pub const VERSION: &str = "v1alpha1";
pub const API_VERSION: &str = "topology.node.k8s.io/v1alpha1";
pub const KIND: &str = "NodeResourceTopology";
pub const LIST_KIND: &str = "NodeResourceTopologyList";
pub const PLURAL: &str = "noderesourcetopologies";
pub const SINGULAR: &str = "noderesourcetopology";
pub const SHORT_NAME: &str = "node-res-topo";

/// Static type information for the top-level kinds of this API group.
pub trait ApiObject {
    const API_VERSION: &'static str;
    const KIND: &'static str;
}

pub type ZoneList = Vec<Zone>;
pub type CostList = Vec<CostInfo>;
pub type AttributeList = Vec<AttributeInfo>;
pub type ResourceInfoList = Vec<ResourceInfo>;

/// NodeResourceTopology describes node resources and their topology.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "NodeResourceTopologyFields")]
pub struct NodeResourceTopology {
    pub metadata: ObjectMeta,
    pub zones: ZoneList,
    pub attributes: AttributeList,
}

impl NodeResourceTopology {
    /// Create a topology object named after the node it describes.
    pub fn new(node_name: &str, zones: ZoneList) -> Self {
        Self {
            metadata: ObjectMeta {
                name: Some(node_name.to_string()),
                ..ObjectMeta::default()
            },
            zones,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(AttributeInfo::new(name, value));
        self
    }

    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zones.push(zone);
        self
    }

    /// Two objects are the same logical resource when they carry the same
    /// name, whatever their content.
    pub fn is_same_resource(&self, other: &NodeResourceTopology) -> bool {
        self.metadata.name.is_some() && self.metadata.name == other.metadata.name
    }

    /// First zone with the given name, in document order.
    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name == name)
    }

    pub fn zone_mut(&mut self, name: &str) -> Option<&mut Zone> {
        self.zones.iter_mut().find(|z| z.name == name)
    }

    /// Build a name index over the zones of this object.
    pub fn index(&self) -> ZoneIndex<'_> {
        ZoneIndex::new(&self.zones)
    }
}

impl ApiObject for NodeResourceTopology {
    const API_VERSION: &'static str = API_VERSION;
    const KIND: &'static str = KIND;
}

impl kube::Resource for NodeResourceTopology {
    type DynamicType = ();
    type Scope = ClusterResourceScope;

    fn kind(_: &()) -> Cow<'_, str> {
        KIND.into()
    }

    fn group(_: &()) -> Cow<'_, str> {
        GROUP.into()
    }

    fn version(_: &()) -> Cow<'_, str> {
        VERSION.into()
    }

    fn api_version(_: &()) -> Cow<'_, str> {
        API_VERSION.into()
    }

    fn plural(_: &()) -> Cow<'_, str> {
        PLURAL.into()
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

impl Serialize for NodeResourceTopology {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct(KIND, 5)?;
        state.serialize_field("apiVersion", API_VERSION)?;
        state.serialize_field("kind", KIND)?;
        state.serialize_field("metadata", &self.metadata)?;
        state.serialize_field("zones", &self.zones)?;
        if self.attributes.is_empty() {
            state.skip_field("attributes")?;
        } else {
            state.serialize_field("attributes", &self.attributes)?;
        }
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeResourceTopologyFields {
    #[serde(default)]
    api_version: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(deserialize_with = "null_as_empty")]
    zones: ZoneList,
    #[serde(default, deserialize_with = "null_as_empty")]
    attributes: AttributeList,
}

impl TryFrom<NodeResourceTopologyFields> for NodeResourceTopology {
    type Error = DecodeError;

    fn try_from(fields: NodeResourceTopologyFields) -> Result<Self, Self::Error> {
        check_type_meta::<Self>(fields.api_version.as_deref(), fields.kind.as_deref())?;
        Ok(Self {
            metadata: compact_metadata(fields.metadata),
            zones: fields.zones,
            attributes: fields.attributes,
        })
    }
}

/// Empty metadata collections decode as absent, matching the binary encoding
/// where the two cannot be told apart.
fn compact_metadata(mut metadata: ObjectMeta) -> ObjectMeta {
    metadata.labels = metadata.labels.filter(|labels| !labels.is_empty());
    metadata.annotations = metadata.annotations.filter(|annotations| !annotations.is_empty());
    metadata.owner_references = metadata.owner_references.filter(|owners| !owners.is_empty());
    metadata.finalizers = metadata.finalizers.filter(|finalizers| !finalizers.is_empty());
    metadata
}

/// NodeResourceTopologyList is a list of NodeResourceTopology resources
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "NodeResourceTopologyListFields")]
pub struct NodeResourceTopologyList {
    pub metadata: ListMeta,
    pub items: Vec<NodeResourceTopology>,
}

impl NodeResourceTopologyList {
    pub fn new(items: Vec<NodeResourceTopology>) -> Self {
        Self {
            metadata: ListMeta::default(),
            items,
        }
    }

    /// The item describing the given node, if present.
    pub fn get(&self, node_name: &str) -> Option<&NodeResourceTopology> {
        self.items
            .iter()
            .find(|item| item.metadata.name.as_deref() == Some(node_name))
    }
}

impl ApiObject for NodeResourceTopologyList {
    const API_VERSION: &'static str = API_VERSION;
    const KIND: &'static str = LIST_KIND;
}

impl From<kube::core::ObjectList<NodeResourceTopology>> for NodeResourceTopologyList {
    fn from(list: kube::core::ObjectList<NodeResourceTopology>) -> Self {
        Self {
            metadata: list.metadata,
            items: list.items,
        }
    }
}

impl Serialize for NodeResourceTopologyList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct(LIST_KIND, 4)?;
        state.serialize_field("apiVersion", API_VERSION)?;
        state.serialize_field("kind", LIST_KIND)?;
        state.serialize_field("metadata", &self.metadata)?;
        state.serialize_field("items", &self.items)?;
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeResourceTopologyListFields {
    #[serde(default)]
    api_version: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    metadata: ListMeta,
    #[serde(deserialize_with = "null_as_empty")]
    items: Vec<NodeResourceTopology>,
}

impl TryFrom<NodeResourceTopologyListFields> for NodeResourceTopologyList {
    type Error = DecodeError;

    fn try_from(fields: NodeResourceTopologyListFields) -> Result<Self, Self::Error> {
        check_type_meta::<Self>(fields.api_version.as_deref(), fields.kind.as_deref())?;
        Ok(Self {
            metadata: fields.metadata,
            items: fields.items,
        })
    }
}

/// Zone represents a resource topology zone, e.g. socket, node, die or core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,

    #[serde(rename = "type")]
    pub zone_type: ZoneType,

    /// Name of the enclosing zone; empty for root zones.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent: String,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub costs: CostList,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub attributes: AttributeList,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub resources: ResourceInfoList,
}

impl Zone {
    pub fn new(name: impl Into<String>, zone_type: impl Into<ZoneType>) -> Self {
        Self {
            name: name.into(),
            zone_type: zone_type.into(),
            parent: String::new(),
            costs: Vec::new(),
            attributes: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = parent.into();
        self
    }

    pub fn with_cost(mut self, name: impl Into<String>, value: i64) -> Self {
        self.costs.push(CostInfo::new(name, value));
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(AttributeInfo::new(name, value));
        self
    }

    pub fn with_resource(mut self, resource: ResourceInfo) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn parent_name(&self) -> Option<&str> {
        (!self.parent.is_empty()).then_some(self.parent.as_str())
    }

    /// Cost from this zone to the named zone, if listed.
    pub fn cost_to(&self, zone: &str) -> Option<i64> {
        self.costs.iter().find(|c| c.name == zone).map(|c| c.value)
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceInfo> {
        self.resources.iter().find(|r| r.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

/// Open-ended zone classification. Any string is accepted; the associated
/// constants name the kinds in common use.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneType(String);

impl ZoneType {
    pub const NODE: &'static str = "Node";
    pub const SOCKET: &'static str = "Socket";
    pub const DIE: &'static str = "Die";
    pub const CORE: &'static str = "Core";
    pub const CACHE: &'static str = "Cache";

    pub fn new(zone_type: impl Into<String>) -> Self {
        Self(zone_type.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the zone types named by the associated constants.
    pub fn is_well_known(&self) -> bool {
        [Self::NODE, Self::SOCKET, Self::DIE, Self::CORE, Self::CACHE].contains(&self.as_str())
    }
}

impl From<&str> for ZoneType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ZoneType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<ZoneType> for String {
    fn from(t: ZoneType) -> Self {
        t.0
    }
}

impl AsRef<str> for ZoneType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ZoneType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ZoneType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ResourceInfo contains information about one resource type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInfo {
    /// Name of the resource.
    pub name: String,
    /// Capacity of the resource, corresponding to capacity in node status, i.e.
    /// total amount of this resource that the node has.
    pub capacity: Quantity,
    /// Allocatable quantity of the resource, corresponding to allocatable in
    /// node status, i.e. total amount of this resource available to be used by
    /// pods.
    pub allocatable: Quantity,
    /// Available is the amount of this resource currently available for new (to
    /// be scheduled) pods, i.e. Allocatable minus the resources reserved by
    /// currently running pods.
    pub available: Quantity,
}

impl ResourceInfo {
    pub fn new(
        name: impl Into<String>,
        capacity: Quantity,
        allocatable: Quantity,
        available: Quantity,
    ) -> Self {
        Self {
            name: name.into(),
            capacity,
            allocatable,
            available,
        }
    }

    /// Build from quantity strings such as `"8Gi"`.
    pub fn parse(
        name: impl Into<String>,
        capacity: &str,
        allocatable: &str,
        available: &str,
    ) -> Result<Self, QuantityError> {
        Ok(Self::new(
            name,
            capacity.parse()?,
            allocatable.parse()?,
            available.parse()?,
        ))
    }
}

/// CostInfo describes the cost (or distance) between two Zones.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CostInfo {
    pub name: String,
    pub value: i64,
}

impl CostInfo {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// AttributeInfo contains one attribute of a Zone.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub name: String,
    pub value: String,
}

impl AttributeInfo {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Lists written by Go producers may arrive as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reject payloads that declare a different type; absent type fields are fine.
pub(crate) fn check_type_meta<T: ApiObject>(
    api_version: Option<&str>,
    kind: Option<&str>,
) -> Result<(), DecodeError> {
    if let Some(found) = api_version.filter(|v| !v.is_empty() && *v != T::API_VERSION) {
        return Err(DecodeError::UnexpectedKind {
            expected: T::API_VERSION.to_string(),
            found: found.to_string(),
        });
    }
    if let Some(found) = kind.filter(|k| !k.is_empty() && *k != T::KIND) {
        return Err(DecodeError::UnexpectedKind {
            expected: T::KIND.to_string(),
            found: found.to_string(),
        });
    }
    Ok(())
}
