// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Tagged binary encoding.
//!
//! Every schema type maps to a message in [`super::proto`] through
//! [`ProtoMessage`]. [`encode`] and [`decode`] work on bare messages; the
//! `*_envelope` functions add the Kubernetes protobuf framing used on the API
//! server wire:
//!
//! ```text
//! 0x6b 0x38 0x73 0x00 | runtime.Unknown { typeMeta, raw = <message>, contentEncoding, contentType }
//! ```
//!
//! Decoding fails when a required field is absent or a quantity does not
//! parse. Unknown tags are skipped.
//!
//! Empty label, annotation, finalizer and owner-reference collections in
//! `metadata` are not distinguishable from absent ones on the wire and decode
//! as `None`.

use bytes::Buf;
use chrono::{DateTime, Utc};
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as meta;
use prost::Message;

use super::proto;
use crate::error::DecodeError;
use crate::quantity::Quantity;
use crate::v1alpha1::{
    check_type_meta, ApiObject, AttributeInfo, CostInfo, NodeResourceTopology,
    NodeResourceTopologyList, ResourceInfo, Zone,
};

/// Magic prefix of Kubernetes protobuf payloads: `k8s\0`.
pub const MAGIC: [u8; 4] = [0x6b, 0x38, 0x73, 0x00];

/// Conversion between a schema type and its wire message.
pub trait ProtoMessage: Sized {
    type Message: Message + Default;

    fn to_message(&self) -> Self::Message;

    fn from_message(message: Self::Message) -> Result<Self, DecodeError>;
}

/// Encode a bare message.
pub fn encode<T: ProtoMessage>(value: &T) -> Vec<u8> {
    value.to_message().encode_to_vec()
}

/// Decode a bare message.
pub fn decode<T: ProtoMessage>(buf: impl Buf) -> Result<T, DecodeError> {
    T::from_message(T::Message::decode(buf)?)
}

/// Encode a top-level object inside the Kubernetes protobuf envelope.
pub fn encode_envelope<T: ProtoMessage + ApiObject>(value: &T) -> Vec<u8> {
    let unknown = proto::Unknown {
        type_meta: Some(proto::TypeMeta {
            api_version: Some(T::API_VERSION.to_string()),
            kind: Some(T::KIND.to_string()),
        }),
        raw: Some(encode(value)),
        content_encoding: Some(String::new()),
        content_type: Some(String::new()),
    };

    let mut out = Vec::with_capacity(MAGIC.len() + unknown.encoded_len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&unknown.encode_to_vec());
    out
}

/// Decode a top-level object from the Kubernetes protobuf envelope.
pub fn decode_envelope<T: ProtoMessage + ApiObject>(payload: &[u8]) -> Result<T, DecodeError> {
    let body = payload
        .strip_prefix(&MAGIC[..])
        .ok_or(DecodeError::MissingMagic)?;
    let unknown = proto::Unknown::decode(body)?;

    let type_meta = unknown.type_meta.unwrap_or_default();
    check_type_meta::<T>(type_meta.api_version.as_deref(), type_meta.kind.as_deref())?;

    if let Some(encoding) = unknown.content_encoding.filter(|e| !e.is_empty()) {
        return Err(DecodeError::UnsupportedContentEncoding(encoding));
    }

    decode(unknown.raw.as_deref().unwrap_or_default())
}

/// Whether the payload carries the protobuf envelope magic.
pub fn has_magic(payload: &[u8]) -> bool {
    payload.starts_with(&MAGIC)
}

impl ProtoMessage for NodeResourceTopology {
    type Message = proto::NodeResourceTopology;

    fn to_message(&self) -> Self::Message {
        proto::NodeResourceTopology {
            metadata: Some(object_meta_to_message(&self.metadata)),
            zones: self.zones.iter().map(Zone::to_message).collect(),
            attributes: self.attributes.iter().map(AttributeInfo::to_message).collect(),
        }
    }

    fn from_message(message: Self::Message) -> Result<Self, DecodeError> {
        Ok(Self {
            metadata: message
                .metadata
                .map(object_meta_from_message)
                .transpose()?
                .unwrap_or_default(),
            zones: from_messages(message.zones)?,
            attributes: from_messages(message.attributes)?,
        })
    }
}

impl ProtoMessage for NodeResourceTopologyList {
    type Message = proto::NodeResourceTopologyList;

    fn to_message(&self) -> Self::Message {
        proto::NodeResourceTopologyList {
            metadata: Some(proto::ListMeta {
                self_link: self.metadata.self_link.clone(),
                resource_version: self.metadata.resource_version.clone(),
                r#continue: self.metadata.continue_.clone(),
                remaining_item_count: self.metadata.remaining_item_count,
            }),
            items: self.items.iter().map(NodeResourceTopology::to_message).collect(),
        }
    }

    fn from_message(message: Self::Message) -> Result<Self, DecodeError> {
        let metadata = message.metadata.unwrap_or_default();
        Ok(Self {
            metadata: meta::ListMeta {
                self_link: metadata.self_link,
                resource_version: metadata.resource_version,
                continue_: metadata.r#continue,
                remaining_item_count: metadata.remaining_item_count,
            },
            items: from_messages(message.items)?,
        })
    }
}

impl ProtoMessage for Zone {
    type Message = proto::Zone;

    fn to_message(&self) -> Self::Message {
        proto::Zone {
            name: Some(self.name.clone()),
            r#type: Some(self.zone_type.as_str().to_string()),
            parent: self.parent_name().map(str::to_string),
            costs: self.costs.iter().map(CostInfo::to_message).collect(),
            attributes: self.attributes.iter().map(AttributeInfo::to_message).collect(),
            resources: self.resources.iter().map(ResourceInfo::to_message).collect(),
        }
    }

    fn from_message(message: Self::Message) -> Result<Self, DecodeError> {
        Ok(Self {
            name: message.name.ok_or(DecodeError::missing("Zone", "name"))?,
            zone_type: message
                .r#type
                .ok_or(DecodeError::missing("Zone", "type"))?
                .into(),
            parent: message.parent.unwrap_or_default(),
            costs: from_messages(message.costs)?,
            attributes: from_messages(message.attributes)?,
            resources: from_messages(message.resources)?,
        })
    }
}

impl ProtoMessage for ResourceInfo {
    type Message = proto::ResourceInfo;

    fn to_message(&self) -> Self::Message {
        proto::ResourceInfo {
            name: Some(self.name.clone()),
            capacity: Some(quantity_to_message(&self.capacity)),
            allocatable: Some(quantity_to_message(&self.allocatable)),
            available: Some(quantity_to_message(&self.available)),
        }
    }

    fn from_message(message: Self::Message) -> Result<Self, DecodeError> {
        Ok(Self {
            name: message
                .name
                .ok_or(DecodeError::missing("ResourceInfo", "name"))?,
            capacity: quantity_from_message(message.capacity, "capacity")?,
            allocatable: quantity_from_message(message.allocatable, "allocatable")?,
            available: quantity_from_message(message.available, "available")?,
        })
    }
}

impl ProtoMessage for CostInfo {
    type Message = proto::CostInfo;

    fn to_message(&self) -> Self::Message {
        proto::CostInfo {
            name: Some(self.name.clone()),
            value: Some(self.value),
        }
    }

    fn from_message(message: Self::Message) -> Result<Self, DecodeError> {
        Ok(Self {
            name: message.name.ok_or(DecodeError::missing("CostInfo", "name"))?,
            value: message
                .value
                .ok_or(DecodeError::missing("CostInfo", "value"))?,
        })
    }
}

impl ProtoMessage for AttributeInfo {
    type Message = proto::AttributeInfo;

    fn to_message(&self) -> Self::Message {
        proto::AttributeInfo {
            name: Some(self.name.clone()),
            value: Some(self.value.clone()),
        }
    }

    fn from_message(message: Self::Message) -> Result<Self, DecodeError> {
        Ok(Self {
            name: message
                .name
                .ok_or(DecodeError::missing("AttributeInfo", "name"))?,
            value: message
                .value
                .ok_or(DecodeError::missing("AttributeInfo", "value"))?,
        })
    }
}

fn from_messages<T: ProtoMessage>(messages: Vec<T::Message>) -> Result<Vec<T>, DecodeError> {
    messages.into_iter().map(T::from_message).collect()
}

fn quantity_to_message(quantity: &Quantity) -> proto::Quantity {
    proto::Quantity {
        string: Some(quantity.as_str().to_string()),
    }
}

fn quantity_from_message(
    message: Option<proto::Quantity>,
    field: &'static str,
) -> Result<Quantity, DecodeError> {
    let text = message
        .and_then(|q| q.string)
        .ok_or(DecodeError::missing("ResourceInfo", field))?;
    Quantity::try_from(text).map_err(|source| DecodeError::InvalidQuantity { field, source })
}

fn time_to_message(time: &meta::Time) -> proto::Time {
    proto::Time {
        seconds: Some(time.0.timestamp()),
        nanos: Some(time.0.timestamp_subsec_nanos() as i32),
    }
}

fn time_from_message(message: proto::Time, field: &'static str) -> Result<meta::Time, DecodeError> {
    let nanos = u32::try_from(message.nanos.unwrap_or_default())
        .map_err(|_| DecodeError::InvalidTimestamp { field })?;
    DateTime::<Utc>::from_timestamp(message.seconds.unwrap_or_default(), nanos)
        .map(meta::Time)
        .ok_or(DecodeError::InvalidTimestamp { field })
}

fn object_meta_to_message(metadata: &meta::ObjectMeta) -> proto::ObjectMeta {
    proto::ObjectMeta {
        name: metadata.name.clone(),
        generate_name: metadata.generate_name.clone(),
        namespace: metadata.namespace.clone(),
        self_link: metadata.self_link.clone(),
        uid: metadata.uid.clone(),
        resource_version: metadata.resource_version.clone(),
        generation: metadata.generation,
        creation_timestamp: metadata.creation_timestamp.as_ref().map(time_to_message),
        deletion_timestamp: metadata.deletion_timestamp.as_ref().map(time_to_message),
        deletion_grace_period_seconds: metadata.deletion_grace_period_seconds,
        labels: metadata.labels.clone().unwrap_or_default(),
        annotations: metadata.annotations.clone().unwrap_or_default(),
        owner_references: metadata
            .owner_references
            .iter()
            .flatten()
            .map(|owner| proto::OwnerReference {
                kind: Some(owner.kind.clone()),
                name: Some(owner.name.clone()),
                uid: Some(owner.uid.clone()),
                api_version: Some(owner.api_version.clone()),
                controller: owner.controller,
                block_owner_deletion: owner.block_owner_deletion,
            })
            .collect(),
        finalizers: metadata.finalizers.clone().unwrap_or_default(),
    }
}

fn object_meta_from_message(message: proto::ObjectMeta) -> Result<meta::ObjectMeta, DecodeError> {
    Ok(meta::ObjectMeta {
        name: message.name,
        generate_name: message.generate_name,
        namespace: message.namespace,
        self_link: message.self_link,
        uid: message.uid,
        resource_version: message.resource_version,
        generation: message.generation,
        creation_timestamp: message
            .creation_timestamp
            .map(|t| time_from_message(t, "metadata.creationTimestamp"))
            .transpose()?,
        deletion_timestamp: message
            .deletion_timestamp
            .map(|t| time_from_message(t, "metadata.deletionTimestamp"))
            .transpose()?,
        deletion_grace_period_seconds: message.deletion_grace_period_seconds,
        labels: non_empty(message.labels),
        annotations: non_empty(message.annotations),
        owner_references: non_empty(
            message
                .owner_references
                .into_iter()
                .map(|owner| meta::OwnerReference {
                    api_version: owner.api_version.unwrap_or_default(),
                    block_owner_deletion: owner.block_owner_deletion,
                    controller: owner.controller,
                    kind: owner.kind.unwrap_or_default(),
                    name: owner.name.unwrap_or_default(),
                    uid: owner.uid.unwrap_or_default(),
                })
                .collect(),
        ),
        finalizers: non_empty(message.finalizers),
        managed_fields: None,
    })
}

fn non_empty<C: Default + PartialEq>(collection: C) -> Option<C> {
    (collection != C::default()).then_some(collection)
}
