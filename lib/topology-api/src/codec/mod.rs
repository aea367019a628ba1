// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Codec Module
//!
//! The schema types in [`crate::v1alpha1`] are the single in-memory
//! representation. Two independent adapters move them on and off the wire:
//!
//! - [`json`]: structured text (JSON, plus YAML for manifests), driven by serde.
//! - [`protobuf`]: tagged binary messages defined in [`proto`], with the
//!   Kubernetes `k8s\0` envelope for top-level objects.
//!
//! [`encode`] and [`decode`] dispatch on an [`Encoding`] for top-level kinds.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError, UnknownEncoding};
use crate::v1alpha1::ApiObject;

pub mod json;
pub mod proto;
pub mod protobuf;

pub use protobuf::ProtoMessage;

/// Wire encoding of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Json,
    Yaml,
    Protobuf,
}

impl Encoding {
    pub fn content_type(&self) -> &'static str {
        match self {
            Encoding::Json => "application/json",
            Encoding::Yaml => "application/yaml",
            Encoding::Protobuf => "application/vnd.kubernetes.protobuf",
        }
    }

    /// Map a `Content-Type` header value, parameters ignored.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        match media_type {
            "application/json" => Some(Encoding::Json),
            "application/yaml" | "application/x-yaml" | "text/yaml" => Some(Encoding::Yaml),
            "application/vnd.kubernetes.protobuf" | "application/x-protobuf" => {
                Some(Encoding::Protobuf)
            }
            _ => None,
        }
    }

    /// Guess the encoding of a payload from its first bytes.
    pub fn sniff(payload: &[u8]) -> Self {
        if protobuf::has_magic(payload) {
            return Encoding::Protobuf;
        }
        match payload.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') | Some(b'[') => Encoding::Json,
            _ => Encoding::Yaml,
        }
    }

    pub fn is_textual(&self) -> bool {
        !matches!(self, Encoding::Protobuf)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::Json => "json",
            Encoding::Yaml => "yaml",
            Encoding::Protobuf => "protobuf",
        };
        f.write_str(name)
    }
}

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Encoding::Json),
            "yaml" | "yml" => Ok(Encoding::Yaml),
            "protobuf" | "proto" | "pb" => Ok(Encoding::Protobuf),
            other => Encoding::from_content_type(other).ok_or_else(|| UnknownEncoding(s.to_string())),
        }
    }
}

/// Encode a top-level object.
pub fn encode<T>(value: &T, encoding: Encoding) -> Result<Vec<u8>, EncodeError>
where
    T: Serialize + ProtoMessage + ApiObject,
{
    let bytes = match encoding {
        Encoding::Json => json::to_vec(value)?,
        Encoding::Yaml => json::to_yaml(value)?.into_bytes(),
        Encoding::Protobuf => protobuf::encode_envelope(value),
    };
    tracing::trace!(kind = T::KIND, %encoding, len = bytes.len(), "encoded object");
    Ok(bytes)
}

/// Decode a top-level object.
pub fn decode<T>(payload: &[u8], encoding: Encoding) -> Result<T, DecodeError>
where
    T: DeserializeOwned + ProtoMessage + ApiObject,
{
    tracing::trace!(kind = T::KIND, %encoding, len = payload.len(), "decoding object");
    match encoding {
        Encoding::Json => json::from_slice(payload),
        Encoding::Yaml => json::from_yaml(payload),
        Encoding::Protobuf => protobuf::decode_envelope(payload),
    }
}

/// Decode a top-level object in whatever encoding it appears to use.
pub fn decode_auto<T>(payload: &[u8]) -> Result<T, DecodeError>
where
    T: DeserializeOwned + ProtoMessage + ApiObject,
{
    decode(payload, Encoding::sniff(payload))
}
