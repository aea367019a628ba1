// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Error types for the topology API.
//!
//! Library surfaces (quantity parsing, the codecs, validation, configuration)
//! return the typed errors defined here. Cluster-facing helpers in
//! [`crate::client`] return [`anyhow::Result`] and attach context instead.

use thiserror::Error;

/// Failure to parse a resource quantity string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("quantity is empty")]
    Empty,

    #[error("invalid numeric part in quantity {0:?}")]
    InvalidNumber(String),

    #[error("unknown suffix {suffix:?} in quantity {input:?}")]
    UnknownSuffix { input: String, suffix: String },

    #[error("quantity {0:?} is out of range")]
    OutOfRange(String),
}

/// Failure to decode one of the schema types from either encoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid protobuf: {0}")]
    Protobuf(#[from] prost::DecodeError),

    #[error("missing required field `{field}` in {message}")]
    MissingField {
        message: &'static str,
        field: &'static str,
    },

    #[error("invalid quantity in field `{field}`: {source}")]
    InvalidQuantity {
        field: &'static str,
        #[source]
        source: QuantityError,
    },

    #[error("invalid timestamp in field `{field}`")]
    InvalidTimestamp { field: &'static str },

    #[error("payload does not start with the protobuf envelope magic")]
    MissingMagic,

    #[error("unsupported content encoding {0:?}")]
    UnsupportedContentEncoding(String),

    #[error("expected {expected}, found {found}")]
    UnexpectedKind { expected: String, found: String },
}

impl DecodeError {
    pub(crate) fn missing(message: &'static str, field: &'static str) -> Self {
        DecodeError::MissingField { message, field }
    }
}

/// Failure to encode one of the schema types to a textual encoding.
///
/// The binary encoding is infallible.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to extract configuration: {0}")]
    Extraction(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// An encoding name or content type that no codec handles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown encoding {0:?}, expected json, yaml or protobuf")]
pub struct UnknownEncoding(pub String);
