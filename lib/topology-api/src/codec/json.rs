// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Structured text encodings: JSON, and YAML for manifests on disk.
//!
//! Field names are the schema's own (`name`, `type`, `parent`, ...). Optional
//! lists and an empty `parent` are omitted on encode and read back as empty.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DecodeError, EncodeError};

pub fn to_vec<T: Serialize>(value: &T) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(value)?)
}

pub fn to_string<T: Serialize>(value: &T) -> Result<String, EncodeError> {
    Ok(serde_json::to_string(value)?)
}

pub fn to_string_pretty<T: Serialize>(value: &T) -> Result<String, EncodeError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn from_str<T: DeserializeOwned>(s: &str) -> Result<T, DecodeError> {
    Ok(serde_json::from_str(s)?)
}

pub fn to_yaml<T: Serialize>(value: &T) -> Result<String, EncodeError> {
    Ok(serde_yaml::to_string(value)?)
}

pub fn from_yaml<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    Ok(serde_yaml::from_slice(bytes)?)
}
