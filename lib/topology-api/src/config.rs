// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Topology client configuration.
//!
//! Configuration sources in priority order (lowest to highest):
//! 1. Code defaults
//! 2. System config file at `/etc/nrt/config.toml`
//! 3. TOML file from the `NRT_CONFIG_PATH` environment variable
//! 4. Environment variables (`NRT_*` prefixed), e.g. `NRT_FIELD_MANAGER`
//!
//! Example:
//! ```toml
//! field_manager = "topology-exporter"
//! force_apply = false
//! encoding = "protobuf"
//! ```

use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Map},
    Figment, Metadata, Profile, Provider,
};
use serde::{Deserialize, Serialize};

use crate::codec::Encoding;
use crate::error::ConfigError;

/// ENV pointing at an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "NRT_CONFIG_PATH";

/// System-wide config file
pub const SYSTEM_CONFIG_PATH: &str = "/etc/nrt/config.toml";

/// Prefix of the environment overrides
const ENV_PREFIX: &str = "NRT_";

/// ENV that switches log output to JSON lines
pub const LOGGING_JSONL_ENV: &str = "NRT_LOGGING_JSONL";

/// ENV that disables ANSI colours in human-readable logs
pub const DISABLE_ANSI_LOGGING_ENV: &str = "NRT_SDK_DISABLE_ANSI_LOGGING";

/// Settings for publishing and reading NodeResourceTopology objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// Field manager recorded by server-side apply.
    pub field_manager: String,

    /// Take ownership of fields held by other managers on apply.
    pub force_apply: bool,

    /// Run the topology validator before every apply.
    pub validate_before_apply: bool,

    /// Default encoding for files written and read by the CLI.
    pub encoding: Encoding,

    pub request_timeout_secs: u64,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            field_manager: "nrtctl".to_string(),
            force_apply: true,
            validate_before_apply: true,
            encoding: Encoding::Json,
            request_timeout_secs: 30,
        }
    }
}

impl TopologyConfig {
    /// Create a Figment configuration with all sources merged.
    pub fn figment() -> Figment {
        let config_path = std::env::var(CONFIG_PATH_ENV).unwrap_or_default();

        Figment::new()
            .merge(Serialized::defaults(TopologyConfig::default()))
            .merge(Toml::file(SYSTEM_CONFIG_PATH))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&[
                "CONFIG_PATH",
                "LOG",
                "LOGGING_CONFIG_PATH",
                "LOGGING_JSONL",
                "SDK_DISABLE_ANSI_LOGGING",
            ]))
    }

    /// Figment with an extra provider merged on top.
    pub fn figment_with<T: Provider>(overrides: T) -> Figment {
        Self::figment().merge(overrides)
    }

    /// Load configuration from default figment (env and files).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::extract_from(Self::figment())
    }

    /// Extract configuration from any provider.
    ///
    /// ```rust,ignore
    /// let config = TopologyConfig::extract_from(
    ///     TopologyConfig::figment().merge(("field_manager", "exporter")),
    /// )?;
    /// ```
    pub fn extract_from<T: Provider>(provider: T) -> Result<Self, ConfigError> {
        let config: Self = Figment::from(provider).extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field_manager.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "field_manager must not be empty".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Provider for TopologyConfig {
    fn metadata(&self) -> Metadata {
        Metadata::named("TopologyConfig")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}

/// Check if a string is truthy
/// This will be used to evaluate environment variables or any other subjective
/// configuration parameters that can be set by the user that should be evaluated
/// as a boolean value.
pub fn is_truthy(val: &str) -> bool {
    matches!(
        val.trim().to_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

/// Check whether an environment variable is set to a truthy value.
pub fn env_is_truthy(env: &str) -> bool {
    std::env::var(env).map(|v| is_truthy(&v)).unwrap_or(false)
}

/// Log lines are JSON objects instead of human-readable text.
pub fn jsonl_logging_enabled() -> bool {
    env_is_truthy(LOGGING_JSONL_ENV)
}

pub fn disable_ansi_logging() -> bool {
    env_is_truthy(DISABLE_ANSI_LOGGING_ENV)
}
