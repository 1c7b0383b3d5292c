//! # Runtime Configuration Module
//!
//! Environment variable overrides applied on top of the route configuration file.
//!
//! ## Environment Variables
//!
//! - `SVCR_HANDLER_SUFFIX` - suffix of canonical handler names (default: `Service`)
//! - `SVCR_METHOD_PREFIX` - prefix of canonical method names (default: `do`)
//! - `SVCR_REGEX_ARGUMENTS` - `verbatim` or `fill-defaults` (default: `verbatim`)
//! - `SVCR_SLOW_RESOLUTION_US` - warn threshold for a single resolution (default: `1000`)
//!
//! ## Usage
//!
//! ```rust
//! use svcrouter::config::DispatchSettings;
//! use svcrouter::runtime_config::RuntimeConfig;
//!
//! let mut settings = DispatchSettings::default();
//! RuntimeConfig::from_env().apply(&mut settings);
//! ```

use crate::config::{DispatchSettings, RegexArgumentPolicy};
use std::env;
use tracing::warn;

/// Overrides loaded from environment variables.
///
/// Unset or unparsable variables leave the corresponding setting untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub handler_suffix: Option<String>,
    pub method_prefix: Option<String>,
    pub regex_arguments: Option<RegexArgumentPolicy>,
    pub slow_resolution_us: Option<u64>,
}

impl RuntimeConfig {
    /// Load overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load overrides through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let regex_arguments = lookup("SVCR_REGEX_ARGUMENTS").and_then(|val| {
            val.parse::<RegexArgumentPolicy>()
                .map_err(|err| warn!(value = %val, error = %err, "Ignoring SVCR_REGEX_ARGUMENTS"))
                .ok()
        });
        let slow_resolution_us = lookup("SVCR_SLOW_RESOLUTION_US").and_then(|val| {
            val.parse()
                .map_err(|_| warn!(value = %val, "Ignoring SVCR_SLOW_RESOLUTION_US"))
                .ok()
        });

        RuntimeConfig {
            handler_suffix: lookup("SVCR_HANDLER_SUFFIX").filter(|s| !s.is_empty()),
            method_prefix: lookup("SVCR_METHOD_PREFIX"),
            regex_arguments,
            slow_resolution_us,
        }
    }

    /// Write every present override into `settings`
    pub fn apply(&self, settings: &mut DispatchSettings) {
        if let Some(suffix) = &self.handler_suffix {
            settings.handler_suffix = suffix.clone();
        }
        if let Some(prefix) = &self.method_prefix {
            settings.method_prefix = prefix.clone();
        }
        if let Some(policy) = self.regex_arguments {
            settings.regex_arguments = policy;
        }
        if let Some(us) = self.slow_resolution_us {
            settings.slow_resolution_us = us;
        }
    }
}
