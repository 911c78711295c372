// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Kernel configuration system

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::EPSILON;

/// File read by [`KernelConfig::load`] when present in the working directory
pub const CONFIG_FILE: &str = "elements.toml";

/// Numeric settings shared by curve construction and offsetting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Distance below which coordinates are considered equal
    pub tolerance: f64,
    /// Longest miter join, as a multiple of the offset distance
    pub miter_limit: f64,
    /// Reject polylines whose segments cross
    pub check_self_intersection: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            tolerance: EPSILON,
            miter_limit: 2.0,
            check_self_intersection: false,
        }
    }
}

impl KernelConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: KernelConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ELEMENTS_*` environment variable overrides
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides looked up by variable name
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(tolerance) = lookup("ELEMENTS_TOLERANCE") {
            self.tolerance = tolerance
                .trim()
                .parse()
                .with_context(|| format!("Invalid ELEMENTS_TOLERANCE: {}", tolerance))?;
        }

        if let Some(limit) = lookup("ELEMENTS_MITER_LIMIT") {
            self.miter_limit = limit
                .trim()
                .parse()
                .with_context(|| format!("Invalid ELEMENTS_MITER_LIMIT: {}", limit))?;
        }

        if let Some(check) = lookup("ELEMENTS_CHECK_SELF_INTERSECTION") {
            self.check_self_intersection = match check.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" => false,
                _ => bail!("Invalid ELEMENTS_CHECK_SELF_INTERSECTION: {}", check),
            };
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            bail!("tolerance must be finite and positive, got {}", self.tolerance);
        }
        if !self.miter_limit.is_finite() || self.miter_limit < 1.0 {
            bail!("miter_limit must be at least 1, got {}", self.miter_limit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = KernelConfig::default();
        assert_eq!(config.tolerance, 1e-5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elements.toml");
        let config = KernelConfig {
            tolerance: 1e-3,
            miter_limit: 4.0,
            check_self_intersection: true,
        };
        config.save(&path).unwrap();
        assert_eq!(KernelConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elements.toml");
        std::fs::write(&path, "tolerance = 0.01\n").unwrap();
        let config = KernelConfig::from_file(&path).unwrap();
        assert_eq!(config.tolerance, 0.01);
        assert_eq!(config.miter_limit, 2.0);
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let owned: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| owned.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
    }

    #[test]
    fn test_overrides() {
        let mut config = KernelConfig::default();
        config
            .apply_overrides(vars(&[
                ("ELEMENTS_TOLERANCE", "0.001"),
                ("ELEMENTS_MITER_LIMIT", " 3 "),
                ("ELEMENTS_CHECK_SELF_INTERSECTION", "TRUE"),
            ]))
            .unwrap();
        assert_eq!(config.tolerance, 0.001);
        assert_eq!(config.miter_limit, 3.0);
        assert!(config.check_self_intersection);

        config
            .apply_overrides(vars(&[("ELEMENTS_CHECK_SELF_INTERSECTION", "0")]))
            .unwrap();
        assert!(!config.check_self_intersection);
        assert_eq!(config.tolerance, 0.001);
    }

    #[test]
    fn test_malformed_overrides_rejected() {
        for (name, value) in [
            ("ELEMENTS_TOLERANCE", "tiny"),
            ("ELEMENTS_MITER_LIMIT", ""),
            ("ELEMENTS_CHECK_SELF_INTERSECTION", "maybe"),
        ] {
            let mut config = KernelConfig::default();
            let err = config.apply_overrides(vars(&[(name, value)])).unwrap_err();
            assert!(err.to_string().contains(name), "{}", err);
        }
    }

    #[test]
    fn test_load_reads_environment() {
        // The only test that touches the process environment.
        std::env::set_var("ELEMENTS_MITER_LIMIT", "5");
        std::env::set_var("ELEMENTS_CHECK_SELF_INTERSECTION", "yes");
        let loaded = KernelConfig::load();
        std::env::set_var("ELEMENTS_TOLERANCE", "-1");
        let invalid = KernelConfig::load();
        std::env::remove_var("ELEMENTS_MITER_LIMIT");
        std::env::remove_var("ELEMENTS_CHECK_SELF_INTERSECTION");
        std::env::remove_var("ELEMENTS_TOLERANCE");

        let loaded = loaded.unwrap();
        assert_eq!(loaded.miter_limit, 5.0);
        assert!(loaded.check_self_intersection);
        assert!(invalid.is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elements.toml");
        std::fs::write(&path, "tolerance = -1.0\n").unwrap();
        assert!(KernelConfig::from_file(&path).is_err());

        let config = KernelConfig {
            miter_limit: 0.5,
            ..KernelConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
