//! Shared configuration for the label-volume paint engine
//!
//! This crate provides the single source of truth for the paint settings
//! that interaction layers read and write: active label, brush radius,
//! slicing mode and the fill-between-slices toggle.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default label written by strokes (0 erases)
pub const DEFAULT_LABEL: u8 = 0;

/// Default brush radius in world units
pub const DEFAULT_RADIUS: f64 = 1.0;

/// Environment variable prefix used by [`PaintConfig::from_env`]
pub const ENV_PREFIX: &str = "LABELPAINT_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// Which volume axis is held fixed while painting a 2D cross-section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlicingMode {
    /// Sagittal-style slices (i fixed)
    I,
    /// j fixed
    J,
    /// k fixed
    K,
    /// Free 3D painting, no axis held
    #[default]
    None,
}

impl SlicingMode {
    /// Index of the fixed axis, if any
    pub fn axis(self) -> Option<usize> {
        match self {
            Self::I => Some(0),
            Self::J => Some(1),
            Self::K => Some(2),
            Self::None => None,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "i" | "x" => Some(Self::I),
            "j" | "y" => Some(Self::J),
            "k" | "z" => Some(Self::K),
            "none" | "" => Some(Self::None),
            _ => None,
        }
    }
}

/// Paint settings read by the engine at stroke time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintConfig {
    /// Label id applied by strokes
    pub active_label: u8,
    /// Brush radius in world units
    pub radius: f64,
    /// Axis held fixed while painting
    pub slicing_mode: SlicingMode,
    /// Propagate same-label strokes across the slices between them
    pub auto_fill_between_slices: bool,
    /// Maximum number of history entries kept (unbounded when `None`)
    pub history_limit: Option<usize>,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            active_label: DEFAULT_LABEL,
            radius: DEFAULT_RADIUS,
            slicing_mode: SlicingMode::None,
            auto_fill_between_slices: false,
            history_limit: None,
        }
    }
}

impl PaintConfig {
    /// Parse a config from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.radius = config.radius.max(0.0);
        Ok(config)
    }

    /// Read overrides from `LABELPAINT_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary key lookup
    ///
    /// Keys are `LABEL`, `RADIUS`, `SLICING`, `AUTOFILL` and `HISTORY_LIMIT`,
    /// each prefixed with [`ENV_PREFIX`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let get = |name: &str| {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key).map(|value| (key, value))
        };
        let invalid = |key: String, value: String| ConfigError::InvalidValue { key, value };

        if let Some((key, value)) = get("LABEL") {
            config.active_label = value.trim().parse().map_err(|_| invalid(key, value))?;
        }
        if let Some((key, value)) = get("RADIUS") {
            match value.trim().parse::<f64>() {
                Ok(radius) if radius.is_finite() => config.radius = radius.max(0.0),
                _ => return Err(invalid(key, value)),
            }
        }
        if let Some((key, value)) = get("SLICING") {
            config.slicing_mode = SlicingMode::parse(&value).ok_or_else(|| invalid(key, value))?;
        }
        if let Some((key, value)) = get("AUTOFILL") {
            config.auto_fill_between_slices = match value.trim() {
                "1" | "true" | "on" => true,
                "0" | "false" | "off" => false,
                _ => return Err(invalid(key, value)),
            };
        }
        if let Some((key, value)) = get("HISTORY_LIMIT") {
            let limit: usize = value.trim().parse().map_err(|_| invalid(key, value))?;
            config.history_limit = (limit > 0).then_some(limit);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = PaintConfig::default();
        assert_eq!(config.active_label, DEFAULT_LABEL);
        assert_eq!(config.radius, DEFAULT_RADIUS);
        assert_eq!(config.slicing_mode, SlicingMode::None);
        assert!(!config.auto_fill_between_slices);
        assert_eq!(config.history_limit, None);
    }

    #[test]
    fn test_slicing_axis() {
        assert_eq!(SlicingMode::I.axis(), Some(0));
        assert_eq!(SlicingMode::K.axis(), Some(2));
        assert_eq!(SlicingMode::None.axis(), None);
    }

    #[test]
    fn test_from_json_partial() {
        let config = PaintConfig::from_json(r#"{"active_label": 5, "slicing_mode": "K"}"#).unwrap();
        assert_eq!(config.active_label, 5);
        assert_eq!(config.slicing_mode, SlicingMode::K);
        assert_eq!(config.radius, DEFAULT_RADIUS);
    }

    #[test]
    fn test_from_json_clamps_radius() {
        let config = PaintConfig::from_json(r#"{"radius": -3.0}"#).unwrap();
        assert_eq!(config.radius, 0.0);
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("LABELPAINT_LABEL", "7"),
            ("LABELPAINT_RADIUS", "2.5"),
            ("LABELPAINT_SLICING", "k"),
            ("LABELPAINT_AUTOFILL", "true"),
            ("LABELPAINT_HISTORY_LIMIT", "16"),
        ]
        .into_iter()
        .collect();

        let config = PaintConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.active_label, 7);
        assert_eq!(config.radius, 2.5);
        assert_eq!(config.slicing_mode, SlicingMode::K);
        assert!(config.auto_fill_between_slices);
        assert_eq!(config.history_limit, Some(16));
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let result = PaintConfig::from_lookup(|key| {
            (key == "LABELPAINT_LABEL").then(|| "300".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_zero_history_limit_is_unbounded() {
        let config = PaintConfig::from_lookup(|key| {
            (key == "LABELPAINT_HISTORY_LIMIT").then(|| "0".to_string())
        })
        .unwrap();
        assert_eq!(config.history_limit, None);
    }
}
