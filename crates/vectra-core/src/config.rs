//! Import configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, VectraError};

/// What happens when a wider foreign element does not fit the target kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrowingPolicy {
    /// Native `as` cast: float64 to float32 rounds and overflows to infinity,
    /// int64 to int32 wraps.
    #[default]
    PassThrough,
    /// Finite out-of-range values clamp to the target's min/max. NaN and
    /// infinities are kept as they are.
    Saturate,
}

/// Options for the buffer import path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// How narrowing casts (f64 -> f32, i64 -> i32, u64 -> u32) behave
    #[serde(default = "default_narrowing")]
    pub narrowing: NarrowingPolicy,
}

fn default_narrowing() -> NarrowingPolicy { NarrowingPolicy::PassThrough }

impl Default for ImportConfig {
    fn default() -> Self {
        Self { narrowing: default_narrowing() }
    }
}

impl ImportConfig {
    pub fn saturating() -> Self {
        Self { narrowing: NarrowingPolicy::Saturate }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| VectraError::Config(e.to_string()))
    }
}

/// Load an [`ImportConfig`] from a JSON file.
pub fn load_config(path: &Path) -> Result<ImportConfig> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| VectraError::Config(format!("{}: {}", path.display(), e)))?;
    ImportConfig::from_json_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pass_through() {
        assert_eq!(ImportConfig::default().narrowing, NarrowingPolicy::PassThrough);
    }

    #[test]
    fn test_missing_field_uses_default() {
        let cfg = ImportConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, ImportConfig::default());
    }

    #[test]
    fn test_parse_saturate() {
        let cfg = ImportConfig::from_json_str(r#"{"narrowing": "saturate"}"#).unwrap();
        assert_eq!(cfg, ImportConfig::saturating());
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = ImportConfig::from_json_str(r#"{"narrowing": "round"}"#).unwrap_err();
        assert!(matches!(err, VectraError::Config(_)));
    }

    #[test]
    fn test_serialize_round_trip() {
        let text = serde_json::to_string(&ImportConfig::saturating()).unwrap();
        assert_eq!(text, r#"{"narrowing":"saturate"}"#);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/vectra.json")).unwrap_err();
        assert!(matches!(err, VectraError::Config(_)));
    }
}
