use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_USER_COLUMN: &str = "user_id";
pub const DEFAULT_ITEM_COLUMN: &str = "game";
pub const DEFAULT_BEHAVIOR_COLUMN: &str = "behavior";
pub const DEFAULT_MAGNITUDE_COLUMN: &str = "value";

/// Behaviour tag that marks genuine usage rather than ownership
pub const DEFAULT_ACTIVE_BEHAVIOR: &str = "play";

/// Names of the four columns the engine needs out of a raw batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub user_id: String,
    pub item_id: String,
    pub behavior: String,
    pub magnitude: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER_COLUMN.to_string(),
            item_id: DEFAULT_ITEM_COLUMN.to_string(),
            behavior: DEFAULT_BEHAVIOR_COLUMN.to_string(),
            magnitude: DEFAULT_MAGNITUDE_COLUMN.to_string(),
        }
    }
}

impl FieldMapping {
    /// `(field, column)` pairs in a fixed order
    pub fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("user_id", self.user_id.as_str()),
            ("item_id", self.item_id.as_str()),
            ("behavior", self.behavior.as_str()),
            ("magnitude", self.magnitude.as_str()),
        ]
    }
}

/// How repeated (user, item) interactions collapse into one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Add magnitudes up; magnitudes are cumulative usage
    #[default]
    Sum,
    /// Arithmetic mean of the repeated magnitudes
    Mean,
    /// Largest repeated magnitude
    Max,
}

/// Configuration for fitting an engine snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub fields: FieldMapping,
    pub active_behavior: String,
    pub duplicate_policy: DuplicatePolicy,
    /// Upper bound on distinct items; the similarity matrix is items x items
    pub max_items: Option<usize>,
    /// Compute similarity rows on the rayon pool
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fields: FieldMapping::default(),
            active_behavior: DEFAULT_ACTIVE_BEHAVIOR.to_string(),
            duplicate_policy: DuplicatePolicy::Sum,
            max_items: None,
            parallel: false,
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON config; absent keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let pairs = self.fields.pairs();
        for (field, column) in &pairs {
            if column.trim().is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "column name for '{}' is blank",
                    field
                )));
            }
        }
        for (i, (field, column)) in pairs.iter().enumerate() {
            if let Some((other, _)) = pairs[i + 1..].iter().find(|(_, c)| c == column) {
                return Err(Error::InvalidConfig(format!(
                    "'{}' and '{}' both map to column '{}'",
                    field, other, column
                )));
            }
        }
        if self.active_behavior.trim().is_empty() {
            return Err(Error::InvalidConfig("active behavior tag is blank".to_string()));
        }
        if self.max_items == Some(0) {
            return Err(Error::InvalidConfig("max_items must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.active_behavior, "play");
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Sum);
        assert_eq!(config.fields.item_id, "game");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(
            r#"{"duplicate_policy": "mean", "fields": {"item_id": "title"}}"#,
        )
        .unwrap();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Mean);
        assert_eq!(config.fields.item_id, "title");
        assert_eq!(config.fields.user_id, "user_id");
        assert_eq!(config.active_behavior, "play");
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut config = EngineConfig::default();
        config.fields.behavior = "game".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_blank_behavior_rejected() {
        let config = EngineConfig {
            active_behavior: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_max_items_rejected() {
        let config = EngineConfig {
            max_items: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            EngineConfig::from_json("{not json"),
            Err(Error::InvalidConfig(_))
        ));
    }
}
