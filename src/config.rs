//! share format configuration
//!
//! Loaded from JSON with `serde_json`; missing fields take their defaults.
//! # Example
//! ```
//! use shamir39::Config;
//!
//! let config = Config::from_json("{}").unwrap();
//! assert_eq!(config.version, "shamir39-p1");
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// version tag written as the first word of every share
pub const DEFAULT_VERSION: &str = "shamir39-p1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_owned(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// the version tag must be a single non-empty word
    pub fn validate(&self) -> Result<()> {
        if self.version.is_empty() || self.version.chars().any(char::is_whitespace) {
            return Err(Error::Config(format!(
                "version tag must be a single word, got {:?}",
                self.version
            )));
        }
        Ok(())
    }
}

#[test]
fn test_config_json() {
    let config = Config::from_json(r#"{"version": "shamir39-p2"}"#).unwrap();
    assert_eq!(config.version, "shamir39-p2");
    let json = config.to_json().unwrap();
    assert_eq!(Config::from_json(&json).unwrap(), config);
    assert_eq!(Config::from_json("{}").unwrap(), Config::default());
}

#[test]
fn test_config_invalid() {
    assert!(matches!(
        Config::from_json(r#"{"version": ""}"#),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        Config::from_json(r#"{"version": "two words"}"#),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        Config::from_json(r#"{"bits": 8}"#),
        Err(Error::Config(_))
    ));
    assert!(matches!(Config::from_json("[1"), Err(Error::Config(_))));
}
