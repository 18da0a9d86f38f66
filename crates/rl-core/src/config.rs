//! Limiter configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::storage::StorageKeys;
use crate::types::Millis;

const MINUTE_MS: Millis = 60 * 1000;

/// Upper bound for every duration option (one year).
pub const MAX_DURATION_MS: Millis = 365 * 24 * 60 * MINUTE_MS;

/// Static limiter options. Every field has a default, so a partial JSON
/// object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LimiterConfig {
    /// Views allowed per session; the next one engages the block
    pub max_views_per_session: u32,
    /// Cooldown length
    pub block_duration_ms: Millis,
    /// Gap between views after which the session starts over
    pub inactivity_reset_ms: Millis,
    /// Path segment that marks in-scope content, e.g. `reel` for `/reel/<id>`
    pub content_segment: String,
    /// Prefix for every storage key
    pub key_prefix: String,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            max_views_per_session: 20,
            block_duration_ms: 15 * MINUTE_MS,
            inactivity_reset_ms: 10 * MINUTE_MS,
            content_segment: "reel".to_string(),
            key_prefix: "reel_limit.".to_string(),
        }
    }
}

impl LimiterConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_views_per_session == 0 {
            return Err(ConfigError::Invalid {
                field: "maxViewsPerSession",
                reason: "must be greater than zero".to_string(),
            });
        }
        check_duration("blockDurationMs", self.block_duration_ms)?;
        check_duration("inactivityResetMs", self.inactivity_reset_ms)?;
        if self.content_segment.is_empty() || self.content_segment.contains('/') {
            return Err(ConfigError::Invalid {
                field: "contentSegment",
                reason: format!("must be a single path segment, got {:?}", self.content_segment),
            });
        }
        Ok(())
    }

    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::with_prefix(&self.key_prefix)
    }
}

fn check_duration(field: &'static str, value: Millis) -> Result<(), ConfigError> {
    if value <= 0 {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("must be positive, got {value}"),
        });
    }
    if value > MAX_DURATION_MS {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("must be at most {MAX_DURATION_MS}, got {value}"),
        });
    }
    Ok(())
}
