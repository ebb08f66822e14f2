//! Player configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use stepview_core::DEFAULT_STRIDE;

use crate::error::ConfigError;

pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 60;

/// Configuration for a [`Player`](crate::Player).
///
/// Every field is supplied explicitly; the player never looks settings up on
/// its own. Validated at player construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerConfig {
    /// Operations between checkpoints.
    #[serde(default = "default_stride")]
    pub stride: usize,
    /// Target frame rate, one operation per frame.
    #[serde(default = "default_fps")]
    pub frames_per_second: u32,
    /// Most operations a single tick may advance.
    #[serde(default = "default_per_tick_cap")]
    pub per_tick_cap: u32,
    /// Most operations any rolling one-second window may advance.
    #[serde(default = "default_per_second_cap")]
    pub per_second_cap: u32,
    /// Early-tick tolerance in milliseconds.
    #[serde(default = "default_jitter_budget_ms")]
    pub jitter_budget_ms: u64,
    /// Whether the player offers stepping backwards.
    #[serde(default = "default_true")]
    pub allow_step_back: bool,
}

fn default_stride() -> usize {
    DEFAULT_STRIDE
}

fn default_fps() -> u32 {
    24
}

fn default_per_tick_cap() -> u32 {
    8
}

fn default_per_second_cap() -> u32 {
    1000
}

fn default_jitter_budget_ms() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            stride: default_stride(),
            frames_per_second: default_fps(),
            per_tick_cap: default_per_tick_cap(),
            per_second_cap: default_per_second_cap(),
            jitter_budget_ms: default_jitter_budget_ms(),
            allow_step_back: true,
        }
    }
}

impl PlayerConfig {
    /// Set the checkpoint stride.
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Set the frame rate.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.frames_per_second = fps;
        self
    }

    /// Set the per-tick and per-second operation caps.
    pub fn with_caps(mut self, per_tick: u32, per_second: u32) -> Self {
        self.per_tick_cap = per_tick;
        self.per_second_cap = per_second;
        self
    }

    /// Set the jitter budget in milliseconds.
    pub fn with_jitter_budget_ms(mut self, millis: u64) -> Self {
        self.jitter_budget_ms = millis;
        self
    }

    /// Allow or deny stepping back.
    pub fn with_step_back(mut self, allowed: bool) -> Self {
        self.allow_step_back = allowed;
        self
    }

    /// Jitter budget as a duration.
    pub fn jitter_budget(&self) -> Duration {
        Duration::from_millis(self.jitter_budget_ms)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stride == 0 {
            return Err(ConfigError::ZeroStride);
        }
        validate_fps(self.frames_per_second)?;
        validate_caps(self.per_tick_cap, self.per_second_cap)?;
        if self.jitter_budget_ms >= 1000 {
            return Err(ConfigError::JitterTooLarge {
                millis: self.jitter_budget_ms,
            });
        }
        Ok(())
    }
}

pub(crate) fn validate_fps(fps: u32) -> Result<(), ConfigError> {
    if (MIN_FPS..=MAX_FPS).contains(&fps) {
        Ok(())
    } else {
        Err(ConfigError::FpsOutOfRange {
            fps,
            min: MIN_FPS,
            max: MAX_FPS,
        })
    }
}

pub(crate) fn validate_caps(per_tick: u32, per_second: u32) -> Result<(), ConfigError> {
    if per_tick == 0 {
        return Err(ConfigError::ZeroCap {
            name: "per_tick_cap",
        });
    }
    if per_second == 0 {
        return Err(ConfigError::ZeroCap {
            name: "per_second_cap",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PlayerConfig::default();
        assert_eq!(config.stride, 200);
        assert_eq!(config.per_tick_cap, 8);
        assert_eq!(config.per_second_cap, 1000);
        assert_eq!(config.jitter_budget(), Duration::from_millis(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert_eq!(
            PlayerConfig::default().with_stride(0).validate(),
            Err(ConfigError::ZeroStride)
        );
        assert!(matches!(
            PlayerConfig::default().with_fps(0).validate(),
            Err(ConfigError::FpsOutOfRange { fps: 0, .. })
        ));
        assert!(matches!(
            PlayerConfig::default().with_fps(61).validate(),
            Err(ConfigError::FpsOutOfRange { fps: 61, .. })
        ));
        assert_eq!(
            PlayerConfig::default().with_caps(0, 10).validate(),
            Err(ConfigError::ZeroCap {
                name: "per_tick_cap"
            })
        );
        assert_eq!(
            PlayerConfig::default().with_caps(1, 0).validate(),
            Err(ConfigError::ZeroCap {
                name: "per_second_cap"
            })
        );
        assert!(PlayerConfig::default()
            .with_jitter_budget_ms(1000)
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: PlayerConfig = toml::from_str("frames_per_second = 60\nstride = 50\n").unwrap();
        assert_eq!(config.frames_per_second, 60);
        assert_eq!(config.stride, 50);
        assert_eq!(config.per_tick_cap, 8);
        assert!(config.allow_step_back);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result: Result<PlayerConfig, _> = toml::from_str("fps = 60\n");
        assert!(result.is_err());
    }
}
