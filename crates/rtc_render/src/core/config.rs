//! # Frame Context Configuration
//!
//! Tunable defaults the frame context restores at the start of every frame,
//! plus the top-level application settings used by hosts such as the demo.
//!
//! ## Configuration Categories
//!
//! - **Frame Config**: pick depth range, line width, matrix pool sizing
//! - **Application Config**: log level, frame count, and the frame config

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};

/// Default near plane for pick-depth rendering
pub const DEFAULT_PICK_Z_NEAR: f64 = 0.01;

/// Default far plane for pick-depth rendering
pub const DEFAULT_PICK_Z_FAR: f64 = 5000.0;

/// # Frame Configuration
///
/// Values `FrameContext::reset` writes back into the frame state, and the
/// number of RTC matrix buffers to allocate up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Near clip distance for pick-depth rendering
    pub pick_z_near: f64,
    /// Far clip distance for pick-depth rendering
    pub pick_z_far: f64,
    /// Line width restored at reset
    pub line_width: f32,
    /// Matrix buffers allocated before the first frame
    pub matrix_pool_capacity: usize,
}

impl FrameConfig {
    /// Create a frame configuration with the default values
    pub fn new() -> Self {
        Self {
            pick_z_near: DEFAULT_PICK_Z_NEAR,
            pick_z_far: DEFAULT_PICK_Z_FAR,
            line_width: 1.0,
            matrix_pool_capacity: 0,
        }
    }

    /// Set the pick-depth clip range
    pub fn with_pick_depth_range(mut self, near: f64, far: f64) -> Self {
        self.pick_z_near = near;
        self.pick_z_far = far;
        self
    }

    /// Set the line width restored at reset
    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    /// Pre-size the RTC matrix pool
    pub fn with_matrix_pool_capacity(mut self, capacity: usize) -> Self {
        self.matrix_pool_capacity = capacity;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.pick_z_near.is_finite() || self.pick_z_near <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "pick_z_near must be finite and positive, got {}",
                self.pick_z_near
            )));
        }

        if !self.pick_z_far.is_finite() || self.pick_z_far <= self.pick_z_near {
            return Err(ConfigError::Invalid(format!(
                "pick_z_far ({}) must be finite and greater than pick_z_near ({})",
                self.pick_z_far, self.pick_z_near
            )));
        }

        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "line_width must be positive, got {}",
                self.line_width
            )));
        }

        Ok(())
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Application Configuration
///
/// Top-level configuration for a host driving the frame context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Log level filter (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
    /// Number of frames to render
    pub frames: u32,
    /// Frame context configuration
    pub frame: FrameConfig,
}

impl ApplicationConfig {
    /// Create a new application configuration with defaults
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            frames: 3,
            frame: FrameConfig::default(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the number of frames to render
    pub fn with_frames(mut self, frames: u32) -> Self {
        self.frames = frames;
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(ConfigError::Invalid(format!("unknown log level '{}'", self.log_level)));
        }
        self.frame.validate()
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for ApplicationConfig {}

impl Config for FrameConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_frame_config_is_valid() {
        let config = FrameConfig::default();

        assert_eq!(config.pick_z_near, DEFAULT_PICK_Z_NEAR);
        assert_eq!(config.pick_z_far, DEFAULT_PICK_Z_FAR);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_pick_range_rejected() {
        let config = FrameConfig::new().with_pick_depth_range(10.0, 1.0);

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_line_width_rejected() {
        let config = FrameConfig::new().with_line_width(0.0);

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let config = ApplicationConfig::new().with_log_level("chatty");

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ApplicationConfig = toml::from_str(
            "frames = 8\n\n[frame]\nmatrix_pool_capacity = 64\n",
        ).unwrap();

        assert_eq!(config.frames, 8);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.frame.matrix_pool_capacity, 64);
        assert_eq!(config.frame.pick_z_far, DEFAULT_PICK_Z_FAR);
    }

    #[test]
    fn test_ron_roundtrip_through_file() {
        let path = std::env::temp_dir().join(format!("rtc_render_config_{}.ron", std::process::id()));
        let config = ApplicationConfig::new()
            .with_frames(12)
            .with_log_level("debug");

        config.save_to_file(&path).unwrap();
        let loaded = ApplicationConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = FrameConfig::load_from_file("frame.yaml");

        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
