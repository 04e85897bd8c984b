//! # Core Module
//!
//! Shared configuration for the frame context and the hosts that drive it.

pub mod config;

pub use config::{
    ApplicationConfig,
    FrameConfig,
    Config,
    ConfigError,
};
