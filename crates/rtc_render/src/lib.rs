//! # RTC Render
//!
//! Per-frame rendering context for scenes whose geometry lives far from the
//! world origin.
//!
//! ## Features
//!
//! - **Frame State**: quality flags, pass index, shadow/pick transforms and draw statistics
//! - **RTC View Matrices**: relative-to-center view matrices computed in double precision
//! - **Per-Frame Memoization**: one matrix per origin per frame, for render and pick passes
//! - **Matrix Pooling**: buffers reused across frames, no steady-state allocation
//! - **Configuration**: TOML/RON configuration with validation
//!
//! ## Quick Start
//!
//! ```rust
//! use rtc_render::prelude::*;
//!
//! let camera = Camera::perspective(DVec3::new(6_378_137.0, 10.0, 50.0), 60.0, 1.5, 0.1, 10_000.0);
//! let scene = Scene::new(SurfaceId(0), camera);
//! let mut frame = FrameContext::new(&scene, FrameConfig::default());
//!
//! frame.reset(&scene);
//! let origin = DVec3::new(6_378_100.0, 0.0, 0.0);
//! let rtc_view = *frame.get_rtc_view_matrix(OriginHash::from_origin(&origin), &origin);
//! frame.state.stats.draw_elements += 1;
//! let stats = frame.end_frame();
//!
//! assert_eq!(stats.draw_elements, 1);
//! assert!(rtc_view.column(3).xyz().norm() < 100.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;

pub mod foundation;
pub mod config;
pub mod render;
pub mod scene;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        core::config::{ApplicationConfig, FrameConfig, Config, ConfigError},
        foundation::math::{DMat4, DVec3, Mat4, Mat4Ext},
        render::{
            Camera, Drawable, FrameContext, FrameState, FrameStats, OriginHash, SurfaceId,
        },
        scene::{FrameScene, Scene},
    };
}
