//! # Rendering Context
//!
//! Per-frame state and relative-to-center matrix caching consumed by a
//! renderer while it traverses a scene.
//!
//! ## Architecture
//!
//! - **FrameContext**: per-scene owner of everything below, reset once per frame
//! - **FrameState**: quality flags, pass index, shadow/pick matrices, statistics
//! - **RtcViewCache**: memoized RTC view and pick-view matrices keyed by origin
//! - **MatrixPool**: reusable matrix buffers backing the cache
//! - **Drawable**: the seam drawables implement to receive the context
//!
//! ## Design Goals
//!
//! - **Precision**: geometry millions of units from the origin renders without
//!   single-precision jitter
//! - **No per-frame churn**: matrix buffers and map capacity are reused frame
//!   after frame

pub mod primitives;

pub mod frame_state;
pub mod matrix_pool;
pub mod rtc_cache;
pub mod frame_context;
pub mod drawable;

pub use primitives::Camera;
pub use frame_state::{FrameState, FrameStats, FrontFace, ElementRange, SnapPickLayer, SnapPickState, SurfaceId};
pub use matrix_pool::{MatrixPool, MatrixSlot};
pub use rtc_cache::{OriginHash, RtcViewCache};
pub use frame_context::FrameContext;
pub use drawable::Drawable;
