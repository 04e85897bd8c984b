//! # Frame Context
//!
//! Rendering context handed to every drawable while a frame is drawn. It owns
//! the [`FrameState`] and the [`RtcViewCache`], and snapshots the scene's
//! surface and camera matrices when the frame starts.
//!
//! ## Frame Protocol
//!
//! ```text
//! reset(scene)                  once, before any drawable is visited
//!   set pass fields             pass, quality flags, shadow/pick matrices
//!   drawable.draw(&mut ctx)     reads state, looks up RTC matrices, counts draws
//! end_frame() -> FrameStats     optional, closes the frame
//! ```
//!
//! RTC lookups outside an open frame are a programming error and trip a debug
//! assertion. Returned matrices borrow the context, so they cannot be held
//! across the next `reset`.

use crate::core::config::FrameConfig;
use crate::foundation::math::{DMat4, DVec3};
use crate::scene::FrameScene;
use super::frame_state::{FrameState, FrameStats};
use super::rtc_cache::{OriginHash, RtcViewCache};

/// Per-scene rendering context reused across frames
#[derive(Debug)]
pub struct FrameContext {
    /// State of the frame currently being drawn
    pub state: FrameState,
    camera_view: DMat4,
    camera_projection: DMat4,
    rtc: RtcViewCache,
    config: FrameConfig,
    frame_number: u64,
    in_frame: bool,
    pool_high_water: usize,
}

impl FrameContext {
    /// Create a context for `scene`
    ///
    /// No frame is open yet; call [`reset`](Self::reset) before drawing.
    pub fn new(scene: &impl FrameScene, config: FrameConfig) -> Self {
        let rtc = RtcViewCache::with_capacity(config.matrix_pool_capacity);
        let pool_high_water = rtc.pool().len();

        Self {
            state: FrameState::new(scene.surface(), &config),
            camera_view: scene.camera_view_matrix(),
            camera_projection: scene.camera_projection_matrix(),
            rtc,
            config,
            frame_number: 0,
            in_frame: false,
            pool_high_water,
        }
    }

    /// Start a new frame
    ///
    /// Restores every state field to its default, zeroes the statistics,
    /// re-reads the surface and camera from `scene`, and clears both RTC
    /// caches. Does not allocate once the pool has reached its high-water mark.
    pub fn reset(&mut self, scene: &impl FrameScene) {
        self.state.reset(scene.surface(), &self.config);
        self.camera_view = scene.camera_view_matrix();
        self.camera_projection = scene.camera_projection_matrix();
        self.rtc.clear();
        self.frame_number += 1;
        self.in_frame = true;

        log::trace!("Frame {} started on surface {:?}", self.frame_number, self.state.surface);
    }

    /// Close the current frame and return its statistics
    pub fn end_frame(&mut self) -> FrameStats {
        debug_assert!(self.in_frame, "end_frame called without an open frame");
        self.in_frame = false;

        let pool_len = self.rtc.pool().len();
        if pool_len > self.pool_high_water {
            log::debug!(
                "RTC matrix pool high-water mark raised {} -> {} buffers",
                self.pool_high_water, pool_len
            );
            self.pool_high_water = pool_len;
        }

        log::trace!(
            "Frame {} finished: {:?}, {} RTC views, {} RTC pick views",
            self.frame_number, self.state.stats, self.rtc.view_len(), self.rtc.pick_view_len()
        );

        self.state.stats
    }

    /// RTC view matrix for geometry stored relative to `origin`
    ///
    /// Computed from the camera view matrix on the first request for
    /// `origin_hash` this frame; later requests return the same buffer.
    pub fn get_rtc_view_matrix(&mut self, origin_hash: OriginHash, origin: &DVec3) -> &DMat4 {
        self.assert_in_frame();
        self.rtc.view_matrix(&self.camera_view, origin_hash, origin)
    }

    /// RTC pick-view matrix for geometry stored relative to `origin`
    ///
    /// Based on the frame's pick view matrix when one is set, otherwise on the
    /// camera view matrix. Cached separately from the ordinary view matrices,
    /// so set `state.pick_view_matrix` before the first pick lookup of a frame.
    pub fn get_rtc_pick_view_matrix(&mut self, origin_hash: OriginHash, origin: &DVec3) -> &DMat4 {
        self.assert_in_frame();
        let base = self.state.pick_view_matrix.as_ref().unwrap_or(&self.camera_view);
        self.rtc.pick_view_matrix(base, origin_hash, origin)
    }

    /// Effective pick view matrix (falls back to the camera view)
    pub fn pick_view_matrix(&self) -> DMat4 {
        self.state.pick_view_matrix.unwrap_or(self.camera_view)
    }

    /// Effective pick projection matrix (falls back to the camera projection)
    pub fn pick_proj_matrix(&self) -> DMat4 {
        self.state.pick_proj_matrix.unwrap_or(self.camera_projection)
    }

    /// Camera view matrix captured at the last reset
    pub fn camera_view_matrix(&self) -> &DMat4 {
        &self.camera_view
    }

    /// Camera projection matrix captured at the last reset
    pub fn camera_projection_matrix(&self) -> &DMat4 {
        &self.camera_projection
    }

    /// Statistics accumulated so far this frame
    pub fn stats(&self) -> FrameStats {
        self.state.stats
    }

    /// Number of frames started so far
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// True between `reset` and `end_frame`
    pub fn is_in_frame(&self) -> bool {
        self.in_frame
    }

    /// The RTC matrix cache
    pub fn rtc_cache(&self) -> &RtcViewCache {
        &self.rtc
    }

    /// Configuration applied at every reset
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    fn assert_in_frame(&self) {
        debug_assert!(
            self.in_frame,
            "RTC matrix requested outside a frame; call reset() first"
        );
    }
}
