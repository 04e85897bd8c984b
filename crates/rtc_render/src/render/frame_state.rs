//! # Frame State
//!
//! The flat bag of per-frame rendering state the renderer writes before and
//! during traversal and every drawable reads while it draws.
//!
//! ## Lifecycle
//!
//! One `FrameState` exists per scene. It is never reallocated: `reset`
//! overwrites every field in place at the start of a frame, keeping the
//! capacity of the snap-pick map.
//!
//! ## Field Groups
//!
//! - **Quality flags**: set by the renderer before traversal, read-only to drawables
//! - **Statistics**: incremented by drawables as they issue draw calls
//! - **Pass and transform slots**: pass index, shadow and pick matrices
//! - **Pick configuration**: depth range, invisible picking, element range
//! - **Snap-pick**: written by drawables during a snap pass, read back afterwards

use std::collections::HashMap;

use serde::{Serialize, Deserialize};

use crate::core::config::FrameConfig;
use crate::foundation::math::{DMat4, DVec3};

/// Handle of the rendering surface a frame is drawn into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SurfaceId(pub u64);

/// Vertex winding that counts as front-facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FrontFace {
    /// Clockwise winding is front-facing
    #[default]
    Clockwise,
    /// Counter-clockwise winding is front-facing
    CounterClockwise,
}

/// Per-frame draw statistics
///
/// Profiling only; nothing in the renderer branches on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameStats {
    /// Indexed draw calls issued
    pub draw_elements: u32,
    /// Non-indexed draw calls issued
    pub draw_arrays: u32,
    /// Program binds
    pub use_program: u32,
    /// Texture binds
    pub bind_texture: u32,
    /// Vertex array binds
    pub bind_array: u32,
}

impl FrameStats {
    /// Indexed plus non-indexed draw calls
    pub const fn total_draws(&self) -> u32 {
        self.draw_elements + self.draw_arrays
    }
}

/// Sub-range of elements to draw, used for partial pick draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementRange {
    /// Number of elements
    pub count: u32,
    /// First element
    pub offset: u32,
}

/// Parameters recorded for one snap-pick layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPickLayer {
    /// RTC origin of the geometry drawn into the layer
    pub origin: DVec3,
    /// Scale applied to the layer's quantized coordinates
    pub coordinate_scale: DVec3,
}

/// Snap-pick bookkeeping shared between drawables and the renderer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapPickState {
    /// Next layer index to be written
    pub layer_number: u32,
    /// Parameters of every layer written this frame
    pub layer_params: HashMap<u32, SnapPickLayer>,
    /// Coordinate scale of the layer currently being drawn
    pub coordinate_scale: DVec3,
    /// Origin of the layer currently being drawn
    pub origin: DVec3,
}

impl SnapPickState {
    fn reset(&mut self) {
        self.layer_number = 0;
        self.layer_params.clear();
        self.coordinate_scale = DVec3::zeros();
        self.origin = DVec3::zeros();
    }
}

/// Rendering state for the frame currently being drawn
#[derive(Debug, Clone)]
pub struct FrameState {
    /// Surface the frame is drawn into, re-read from the scene at reset
    pub surface: SurfaceId,
    /// Last program bound this frame
    pub last_program_id: Option<u32>,

    /// Physically-based shading for triangle surfaces
    pub pbr_enabled: bool,
    /// Color textures for triangle surfaces
    pub color_texture_enabled: bool,
    /// Scalable ambient obscurance is active
    pub with_sao: bool,
    /// Back faces are drawn (culling disabled)
    pub backfaces: bool,
    /// Winding considered front-facing
    pub front_face: FrontFace,

    /// Next free texture unit
    pub texture_unit: u32,
    /// Draw statistics
    pub stats: FrameStats,

    /// Index of the active render pass (e.g. left/right eye)
    pub pass: u32,

    /// View matrix used when rendering shadow maps
    pub shadow_view_matrix: Option<DMat4>,
    /// Projection matrix used when rendering shadow maps
    pub shadow_proj_matrix: Option<DMat4>,
    /// View matrix for ray picking; falls back to the camera when unset
    pub pick_view_matrix: Option<DMat4>,
    /// Projection matrix for ray picking; falls back to the camera when unset
    pub pick_proj_matrix: Option<DMat4>,

    /// Near clip distance for pick-depth rendering
    pub pick_z_near: f64,
    /// Far clip distance for pick-depth rendering
    pub pick_z_far: f64,
    /// Invisible objects take part in picking
    pub pick_invisible: bool,
    /// Restrict pick draws to an element range
    pub pick_elements: Option<ElementRange>,

    /// Current line width
    pub line_width: f32,

    /// Snap-pick layer bookkeeping
    pub snap_pick: SnapPickState,
}

impl FrameState {
    /// Create a state holding the defaults from `config`
    pub fn new(surface: SurfaceId, config: &FrameConfig) -> Self {
        Self {
            surface,
            last_program_id: None,
            pbr_enabled: false,
            color_texture_enabled: false,
            with_sao: false,
            backfaces: false,
            front_face: FrontFace::Clockwise,
            texture_unit: 0,
            stats: FrameStats::default(),
            pass: 0,
            shadow_view_matrix: None,
            shadow_proj_matrix: None,
            pick_view_matrix: None,
            pick_proj_matrix: None,
            pick_z_near: config.pick_z_near,
            pick_z_far: config.pick_z_far,
            pick_invisible: false,
            pick_elements: None,
            line_width: config.line_width,
            snap_pick: SnapPickState::default(),
        }
    }

    /// Restore every field to its default in place
    pub fn reset(&mut self, surface: SurfaceId, config: &FrameConfig) {
        self.surface = surface;
        self.last_program_id = None;
        self.pbr_enabled = false;
        self.color_texture_enabled = false;
        self.with_sao = false;
        self.backfaces = false;
        self.front_face = FrontFace::Clockwise;
        self.texture_unit = 0;
        self.stats = FrameStats::default();
        self.pass = 0;
        self.shadow_view_matrix = None;
        self.shadow_proj_matrix = None;
        self.pick_view_matrix = None;
        self.pick_proj_matrix = None;
        self.pick_z_near = config.pick_z_near;
        self.pick_z_far = config.pick_z_far;
        self.pick_invisible = false;
        self.pick_elements = None;
        self.line_width = config.line_width;
        self.snap_pick.reset();
    }

    /// Record a program bind
    ///
    /// Returns `true` and counts a `use_program` when `program_id` differs from
    /// the last program bound this frame.
    pub fn use_program(&mut self, program_id: u32) -> bool {
        if self.last_program_id == Some(program_id) {
            return false;
        }
        self.last_program_id = Some(program_id);
        self.stats.use_program += 1;
        true
    }

    /// Hand out the next texture unit and count the bind
    pub fn next_texture_unit(&mut self) -> u32 {
        let unit = self.texture_unit;
        self.texture_unit += 1;
        self.stats.bind_texture += 1;
        unit
    }

    /// Record the parameters of a snap-pick layer
    ///
    /// Stores them under the current layer number, makes them the current
    /// snap-pick origin and scale, and advances the layer number. Returns the
    /// index the layer was recorded under.
    pub fn push_snap_pick_layer(&mut self, origin: DVec3, coordinate_scale: DVec3) -> u32 {
        let layer = self.snap_pick.layer_number;
        self.snap_pick.layer_params.insert(layer, SnapPickLayer { origin, coordinate_scale });
        self.snap_pick.origin = origin;
        self.snap_pick.coordinate_scale = coordinate_scale;
        self.snap_pick.layer_number += 1;
        layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dirty_state() -> FrameState {
        let mut state = FrameState::new(SurfaceId(1), &FrameConfig::default());
        state.pbr_enabled = true;
        state.color_texture_enabled = true;
        state.with_sao = true;
        state.backfaces = true;
        state.front_face = FrontFace::CounterClockwise;
        state.pass = 1;
        state.stats = FrameStats {
            draw_elements: 40,
            draw_arrays: 3,
            use_program: 7,
            bind_texture: 9,
            bind_array: 12,
        };
        state.shadow_view_matrix = Some(DMat4::identity());
        state.shadow_proj_matrix = Some(DMat4::identity());
        state.pick_view_matrix = Some(DMat4::identity());
        state.pick_proj_matrix = Some(DMat4::identity());
        state.pick_z_near = 2.0;
        state.pick_z_far = 3.0;
        state.pick_invisible = true;
        state.pick_elements = Some(ElementRange { count: 3, offset: 9 });
        state.line_width = 4.0;
        state.use_program(3);
        state.next_texture_unit();
        state.push_snap_pick_layer(DVec3::new(1.0, 2.0, 3.0), DVec3::new(0.5, 0.5, 0.5));
        state
    }

    #[test]
    fn test_reset_restores_defaults() {
        let config = FrameConfig::default();
        let mut state = dirty_state();

        state.reset(SurfaceId(2), &config);

        let expected = FrameState::new(SurfaceId(2), &config);
        assert_eq!(state.surface, SurfaceId(2));
        assert_eq!(state.stats, FrameStats::default());
        assert_eq!(state.last_program_id, None);
        assert!(!state.pbr_enabled && !state.color_texture_enabled && !state.with_sao && !state.backfaces);
        assert_eq!(state.front_face, FrontFace::Clockwise);
        assert_eq!(state.texture_unit, 0);
        assert_eq!(state.pass, 0);
        assert!(state.shadow_view_matrix.is_none() && state.shadow_proj_matrix.is_none());
        assert!(state.pick_view_matrix.is_none() && state.pick_proj_matrix.is_none());
        assert_eq!(state.pick_z_near, config.pick_z_near);
        assert_eq!(state.pick_z_far, config.pick_z_far);
        assert!(!state.pick_invisible);
        assert_eq!(state.pick_elements, None);
        assert_eq!(state.line_width, 1.0);
        assert_eq!(state.snap_pick, expected.snap_pick);
    }

    #[test]
    fn test_reset_keeps_snap_pick_capacity() {
        let mut state = dirty_state();
        let capacity = state.snap_pick.layer_params.capacity();

        state.reset(SurfaceId(1), &FrameConfig::default());

        assert!(state.snap_pick.layer_params.is_empty());
        assert_eq!(state.snap_pick.layer_params.capacity(), capacity);
    }

    #[test]
    fn test_reset_uses_configured_pick_range() {
        let config = FrameConfig::new().with_pick_depth_range(0.5, 250.0).with_line_width(2.0);
        let mut state = dirty_state();

        state.reset(SurfaceId(1), &config);

        assert_eq!((state.pick_z_near, state.pick_z_far), (0.5, 250.0));
        assert_eq!(state.line_width, 2.0);
    }

    #[test]
    fn test_use_program_counts_only_switches() {
        let mut state = FrameState::new(SurfaceId::default(), &FrameConfig::default());

        assert!(state.use_program(4));
        assert!(!state.use_program(4));
        assert!(state.use_program(5));

        assert_eq!(state.stats.use_program, 2);
        assert_eq!(state.last_program_id, Some(5));
    }

    #[test]
    fn test_texture_units_are_sequential() {
        let mut state = FrameState::new(SurfaceId::default(), &FrameConfig::default());

        let units: Vec<u32> = (0..3).map(|_| state.next_texture_unit()).collect();

        assert_eq!(units, vec![0, 1, 2]);
        assert_eq!(state.stats.bind_texture, 3);
    }

    #[test]
    fn test_snap_pick_layers_are_numbered() {
        let mut state = FrameState::new(SurfaceId::default(), &FrameConfig::default());
        let near = DVec3::new(10.0, 0.0, 0.0);
        let far = DVec3::new(9_000_000.0, 0.0, 0.0);
        let scale = DVec3::new(0.001, 0.001, 0.001);

        assert_eq!(state.push_snap_pick_layer(near, scale), 0);
        assert_eq!(state.push_snap_pick_layer(far, scale), 1);

        assert_eq!(state.snap_pick.layer_number, 2);
        assert_eq!(state.snap_pick.origin, far);
        assert_eq!(state.snap_pick.layer_params[&0].origin, near);
        assert_eq!(state.snap_pick.layer_params[&1].coordinate_scale, scale);
    }

    #[test]
    fn test_total_draws() {
        let stats = FrameStats { draw_elements: 5, draw_arrays: 2, ..FrameStats::default() };

        assert_eq!(stats.total_draws(), 7);
    }
}
