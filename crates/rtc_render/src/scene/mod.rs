//! Scene collaborator
//!
//! The frame context does not own a scene graph. At the start of each frame
//! it reads the rendering surface and the camera matrices from whatever
//! implements [`FrameScene`]; [`Scene`] is the minimal implementation used by
//! hosts that only need a surface and a camera.

use crate::foundation::math::DMat4;
use crate::render::frame_state::SurfaceId;
use crate::render::primitives::Camera;

/// Read-only view of the scene the frame context renders
pub trait FrameScene {
    /// Surface the next frame is drawn into
    fn surface(&self) -> SurfaceId;

    /// Current camera view matrix
    fn camera_view_matrix(&self) -> DMat4;

    /// Current camera projection matrix
    fn camera_projection_matrix(&self) -> DMat4;
}

/// A rendering surface viewed through a single camera
#[derive(Debug, Clone)]
pub struct Scene {
    surface: SurfaceId,
    /// The scene camera
    pub camera: Camera,
}

impl Scene {
    /// Create a scene drawing into `surface`
    pub fn new(surface: SurfaceId, camera: Camera) -> Self {
        Self { surface, camera }
    }

    /// Point the scene at a different surface (e.g. after a context loss)
    pub fn set_surface(&mut self, surface: SurfaceId) {
        log::debug!("Scene surface changed: {:?} -> {:?}", self.surface, surface);
        self.surface = surface;
    }
}

impl FrameScene for Scene {
    fn surface(&self) -> SurfaceId {
        self.surface
    }

    fn camera_view_matrix(&self) -> DMat4 {
        self.camera.get_view_matrix()
    }

    fn camera_projection_matrix(&self) -> DMat4 {
        self.camera.get_projection_matrix()
    }
}
