//! # 3D Camera
//!
//! Double-precision perspective camera. Positions are kept in `f64` so a
//! camera placed millions of units from the world origin still produces an
//! exact view matrix; the frame context re-bases that matrix per RTC origin
//! before anything is narrowed to `f32`.

use crate::foundation::math::{DVec3, DMat4, Mat4Ext, utils};

/// 3D perspective camera
///
/// # Coordinate System
/// Right-handed, Y-up view space:
/// - X+ = Right
/// - Y+ = Up
/// - Z+ = Towards the viewer
///
/// Matrices are computed on demand from the camera parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: DVec3,

    /// Point the camera is looking at in world space
    pub target: DVec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: DVec3,

    /// Field of view angle in radians
    pub fov: f64,

    /// Aspect ratio (width / height)
    pub aspect: f64,

    /// Distance to near clipping plane
    pub near: f64,

    /// Distance to far clipping plane
    pub far: f64,
}

impl Camera {
    /// Create a new perspective camera with standard Y-up orientation
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Field of view angle in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// # Example
    /// ```rust
    /// use rtc_render::foundation::math::DVec3;
    /// use rtc_render::render::primitives::Camera;
    ///
    /// let camera = Camera::perspective(
    ///     DVec3::new(6_378_137.0, 0.0, 50.0),
    ///     60.0,
    ///     16.0 / 9.0,
    ///     0.1,
    ///     10_000.0,
    /// );
    /// assert!(camera.fov > 1.0);
    /// ```
    pub fn perspective(position: DVec3, fov_degrees: f64, aspect: f64, near: f64, far: f64) -> Self {
        Self {
            position,
            target: DVec3::zeros(),
            up: DVec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: DVec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Update camera target (look-at point)
    pub fn set_target(&mut self, target: DVec3) {
        self.target = target;
        log::trace!("Camera target updated to: {:?}", target);
    }

    /// World-to-view transformation matrix
    pub fn get_view_matrix(&self) -> DMat4 {
        DMat4::look_at(self.position, self.target, self.up)
    }

    /// Perspective projection matrix
    pub fn get_projection_matrix(&self) -> DMat4 {
        DMat4::perspective(self.fov, self.aspect, self.near, self.far)
    }
}

impl Default for Camera {
    /// Camera above and behind the origin, looking at it
    ///
    /// - Position: (0, 3, 3)
    /// - FOV: 45 degrees
    /// - Aspect: 16:9
    /// - Near / Far: 0.1 / 1000
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, 3.0, 3.0),
            target: DVec3::zeros(),
            up: DVec3::new(0.0, 1.0, 0.0),
            fov: std::f64::consts::FRAC_PI_4,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}
