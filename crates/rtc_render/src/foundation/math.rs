//! Math utilities and types
//!
//! Provides the matrix and vector types used by the frame context. Camera and
//! RTC math runs in double precision; the single-precision aliases are what
//! ends up in GPU uniforms.

pub use nalgebra::{
    Vector3,
    Matrix4,
};

/// 3D vector type (single precision, GPU-facing)
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type (single precision, GPU-facing)
pub type Mat4 = Matrix4<f32>;

/// 3D point type (single precision, GPU-facing)
pub type Point3 = nalgebra::Point3<f32>;

/// 3D vector type (double precision)
pub type DVec3 = Vector3<f64>;

/// 4x4 matrix type (double precision)
pub type DMat4 = Matrix4<f64>;

/// 3D point type (double precision)
pub type DPoint3 = nalgebra::Point3<f64>;

/// Math utility functions
pub mod utils {
    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees.to_radians()
    }
}

/// Extension trait for DMat4 with camera matrix constructors
pub trait Mat4Ext {
    /// Create a perspective projection matrix with a [0, 1] depth range
    fn perspective(fov_y: f64, aspect: f64, near: f64, far: f64) -> DMat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: DVec3, target: DVec3, up: DVec3) -> DMat4;
}

impl Mat4Ext for DMat4 {
    fn perspective(fov_y: f64, aspect: f64, near: f64, far: f64) -> DMat4 {
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = DMat4::zeros();

        // Right-handed view space (-Z forward) into [0, 1] depth:
        // P = [a⁻¹/tan(φ/2)    0              0                    0           ]
        //     [0               1/tan(φ/2)     0                    0           ]
        //     [0               0              f/(n-f)              -nf/(f-n)   ]
        //     [0               0              -1                   0           ]
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = far / (near - far);
        result[(2, 3)] = -(near * far) / (far - near);
        result[(3, 2)] = -1.0;

        result
    }

    fn look_at(eye: DVec3, target: DVec3, up: DVec3) -> DMat4 {
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = DMat4::new(
            1.0, 0.0, 0.0, -eye.x,
            0.0, 1.0, 0.0, -eye.y,
            0.0, 0.0, 1.0, -eye.z,
            0.0, 0.0, 0.0, 1.0,
        );

        let rotation = DMat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }
}

/// Transform an RTC center into the view space of `view`.
///
/// This is `R·origin + t` where `R` and `t` are the rotation/scale block and
/// translation column of the view matrix. With a camera far from the world
/// origin both terms are large and nearly cancel, so this has to run in
/// double precision.
pub fn rtc_center_view(view: &DMat4, origin: &DVec3) -> DVec3 {
    view.fixed_view::<3, 3>(0, 0) * origin + view.fixed_view::<3, 1>(0, 3)
}

/// Build the relative-to-center view matrix for `origin` into `out`.
///
/// The result keeps the rotation of `view` and replaces its translation with
/// the view-space position of `origin`, so for any world point `p`:
///
/// ```text
/// out · (p - origin) == view · p
/// ```
///
/// Geometry stored relative to `origin` therefore lands in the same place as
/// the absolute geometry would under `view`, but without ever pushing large
/// world coordinates through single-precision arithmetic.
pub fn create_rtc_view_mat(view: &DMat4, origin: &DVec3, out: &mut DMat4) {
    let center = rtc_center_view(view, origin);
    out.copy_from(view);
    out.fixed_view_mut::<3, 1>(0, 3).copy_from(&center);
}

/// Downcast a double-precision matrix for upload as a uniform.
pub fn to_gpu(matrix: &DMat4) -> Mat4 {
    matrix.cast::<f32>()
}

/// Column-major bytes of a single-precision matrix, ready for a uniform buffer.
pub fn gpu_bytes(matrix: &Mat4) -> &[u8] {
    bytemuck::cast_slice(matrix.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-9;

    fn far_camera_view() -> DMat4 {
        DMat4::look_at(
            DVec3::new(6_378_137.0, 12_000.5, -250_000.25),
            DVec3::new(6_378_100.0, 12_010.0, -250_040.0),
            DVec3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn test_rtc_center_matches_transform_point() {
        let view = far_camera_view();
        let origin = DVec3::new(6_378_000.0, 12_000.0, -250_100.0);

        let expected = view.transform_point(&DPoint3::from(origin));
        let center = rtc_center_view(&view, &origin);

        assert_relative_eq!(center, expected.coords, epsilon = 1e-6);
    }

    #[test]
    fn test_rtc_matrix_keeps_rotation() {
        let view = far_camera_view();
        let origin = DVec3::new(6_378_000.0, 12_000.0, -250_100.0);
        let mut rtc = DMat4::zeros();

        create_rtc_view_mat(&view, &origin, &mut rtc);

        assert_relative_eq!(
            rtc.fixed_view::<3, 3>(0, 0).into_owned(),
            view.fixed_view::<3, 3>(0, 0).into_owned(),
            epsilon = EPSILON
        );
        assert_eq!(rtc.row(3), view.row(3));
    }

    #[test]
    fn test_rtc_rebasing_identity_view() {
        let origin = DVec3::new(1000.0, 0.0, 0.0);
        let mut rtc = DMat4::zeros();

        create_rtc_view_mat(&DMat4::identity(), &origin, &mut rtc);

        assert_eq!(rtc, DMat4::new_translation(&origin));
    }

    #[test]
    fn test_rtc_rebasing_matches_absolute_transform() {
        let view = far_camera_view();
        let origin = DVec3::new(6_378_000.0, 12_000.0, -250_100.0);
        let world = DPoint3::new(6_378_003.5, 12_004.25, -250_098.0);
        let mut rtc = DMat4::zeros();

        create_rtc_view_mat(&view, &origin, &mut rtc);

        let absolute = view.transform_point(&world);
        let rebased = rtc.transform_point(&DPoint3::from(world.coords - origin));
        assert_relative_eq!(rebased, absolute, epsilon = 1e-6);
    }

    #[test]
    fn test_single_precision_rtc_keeps_accuracy() {
        let view = far_camera_view();
        let origin = DVec3::new(6_378_000.0, 12_000.0, -250_100.0);
        let world = DPoint3::new(6_378_003.5, 12_004.25, -250_098.0);
        let mut rtc = DMat4::zeros();

        create_rtc_view_mat(&view, &origin, &mut rtc);

        let reference = view.transform_point(&world).coords;
        let local = (world.coords - origin).cast::<f32>();
        let gpu = to_gpu(&rtc).transform_point(&nalgebra::Point3::from(local));

        assert_relative_eq!(
            gpu.coords.cast::<f64>(),
            reference,
            max_relative = 1e-5,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_gpu_bytes_length() {
        let matrix = to_gpu(&DMat4::identity());
        let bytes = gpu_bytes(&matrix);

        assert_eq!(bytes.len(), 16 * std::mem::size_of::<f32>());
        assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
    }

    #[test]
    fn test_look_at_from_origin_is_identity() {
        let view = DMat4::look_at(
            DVec3::zeros(),
            DVec3::new(0.0, 0.0, -1.0),
            DVec3::new(0.0, 1.0, 0.0),
        );

        assert_relative_eq!(view, DMat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_perspective_maps_clip_planes_to_unit_depth() {
        let (near, far) = (0.1, 1000.0);
        let projection = DMat4::perspective(std::f64::consts::FRAC_PI_3, 1.5, near, far);

        let depth = |z: f64| {
            let clip = projection * nalgebra::Vector4::new(0.0, 0.0, z, 1.0);
            assert!(clip.w > 0.0, "point at view z = {z} got w = {}", clip.w);
            clip.z / clip.w
        };

        assert_relative_eq!(depth(-near), 0.0, epsilon = EPSILON);
        assert_relative_eq!(depth(-far), 1.0, epsilon = EPSILON);
        assert!((0.0..=1.0).contains(&depth(-42.0)));
    }
}
