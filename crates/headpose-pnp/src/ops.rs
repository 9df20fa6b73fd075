use glam::{DMat3, DVec3};

use crate::camera::CameraIntrinsics;

/// Depth below which a camera-frame point is treated as lying on the camera plane.
pub(crate) const MIN_DEPTH: f64 = 1e-12;

/// Construct compact intrinsics vectors used for fast projection.
pub(crate) fn intrinsics_as_vectors(k: &[[f64; 3]; 3]) -> (DVec3, DVec3) {
    let fx = k[0][0];
    let fy = k[1][1];
    let cx = k[0][2];
    let cy = k[1][2];
    (DVec3::new(fx, 0.0, cx), DVec3::new(0.0, fy, cy))
}

/// Project a camera-frame point to pixels; `None` when it lies on the camera plane.
#[inline]
pub(crate) fn project_camera_point(pc: DVec3, intr_x: &DVec3, intr_y: &DVec3) -> Option<[f64; 2]> {
    if pc.z.abs() < MIN_DEPTH {
        return None;
    }
    Some([intr_x.dot(pc) / pc.z, intr_y.dot(pc) / pc.z])
}

/// Transform a world point into the camera frame.
#[inline]
pub(crate) fn to_camera(world_point: &[f64; 3], r_mat: &DMat3, t_vec: &DVec3) -> DVec3 {
    *r_mat * DVec3::from_array(*world_point) + *t_vec
}

/// Intrinsics vectors for a [`CameraIntrinsics`].
pub(crate) fn camera_vectors(intrinsics: &CameraIntrinsics) -> (DVec3, DVec3) {
    intrinsics_as_vectors(&intrinsics.to_matrix())
}
