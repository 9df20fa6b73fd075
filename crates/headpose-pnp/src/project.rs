//! Projection of world points through a posed pinhole camera.

use glam::DVec3;

use crate::camera::CameraIntrinsics;
use crate::ops::{camera_vectors, project_camera_point, to_camera};
use crate::rotation::exp_so3;

/// Project a single world point with the pose `(rvec, t)`.
///
/// Returns `None` when the point lands on the camera plane (zero depth).
pub fn project_point(
    point: &[f64; 3],
    rvec: &[f64; 3],
    t: &[f64; 3],
    intrinsics: &CameraIntrinsics,
) -> Option<[f64; 2]> {
    let r_mat = exp_so3(DVec3::from_array(*rvec));
    let (intr_x, intr_y) = camera_vectors(intrinsics);
    project_camera_point(
        to_camera(point, &r_mat, &DVec3::from_array(*t)),
        &intr_x,
        &intr_y,
    )
}

/// Project world points with the pose `(rvec, t)`, no lens distortion.
///
/// Points on the camera plane project to non-finite coordinates.
pub fn project_points(
    points: &[[f64; 3]],
    rvec: &[f64; 3],
    t: &[f64; 3],
    intrinsics: &CameraIntrinsics,
) -> Vec<[f64; 2]> {
    let r_mat = exp_so3(DVec3::from_array(*rvec));
    let t_vec = DVec3::from_array(*t);
    let (intr_x, intr_y) = camera_vectors(intrinsics);
    points
        .iter()
        .map(|p| {
            project_camera_point(to_camera(p, &r_mat, &t_vec), &intr_x, &intr_y)
                .unwrap_or([f64::NAN, f64::NAN])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_project_identity_pose() {
        let intrinsics = CameraIntrinsics::pinhole(1000.0, 320.0, 240.0);
        let uv = project_points(
            &[[0.0, 0.0, 0.0], [50.0, 0.0, 0.0], [0.0, -50.0, 0.0]],
            &[0.0, 0.0, 0.0],
            &[0.0, 0.0, 1000.0],
            &intrinsics,
        );
        assert_eq!(uv[0], [320.0, 240.0]);
        assert_eq!(uv[1], [370.0, 240.0]);
        assert_eq!(uv[2], [320.0, 190.0]);
    }

    #[test]
    fn test_project_rotated_pose() {
        // 90 degrees about y maps world x onto camera -z
        let intrinsics = CameraIntrinsics::pinhole(100.0, 0.0, 0.0);
        let uv = project_point(
            &[0.0, 0.0, 10.0],
            &[0.0, std::f64::consts::FRAC_PI_2, 0.0],
            &[0.0, 0.0, 100.0],
            &intrinsics,
        );
        let uv = uv.unwrap_or([f64::NAN, f64::NAN]);
        assert_abs_diff_eq!(uv[0], 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(uv[1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_project_point_on_camera_plane() {
        let intrinsics = CameraIntrinsics::pinhole(100.0, 0.0, 0.0);
        assert!(project_point(&[1.0, 1.0, 0.0], &[0.0; 3], &[0.0; 3], &intrinsics).is_none());
        let uv = project_points(&[[1.0, 1.0, 0.0]], &[0.0; 3], &[0.0; 3], &intrinsics);
        assert!(uv[0][0].is_nan());
    }
}
