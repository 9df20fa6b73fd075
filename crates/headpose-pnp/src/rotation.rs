//! Rodrigues axis-angle conversions.
//!
//! A rotation vector `r` encodes a rotation of `|r|` radians about the unit
//! axis `r / |r|`. Matrices are row-major `[[f64; 3]; 3]`.

use glam::{DMat3, DQuat, DVec3};

/// Below this angle the first-order expansion `I + [r]x` is used.
const SMALL_ANGLE: f64 = 1e-12;

/// Convert a row-major array matrix to a glam matrix.
pub(crate) fn mat3_from_rows(r: &[[f64; 3]; 3]) -> DMat3 {
    DMat3::from_cols(
        DVec3::new(r[0][0], r[1][0], r[2][0]),
        DVec3::new(r[0][1], r[1][1], r[2][1]),
        DVec3::new(r[0][2], r[1][2], r[2][2]),
    )
}

/// Convert a glam matrix to a row-major array matrix.
pub(crate) fn mat3_to_rows(m: &DMat3) -> [[f64; 3]; 3] {
    [
        m.row(0).to_array(),
        m.row(1).to_array(),
        m.row(2).to_array(),
    ]
}

/// Rotation vector to glam rotation matrix (Rodrigues' formula).
pub(crate) fn exp_so3(rvec: DVec3) -> DMat3 {
    let theta = rvec.length();
    if theta < SMALL_ANGLE {
        // I + [r]x
        return DMat3::from_cols(
            DVec3::new(1.0, rvec.z, -rvec.y),
            DVec3::new(-rvec.z, 1.0, rvec.x),
            DVec3::new(rvec.y, -rvec.x, 1.0),
        );
    }
    DMat3::from_axis_angle(rvec / theta, theta)
}

/// Convert a Rodrigues rotation vector to a 3x3 rotation matrix.
///
/// # Example
///
/// ```
/// use headpose_pnp::rodrigues_to_matrix;
///
/// let r = rodrigues_to_matrix(&[0.0, 0.0, std::f64::consts::FRAC_PI_2]);
/// assert!((r[0][1] + 1.0).abs() < 1e-12);
/// assert!((r[1][0] - 1.0).abs() < 1e-12);
/// ```
pub fn rodrigues_to_matrix(rvec: &[f64; 3]) -> [[f64; 3]; 3] {
    mat3_to_rows(&exp_so3(DVec3::from_array(*rvec)))
}

/// Convert a 3x3 rotation matrix to a Rodrigues rotation vector.
///
/// The returned angle lies in `[0, pi]`.
pub fn matrix_to_rodrigues(rotation: &[[f64; 3]; 3]) -> [f64; 3] {
    let q = DQuat::from_mat3(&mat3_from_rows(rotation)).normalize();
    // pick the hemisphere with w >= 0 so the angle stays within [0, pi]
    let q = if q.w < 0.0 {
        DQuat::from_xyzw(-q.x, -q.y, -q.z, -q.w)
    } else {
        q
    };
    let v = DVec3::new(q.x, q.y, q.z);
    let s = v.length();
    if s < SMALL_ANGLE {
        return (2.0 * v).to_array();
    }
    let angle = 2.0 * s.atan2(q.w);
    (v * (angle / s)).to_array()
}
