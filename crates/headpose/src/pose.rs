use headpose_pnp::matrix_to_rodrigues;
use serde::{Deserialize, Serialize};

/// Rigid head transform in the camera frame.
///
/// Stored as a row-major 4x4 matrix: the top-left 3x3 block is the rotation,
/// the last column holds the translation in meters and the bottom row is
/// `[0, 0, 0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadPose {
    matrix: [[f64; 4]; 4],
}

impl HeadPose {
    /// Compose a pose from a rotation matrix and a translation in meters.
    pub fn new(rotation: [[f64; 3]; 3], translation: [f64; 3]) -> Self {
        let mut matrix = [[0.0; 4]; 4];
        for (row, (r, t)) in matrix.iter_mut().zip(rotation.iter().zip(translation)) {
            row[..3].copy_from_slice(r);
            row[3] = t;
        }
        matrix[3][3] = 1.0;
        Self { matrix }
    }

    /// Compose a pose from a solver translation in millimeters.
    pub fn from_millimeters(rotation: [[f64; 3]; 3], translation_mm: [f64; 3]) -> Self {
        Self::new(rotation, translation_mm.map(|v| v / 1000.0))
    }

    /// The full 4x4 matrix.
    pub fn as_matrix(&self) -> &[[f64; 4]; 4] {
        &self.matrix
    }

    /// The 3x3 rotation block.
    pub fn rotation(&self) -> [[f64; 3]; 3] {
        let m = &self.matrix;
        [
            [m[0][0], m[0][1], m[0][2]],
            [m[1][0], m[1][1], m[1][2]],
            [m[2][0], m[2][1], m[2][2]],
        ]
    }

    /// The translation column, in meters.
    pub fn translation(&self) -> [f64; 3] {
        [self.matrix[0][3], self.matrix[1][3], self.matrix[2][3]]
    }

    /// The translation in millimeters.
    pub fn translation_mm(&self) -> [f64; 3] {
        self.translation().map(|v| v * 1000.0)
    }

    /// The translation in whole centimeters, truncated toward zero.
    pub fn translation_cm(&self) -> [i64; 3] {
        self.translation().map(|v| (v * 100.0).trunc() as i64)
    }

    /// The rotation as a Rodrigues vector.
    pub fn rotation_vector(&self) -> [f64; 3] {
        matrix_to_rodrigues(&self.rotation())
    }

    /// Human readable position, e.g. `(3cm, -2cm, 100cm)`.
    pub fn label(&self) -> String {
        let [x, y, z] = self.translation_cm();
        format!("({x}cm, {y}cm, {z}cm)")
    }
}

impl From<HeadPose> for [[f64; 4]; 4] {
    fn from(pose: HeadPose) -> Self {
        pose.matrix
    }
}
