//! Iterative PnP: Levenberg–Marquardt refinement from an explicit initial pose.
//!
//! Unlike closed-form solvers, the result depends on the seed. Iterative PnP
//! can settle in a mirrored optimum with the object behind the camera, so
//! callers pass a seed that already places the object in front of it.

use crate::camera::CameraIntrinsics;
use crate::pnp::{PnPError, PnPResult, PnPSolver};
use crate::refine::{refine_pose_lm, LMParams};
use crate::rotation::rodrigues_to_matrix;

/// Initial pose handed to the iterative solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseGuess {
    /// Axis-angle rotation seed.
    pub rvec: [f64; 3],
    /// Translation seed, in world units.
    pub tvec: [f64; 3],
}

impl Default for PoseGuess {
    fn default() -> Self {
        Self {
            rvec: [0.0; 3],
            tvec: [0.0, 0.0, 1.0],
        }
    }
}

/// Parameters controlling the iterative solver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IterativeParams {
    /// Pose the refinement starts from.
    pub guess: PoseGuess,
    /// Levenberg–Marquardt settings.
    pub lm: LMParams,
}

/// Marker type representing the seeded iterative PnP algorithm.
pub struct IterativePnP;

impl PnPSolver for IterativePnP {
    type Param = IterativeParams;

    fn solve(
        world: &[[f64; 3]],
        image: &[[f64; 2]],
        k: &[[f64; 3]; 3],
        params: &Self::Param,
    ) -> Result<PnPResult, PnPError> {
        // validates the matrix shape before any projection
        CameraIntrinsics::from_matrix(k)?;

        if world.len() != image.len() {
            return Err(PnPError::MismatchedArrayLengths {
                left_name: "world points",
                left_len: world.len(),
                right_name: "image points",
                right_len: image.len(),
            });
        }
        if world.len() < 4 {
            return Err(PnPError::InsufficientCorrespondences {
                required: 4,
                actual: world.len(),
            });
        }

        let mut rvec = params.guess.rvec;
        let mut tvec = params.guess.tvec;
        let summary = refine_pose_lm(world, image, k, &mut rvec, &mut tvec, &params.lm)?;

        Ok(PnPResult {
            rotation: rodrigues_to_matrix(&rvec),
            translation: tvec,
            rvec,
            reproj_rmse: Some(summary.rmse),
            num_iterations: Some(summary.iterations),
            converged: Some(summary.converged),
        })
    }
}
