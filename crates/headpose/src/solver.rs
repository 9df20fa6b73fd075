//! Head pose from one face's landmarks.

use headpose_pnp::{solve_pnp, IterativeParams, LMParams, PnPError, PnPMethod, PnPResult, PoseGuess};

use crate::camera::CameraModel;
use crate::landmarks::FacialLandmarkSet;
use crate::model::ReferenceHeadModel;
use crate::pose::HeadPose;

/// Rotation seed of every solve, as a Rodrigues vector.
///
/// Empirically tuned: it is close to a frontal head in the reference model
/// frame. Starting from zero rotation the iterative solve can settle on the
/// mirror solution with the head behind the camera.
pub const INITIAL_RVEC: [f64; 3] = [1.2, 1.2, -1.2];

/// Translation seed of every solve: one meter in front of the camera, in mm.
pub const INITIAL_TVEC: [f64; 3] = [0.0, 0.0, 1000.0];

/// Fits the reference head model to detected landmarks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseSolver {
    lm: LMParams,
}

impl PoseSolver {
    /// A solver with the given LM settings.
    pub fn new(lm: LMParams) -> Self {
        Self { lm }
    }

    /// Solve the pose and keep the raw solver output (translation in mm).
    ///
    /// The camera's optical center must be set.
    pub fn solve_raw(
        &self,
        camera: &CameraModel,
        landmarks: &FacialLandmarkSet,
    ) -> Result<PnPResult, PnPError> {
        let Some(k) = camera.matrix() else {
            return Err(PnPError::InvalidIntrinsics(
                "optical center is not set".to_string(),
            ));
        };
        let model = ReferenceHeadModel;
        let image_points = model.image_points(landmarks);
        let params = IterativeParams {
            guess: PoseGuess {
                rvec: INITIAL_RVEC,
                tvec: INITIAL_TVEC,
            },
            lm: self.lm.clone(),
        };
        solve_pnp(
            model.points(),
            &image_points,
            &k,
            PnPMethod::Iterative(params),
        )
    }

    /// Solve the pose of one face.
    ///
    /// A refinement that stops without converging is reported as
    /// [`PnPError::NotConverged`].
    pub fn solve(
        &self,
        camera: &CameraModel,
        landmarks: &FacialLandmarkSet,
    ) -> Result<HeadPose, PnPError> {
        let res = self.solve_raw(camera, landmarks)?;
        let iterations = res.num_iterations.unwrap_or_default();
        let rmse = res.reproj_rmse.unwrap_or(f64::NAN);
        if res.converged == Some(false) {
            return Err(PnPError::NotConverged { iterations, rmse });
        }
        log::debug!("Pose solved in {iterations} iterations, rmse {rmse:.4} px");
        Ok(HeadPose::from_millimeters(res.rotation, res.translation))
    }
}
