//! Common data types shared across Perspective-n-Point (PnP) solvers.

use thiserror::Error;

/// Error types for PnP solvers.
#[derive(Debug, Error, PartialEq)]
pub enum PnPError {
    /// Invalid input data - insufficient correspondences for the specific solver
    #[error("PnP solver requires at least {required} 2D-3D correspondences, got {actual}")]
    InsufficientCorrespondences {
        /// Minimum number of correspondences required by the solver
        required: usize,
        /// Actual number of correspondences provided
        actual: usize,
    },

    /// Invalid input data - mismatched array lengths with descriptive labels.
    #[error("Mismatched array lengths: {left_name} ({left_len}) != {right_name} ({right_len})")]
    MismatchedArrayLengths {
        /// Label for the left-hand slice
        left_name: &'static str,
        /// Length of the left-hand slice
        left_len: usize,
        /// Label for the right-hand slice
        right_name: &'static str,
        /// Length of the right-hand slice
        right_len: usize,
    },

    /// The intrinsics matrix is not a zero-skew pinhole matrix.
    #[error("Invalid camera intrinsics matrix: {0}")]
    InvalidIntrinsics(String),

    /// The damped normal equations could not be solved at any damping level.
    #[error("Normal equations are singular after {iterations} iterations")]
    SingularSystem {
        /// Number of LM iterations performed before giving up.
        iterations: usize,
    },

    /// The refinement stopped without meeting a convergence criterion.
    #[error("Pose refinement did not converge after {iterations} iterations (rmse {rmse} px)")]
    NotConverged {
        /// Number of LM iterations performed.
        iterations: usize,
        /// Reprojection RMSE of the last accepted pose, in pixels.
        rmse: f64,
    },

    /// The initial guess or the refined pose produced non-finite values.
    #[error("Pose refinement produced non-finite values")]
    NonFinite,
}

/// Result returned by any PnP solver.
///
/// The rotation matrix maps coordinates from the **world** frame to the
/// **camera** frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PnPResult {
    /// Estimated rotation matrix.
    pub rotation: [[f64; 3]; 3],
    /// Estimated translation vector.
    pub translation: [f64; 3],
    /// Rodrigues axis-angle representation of `rotation`.
    pub rvec: [f64; 3],
    /// Optional root-mean-square reprojection error in pixels.
    pub reproj_rmse: Option<f64>,
    /// Optional number of iterations taken by an iterative solver.
    pub num_iterations: Option<usize>,
    /// Indicates whether an iterative solver reported convergence.
    pub converged: Option<bool>,
}

/// Trait implemented by every PnP solver available in this crate.
pub trait PnPSolver {
    /// Parameter object specific to the solver.
    type Param;

    /// Solve for camera pose given 2D-3D correspondences.
    ///
    /// # Arguments
    /// * `world` – 3-D coordinates in the world frame.
    /// * `image` – Corresponding pixel coordinates.
    /// * `k` – Camera intrinsics matrix.
    /// * `params` – Solver-specific parameters.
    fn solve(
        world: &[[f64; 3]],
        image: &[[f64; 2]],
        k: &[[f64; 3]; 3],
        params: &Self::Param,
    ) -> Result<PnPResult, PnPError>;
}
