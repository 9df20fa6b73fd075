#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Seeded PnP (Perspective-n-Point)
//!
//! Camera pose refinement from 2D-3D point correspondences, starting from a
//! caller-supplied pose instead of a closed-form initialization.
//!
//! ## Example
//!
//! ```rust
//! use headpose_pnp::{solve_pnp, CameraIntrinsics, IterativeParams, PnPMethod, PoseGuess};
//!
//! let intrinsics = CameraIntrinsics::pinhole(800.0, 320.0, 240.0);
//!
//! let world = [
//!     [0.0, 0.0, 0.0],
//!     [100.0, 0.0, 0.0],
//!     [0.0, 100.0, 0.0],
//!     [0.0, 0.0, 100.0],
//!     [100.0, 100.0, 0.0],
//!     [0.0, 100.0, 100.0],
//! ];
//! let rvec = [0.1, -0.2, 0.05];
//! let t = [10.0, -20.0, 900.0];
//! let image = headpose_pnp::project_points(&world, &rvec, &t, &intrinsics);
//!
//! let params = IterativeParams {
//!     guess: PoseGuess { rvec: [0.0, 0.0, 0.0], tvec: [0.0, 0.0, 1000.0] },
//!     ..Default::default()
//! };
//! let result = solve_pnp(&world, &image, &intrinsics.to_matrix(), PnPMethod::Iterative(params))?;
//! assert!((result.translation[2] - 900.0).abs() < 1e-3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Pinhole camera intrinsics.
pub mod camera;

/// Common data types and traits for PnP solvers.
pub mod pnp;

/// Iterative PnP solver driven by an explicit initial pose.
pub mod iterative;

/// Levenberg–Marquardt pose refinement.
pub mod refine;

/// Axis-angle / rotation matrix conversions.
pub mod rotation;

/// Projection of 3D points through a posed pinhole camera.
pub mod project;

mod ops;

pub use camera::CameraIntrinsics;
pub use iterative::{IterativeParams, IterativePnP, PoseGuess};
pub use pnp::{PnPError, PnPResult, PnPSolver};
pub use project::{project_point, project_points};
pub use refine::{refine_pose_lm, LMParams};
pub use rotation::{matrix_to_rodrigues, rodrigues_to_matrix};

/// Enumeration of the Perspective-n-Point algorithms available in this crate.
#[derive(Debug, Clone)]
pub enum PnPMethod {
    /// Levenberg–Marquardt refinement seeded with the given parameters.
    Iterative(IterativeParams),
}

/// Dispatch function that routes to the chosen PnP solver.
pub fn solve_pnp(
    world: &[[f64; 3]],
    image: &[[f64; 2]],
    k: &[[f64; 3]; 3],
    method: PnPMethod,
) -> Result<PnPResult, PnPError> {
    match method {
        PnPMethod::Iterative(params) => IterativePnP::solve(world, image, k, &params),
    }
}
