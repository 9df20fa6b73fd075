#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! The pipeline is `image -> LandmarkDetector -> 68 landmarks per face ->
//! PoseSolver -> HeadPose per face -> PoseRenderer -> overlay`.
//!
//! ```rust
//! use headpose::{DetectedFace, DetectorError, HeadPoseEstimator, LandmarkDetector};
//! use headpose_image::{Image, ImageSize};
//!
//! struct NoFaces;
//!
//! impl LandmarkDetector for NoFaces {
//!     fn detect(&mut self, _: &Image<u8, 3>) -> Result<Vec<DetectedFace>, DetectorError> {
//!         Ok(vec![])
//!     }
//! }
//!
//! let mut estimator = HeadPoseEstimator::with_focal_length(1000.0, NoFaces)?;
//! let frame = Image::<u8, 3>::from_size_val(ImageSize { width: 640, height: 480 }, 0)?;
//! assert!(estimator.update(&frame)?.is_empty());
//! assert!(estimator.poses().is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Pinhole camera model with a lazily fixed optical center.
pub mod camera;

/// Estimator configuration.
pub mod config;

/// Landmark detector seam and a replaying detector.
pub mod detector;

mod error;
pub use error::HeadPoseError;

/// The head pose estimator.
pub mod estimator;

/// 2D line intersection.
pub mod geometry;

/// The 68-point landmark convention.
pub mod landmarks;

/// The 3D reference head model.
pub mod model;

/// Rigid head pose.
pub mod pose;

/// Overlay geometry and rasterization.
pub mod render;

/// Reference model fit.
pub mod solver;

pub use camera::{CameraModel, OpticalCenter};
pub use config::{EstimatorConfig, RenderConfig, SolverConfig};
pub use detector::{DetectedFace, DetectorError, FaceRegion, LandmarkDetector, ReplayDetector};
pub use estimator::HeadPoseEstimator;
pub use geometry::line_intersection;
pub use landmarks::{FacialFeature, FacialLandmarkSet, Point2, NUM_LANDMARKS};
pub use model::ReferenceHeadModel;
pub use pose::HeadPose;
pub use render::{Label, Overlay, PoseRenderer, Polyline, Segment};
pub use solver::{PoseSolver, INITIAL_RVEC, INITIAL_TVEC};
