use headpose_image::ImageError;
use headpose_pnp::PnPError;

/// An error type for the head pose estimator.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum HeadPoseError {
    /// The landmark model artifact or the estimator configuration is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The image passed to the estimator has no pixels.
    #[error("Image is empty")]
    EmptyImage,

    /// The image buffer itself is malformed.
    #[error(transparent)]
    InvalidImage(#[from] ImageError),

    /// A face index outside the faces stored by the last update.
    #[error("Face index {index} is out of range, {count} faces stored")]
    FaceIndexOutOfRange {
        /// Requested face index.
        index: usize,
        /// Number of faces currently stored.
        count: usize,
    },

    /// The pose solve failed for one face.
    #[error("Pose solve failed for face {face}: {source}")]
    Solver {
        /// Index of the face whose solve failed.
        face: usize,
        /// Underlying PnP error.
        #[source]
        source: PnPError,
    },

    /// The landmark detector reported a failure.
    #[error("Landmark detector failed: {0}")]
    Detector(String),

    /// A landmark set does not have the expected number of points.
    #[error("Expected {expected} landmarks per face, got {actual}")]
    InvalidLandmarks {
        /// Required number of points.
        expected: usize,
        /// Number of points received.
        actual: usize,
    },
}
