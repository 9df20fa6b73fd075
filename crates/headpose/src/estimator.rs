use headpose_image::Image;

use crate::camera::CameraModel;
use crate::config::{EstimatorConfig, RenderConfig};
use crate::detector::{DetectedFace, FaceRegion, LandmarkDetector};
use crate::error::HeadPoseError;
use crate::landmarks::{FacialFeature, FacialLandmarkSet, Point2};
use crate::pose::HeadPose;
use crate::render::{Overlay, PoseRenderer};
use crate::solver::PoseSolver;

/// Head pose estimator owning the camera model and the state of the last frame.
///
/// Each [`update`](Self::update) replaces the stored faces; poses are always
/// solved from the fixed initial guess, never from a previous frame.
///
/// The estimator is not synchronized: calls on one instance must not overlap.
pub struct HeadPoseEstimator<D: LandmarkDetector> {
    detector: D,
    camera: CameraModel,
    solver: PoseSolver,
    renderer_config: RenderConfig,
    faces: Vec<FaceRegion>,
    landmarks: Vec<FacialLandmarkSet>,
    current_frame: Option<Image<u8, 3>>,
}

impl<D: LandmarkDetector> HeadPoseEstimator<D> {
    /// Create an estimator from a validated configuration and a detector.
    pub fn new(config: EstimatorConfig, detector: D) -> Result<Self, HeadPoseError> {
        config.validate()?;
        Ok(Self {
            detector,
            camera: config.camera(),
            solver: PoseSolver::new((&config.solver).into()),
            renderer_config: config.render,
            faces: Vec::new(),
            landmarks: Vec::new(),
            current_frame: None,
        })
    }

    /// Create an estimator with default settings and the given focal length.
    pub fn with_focal_length(focal_length: f64, detector: D) -> Result<Self, HeadPoseError> {
        Self::new(
            EstimatorConfig {
                focal_length,
                ..Default::default()
            },
            detector,
        )
    }

    /// Detect the faces of a new frame and return their landmarks.
    ///
    /// The first call fixes the optical center to the image center. Detector
    /// failures are returned as [`HeadPoseError::Detector`] and leave the
    /// previously stored faces untouched.
    pub fn update(&mut self, image: &Image<u8, 3>) -> Result<&[FacialLandmarkSet], HeadPoseError> {
        if image.is_empty() {
            return Err(HeadPoseError::EmptyImage);
        }

        if let Some((x, y)) = self.camera.init_from_frame(image.size()) {
            log::info!("Setting the optical center to ({x}, {y})");
        }

        let detected = self.detector.detect(image)?;
        log::debug!("Detected {} faces", detected.len());

        let (faces, landmarks): (Vec<_>, Vec<_>) = detected
            .into_iter()
            .map(|DetectedFace { region, landmarks }| (region, landmarks))
            .unzip();
        self.faces = faces;
        self.landmarks = landmarks;
        self.current_frame = Some(image.clone());

        Ok(&self.landmarks)
    }

    /// Pose of the face at `face_index` in the last frame.
    pub fn pose(&self, face_index: usize) -> Result<HeadPose, HeadPoseError> {
        let landmarks = self.face(face_index)?;
        self.solver
            .solve(&self.camera, landmarks)
            .map_err(|source| HeadPoseError::Solver {
                face: face_index,
                source,
            })
    }

    /// Poses of all faces of the last frame, in face order.
    ///
    /// A failed solve is reported in its slot without affecting other faces.
    pub fn poses(&self) -> Vec<Result<HeadPose, HeadPoseError>> {
        (0..self.landmarks.len())
            .map(|i| {
                let res = self.pose(i);
                if let Err(e) = &res {
                    log::warn!("{e}");
                }
                res
            })
            .collect()
    }

    /// Coordinates of a named feature of one face.
    pub fn coords_of(
        &self,
        face_index: usize,
        feature: FacialFeature,
    ) -> Result<Point2, HeadPoseError> {
        Ok(self.face(face_index)?.get(feature))
    }

    /// Landmarks of the last frame.
    pub fn landmarks(&self) -> &[FacialLandmarkSet] {
        &self.landmarks
    }

    /// Face regions of the last frame.
    pub fn faces(&self) -> &[FaceRegion] {
        &self.faces
    }

    /// The camera model.
    pub fn camera(&self) -> &CameraModel {
        &self.camera
    }

    /// The last processed frame.
    pub fn current_frame(&self) -> Option<&Image<u8, 3>> {
        self.current_frame.as_ref()
    }

    /// A renderer using this estimator's camera model.
    pub fn renderer(&self) -> PoseRenderer {
        PoseRenderer::new(self.camera, self.renderer_config.clone())
    }

    /// Overlay geometry for the given landmarks and poses.
    pub fn overlay(&self, landmarks: &[FacialLandmarkSet], poses: &[HeadPose]) -> Overlay {
        self.renderer().overlay(landmarks, poses)
    }

    /// Draw landmarks and poses on a copy of `base`.
    pub fn draw_detections(
        &self,
        base: &Image<u8, 3>,
        landmarks: &[FacialLandmarkSet],
        poses: &[HeadPose],
    ) -> Image<u8, 3> {
        self.renderer().draw_detections(base, landmarks, poses)
    }

    fn face(&self, face_index: usize) -> Result<&FacialLandmarkSet, HeadPoseError> {
        self.landmarks
            .get(face_index)
            .ok_or(HeadPoseError::FaceIndexOutOfRange {
                index: face_index,
                count: self.landmarks.len(),
            })
    }
}
