//! Estimator configuration, loadable from JSON.

use std::path::Path;

use headpose_pnp::LMParams;
use serde::{Deserialize, Serialize};

use crate::camera::CameraModel;
use crate::error::HeadPoseError;

/// Top level estimator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Focal length in pixels.
    pub focal_length: f64,
    /// Explicit optical center; inferred from the first frame when absent.
    pub optical_center: Option<[f64; 2]>,
    /// Pose solver settings.
    pub solver: SolverConfig,
    /// Overlay presentation settings.
    pub render: RenderConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            focal_length: 1000.0,
            optical_center: None,
            solver: SolverConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

/// Levenberg–Marquardt settings for the pose solve.
///
/// The initial pose is not configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Iteration cap.
    pub max_iterations: usize,
    /// Relative cost decrease below which the solve stops.
    pub cost_tolerance: f64,
    /// Relative step size below which the solve stops.
    pub step_tolerance: f64,
    /// Initial damping.
    pub initial_lambda: f64,
    /// Damping multiplier on rejected / accepted steps.
    pub lambda_factor: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let lm = LMParams::default();
        Self {
            max_iterations: lm.max_iters,
            cost_tolerance: lm.cost_tolerance,
            step_tolerance: lm.step_tolerance,
            initial_lambda: lm.lambda_init,
            lambda_factor: lm.lambda_mul,
        }
    }
}

impl From<&SolverConfig> for LMParams {
    fn from(c: &SolverConfig) -> Self {
        LMParams {
            max_iters: c.max_iterations,
            cost_tolerance: c.cost_tolerance,
            step_tolerance: c.step_tolerance,
            lambda_init: c.initial_lambda,
            lambda_mul: c.lambda_factor,
        }
    }
}

/// Colors, line width and text settings of the overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Line thickness in pixels.
    pub thickness: usize,
    /// Color of the landmark contours.
    pub landmark_color: [u8; 3],
    /// Color of the segment towards the X axis tip.
    pub x_axis_color: [u8; 3],
    /// Color of the segment towards the Y axis tip.
    pub y_axis_color: [u8; 3],
    /// Color of the segment towards the Z axis tip.
    pub z_axis_color: [u8; 3],
    /// Color of the position label.
    pub label_color: [u8; 3],
    /// Integer magnification of the label font.
    pub text_scale: usize,
    /// Length of each drawn axis, in millimeters.
    pub axis_length: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            thickness: 2,
            landmark_color: [0, 128, 128],
            x_axis_color: [255, 0, 0],
            y_axis_color: [0, 255, 0],
            z_axis_color: [0, 0, 255],
            label_color: [255, 0, 0],
            text_scale: 2,
            axis_length: 50.0,
        }
    }
}

impl EstimatorConfig {
    /// Read and validate a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HeadPoseError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HeadPoseError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            HeadPoseError::Configuration(format!("cannot parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), HeadPoseError> {
        if !self.focal_length.is_finite() || self.focal_length <= 0.0 {
            return Err(HeadPoseError::Configuration(format!(
                "focal_length must be a positive number, got {}",
                self.focal_length
            )));
        }
        if let Some([x, y]) = self.optical_center {
            if !x.is_finite() || !y.is_finite() {
                return Err(HeadPoseError::Configuration(
                    "optical_center must be finite".to_string(),
                ));
            }
        }

        let s = &self.solver;
        if s.max_iterations == 0 {
            return Err(HeadPoseError::Configuration(
                "solver.max_iterations must be at least 1".to_string(),
            ));
        }
        if s.cost_tolerance < 0.0 || s.step_tolerance < 0.0 {
            return Err(HeadPoseError::Configuration(
                "solver tolerances must be non-negative".to_string(),
            ));
        }
        if s.initial_lambda <= 0.0 || s.lambda_factor <= 1.0 {
            return Err(HeadPoseError::Configuration(format!(
                "solver damping must satisfy initial_lambda > 0 and lambda_factor > 1, got {} and {}",
                s.initial_lambda, s.lambda_factor
            )));
        }

        if self.render.axis_length <= 0.0 {
            return Err(HeadPoseError::Configuration(
                "render.axis_length must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The camera model described by this configuration.
    pub fn camera(&self) -> CameraModel {
        match self.optical_center {
            Some([x, y]) => CameraModel::with_optical_center(self.focal_length, x, y),
            None => CameraModel::new(self.focal_length),
        }
    }
}
