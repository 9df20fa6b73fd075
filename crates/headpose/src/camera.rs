use headpose_image::ImageSize;
use headpose_pnp::CameraIntrinsics;

/// Principal point of the camera model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpticalCenter {
    /// Not known yet; fixed from the first processed frame.
    Unset,
    /// Fixed principal point in pixels.
    Set {
        /// Horizontal coordinate.
        x: f64,
        /// Vertical coordinate.
        y: f64,
    },
}

/// Ideal pinhole camera: one focal length, zero skew, no distortion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraModel {
    focal_length: f64,
    optical_center: OpticalCenter,
}

impl CameraModel {
    /// A camera whose optical center will be taken from the first frame.
    pub fn new(focal_length: f64) -> Self {
        Self {
            focal_length,
            optical_center: OpticalCenter::Unset,
        }
    }

    /// A camera with a known optical center.
    pub fn with_optical_center(focal_length: f64, x: f64, y: f64) -> Self {
        Self {
            focal_length,
            optical_center: OpticalCenter::Set { x, y },
        }
    }

    /// Focal length in pixels.
    pub fn focal_length(&self) -> f64 {
        self.focal_length
    }

    /// Current optical center state.
    pub fn optical_center(&self) -> OpticalCenter {
        self.optical_center
    }

    /// Fix the optical center to the image center if it is still unset.
    ///
    /// Returns the newly set center, or `None` when it was already set.
    pub fn init_from_frame(&mut self, size: ImageSize) -> Option<(f64, f64)> {
        match self.optical_center {
            OpticalCenter::Set { .. } => None,
            OpticalCenter::Unset => {
                // integer halves, matching the pixel grid of the first frame
                let x = (size.width / 2) as f64;
                let y = (size.height / 2) as f64;
                self.optical_center = OpticalCenter::Set { x, y };
                Some((x, y))
            }
        }
    }

    /// Pinhole intrinsics, or `None` until the optical center is set.
    pub fn intrinsics(&self) -> Option<CameraIntrinsics> {
        match self.optical_center {
            OpticalCenter::Set { x, y } => Some(CameraIntrinsics::pinhole(self.focal_length, x, y)),
            OpticalCenter::Unset => None,
        }
    }

    /// The 3x3 intrinsics matrix, or `None` until the optical center is set.
    pub fn matrix(&self) -> Option<[[f64; 3]; 3]> {
        self.intrinsics().map(|k| k.to_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optical_center_set_once() {
        let mut camera = CameraModel::new(1000.0);
        assert_eq!(camera.optical_center(), OpticalCenter::Unset);

        let first = camera.init_from_frame(ImageSize {
            width: 641,
            height: 480,
        });
        assert_eq!(first, Some((320.0, 240.0)));

        let second = camera.init_from_frame(ImageSize {
            width: 100,
            height: 100,
        });
        assert_eq!(second, None);
        assert_eq!(
            camera.optical_center(),
            OpticalCenter::Set { x: 320.0, y: 240.0 }
        );
    }

    #[test]
    fn test_explicit_center_is_kept() {
        let mut camera = CameraModel::with_optical_center(800.0, 10.0, 20.0);
        assert_eq!(camera.init_from_frame([640, 480].into()), None);
        assert_eq!(
            camera.matrix(),
            Some([[800.0, 0.0, 10.0], [0.0, 800.0, 20.0], [0.0, 0.0, 1.0]])
        );
    }

    #[test]
    fn test_no_intrinsics_until_center_is_set() {
        let mut camera = CameraModel::new(500.0);
        assert_eq!(camera.intrinsics(), None);
        assert_eq!(camera.matrix(), None);

        camera.init_from_frame(ImageSize {
            width: 100,
            height: 60,
        });
        assert_eq!(
            camera.intrinsics(),
            Some(CameraIntrinsics::pinhole(500.0, 50.0, 30.0))
        );
    }
}
