//! Anthropometric reference head used as the 3D side of the pose fit.
//!
//! Coordinates are in millimeters in a head-centered frame with the origin at
//! the sellion, X pointing forward out of the face, Y towards the subject's
//! left and Z up.

use crate::landmarks::{FacialFeature, FacialLandmarkSet, Point2};

/// Number of correspondences used by the pose fit.
pub const NUM_MODEL_POINTS: usize = 8;

/// Bridge of the nose.
pub const SELLION: [f64; 3] = [0.0, 0.0, 0.0];
/// Right eye, outer corner.
pub const RIGHT_EYE: [f64; 3] = [-20.0, -65.5, -5.0];
/// Left eye, outer corner.
pub const LEFT_EYE: [f64; 3] = [-20.0, 65.5, -5.0];
/// Right ear.
pub const RIGHT_EAR: [f64; 3] = [-100.0, -77.5, -6.0];
/// Left ear.
pub const LEFT_EAR: [f64; 3] = [-100.0, 77.5, -6.0];
/// Chin.
pub const MENTON: [f64; 3] = [0.0, 0.0, -133.0];
/// Bottom of the nose.
pub const NOSE: [f64; 3] = [21.0, 0.0, -48.0];
/// Center of the mouth line.
pub const STOMION: [f64; 3] = [10.0, 0.0, -75.0];

/// The fixed set of 3D reference points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceHeadModel;

impl ReferenceHeadModel {
    /// The model points, in fit order: sellion, right eye, left eye, right
    /// ear, left ear, menton, nose, stomion.
    pub const POINTS: [[f64; 3]; NUM_MODEL_POINTS] = [
        SELLION, RIGHT_EYE, LEFT_EYE, RIGHT_EAR, LEFT_EAR, MENTON, NOSE, STOMION,
    ];

    /// The 3D side of the correspondences.
    pub fn points(&self) -> &'static [[f64; 3]; NUM_MODEL_POINTS] {
        &Self::POINTS
    }

    /// The 2D side of the correspondences, in the same order as [`Self::POINTS`].
    ///
    /// The stomion is not a detected landmark; it is the midpoint of the two
    /// inner lip centers.
    pub fn image_points(&self, landmarks: &FacialLandmarkSet) -> [[f64; 2]; NUM_MODEL_POINTS] {
        let p = |f: FacialFeature| -> [f64; 2] { landmarks.get(f).into() };
        [
            p(FacialFeature::Sellion),
            p(FacialFeature::RightEye),
            p(FacialFeature::LeftEye),
            p(FacialFeature::RightSide),
            p(FacialFeature::LeftSide),
            p(FacialFeature::Menton),
            p(FacialFeature::Nose),
            <[f64; 2]>::from(landmarks.stomion()),
        ]
    }

    /// Landmark slots filled by [`Self::image_points`], with the model point
    /// each one pairs with. The stomion pairs with both inner lip centers.
    pub fn feature_points(&self) -> [(FacialFeature, [f64; 3]); 9] {
        [
            (FacialFeature::Sellion, SELLION),
            (FacialFeature::RightEye, RIGHT_EYE),
            (FacialFeature::LeftEye, LEFT_EYE),
            (FacialFeature::RightSide, RIGHT_EAR),
            (FacialFeature::LeftSide, LEFT_EAR),
            (FacialFeature::Menton, MENTON),
            (FacialFeature::Nose, NOSE),
            (FacialFeature::MouthCenterTop, STOMION),
            (FacialFeature::MouthCenterBottom, STOMION),
        ]
    }
}

/// Convenience used by synthetic detectors: a landmark set where every named
/// feature sits at `project(model point)` and the rest sit at the sellion.
pub fn landmarks_from_projection<F>(project: F) -> Option<FacialLandmarkSet>
where
    F: Fn(&[f64; 3]) -> Option<[f64; 2]>,
{
    let model = ReferenceHeadModel;
    let fill = Point2::from(project(&SELLION)?);
    let mut points = vec![fill; crate::landmarks::NUM_LANDMARKS];
    for (feature, p3d) in model.feature_points() {
        points[feature.index()] = Point2::from(project(&p3d)?);
    }
    FacialLandmarkSet::new(points).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::NUM_LANDMARKS;

    #[test]
    fn test_model_is_symmetric() {
        let m = ReferenceHeadModel.points();
        assert_eq!(m[1][1], -m[2][1]);
        assert_eq!(m[3][1], -m[4][1]);
        assert_eq!(m[0], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_image_points_order() -> Result<(), crate::HeadPoseError> {
        let points: Vec<Point2> = (0..NUM_LANDMARKS)
            .map(|i| Point2::new(i as f64, 2.0 * i as f64))
            .collect();
        let set = FacialLandmarkSet::new(points)?;
        let uv = ReferenceHeadModel.image_points(&set);
        assert_eq!(uv[0], [30.0, 60.0]);
        assert_eq!(uv[3], [0.0, 0.0]);
        assert_eq!(uv[4], [16.0, 32.0]);
        assert_eq!(uv[5], [8.0, 16.0]);
        // (62 + 66) / 2
        assert_eq!(uv[7], [64.0, 128.0]);
        Ok(())
    }

    #[test]
    fn test_landmarks_from_projection() {
        let set = landmarks_from_projection(|p| Some([p[1], -p[2]]));
        let set = set.expect("projection is total");
        assert_eq!(set.get(FacialFeature::Menton), Point2::new(0.0, 133.0));
        assert_eq!(set.stomion(), Point2::new(0.0, 75.0));
        assert!(landmarks_from_projection(|_| None).is_none());
    }
}
