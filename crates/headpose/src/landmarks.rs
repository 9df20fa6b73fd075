//! The 68-point facial landmark convention.

use serde::{Deserialize, Serialize};

use crate::error::HeadPoseError;

/// Number of points in a facial landmark set.
pub const NUM_LANDMARKS: usize = 68;

/// A 2D point in pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point2 {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The arithmetic midpoint between `self` and `other`.
    pub fn midpoint(&self, other: &Point2) -> Point2 {
        Point2::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Round to the nearest pixel, saturating far-away coordinates.
    pub fn to_pixel(&self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}

impl From<[f64; 2]> for Point2 {
    fn from(p: [f64; 2]) -> Self {
        Point2::new(p[0], p[1])
    }
}

impl From<Point2> for [f64; 2] {
    fn from(p: Point2) -> Self {
        [p.x, p.y]
    }
}

/// Named facial features and their position in the 68-point sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacialFeature {
    /// Bridge of the nose between the eyes.
    Sellion,
    /// Outer corner of the right eye.
    RightEye,
    /// Outer corner of the left eye.
    LeftEye,
    /// Right end of the jaw line, next to the ear.
    RightSide,
    /// Left end of the jaw line, next to the ear.
    LeftSide,
    /// Inner end of the right eyebrow.
    EyebrowRight,
    /// Inner end of the left eyebrow.
    EyebrowLeft,
    /// Chin point.
    Menton,
    /// Bottom of the nose.
    Nose,
    /// Top of the outer lip.
    MouthUp,
    /// Bottom of the outer lip.
    MouthDown,
    /// Right mouth corner.
    MouthRight,
    /// Left mouth corner.
    MouthLeft,
    /// Center of the upper inner lip.
    MouthCenterTop,
    /// Center of the lower inner lip.
    MouthCenterBottom,
}

impl FacialFeature {
    /// Every named feature.
    pub const ALL: [FacialFeature; 15] = [
        FacialFeature::Sellion,
        FacialFeature::RightEye,
        FacialFeature::LeftEye,
        FacialFeature::RightSide,
        FacialFeature::LeftSide,
        FacialFeature::EyebrowRight,
        FacialFeature::EyebrowLeft,
        FacialFeature::Menton,
        FacialFeature::Nose,
        FacialFeature::MouthUp,
        FacialFeature::MouthDown,
        FacialFeature::MouthRight,
        FacialFeature::MouthLeft,
        FacialFeature::MouthCenterTop,
        FacialFeature::MouthCenterBottom,
    ];

    /// Position of the feature in a [`FacialLandmarkSet`].
    pub const fn index(self) -> usize {
        match self {
            FacialFeature::RightSide => 0,
            FacialFeature::Menton => 8,
            FacialFeature::LeftSide => 16,
            FacialFeature::EyebrowRight => 21,
            FacialFeature::EyebrowLeft => 22,
            FacialFeature::Sellion => 30,
            FacialFeature::Nose => 33,
            FacialFeature::RightEye => 36,
            FacialFeature::LeftEye => 45,
            FacialFeature::MouthRight => 48,
            FacialFeature::MouthUp => 51,
            FacialFeature::MouthLeft => 54,
            FacialFeature::MouthDown => 57,
            FacialFeature::MouthCenterTop => 62,
            FacialFeature::MouthCenterBottom => 66,
        }
    }
}

/// A connected run of landmarks drawn as one polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contour {
    /// First landmark index.
    pub start: usize,
    /// Last landmark index, inclusive.
    pub end: usize,
    /// Whether the last point connects back to the first.
    pub closed: bool,
}

/// Landmark connectivity of the 68-point model.
///
/// The nose base is closed back to the sellion point, joining both nostril
/// ends to the bridge.
#[rustfmt::skip]
pub const CONTOURS: [Contour; 9] = [
    // jaw
    Contour { start: 0, end: 16, closed: false },
    // brows
    Contour { start: 17, end: 21, closed: false },
    Contour { start: 22, end: 26, closed: false },
    // nose bridge
    Contour { start: 27, end: 30, closed: false },
    // nose base
    Contour { start: 30, end: 35, closed: true },
    // eyes
    Contour { start: 36, end: 41, closed: true },
    Contour { start: 42, end: 47, closed: true },
    // lips
    Contour { start: 48, end: 59, closed: true },
    Contour { start: 60, end: 67, closed: true },
];

/// The 68 landmark points of one detected face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point2>", into = "Vec<Point2>")]
pub struct FacialLandmarkSet {
    points: Vec<Point2>,
}

impl FacialLandmarkSet {
    /// Create a landmark set, checking that exactly 68 points are given.
    pub fn new(points: Vec<Point2>) -> Result<Self, HeadPoseError> {
        if points.len() != NUM_LANDMARKS {
            return Err(HeadPoseError::InvalidLandmarks {
                expected: NUM_LANDMARKS,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// All points in landmark order.
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// The point of a named feature.
    pub fn get(&self, feature: FacialFeature) -> Point2 {
        self.points[feature.index()]
    }

    /// The center of the mouth line: midpoint of the two inner lip centers.
    pub fn stomion(&self) -> Point2 {
        self.get(FacialFeature::MouthCenterTop)
            .midpoint(&self.get(FacialFeature::MouthCenterBottom))
    }

    /// Landmark points grouped into drawable contours.
    pub fn contours(&self) -> impl Iterator<Item = (&[Point2], bool)> + '_ {
        CONTOURS
            .iter()
            .map(|c| (&self.points[c.start..=c.end], c.closed))
    }
}

impl TryFrom<Vec<Point2>> for FacialLandmarkSet {
    type Error = HeadPoseError;

    fn try_from(points: Vec<Point2>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<FacialLandmarkSet> for Vec<Point2> {
    fn from(set: FacialLandmarkSet) -> Self {
        set.points
    }
}
