//! Overlay geometry for detected landmarks and head poses.
//!
//! [`PoseRenderer::overlay`] produces plain 2D geometry so it can be consumed
//! by any drawing backend; [`PoseRenderer::draw_detections`] rasterizes it on a
//! copy of an image with the drawing primitives of `headpose-image`.

use headpose_image::draw::{draw_line, draw_polyline, draw_text, text_height};
use headpose_image::Image;
use headpose_pnp::project_point;

use crate::camera::CameraModel;
use crate::config::RenderConfig;
use crate::landmarks::{FacialFeature, FacialLandmarkSet, Point2};
use crate::pose::HeadPose;

/// A connected run of landmark points.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    /// Vertices in drawing order.
    pub points: Vec<Point2>,
    /// Whether the last vertex connects back to the first.
    pub closed: bool,
    /// Line color.
    pub color: [u8; 3],
}

/// A single line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start point.
    pub from: Point2,
    /// End point.
    pub to: Point2,
    /// Line color.
    pub color: [u8; 3],
}

/// A text label anchored at its bottom-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Anchor point.
    pub anchor: Point2,
    /// Label text.
    pub text: String,
    /// Text color.
    pub color: [u8; 3],
}

/// Everything drawn over one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    /// Landmark contours.
    pub polylines: Vec<Polyline>,
    /// Pose axes, three per face.
    pub segments: Vec<Segment>,
    /// Position labels, one per face.
    pub labels: Vec<Label>,
}

/// Builds overlays with the same camera model the poses were solved with.
#[derive(Debug, Clone)]
pub struct PoseRenderer {
    camera: CameraModel,
    config: RenderConfig,
}

impl PoseRenderer {
    /// Create a renderer.
    pub fn new(camera: CameraModel, config: RenderConfig) -> Self {
        Self { camera, config }
    }

    /// The projected axis triad of a pose: origin, then X, Y and Z tips.
    ///
    /// Points on the camera plane have no projection. Nothing is projected
    /// while the camera's optical center is unset.
    pub fn project_axes(&self, pose: &HeadPose) -> [Option<Point2>; 4] {
        let Some(intrinsics) = self.camera.intrinsics() else {
            return [None; 4];
        };
        let l = self.config.axis_length;
        let axes = [[0.0, 0.0, 0.0], [l, 0.0, 0.0], [0.0, l, 0.0], [0.0, 0.0, l]];
        // the axes are in millimeters, like the model the pose was fitted to
        let rvec = pose.rotation_vector();
        let t = pose.translation_mm();
        axes.map(|p| project_point(&p, &rvec, &t, &intrinsics).map(Point2::from))
    }

    /// Overlay geometry for one frame.
    ///
    /// `poses[i]` is labeled at the sellion of `landmarks[i]`; keeping both
    /// lists in the same face order is up to the caller.
    pub fn overlay(&self, landmarks: &[FacialLandmarkSet], poses: &[HeadPose]) -> Overlay {
        let mut overlay = Overlay::default();

        for set in landmarks {
            overlay
                .polylines
                .extend(set.contours().map(|(points, closed)| Polyline {
                    points: points.to_vec(),
                    closed,
                    color: self.config.landmark_color,
                }));
        }

        for (i, pose) in poses.iter().enumerate() {
            let [origin, x_tip, y_tip, z_tip] = self.project_axes(pose);

            if let Some(origin) = origin {
                for (tip, color) in [
                    (x_tip, self.config.x_axis_color),
                    (y_tip, self.config.y_axis_color),
                    (z_tip, self.config.z_axis_color),
                ] {
                    if let Some(to) = tip {
                        overlay.segments.push(Segment {
                            from: origin,
                            to,
                            color,
                        });
                    }
                }
            }

            let anchor = landmarks
                .get(i)
                .map(|set| set.get(FacialFeature::Sellion))
                .or(origin);
            if let Some(anchor) = anchor {
                overlay.labels.push(Label {
                    anchor,
                    text: pose.label(),
                    color: self.config.label_color,
                });
            }
        }

        overlay
    }

    /// Rasterize an overlay onto `image` in place.
    ///
    /// Geometry with non-finite coordinates is skipped; a polyline keeps its
    /// edges between finite vertices.
    pub fn rasterize(&self, overlay: &Overlay, image: &mut Image<u8, 3>) {
        let thickness = self.config.thickness;
        for polyline in &overlay.polylines {
            if polyline.points.iter().all(Point2::is_finite) {
                let points: Vec<(i64, i64)> =
                    polyline.points.iter().map(Point2::to_pixel).collect();
                draw_polyline(image, &points, polyline.closed, polyline.color, thickness);
                continue;
            }
            let n = polyline.points.len();
            let edges = if polyline.closed && n > 2 { n } else { n.saturating_sub(1) };
            for i in 0..edges {
                let (from, to) = (polyline.points[i], polyline.points[(i + 1) % n]);
                if from.is_finite() && to.is_finite() {
                    draw_line(image, from.to_pixel(), to.to_pixel(), polyline.color, thickness);
                }
            }
        }
        for segment in &overlay.segments {
            if !(segment.from.is_finite() && segment.to.is_finite()) {
                continue;
            }
            draw_line(
                image,
                segment.from.to_pixel(),
                segment.to.to_pixel(),
                segment.color,
                thickness,
            );
        }
        let scale = self.config.text_scale;
        for label in overlay.labels.iter().filter(|l| l.anchor.is_finite()) {
            let (x, y) = label.anchor.to_pixel();
            let top = y.saturating_sub(text_height(scale) as i64);
            draw_text(image, (x, top), &label.text, label.color, scale);
        }
    }

    /// Draw landmarks and poses on a copy of `base`.
    ///
    /// The input image is left untouched.
    pub fn draw_detections(
        &self,
        base: &Image<u8, 3>,
        landmarks: &[FacialLandmarkSet],
        poses: &[HeadPose],
    ) -> Image<u8, 3> {
        let mut result = base.clone();
        let overlay = self.overlay(landmarks, poses);
        self.rasterize(&overlay, &mut result);
        result
    }
}
