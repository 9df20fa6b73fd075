use glam::DVec2;

use crate::landmarks::Point2;

/// Below this cross product magnitude two lines are treated as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-8;

/// Intersection of the line through `o1`, `p1` with the line through `o2`, `p2`.
///
/// Returns `None` when the lines are parallel.
///
/// # Example
///
/// ```
/// use headpose::{line_intersection, Point2};
///
/// let p = line_intersection(
///     Point2::new(0.0, 0.0),
///     Point2::new(2.0, 2.0),
///     Point2::new(0.0, 2.0),
///     Point2::new(2.0, 0.0),
/// );
/// assert_eq!(p, Some(Point2::new(1.0, 1.0)));
/// ```
pub fn line_intersection(o1: Point2, p1: Point2, o2: Point2, p2: Point2) -> Option<Point2> {
    let o1 = DVec2::new(o1.x, o1.y);
    let o2 = DVec2::new(o2.x, o2.y);
    let x = o2 - o1;
    let d1 = DVec2::new(p1.x, p1.y) - o1;
    let d2 = DVec2::new(p2.x, p2.y) - o2;

    let cross = d1.perp_dot(d2);
    if cross.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t1 = x.perp_dot(d2) / cross;
    let r = o1 + d1 * t1;
    Some(Point2::new(r.x, r.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_intersection_of_skew_lines() {
        // y = 2x + 1 and y = -x + 4 meet at (1, 3)
        let r = line_intersection(
            Point2::new(0.0, 1.0),
            Point2::new(2.0, 5.0),
            Point2::new(4.0, 0.0),
            Point2::new(-1.0, 5.0),
        );
        let r = r.expect("lines are not parallel");
        assert_abs_diff_eq!(r.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.y, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_intersection_outside_segments() {
        // the helper works on infinite lines, not segments
        let r = line_intersection(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(5.0, 1.0),
            Point2::new(5.0, 2.0),
        );
        assert_eq!(r, Some(Point2::new(5.0, 0.0)));
    }

    #[test]
    fn test_parallel_lines() {
        let r = line_intersection(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(3.0, 4.0),
        );
        assert_eq!(r, None);

        // coincident lines are parallel too
        let r = line_intersection(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
            Point2::new(3.0, 3.0),
        );
        assert_eq!(r, None);
    }
}
