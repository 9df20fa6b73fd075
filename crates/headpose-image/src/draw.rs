use crate::font::{glyph, GLYPH_HEIGHT, GLYPH_SPACING, GLYPH_WIDTH};
use crate::image::Image;

/// Helper function to set a pixel's color, skipping coordinates outside the image.
#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x < 0 || y < 0 || x >= img.cols() as i64 || y >= img.rows() as i64 {
        return;
    }
    let start = (y as usize * img.cols() + x as usize) * C;
    img.as_slice_mut()[start..start + C].copy_from_slice(&color);
}

/// Clips the segment `p0 -> p1` to the box `[min, max]` with the Liang-Barsky algorithm.
///
/// Endpoints inside the box are returned unchanged. Returns `None` when the
/// segment misses the box.
fn clip_segment(
    p0: (i64, i64),
    p1: (i64, i64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<((i64, i64), (i64, i64))> {
    let (x0, y0) = (p0.0 as f64, p0.1 as f64);
    let (dx, dy) = (p1.0 as f64 - x0, p1.1 as f64 - y0);
    let edges = [min.0, max.0, min.1, max.1];

    // parameter and edge index of the entry and exit points
    let mut enter = (0.0f64, None);
    let mut exit = (1.0f64, None);
    for (edge, (p, q)) in [
        (-dx, x0 - min.0),
        (dx, max.0 - x0),
        (-dy, y0 - min.1),
        (dy, max.1 - y0),
    ]
    .into_iter()
    .enumerate()
    {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > exit.0 {
                return None;
            }
            if r > enter.0 {
                enter = (r, Some(edge));
            }
        } else {
            if r < enter.0 {
                return None;
            }
            if r < exit.0 {
                exit = (r, Some(edge));
            }
        }
    }

    // the crossed edge gives one coordinate exactly; the other one loses
    // precision for far-away endpoints and is kept in the box
    let at = |t: f64, edge: usize| {
        let mut x = (x0 + t * dx).round();
        let mut y = (y0 + t * dy).round();
        if edge < 2 {
            x = edges[edge];
        } else {
            y = edges[edge];
        }
        (
            x.clamp(min.0, max.0) as i64,
            y.clamp(min.1, max.1) as i64,
        )
    };
    let start = enter.1.map_or(p0, |edge| at(enter.0, edge));
    let end = exit.1.map_or(p1, |edge| at(exit.0, edge));
    Some((start, end))
}

/// Draws a line on an image inplace using a standard Bresenham's line algorithm.
///
/// The line is clipped to the image first, so endpoints may lie arbitrarily
/// far outside of it.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
/// * `thickness` - The thickness of the line. (Note: thickness > 1 is approximate).
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    if img.cols() == 0 || img.rows() == 0 {
        return;
    }

    // thick lines are stamped with a square brush centered on the line
    let half = if thickness > 1 {
        thickness as i64 / 2
    } else {
        0
    };

    let min = (-half as f64, -half as f64);
    let max = (
        (img.cols() as i64 - 1 + half) as f64,
        (img.rows() as i64 - 1 + half) as f64,
    );
    let Some(((mut x0, mut y0), (x1, y1))) = clip_segment(p0, p1, min, max) else {
        return;
    };

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;

    loop {
        for i in -half..=half {
            for j in -half..=half {
                set_pixel(img, x0 + i, y0 + j, color);
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draws a chain of connected line segments inplace.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `points` - The vertices of the polyline.
/// * `closed` - Whether to connect the last vertex back to the first one.
/// * `color` - The color of the polyline.
/// * `thickness` - The thickness of the segments.
pub fn draw_polyline<const C: usize>(
    img: &mut Image<u8, C>,
    points: &[(i64, i64)],
    closed: bool,
    color: [u8; C],
    thickness: usize,
) {
    for pair in points.windows(2) {
        draw_line(img, pair[0], pair[1], color, thickness);
    }
    if closed && points.len() > 2 {
        draw_line(img, points[points.len() - 1], points[0], color, thickness);
    }
}

/// Height in pixels of a line of text drawn with [`draw_text`] at the given scale.
pub fn text_height(scale: usize) -> usize {
    GLYPH_HEIGHT * scale
}

/// Draws a single line of text inplace with the built-in 3x5 bitmap font.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `origin` - The top-left corner of the first glyph (x, y).
/// * `text` - The text to render. Unsupported characters render as a block.
/// * `color` - The color of the glyph pixels.
/// * `scale` - Integer magnification of the font; zero draws nothing.
pub fn draw_text<const C: usize>(
    img: &mut Image<u8, C>,
    origin: (i64, i64),
    text: &str,
    color: [u8; C],
    scale: usize,
) {
    let s = scale as i64;
    let advance = ((GLYPH_WIDTH + GLYPH_SPACING) * scale) as i64;
    let mut cx = origin.0;
    for c in text.chars() {
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if (bits >> (GLYPH_WIDTH - 1 - col)) & 1 == 0 {
                    continue;
                }
                let px = cx.saturating_add(col as i64 * s);
                let py = origin.1.saturating_add(row as i64 * s);
                for dy in 0..s {
                    for dx in 0..s {
                        set_pixel(img, px.saturating_add(dx), py.saturating_add(dy), color);
                    }
                }
            }
        }
        cx = cx.saturating_add(advance);
    }
}
