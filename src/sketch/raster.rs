use crate::sketch::model::Color;

/// Row spans of a filled disc, so stamping a round brush is one memset-like
/// pass per row instead of a distance test per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrushMask {
    radius: i32,
    rows: Vec<BrushMaskRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BrushMaskRow {
    dy: i32,
    min_dx: i32,
    max_dx: i32,
}

impl BrushMask {
    pub fn for_width(stroke_width: u32) -> Self {
        let stroke_width = stroke_width.max(1);
        let radius = (stroke_width.saturating_sub(1) / 2) as i32;
        let mut rows = Vec::with_capacity((radius * 2 + 1) as usize);
        for dy in -radius..=radius {
            let mut max_dx = radius;
            while max_dx >= 0 && max_dx * max_dx + dy * dy > radius * radius {
                max_dx -= 1;
            }
            if max_dx >= 0 {
                rows.push(BrushMaskRow {
                    dy,
                    min_dx: -max_dx,
                    max_dx,
                });
            }
        }
        Self { radius, rows }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }
}

pub fn clear_pixels(pixels: &mut [u8]) {
    pixels.fill(0);
}

/// Stamps `mask` at every Bresenham step from `start` to `end`. The segment
/// is first clipped to the buffer grown by the brush radius, so the walk is
/// bounded by the buffer size whatever the endpoints. Returns whether any
/// pixel was written.
pub fn stamp_segment(
    start: (i32, i32),
    end: (i32, i32),
    color: Color,
    mask: &BrushMask,
    pixels: &mut [u8],
    width: u32,
    height: u32,
) -> bool {
    if width == 0 || height == 0 {
        return false;
    }
    let pad = f64::from(mask.radius());
    let min = (-pad, -pad);
    let max = (f64::from(width - 1) + pad, f64::from(height - 1) + pad);
    let from = (f64::from(start.0), f64::from(start.1));
    let to = (f64::from(end.0), f64::from(end.1));
    let Some((from, to)) = clip_segment(from, to, min, max) else {
        return false;
    };

    let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
    let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut touched = false;
    loop {
        touched |= stamp_brush((x0, y0), color, mask, pixels, width, height);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
    touched
}

/// Liang-Barsky clip of `from..to` against the box `min..=max`.
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-dx, from.0 - min.0),
        (dx, max.0 - from.0),
        (-dy, from.1 - min.1),
        (dy, max.1 - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((
        (from.0 + t0 * dx, from.1 + t0 * dy),
        (from.0 + t1 * dx, from.1 + t1 * dy),
    ))
}

fn stamp_brush(
    center: (i64, i64),
    color: Color,
    mask: &BrushMask,
    pixels: &mut [u8],
    width: u32,
    height: u32,
) -> bool {
    let max_x = i64::from(width) - 1;
    let max_y = i64::from(height) - 1;
    let rgba = color.to_rgba_array();

    let mut touched = false;
    for row in &mask.rows {
        let y = center.1 + i64::from(row.dy);
        if y < 0 || y > max_y {
            continue;
        }
        let x0 = (center.0 + i64::from(row.min_dx)).max(0);
        let x1 = (center.0 + i64::from(row.max_dx)).min(max_x);
        if x0 > x1 {
            continue;
        }
        let row_base = (y as usize) * (width as usize) * 4;
        let start = row_base + (x0 as usize) * 4;
        let end = row_base + (x1 as usize + 1) * 4;
        let Some(span) = pixels.get_mut(start..end) else {
            continue;
        };
        for px in span.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
        touched = true;
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(pixels: &[u8], width: u32, x: u32, y: u32) -> u8 {
        pixels[((y * width + x) * 4 + 3) as usize]
    }

    #[test]
    fn width_three_mask_is_a_plus_shape() {
        let mask = BrushMask::for_width(3);
        let mut pixels = vec![0u8; 5 * 5 * 4];
        assert!(stamp_segment((2, 2), (2, 2), Color::WHITE, &mask, &mut pixels, 5, 5));

        assert_eq!(alpha_at(&pixels, 5, 2, 2), 255);
        assert_eq!(alpha_at(&pixels, 5, 1, 2), 255);
        assert_eq!(alpha_at(&pixels, 5, 2, 3), 255);
        assert_eq!(alpha_at(&pixels, 5, 1, 1), 0);
        assert_eq!(alpha_at(&pixels, 5, 0, 2), 0);
    }

    #[test]
    fn segment_covers_both_endpoints() {
        let mask = BrushMask::for_width(1);
        let mut pixels = vec![0u8; 10 * 10 * 4];
        assert!(stamp_segment((1, 1), (8, 6), Color::WHITE, &mask, &mut pixels, 10, 10));

        assert_eq!(alpha_at(&pixels, 10, 1, 1), 255);
        assert_eq!(alpha_at(&pixels, 10, 8, 6), 255);
    }

    #[test]
    fn stamping_outside_the_buffer_is_clipped() {
        let mask = BrushMask::for_width(5);
        let mut pixels = vec![0u8; 4 * 4 * 4];
        let touched = stamp_segment((-20, -20), (-10, -10), Color::WHITE, &mask, &mut pixels, 4, 4);

        assert!(!touched);
        assert!(pixels.iter().all(|b| *b == 0));
    }

    #[test]
    fn brush_overhang_still_reaches_the_edge() {
        let mask = BrushMask::for_width(5);
        let mut pixels = vec![0u8; 4 * 4 * 4];
        assert!(stamp_segment((-2, 1), (-2, 1), Color::WHITE, &mask, &mut pixels, 4, 4));
        assert_eq!(alpha_at(&pixels, 4, 0, 1), 255);
        assert_eq!(alpha_at(&pixels, 4, 1, 1), 0);
    }

    #[test]
    fn extreme_endpoints_only_walk_the_visible_part() {
        let mask = BrushMask::for_width(1);
        let mut pixels = vec![0u8; 16 * 16 * 4];
        let touched = stamp_segment(
            (-5, 0),
            (i32::MAX, 0),
            Color::WHITE,
            &mask,
            &mut pixels,
            16,
            16,
        );

        assert!(touched);
        assert_eq!(alpha_at(&pixels, 16, 0, 0), 255);
        assert_eq!(alpha_at(&pixels, 16, 15, 0), 255);
        assert_eq!(alpha_at(&pixels, 16, 0, 1), 0);
    }

    #[test]
    fn segment_between_opposite_extremes_does_not_overflow() {
        let mask = BrushMask::for_width(3);
        let mut pixels = vec![0u8; 8 * 8 * 4];
        let touched = stamp_segment(
            (i32::MIN, i32::MIN),
            (i32::MAX, i32::MAX),
            Color::WHITE,
            &mask,
            &mut pixels,
            8,
            8,
        );

        assert!(touched);
        assert_eq!(alpha_at(&pixels, 8, 4, 4), 255);
    }

    #[test]
    fn zero_sized_buffer_draws_nothing() {
        let mask = BrushMask::for_width(3);
        let mut pixels = Vec::new();
        assert!(!stamp_segment((0, 0), (4, 4), Color::WHITE, &mask, &mut pixels, 0, 0));
    }

    #[test]
    fn clip_keeps_inside_segments_untouched() {
        let clipped = clip_segment((1.0, 1.0), (3.0, 2.0), (0.0, 0.0), (5.0, 5.0));
        assert_eq!(clipped, Some(((1.0, 1.0), (3.0, 2.0))));
        assert_eq!(clip_segment((-3.0, 9.0), (-1.0, 9.0), (0.0, 0.0), (5.0, 5.0)), None);
    }
}
