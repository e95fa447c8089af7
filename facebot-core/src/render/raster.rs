//! Scanline rasterization primitives
//!
//! Stateless fills over a [`Framebuffer`]. Degenerate sizes draw nothing.

use libm::sqrtf;

use super::Framebuffer;
use crate::color::Rgb565;

/// Offsets in `[-reach, reach]` around `centre` that land inside `[0, len)`
///
/// `None` when the whole range misses the surface.
fn clip_offsets(centre: i32, reach: i64, len: u16) -> Option<(i64, i64)> {
    let centre = centre as i64;
    let lo = (-reach).max(-centre);
    let hi = reach.min(len as i64 - 1 - centre);
    (lo <= hi).then_some((lo, hi))
}

/// Filled axis-aligned ellipse, one horizontal span per row
pub fn fill_ellipse(fb: &mut Framebuffer, cx: i32, cy: i32, rx: i32, ry: i32, color: Rgb565) {
    if rx <= 0 || ry <= 0 {
        return;
    }
    let (width, height) = (fb.width() as i64, fb.height() as i64);
    let Some((dy_lo, dy_hi)) = clip_offsets(cy, ry as i64, fb.height()) else {
        return;
    };
    if clip_offsets(cx, rx as i64, fb.width()).is_none() {
        return;
    }

    let inv_ry2 = 1.0 / (ry as f32 * ry as f32);
    for dy in dy_lo..=dy_hi {
        let ratio = 1.0 - (dy * dy) as f32 * inv_ry2;
        if ratio <= 0.0 {
            continue;
        }
        let dx = (rx as f32 * sqrtf(ratio)) as i64;
        let x1 = (cx as i64 - dx).max(0);
        let x2 = (cx as i64 + dx).min(width - 1);
        let y = cy as i64 + dy;
        if x1 <= x2 && (0..height).contains(&y) {
            fb.hline(x1 as i32, x2 as i32, y as i32, color);
        }
    }
}

/// Filled circle
pub fn fill_circle(fb: &mut Framebuffer, cx: i32, cy: i32, r: i32, color: Rgb565) {
    fill_ellipse(fb, cx, cy, r, r, color);
}

/// Filled heart from the implicit curve `(x² + y² - 1)³ - x²y³ <= 0`
///
/// Lobes at the top, point at the bottom. Every on-screen pixel of the
/// `[-size, size]²` window is tested, so the cost is quadratic in `size`;
/// only use it for small, bounded sprites.
pub fn fill_heart(fb: &mut Framebuffer, cx: i32, cy: i32, size: f32, color: Rgb565) {
    if !(size > 0.0) {
        return;
    }

    let sz = (size + 0.5) as i64;
    let Some((dy_lo, dy_hi)) = clip_offsets(cy, sz, fb.height()) else {
        return;
    };
    let Some((dx_lo, dx_hi)) = clip_offsets(cx, sz, fb.width()) else {
        return;
    };

    let inv_sz = 1.0 / size;
    for dy in dy_lo..=dy_hi {
        // Screen y grows downward, the curve is defined with y up
        let ny = -(dy as f32) * inv_sz;
        let y2 = ny * ny;
        let y = (cy as i64 + dy) as i32;
        for dx in dx_lo..=dx_hi {
            let nx = dx as f32 * inv_sz;
            let x2 = nx * nx;
            let inner = x2 + y2 - 1.0;
            if inner * inner * inner - x2 * y2 * ny <= 0.0 {
                fb.set_pixel((cx as i64 + dx) as i32, y, color);
            }
        }
    }
}

/// Smile stroke: the lower half of an ellipse traced column by column
///
/// Each column `dx` in `[-half_width, half_width]` gets `thickness` pixels
/// starting `depth * sqrt(1 - (dx/half_width)²)` below `cy`.
pub fn smile_arc(
    fb: &mut Framebuffer,
    cx: i32,
    cy: i32,
    half_width: i32,
    depth: i32,
    thickness: i32,
    color: Rgb565,
) {
    if half_width <= 0 || thickness <= 0 {
        return;
    }
    let Some((dx_lo, dx_hi)) = clip_offsets(cx, half_width as i64, fb.width()) else {
        return;
    };
    let height = fb.height() as i64;

    for dx in dx_lo..=dx_hi {
        let frac = dx as f32 / half_width as f32;
        let curve = sqrtf((1.0 - frac * frac).max(0.0));
        let top = cy as i64 + (curve * depth as f32) as i64;
        let y1 = top.max(0);
        let y2 = (top + thickness as i64).min(height);
        let x = (cx as i64 + dx) as i32;
        for y in y1..y2 {
            fb.set_pixel(x, y as i32, color);
        }
    }
}
