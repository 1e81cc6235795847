//! Small geometry helpers shared by the hit testing and fit code.

use eframe::egui::{Pos2, Vec2, vec2};

/// Squared euclidean distance. Hit tests compare against a squared radius.
pub fn distance_sq(a: Pos2, b: Pos2) -> f32 {
    (a.x - b.x) * (a.x - b.x) + (a.y - b.y) * (a.y - b.y)
}

/// Top-left of a `virtual_size` box centered in `canvas`.
pub fn letterbox_offset(canvas: Vec2, virtual_size: Vec2) -> Vec2 {
    vec2(
        canvas.x / 2.0 - virtual_size.x / 2.0,
        canvas.y / 2.0 - virtual_size.y / 2.0,
    )
}

#[cfg(test)]
pub(crate) fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-3 * a.abs().max(b.abs()).max(1.0)
}
