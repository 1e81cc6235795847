//! Round resize handles drawn on the crop rectangle.

use eframe::egui::{Color32, CursorIcon, Painter, Pos2, Stroke, Vec2};

use crate::crop::{CropRectangle, ResizeDir};
use crate::geometry::distance_sq;

/// Handle radius in canvas pixels. Also the hit radius for hover tests.
pub const HANDLE_RADIUS: f32 = 5.0;

const HANDLE_FILL: Color32 = Color32::WHITE;
const HANDLE_OUTLINE: Color32 = Color32::from_rgb(0x99, 0x99, 0x99);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPoint {
    /// Canvas-relative center.
    pub center: Pos2,
    pub dir: ResizeDir,
}

impl ControlPoint {
    pub fn new(center: Pos2, dir: ResizeDir) -> Self {
        Self { center, dir }
    }

    pub fn cursor(&self) -> CursorIcon {
        self.dir.cursor()
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        distance_sq(self.center, pos) < HANDLE_RADIUS * HANDLE_RADIUS
    }

    /// Paint the handle. `origin` is the screen position of the canvas.
    pub fn paint(&self, painter: &Painter, origin: Vec2) {
        painter.circle(
            self.center + origin,
            HANDLE_RADIUS,
            HANDLE_FILL,
            Stroke::new(1.0, HANDLE_OUTLINE),
        );
    }
}

/// Handles for `rect` in hit-test priority order: the corners, then the edge
/// midpoints when the ratio is free-form.
pub fn control_points(rect: &CropRectangle, free_form: bool) -> Vec<ControlPoint> {
    let dirs: &[ResizeDir] = if free_form {
        &ResizeDir::ALL
    } else {
        &ResizeDir::CORNERS
    };
    dirs.iter()
        .map(|&dir| ControlPoint::new(rect.anchor(dir), dir))
        .collect()
}
