//! The crop rectangle and the rules for moving and resizing it.
//!
//! All coordinates are canvas-relative. `bounds` is always the rect the
//! virtual image occupies inside the canvas (see [`crate::ImageSize::bounds_in`]).

use eframe::egui::{CursorIcon, Pos2, Rect, Vec2, pos2, vec2};

use crate::config::DEFAULT_MIN_SIZE;
use crate::error::CropError;

/// Which handle a resize is driven from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResizeDir {
    TopLeft,
    BottomRight,
    TopRight,
    BottomLeft,
    TopMiddle,
    BottomMiddle,
    LeftMiddle,
    RightMiddle,
}

impl ResizeDir {
    /// Hit-test order: corners first, then edge midpoints.
    pub const ALL: [ResizeDir; 8] = [
        ResizeDir::TopLeft,
        ResizeDir::BottomRight,
        ResizeDir::TopRight,
        ResizeDir::BottomLeft,
        ResizeDir::TopMiddle,
        ResizeDir::BottomMiddle,
        ResizeDir::LeftMiddle,
        ResizeDir::RightMiddle,
    ];

    pub const CORNERS: [ResizeDir; 4] = [
        ResizeDir::TopLeft,
        ResizeDir::BottomRight,
        ResizeDir::TopRight,
        ResizeDir::BottomLeft,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            ResizeDir::TopLeft
                | ResizeDir::TopRight
                | ResizeDir::BottomLeft
                | ResizeDir::BottomRight
        )
    }

    pub fn cursor(self) -> CursorIcon {
        match self {
            ResizeDir::TopLeft | ResizeDir::BottomRight => CursorIcon::ResizeNwSe,
            ResizeDir::TopRight | ResizeDir::BottomLeft => CursorIcon::ResizeNeSw,
            ResizeDir::TopMiddle | ResizeDir::BottomMiddle => CursorIcon::ResizeVertical,
            ResizeDir::LeftMiddle | ResizeDir::RightMiddle => CursorIcon::ResizeHorizontal,
        }
    }

    fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeDir::TopLeft | ResizeDir::BottomLeft | ResizeDir::LeftMiddle
        )
    }

    fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeDir::TopRight | ResizeDir::BottomRight | ResizeDir::RightMiddle
        )
    }

    fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeDir::TopLeft | ResizeDir::TopRight | ResizeDir::TopMiddle
        )
    }

    fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeDir::BottomLeft | ResizeDir::BottomRight | ResizeDir::BottomMiddle
        )
    }
}

/// The user's selection in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropRectangle {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    /// Resizing never takes `width` or `height` below this.
    pub min: f32,
}

impl Default for CropRectangle {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl CropRectangle {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
            min: DEFAULT_MIN_SIZE,
        }
    }

    pub fn with_min(mut self, min: f32) -> Self {
        self.min = min;
        self
    }

    /// Largest rectangle of `ratio` (width / height) that fits in `bounds`,
    /// centered on it. A non-positive ratio fills `bounds`.
    pub fn inscribed(bounds: Rect, ratio: f32) -> Self {
        let (width, height) = (bounds.width(), bounds.height());
        let (crop_width, crop_height) = if !(ratio.is_finite() && ratio > 0.0) {
            (width, height)
        } else if width <= height * ratio {
            (width, width / ratio)
        } else {
            (height * ratio, height)
        };
        Self::centered(bounds, crop_width, crop_height)
    }

    /// A `width` x `height` rectangle centered on `bounds`. Fails when it
    /// would not fit.
    pub fn fixed(bounds: Rect, width: f32, height: f32) -> Result<Self, CropError> {
        if width > bounds.width() || height > bounds.height() {
            return Err(CropError::CropSizeExceedsImage {
                crop_width: width,
                crop_height: height,
                image_width: bounds.width(),
                image_height: bounds.height(),
            });
        }
        Ok(Self::centered(bounds, width, height))
    }

    fn centered(bounds: Rect, width: f32, height: f32) -> Self {
        let center = bounds.center();
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn min_pos(&self) -> Pos2 {
        pos2(self.left, self.top)
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    pub fn to_rect(&self) -> Rect {
        Rect::from_min_size(self.min_pos(), self.size())
    }

    /// Strictly inside, borders excluded.
    pub fn contains(&self, pos: Pos2) -> bool {
        pos.x > self.left && pos.x < self.right() && pos.y > self.top && pos.y < self.bottom()
    }

    /// Position of the handle for `dir`.
    pub fn anchor(&self, dir: ResizeDir) -> Pos2 {
        let (x1, y1, x2, y2) = (self.left, self.top, self.right(), self.bottom());
        let (mx, my) = (x1 + self.width / 2.0, y1 + self.height / 2.0);
        match dir {
            ResizeDir::TopLeft => pos2(x1, y1),
            ResizeDir::BottomRight => pos2(x2, y2),
            ResizeDir::TopRight => pos2(x2, y1),
            ResizeDir::BottomLeft => pos2(x1, y2),
            ResizeDir::TopMiddle => pos2(mx, y1),
            ResizeDir::BottomMiddle => pos2(mx, y2),
            ResizeDir::LeftMiddle => pos2(x1, my),
            ResizeDir::RightMiddle => pos2(x2, my),
        }
    }

    /// Translate by `delta`, then pull the rectangle back inside `bounds`.
    pub fn translate(&mut self, delta: Vec2, bounds: Rect) {
        self.left += delta.x;
        self.top += delta.y;
        self.move_inside(bounds);
    }

    /// Clamp each edge separately. Left and top are applied last so a
    /// rectangle larger than `bounds` ends up pinned to the top-left.
    pub fn move_inside(&mut self, bounds: Rect) {
        if self.right() > bounds.max.x {
            self.left = bounds.max.x - self.width;
        }
        if self.bottom() > bounds.max.y {
            self.top = bounds.max.y - self.height;
        }
        if self.left < bounds.min.x {
            self.left = bounds.min.x;
        }
        if self.top < bounds.min.y {
            self.top = bounds.min.y;
        }
    }

    /// The rectangle after dragging the `dir` handle by `delta`, without any
    /// checks. With `ratio > 0` the horizontal delta drives both axes.
    pub fn resized(&self, dir: ResizeDir, delta: Vec2, ratio: f32) -> Self {
        let mut next = *self;
        let (dx, dy) = if ratio > 0.0 {
            (delta.x, delta.x / ratio)
        } else {
            (delta.x, delta.y)
        };

        match dir {
            ResizeDir::TopLeft => {
                next.left += dx;
                next.top += dy;
                next.width -= dx;
                next.height -= dy;
            }
            ResizeDir::TopRight if ratio > 0.0 => {
                next.top -= dy;
                next.width += dx;
                next.height += dy;
            }
            ResizeDir::TopRight => {
                next.top += dy;
                next.width += dx;
                next.height -= dy;
            }
            ResizeDir::BottomLeft if ratio > 0.0 => {
                next.left += dx;
                next.width -= dx;
                next.height -= dy;
            }
            ResizeDir::BottomLeft => {
                next.left += dx;
                next.width -= dx;
                next.height += dy;
            }
            ResizeDir::BottomRight => {
                next.width += dx;
                next.height += dy;
            }
            ResizeDir::TopMiddle => {
                next.top += delta.y;
                next.height -= delta.y;
            }
            ResizeDir::BottomMiddle => {
                next.height += delta.y;
            }
            ResizeDir::LeftMiddle => {
                next.left += delta.x;
                next.width -= delta.x;
            }
            ResizeDir::RightMiddle => {
                next.width += delta.x;
            }
        }
        next
    }

    /// Apply one resize step. The step is taken whole or not at all: it is
    /// rejected when it would shrink below `min` or push a moving edge out
    /// of `bounds`. Returns whether the rectangle changed.
    pub fn resize(&mut self, dir: ResizeDir, delta: Vec2, ratio: f32, bounds: Rect) -> bool {
        if ratio > 0.0 && !dir.is_corner() {
            return false;
        }
        let next = self.resized(dir, delta, ratio);
        if !next.can_zoom_out() || !next.can_zoom_in(dir, bounds) {
            return false;
        }
        let changed = next != *self;
        *self = next;
        changed
    }

    fn can_zoom_out(&self) -> bool {
        self.width >= self.min && self.height >= self.min
    }

    fn can_zoom_in(&self, dir: ResizeDir, bounds: Rect) -> bool {
        (!dir.moves_left() || self.left >= bounds.min.x)
            && (!dir.moves_right() || self.right() <= bounds.max.x)
            && (!dir.moves_top() || self.top >= bounds.min.y)
            && (!dir.moves_bottom() || self.bottom() <= bounds.max.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::approx_eq;

    fn bounds() -> Rect {
        // 640x460 virtual image centered in a 700x500 canvas.
        Rect::from_min_size(pos2(30.0, 20.0), vec2(640.0, 460.0))
    }

    fn contained(rect: &CropRectangle, bounds: Rect) -> bool {
        rect.left >= bounds.min.x - 1e-3
            && rect.top >= bounds.min.y - 1e-3
            && rect.right() <= bounds.max.x + 1e-3
            && rect.bottom() <= bounds.max.y + 1e-3
    }

    #[test]
    fn inscribed_fits_the_binding_dimension() {
        let square = CropRectangle::inscribed(bounds(), 1.0);
        assert_eq!(square.size(), vec2(460.0, 460.0));
        assert_eq!(square.min_pos(), pos2(120.0, 20.0));

        let wide = CropRectangle::inscribed(bounds(), 4.0);
        assert_eq!(wide.size(), vec2(640.0, 160.0));
        assert_eq!(wide.min_pos(), pos2(30.0, 170.0));
    }

    #[test]
    fn fixed_crop_is_exact_and_centered() {
        let rect = CropRectangle::fixed(bounds(), 200.0, 200.0).unwrap();
        assert_eq!(rect.width, 200.0);
        assert_eq!(rect.height, 200.0);
        assert_eq!(rect.to_rect().center(), bounds().center());
    }

    #[test]
    fn fixed_crop_larger_than_image_fails() {
        assert!(matches!(
            CropRectangle::fixed(bounds(), 641.0, 100.0),
            Err(CropError::CropSizeExceedsImage { .. })
        ));
        assert!(matches!(
            CropRectangle::fixed(bounds(), 100.0, 461.0),
            Err(CropError::CropSizeExceedsImage { .. })
        ));
    }

    #[test]
    fn free_form_bottom_right_moves_axes_independently() {
        let mut rect = CropRectangle::new(100.0, 100.0, 200.0, 150.0);
        assert!(rect.resize(ResizeDir::BottomRight, vec2(30.0, 20.0), 0.0, bounds()));
        assert_eq!(rect, CropRectangle::new(100.0, 100.0, 230.0, 170.0));
    }

    #[test]
    fn locked_top_left_uses_horizontal_delta() {
        let mut rect = CropRectangle::new(100.0, 100.0, 200.0, 200.0);
        assert!(rect.resize(ResizeDir::TopLeft, vec2(10.0, 10.0), 1.0, bounds()));
        assert_eq!(rect, CropRectangle::new(110.0, 110.0, 190.0, 190.0));

        // The vertical component is ignored under a ratio lock.
        let mut rect = CropRectangle::new(100.0, 100.0, 200.0, 100.0);
        assert!(rect.resize(ResizeDir::TopLeft, vec2(10.0, -50.0), 2.0, bounds()));
        assert_eq!(rect, CropRectangle::new(110.0, 105.0, 190.0, 95.0));
    }

    #[test]
    fn locked_ratio_rejects_edge_midpoints() {
        let mut rect = CropRectangle::new(100.0, 100.0, 200.0, 200.0);
        assert!(!rect.resize(ResizeDir::RightMiddle, vec2(10.0, 0.0), 1.0, bounds()));
        assert_eq!(rect, CropRectangle::new(100.0, 100.0, 200.0, 200.0));
    }

    #[test]
    fn step_past_min_is_rejected_whole() {
        let mut rect = CropRectangle::new(100.0, 100.0, 30.0, 30.0);
        assert!(!rect.resize(ResizeDir::BottomRight, vec2(-15.0, -5.0), 0.0, bounds()));
        assert_eq!(rect.size(), vec2(30.0, 30.0));

        // Landing exactly on min is allowed.
        assert!(rect.resize(ResizeDir::BottomRight, vec2(-10.0, -10.0), 0.0, bounds()));
        assert_eq!(rect.size(), vec2(20.0, 20.0));
    }

    #[test]
    fn step_past_bounds_is_rejected_whole() {
        let mut rect = CropRectangle::new(40.0, 30.0, 100.0, 100.0);
        assert!(!rect.resize(ResizeDir::TopLeft, vec2(-20.0, -5.0), 0.0, bounds()));
        assert_eq!(rect, CropRectangle::new(40.0, 30.0, 100.0, 100.0));

        // Growing the opposite side is unaffected.
        assert!(rect.resize(ResizeDir::BottomRight, vec2(20.0, 20.0), 0.0, bounds()));
        assert_eq!(rect.size(), vec2(120.0, 120.0));
    }

    #[test]
    fn edge_midpoints_move_one_dimension() {
        let start = CropRectangle::new(100.0, 100.0, 200.0, 150.0);

        let mut rect = start;
        rect.resize(ResizeDir::TopMiddle, vec2(50.0, 10.0), 0.0, bounds());
        assert_eq!(rect, CropRectangle::new(100.0, 110.0, 200.0, 140.0));

        let mut rect = start;
        rect.resize(ResizeDir::LeftMiddle, vec2(-10.0, 99.0), 0.0, bounds());
        assert_eq!(rect, CropRectangle::new(90.0, 100.0, 210.0, 150.0));
    }

    #[test]
    fn move_clamps_each_edge() {
        let mut rect = CropRectangle::new(100.0, 100.0, 200.0, 100.0);
        rect.translate(vec2(-500.0, 1000.0), bounds());
        assert_eq!(rect.min_pos(), pos2(30.0, 380.0));

        rect.translate(vec2(1000.0, -1000.0), bounds());
        assert_eq!(rect.min_pos(), pos2(470.0, 20.0));
    }

    #[test]
    fn oversized_rectangle_is_pinned_top_left() {
        let mut rect = CropRectangle::new(0.0, 0.0, 800.0, 600.0);
        rect.translate(vec2(5.0, 5.0), bounds());
        assert_eq!(rect.min_pos(), pos2(30.0, 20.0));
    }

    #[test]
    fn moves_keep_rectangle_inside() {
        let deltas = [
            vec2(13.0, -7.0),
            vec2(-250.0, 40.0),
            vec2(700.0, 700.0),
            vec2(-3.5, 0.25),
            vec2(0.0, -900.0),
            vec2(120.0, 33.0),
        ];
        let mut rect = CropRectangle::inscribed(bounds(), 1.5);
        rect.resize(ResizeDir::BottomRight, vec2(-100.0, 0.0), 1.5, bounds());
        for round in 0..20 {
            let delta = deltas[round % deltas.len()] * (round as f32 + 1.0) / 3.0;
            rect.translate(delta, bounds());
            assert!(contained(&rect, bounds()), "round {round}: {rect:?}");
        }
    }

    #[test]
    fn resize_sequences_keep_ratio_min_and_bounds() {
        let deltas = [
            vec2(12.0, 3.0),
            vec2(-40.0, -9.0),
            vec2(-300.0, 5.0),
            vec2(7.5, 60.0),
            vec2(250.0, -250.0),
            vec2(-1.25, 0.5),
        ];
        for ratio in [0.5, 1.0, 4.0 / 3.0, 16.0 / 9.0] {
            let mut rect = CropRectangle::inscribed(bounds(), ratio);
            for round in 0..48 {
                let dir = ResizeDir::CORNERS[round % 4];
                let delta = deltas[round % deltas.len()];
                rect.resize(dir, delta, ratio, bounds());
                assert!(approx_eq(rect.width / rect.height, ratio), "{ratio}: {rect:?}");
                assert!(rect.width >= rect.min && rect.height >= rect.min);
                assert!(contained(&rect, bounds()), "{ratio}: {rect:?}");
            }
        }
    }

    #[test]
    fn free_form_sequences_respect_min() {
        let mut rect = CropRectangle::inscribed(bounds(), 0.0);
        for round in 0..64 {
            let dir = ResizeDir::ALL[round % 8];
            let delta = vec2(37.0, -23.0) * if round % 3 == 0 { -1.0 } else { 1.0 };
            rect.resize(dir, delta, 0.0, bounds());
            assert!(rect.width >= rect.min && rect.height >= rect.min, "{rect:?}");
            assert!(contained(&rect, bounds()), "{rect:?}");
        }
    }

    #[test]
    fn anchors_and_cursors() {
        let rect = CropRectangle::new(0.0, 0.0, 10.0, 20.0);
        assert_eq!(rect.anchor(ResizeDir::RightMiddle), pos2(10.0, 10.0));
        assert_eq!(rect.anchor(ResizeDir::BottomLeft), pos2(0.0, 20.0));
        assert_eq!(ResizeDir::TopRight.cursor(), CursorIcon::ResizeNeSw);
        assert_eq!(ResizeDir::LeftMiddle.cursor(), CursorIcon::ResizeHorizontal);
        assert!(rect.contains(pos2(5.0, 5.0)));
        assert!(!rect.contains(pos2(0.0, 5.0)));
    }
}
