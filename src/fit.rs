//! Image-fit calculation: how large the image is drawn inside the canvas.

use eframe::egui::{Rect, Vec2, vec2};

use crate::geometry::letterbox_offset;

/// Natural pixel size of the image next to the size it is displayed at.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ImageSize {
    pub width: f32,
    pub height: f32,
    pub virtual_width: f32,
    pub virtual_height: f32,
}

impl ImageSize {
    /// Fit an `image_width` x `image_height` image into `available`
    /// (canvas minus padding), preserving the aspect ratio. Images that
    /// already fit are shown at their natural size, never upscaled.
    pub fn fit(available: Vec2, image_width: f32, image_height: f32) -> Self {
        let (cw, ch) = (available.x.max(0.0), available.y.max(0.0));
        let (iw, ih) = (image_width, image_height);

        if iw <= 0.0 || ih <= 0.0 {
            return Self {
                width: iw.max(0.0),
                height: ih.max(0.0),
                ..Default::default()
            };
        }

        let (virtual_width, virtual_height) = if cw < iw || ch < ih {
            if ch <= 0.0 || cw / ch < iw / ih {
                (cw, cw * ih / iw)
            } else {
                (iw * ch / ih, ch)
            }
        } else {
            (iw, ih)
        };

        Self {
            width: iw,
            height: ih,
            virtual_width,
            virtual_height,
        }
    }

    pub fn natural(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    pub fn virtual_size(&self) -> Vec2 {
        vec2(self.virtual_width, self.virtual_height)
    }

    /// Natural image pixels per displayed pixel, per axis.
    pub fn scale(&self) -> Vec2 {
        let sx = if self.virtual_width > 0.0 {
            self.width / self.virtual_width
        } else {
            0.0
        };
        let sy = if self.virtual_height > 0.0 {
            self.height / self.virtual_height
        } else {
            0.0
        };
        vec2(sx, sy)
    }

    /// Canvas-relative rect the image occupies, centered in `canvas`.
    pub fn bounds_in(&self, canvas: Vec2) -> Rect {
        let offset = letterbox_offset(canvas, self.virtual_size());
        Rect::from_min_size(offset.to_pos2(), self.virtual_size())
    }
}
