//! Derived crop data and exporting the selected region.

use std::io::Cursor;

use eframe::egui::Vec2;
use image::{DynamicImage, ImageFormat};

use crate::crop::CropRectangle;
use crate::error::CropError;
use crate::fit::ImageSize;
use crate::geometry::letterbox_offset;

/// Snapshot of the selection handed to callbacks. Positions are relative to
/// the top-left of the displayed image, not the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CropData {
    /// Crop left in displayed pixels.
    pub left: f32,
    /// Crop top in displayed pixels.
    pub top: f32,
    pub virtual_crop_width: f32,
    pub virtual_crop_height: f32,
    /// Crop left in image pixels.
    pub crop_left: f32,
    /// Crop top in image pixels.
    pub crop_top: f32,
    pub crop_width: f32,
    pub crop_height: f32,
    pub image_width: f32,
    pub image_height: f32,
    pub image_virtual_width: f32,
    pub image_virtual_height: f32,
}

impl CropData {
    pub fn new(rect: &CropRectangle, image_size: &ImageSize, canvas: Vec2) -> Self {
        let offset = letterbox_offset(canvas, image_size.virtual_size());
        let scale = image_size.scale();
        let left = rect.left - offset.x;
        let top = rect.top - offset.y;

        Self {
            left,
            top,
            virtual_crop_width: rect.width,
            virtual_crop_height: rect.height,
            crop_left: left * scale.x,
            crop_top: top * scale.y,
            crop_width: rect.width * scale.x,
            crop_height: rect.height * scale.y,
            image_width: image_size.width,
            image_height: image_size.height,
            image_virtual_width: image_size.virtual_width,
            image_virtual_height: image_size.virtual_height,
        }
    }

    /// `(x, y, width, height)` in image pixels, rounded and clipped to the
    /// image. `None` when nothing is left.
    pub fn pixel_region(&self) -> Option<(u32, u32, u32, u32)> {
        let image_width = self.image_width.round().max(0.0);
        let image_height = self.image_height.round().max(0.0);

        let x = self.crop_left.round().clamp(0.0, image_width);
        let y = self.crop_top.round().clamp(0.0, image_height);
        let right = (self.crop_left + self.crop_width).round().clamp(x, image_width);
        let bottom = (self.crop_top + self.crop_height).round().clamp(y, image_height);

        let (width, height) = (right - x, bottom - y);
        if width < 1.0 || height < 1.0 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let region = (x as u32, y as u32, width as u32, height as u32);
        Some(region)
    }
}

/// Cut the region described by `data` out of the full-resolution `image`.
pub fn crop_region(image: &DynamicImage, data: &CropData) -> Result<DynamicImage, CropError> {
    let (x, y, width, height) = data
        .pixel_region()
        .ok_or_else(|| CropError::Export("crop region is empty".to_owned()))?;
    log::debug!("cropping {width}x{height} at ({x}, {y})");
    Ok(image.crop_imm(x, y, width, height))
}

/// Encode `image` as JPEG. Alpha is dropped.
pub fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>, CropError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image.to_rgb8())
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .map_err(|e| CropError::Export(e.to_string()))?;
    Ok(bytes)
}
