//! Widget options.

use eframe::egui::Color32;

use crate::error::CropError;

/// Default lower bound for the crop rectangle's width and height.
pub const DEFAULT_MIN_SIZE: f32 = 20.0;

/// How often the widget asks egui for a new frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RepaintMode {
    /// Request a repaint every frame, whether or not anything changed.
    #[default]
    Continuous,
    /// Only repaint when pointer input changed the widget state.
    OnChange,
}

/// All options for a [`crate::CropImage`], built with struct update syntax:
///
/// ```
/// use crop_image::CropOptions;
///
/// let options = CropOptions {
///     ratio: 16.0 / 9.0,
///     padding: 20.0,
///     ..Default::default()
/// };
/// assert!(options.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CropOptions {
    /// Border colour of the crop rectangle.
    pub stroke_color: Color32,
    /// Width / height lock. 0 means free-form.
    pub ratio: f32,
    /// Canvas width without padding. Defaults to the image width.
    pub width: Option<f32>,
    /// Canvas height without padding. Defaults to the image height.
    pub height: Option<f32>,
    /// Empty margin around the image inside the canvas.
    pub padding: f32,
    /// Fixed crop width in displayed pixels. Needs `crop_height` too, and
    /// turns off interactive resizing.
    pub crop_width: Option<f32>,
    /// Fixed crop height in displayed pixels.
    pub crop_height: Option<f32>,
    /// Smallest width or height resizing may produce.
    pub min_size: f32,
    pub repaint: RepaintMode,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            stroke_color: Color32::from_rgb(0x99, 0x99, 0x99),
            ratio: 0.0,
            width: None,
            height: None,
            padding: 0.0,
            crop_width: None,
            crop_height: None,
            min_size: DEFAULT_MIN_SIZE,
            repaint: RepaintMode::default(),
        }
    }
}

impl CropOptions {
    pub fn validate(&self) -> Result<(), CropError> {
        if !self.ratio.is_finite() || self.ratio < 0.0 {
            return Err(CropError::InvalidOption(format!(
                "ratio must be a finite number >= 0, got {}",
                self.ratio
            )));
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(CropError::InvalidOption(format!(
                "padding must be >= 0, got {}",
                self.padding
            )));
        }
        if !self.min_size.is_finite() || self.min_size < 0.0 {
            return Err(CropError::InvalidOption(format!(
                "min_size must be >= 0, got {}",
                self.min_size
            )));
        }
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("crop_width", self.crop_width),
            ("crop_height", self.crop_height),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(CropError::InvalidOption(format!(
                        "{name} must be > 0, got {v}"
                    )));
                }
            }
        }
        if self.crop_width.is_some() != self.crop_height.is_some() {
            return Err(CropError::InvalidOption(
                "crop_width and crop_height must be set together".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn is_free_form(&self) -> bool {
        self.ratio <= 0.0
    }

    /// Fixed crop size, if both dimensions are configured.
    pub fn fixed_crop_size(&self) -> Option<(f32, f32)> {
        self.crop_width.zip(self.crop_height)
    }
}
