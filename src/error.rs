use thiserror::Error;

/// Errors raised while building the crop widget or exporting a crop.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CropError {
    #[error(
        "crop size {crop_width}x{crop_height} exceeds the displayed image size {image_width}x{image_height}"
    )]
    CropSizeExceedsImage {
        crop_width: f32,
        crop_height: f32,
        image_width: f32,
        image_height: f32,
    },

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("export failed: {0}")]
    Export(String),
}
