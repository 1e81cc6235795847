//! An egui widget for picking a crop rectangle on an image.
//!
//! The image is letterboxed into a canvas and a crop rectangle is drawn on
//! top of it. The rectangle can be moved, resized from its handles, locked to
//! an aspect ratio or fixed to a size, and the selected region can be read
//! back from the full-resolution image.

pub mod config;
pub mod control_point;
pub mod crop;
pub mod error;
pub mod export;
pub mod fit;
pub mod geometry;
pub mod interaction;
pub mod widget;

pub use config::{CropOptions, RepaintMode};
pub use crop::{CropRectangle, ResizeDir};
pub use error::CropError;
pub use export::CropData;
pub use fit::ImageSize;
pub use interaction::{DragState, Hit, Interaction};
pub use widget::{CropImage, ImageSource};
