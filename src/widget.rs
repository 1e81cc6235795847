//! The embeddable crop widget.

use std::path::{Path, PathBuf};

use eframe::egui::{
    self, Color32, Painter, Pos2, Rect, Response, Sense, Shape, Stroke, TextureHandle, Ui, Vec2,
};
use image::DynamicImage;

use crate::config::{CropOptions, RepaintMode};
use crate::control_point::control_points;
use crate::crop::CropRectangle;
use crate::error::CropError;
use crate::export::{CropData, crop_region, encode_jpeg};
use crate::fit::ImageSize;
use crate::interaction::{Constraints, DragEvent, Interaction};

const COVER_COLOR: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 102);
const BORDER_WIDTH: f32 = 2.0;
const BORDER_DASH: f32 = 3.0;

type Callback = Box<dyn FnMut(&CropData)>;

/// Where the image comes from.
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
    Image(DynamicImage),
}

impl ImageSource {
    fn load(self) -> Result<DynamicImage, CropError> {
        match self {
            ImageSource::Path(path) => Ok(image::ImageReader::open(&path)?
                .with_guessed_format()?
                .decode()?),
            ImageSource::Bytes(bytes) => Ok(image::load_from_memory(&bytes)?),
            ImageSource::Image(image) => Ok(image),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(image: DynamicImage) -> Self {
        ImageSource::Image(image)
    }
}

/// An image with a movable, resizable crop rectangle on top.
///
/// Call [`CropImage::show`] every frame. The canvas is `width`/`height`
/// (default: the image size) plus `padding` on each side; the image is
/// letterboxed into it and the crop rectangle lives in canvas coordinates.
pub struct CropImage {
    options: CropOptions,
    image: Option<DynamicImage>,
    texture: Option<TextureHandle>,
    canvas_size: Vec2,
    image_size: ImageSize,
    crop: CropRectangle,
    interaction: Interaction,
    created: bool,
    disposed: bool,
    on_move: Option<Callback>,
    on_resize: Option<Callback>,
    on_created: Option<Callback>,
}

impl CropImage {
    /// Decode the image and lay out the initial crop rectangle. Fails on a
    /// bad option, an unreadable image, or a fixed crop size larger than the
    /// displayed image.
    pub fn new(source: impl Into<ImageSource>, options: CropOptions) -> Result<Self, CropError> {
        options.validate()?;
        let image = source.into().load()?;
        let canvas_size = Self::canvas_size_for(&options, &image);
        let (image_size, crop) = Self::layout(&options, canvas_size, &image)?;
        log::debug!(
            "crop widget: image {}x{}, canvas {:?}, crop {:?}",
            image.width(),
            image.height(),
            canvas_size,
            crop
        );

        Ok(Self {
            options,
            image: Some(image),
            texture: None,
            canvas_size,
            image_size,
            crop,
            interaction: Interaction::default(),
            created: false,
            disposed: false,
            on_move: None,
            on_resize: None,
            on_created: None,
        })
    }

    pub fn on_move(mut self, callback: impl FnMut(&CropData) + 'static) -> Self {
        self.on_move = Some(Box::new(callback));
        self
    }

    pub fn on_resize(mut self, callback: impl FnMut(&CropData) + 'static) -> Self {
        self.on_resize = Some(Box::new(callback));
        self
    }

    /// Called once, on the first frame the image is on screen.
    pub fn on_created(mut self, callback: impl FnMut(&CropData) + 'static) -> Self {
        self.on_created = Some(Box::new(callback));
        self
    }

    fn canvas_size_for(options: &CropOptions, image: &DynamicImage) -> Vec2 {
        egui::vec2(
            options.width.unwrap_or(image.width() as f32) + options.padding * 2.0,
            options.height.unwrap_or(image.height() as f32) + options.padding * 2.0,
        )
    }

    fn layout(
        options: &CropOptions,
        canvas_size: Vec2,
        image: &DynamicImage,
    ) -> Result<(ImageSize, CropRectangle), CropError> {
        let (iw, ih) = (image.width() as f32, image.height() as f32);
        let available = canvas_size - egui::vec2(options.padding * 2.0, options.padding * 2.0);
        let image_size = ImageSize::fit(available, iw, ih);
        let bounds = image_size.bounds_in(canvas_size);

        let crop = match options.fixed_crop_size() {
            Some((width, height)) => CropRectangle::fixed(bounds, width, height)?,
            None => {
                let ratio = if options.is_free_form() { iw / ih } else { options.ratio };
                CropRectangle::inscribed(bounds, ratio)
            }
        };
        Ok((image_size, crop.with_min(options.min_size)))
    }

    /// Recompute the image fit and reset the crop rectangle to the default
    /// for the current ratio.
    pub fn init_image_size(&mut self) -> Result<(), CropError> {
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| CropError::InvalidOption("widget has been disposed".to_owned()))?;
        self.canvas_size = Self::canvas_size_for(&self.options, image);
        let (image_size, crop) = Self::layout(&self.options, self.canvas_size, image)?;
        self.image_size = image_size;
        self.crop = crop;
        self.interaction.pointer_up();
        log::debug!("image size {:?}, crop {:?}", self.image_size, self.crop);
        Ok(())
    }

    /// Switch the aspect ratio lock (0 for free-form) and reset the crop.
    pub fn set_ratio(&mut self, ratio: f32) -> Result<(), CropError> {
        let options = CropOptions {
            ratio,
            ..self.options.clone()
        };
        options.validate()?;
        self.options = options;
        self.init_image_size()
    }

    /// Replace the crop rectangle, e.g. with one cached for this ratio, and
    /// pull it back inside the image.
    ///
    /// A fixed crop size overrides the restored size. Free-form rectangles
    /// are clamped to `min_size` and the image size. Under a ratio lock a
    /// rectangle with the wrong ratio or an out-of-range size is refused and
    /// the current crop is kept. Returns whether `rect` was taken.
    pub fn init_crop(&mut self, rect: CropRectangle) -> bool {
        let bounds = self.bounds();
        let min = self.options.min_size;
        let mut rect = rect.with_min(min);

        if let Some((width, height)) = self.options.fixed_crop_size() {
            rect.width = width;
            rect.height = height;
        } else if self.options.is_free_form() {
            let width = rect.width.max(min).min(bounds.width());
            let height = rect.height.max(min).min(bounds.height());
            if (width, height) != (rect.width, rect.height) {
                log::warn!("clamping restored crop {rect:?} to {width}x{height}");
            }
            rect.width = width;
            rect.height = height;
        } else {
            let ratio = self.options.ratio;
            let ratio_ok = rect.height > 0.0
                && (rect.width / rect.height - ratio).abs() <= 1e-3 * ratio;
            let size_ok = rect.width >= min
                && rect.height >= min
                && rect.width <= bounds.width()
                && rect.height <= bounds.height();
            if !ratio_ok || !size_ok {
                log::warn!("refusing restored crop {rect:?} for ratio {ratio} in {bounds:?}");
                return false;
            }
        }

        rect.move_inside(bounds);
        self.crop = rect;
        self.interaction.pointer_up();
        true
    }

    /// Ask egui for another frame.
    pub fn render(&self, ctx: &egui::Context) {
        ctx.request_repaint();
    }

    /// Drop the image and texture. Afterwards `show` paints nothing and the
    /// widget stops requesting repaints.
    pub fn dispose(&mut self) {
        log::debug!("disposing crop widget");
        self.disposed = true;
        self.texture = None;
        self.image = None;
        self.interaction = Interaction::default();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn options(&self) -> &CropOptions {
        &self.options
    }

    pub fn crop(&self) -> &CropRectangle {
        &self.crop
    }

    pub fn image_size(&self) -> &ImageSize {
        &self.image_size
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    /// Canvas-relative rect of the displayed image.
    pub fn bounds(&self) -> Rect {
        self.image_size.bounds_in(self.canvas_size)
    }

    fn constraints(&self) -> Constraints {
        Constraints {
            bounds: self.bounds(),
            ratio: self.options.ratio,
            fixed_size: self.options.fixed_crop_size().is_some(),
        }
    }

    pub fn data(&self) -> CropData {
        CropData::new(&self.crop, &self.image_size, self.canvas_size)
    }

    /// The selected region of the full-resolution image.
    pub fn current_crop(&self) -> Result<DynamicImage, CropError> {
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| CropError::Export("widget has been disposed".to_owned()))?;
        crop_region(image, &self.data())
    }

    /// The selected region as JPEG bytes.
    pub fn get_current_crop_as_image(&self) -> Result<Vec<u8>, CropError> {
        let cropped = self.current_crop()?;
        let bytes = encode_jpeg(&cropped)?;
        log::info!(
            "exported {}x{} crop ({} bytes)",
            cropped.width(),
            cropped.height(),
            bytes.len()
        );
        Ok(bytes)
    }

    fn load_texture(&mut self, ctx: &egui::Context) {
        if let Some(image) = &self.image {
            let size = [image.width() as _, image.height() as _];
            let image_buffer = image.to_rgba8();
            let pixels = image_buffer.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture =
                Some(ctx.load_texture("crop-image", color_image, egui::TextureOptions::LINEAR));
        }
    }

    /// Handle input and paint one frame.
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        if self.disposed {
            return ui.allocate_response(Vec2::ZERO, Sense::hover());
        }
        if self.texture.is_none() {
            self.load_texture(ui.ctx());
        }

        let (canvas_rect, response) =
            ui.allocate_exact_size(self.canvas_size, Sense::click_and_drag());
        let origin = canvas_rect.min.to_vec2();
        let to_canvas = |pos: Pos2| pos - origin;

        if !self.created {
            self.created = true;
            let data = self.data();
            if let Some(callback) = self.on_created.as_mut() {
                callback(&data);
            }
        }

        let constraints = self.constraints();
        let mut changed = false;

        if response.drag_started() {
            let press = ui
                .input(|i| i.pointer.press_origin())
                .or(response.interact_pointer_pos());
            if let Some(pos) = press {
                self.interaction
                    .pointer_down(to_canvas(pos), &self.crop, &constraints);
                changed = true;
            }
        }

        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                changed |= self.drag_to(to_canvas(pos), &constraints);
            }
        } else if let Some(pos) = response.hover_pos() {
            let before = self.interaction.hover();
            changed |= self
                .interaction
                .pointer_hover(to_canvas(pos), &self.crop, &constraints)
                != before;
        }

        if response.drag_stopped() {
            // The release frame can carry one last move.
            let moved = ui.input(|i| i.pointer.delta() != Vec2::ZERO);
            if moved && !response.dragged() && self.interaction.is_dragging() {
                let pos = response
                    .interact_pointer_pos()
                    .or(ui.input(|i| i.pointer.latest_pos()));
                if let Some(pos) = pos {
                    changed |= self.drag_to(to_canvas(pos), &constraints);
                }
            }
            self.interaction.pointer_up();
            changed = true;
        }

        if response.hovered() || self.interaction.is_dragging() {
            ui.ctx().set_cursor_icon(self.interaction.cursor());
        }

        self.paint(&ui.painter_at(canvas_rect), canvas_rect);

        match self.options.repaint {
            RepaintMode::Continuous => ui.ctx().request_repaint(),
            RepaintMode::OnChange if changed => ui.ctx().request_repaint(),
            RepaintMode::OnChange => {}
        }

        response
    }

    /// Feed a canvas-relative pointer position to an active drag and fire
    /// the matching callback. Returns whether the crop changed.
    fn drag_to(&mut self, pos: Pos2, constraints: &Constraints) -> bool {
        match self.interaction.pointer_move(pos, &mut self.crop, constraints) {
            Some(event) => {
                self.notify(event);
                event.changed()
            }
            None => false,
        }
    }

    fn notify(&mut self, event: DragEvent) {
        let data = self.data();
        let callback = match event {
            DragEvent::Moved { .. } => self.on_move.as_mut(),
            DragEvent::Resized { .. } => self.on_resize.as_mut(),
        };
        if let Some(callback) = callback {
            callback(&data);
        }
    }

    fn paint(&self, painter: &Painter, canvas_rect: Rect) {
        let origin = canvas_rect.min.to_vec2();
        let image_rect = self.bounds().translate(origin);
        let crop_rect = self.crop.to_rect().translate(origin);

        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                image_rect,
                Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        // Cover everything but the selection.
        painter.rect_filled(
            Rect::from_min_max(canvas_rect.min, egui::pos2(canvas_rect.max.x, crop_rect.min.y)),
            0.0,
            COVER_COLOR,
        );
        painter.rect_filled(
            Rect::from_min_max(egui::pos2(canvas_rect.min.x, crop_rect.max.y), canvas_rect.max),
            0.0,
            COVER_COLOR,
        );
        painter.rect_filled(
            Rect::from_min_max(
                egui::pos2(canvas_rect.min.x, crop_rect.min.y),
                egui::pos2(crop_rect.min.x, crop_rect.max.y),
            ),
            0.0,
            COVER_COLOR,
        );
        painter.rect_filled(
            Rect::from_min_max(
                egui::pos2(crop_rect.max.x, crop_rect.min.y),
                egui::pos2(canvas_rect.max.x, crop_rect.max.y),
            ),
            0.0,
            COVER_COLOR,
        );

        let outline = [
            crop_rect.left_top(),
            crop_rect.right_top(),
            crop_rect.right_bottom(),
            crop_rect.left_bottom(),
            crop_rect.left_top(),
        ];
        painter.extend(Shape::dashed_line(
            &outline,
            Stroke::new(BORDER_WIDTH, self.options.stroke_color),
            BORDER_DASH,
            BORDER_DASH,
        ));

        if self.options.fixed_crop_size().is_none() {
            for point in control_points(&self.crop, self.options.is_free_form()) {
                point.paint(painter, origin);
            }
        }
    }
}
