#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use crop_image::{CropImage, CropOptions, CropRectangle};
use eframe::egui;

const PADDING: f32 = 20.0;
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

#[derive(Clone, Copy, Debug, PartialEq)]
enum AspectRatioMode {
    Free,
    Original,
    Square,
    // Landscape
    R3_2,
    R4_3,
    R16_9,
    // Portrait
    R2_3,
    R3_4,
    R9_16,
    Custom,
}

impl Default for AspectRatioMode {
    fn default() -> Self {
        Self::Free
    }
}

impl AspectRatioMode {
    const LANDSCAPE: [AspectRatioMode; 3] = [Self::R3_2, Self::R4_3, Self::R16_9];
    const PORTRAIT: [AspectRatioMode; 3] = [Self::R2_3, Self::R3_4, Self::R9_16];

    fn counterpart(&self) -> Self {
        match self {
            AspectRatioMode::R3_2 => AspectRatioMode::R2_3,
            AspectRatioMode::R4_3 => AspectRatioMode::R3_4,
            AspectRatioMode::R16_9 => AspectRatioMode::R9_16,
            AspectRatioMode::R2_3 => AspectRatioMode::R3_2,
            AspectRatioMode::R3_4 => AspectRatioMode::R4_3,
            AspectRatioMode::R9_16 => AspectRatioMode::R16_9,
            _ => *self,
        }
    }

    /// Width / height lock for the widget, 0 for free-form.
    fn ratio(&self, image_size: egui::Vec2, custom_w: u32, custom_h: u32) -> f32 {
        match self {
            AspectRatioMode::Free => 0.0,
            AspectRatioMode::Original => image_size.x / image_size.y,
            AspectRatioMode::Square => 1.0,
            AspectRatioMode::R3_2 => 3.0 / 2.0,
            AspectRatioMode::R4_3 => 4.0 / 3.0,
            AspectRatioMode::R16_9 => 16.0 / 9.0,
            AspectRatioMode::R2_3 => 2.0 / 3.0,
            AspectRatioMode::R3_4 => 3.0 / 4.0,
            AspectRatioMode::R9_16 => 9.0 / 16.0,
            AspectRatioMode::Custom => custom_w as f32 / custom_h as f32,
        }
    }
}

impl std::fmt::Display for AspectRatioMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AspectRatioMode::Free => "Free",
            AspectRatioMode::Original => "Original",
            AspectRatioMode::Square => "1:1",
            AspectRatioMode::R3_2 => "3:2",
            AspectRatioMode::R4_3 => "4:3",
            AspectRatioMode::R16_9 => "16:9",
            AspectRatioMode::R2_3 => "2:3",
            AspectRatioMode::R3_4 => "3:4",
            AspectRatioMode::R9_16 => "9:16",
            AspectRatioMode::Custom => "Custom",
        };
        write!(f, "{}", s)
    }
}

/// Hosts a single [`CropImage`] and remembers the last rectangle per ratio.
#[derive(Default)]
struct CropHost {
    crop: Option<CropImage>,
    aspect_ratio_mode: AspectRatioMode,
    custom_w: u32,
    custom_h: u32,
    is_portrait: bool,
    // Keyed by `f32::to_bits` of the ratio.
    saved_crops: HashMap<u32, CropRectangle>,
    status: Option<String>,
}

impl CropHost {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            custom_w: 4,
            custom_h: 3,
            is_portrait: false,
            ..Default::default()
        }
    }

    fn current_ratio(&self) -> f32 {
        let image_size = self
            .crop
            .as_ref()
            .map(|crop| crop.image_size().natural())
            .unwrap_or(egui::vec2(1.0, 1.0));
        self.aspect_ratio_mode
            .ratio(image_size, self.custom_w, self.custom_h)
    }

    fn open(&mut self, path: &Path, available: egui::Vec2) -> anyhow::Result<()> {
        let options = CropOptions {
            width: Some((available.x - PADDING * 2.0).max(1.0)),
            height: Some((available.y - PADDING * 2.0).max(1.0)),
            padding: PADDING,
            ..Default::default()
        };
        let crop = CropImage::new(path, options)
            .with_context(|| format!("failed to open {}", path.display()))?
            .on_created(|data| {
                log::info!(
                    "image {}x{} shown at {}x{}",
                    data.image_width,
                    data.image_height,
                    data.image_virtual_width,
                    data.image_virtual_height
                );
            })
            .on_move(|data| log::trace!("moved to ({}, {})", data.left, data.top))
            .on_resize(|data| log::trace!("resized to {}x{}", data.crop_width, data.crop_height));

        if let Some(mut old) = self.crop.replace(crop) {
            old.dispose();
        }
        self.saved_crops.clear();
        self.apply_ratio()
    }

    /// Push the selected ratio into the widget, restoring the rectangle last
    /// used with it.
    fn apply_ratio(&mut self) -> anyhow::Result<()> {
        let ratio = self.current_ratio();
        let Some(crop) = self.crop.as_mut() else {
            return Ok(());
        };

        self.saved_crops
            .insert(crop.options().ratio.to_bits(), *crop.crop());
        crop.set_ratio(ratio).context("failed to change the aspect ratio")?;
        if let Some(saved) = self.saved_crops.get(&ratio.to_bits()) {
            if !crop.init_crop(*saved) {
                self.saved_crops.remove(&ratio.to_bits());
            }
        }
        Ok(())
    }

    fn save(&self, path: &Path) -> anyhow::Result<()> {
        let Some(crop) = &self.crop else {
            return Ok(());
        };
        let is_jpeg = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"));

        if is_jpeg {
            let bytes = crop.get_current_crop_as_image()?;
            std::fs::write(path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
        } else {
            crop.current_crop()?
                .save(path)
                .with_context(|| format!("failed to save {}", path.display()))?;
        }
        log::info!("saved crop to {}", path.display());
        Ok(())
    }

    fn report(&mut self, result: anyhow::Result<()>) {
        match result {
            Ok(()) => self.status = None,
            Err(e) => {
                log::error!("{e:#}");
                self.status = Some(format!("{e:#}"));
            }
        }
    }

    fn ratio_picker(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;
        ui.label("Aspect Ratio:");
        egui::ComboBox::from_id_salt("params_aspect_ratio")
            .selected_text(format!("{}", self.aspect_ratio_mode))
            .show_ui(ui, |ui| {
                let oriented = if self.is_portrait {
                    AspectRatioMode::PORTRAIT
                } else {
                    AspectRatioMode::LANDSCAPE
                };
                let common = [
                    AspectRatioMode::Free,
                    AspectRatioMode::Original,
                    AspectRatioMode::Square,
                ];
                for mode in common {
                    changed |= ui
                        .selectable_value(&mut self.aspect_ratio_mode, mode, mode.to_string())
                        .changed();
                }
                ui.separator();
                for mode in oriented {
                    changed |= ui
                        .selectable_value(&mut self.aspect_ratio_mode, mode, mode.to_string())
                        .changed();
                }
                ui.separator();
                changed |= ui
                    .selectable_value(
                        &mut self.aspect_ratio_mode,
                        AspectRatioMode::Custom,
                        "Custom",
                    )
                    .changed();
            });

        if ui.button("🔄").clicked() {
            self.is_portrait = !self.is_portrait;
            if self.aspect_ratio_mode == AspectRatioMode::Custom {
                std::mem::swap(&mut self.custom_w, &mut self.custom_h);
            } else {
                self.aspect_ratio_mode = self.aspect_ratio_mode.counterpart();
            }
            changed = true;
        }

        if self.aspect_ratio_mode == AspectRatioMode::Custom {
            changed |= ui
                .add(
                    egui::DragValue::new(&mut self.custom_w)
                        .speed(0.1)
                        .range(1..=100),
                )
                .changed();
            ui.label(":");
            changed |= ui
                .add(
                    egui::DragValue::new(&mut self.custom_h)
                        .speed(0.1)
                        .range(1..=100),
                )
                .changed();
        }
        changed
    }
}

impl eframe::App for CropHost {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dropped: Option<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .first()
                .and_then(|file| file.path.clone())
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut to_open = dropped;
            ui.horizontal(|ui| {
                if ui.button("Open Image").clicked() {
                    to_open = rfd::FileDialog::new()
                        .add_filter("Image", &IMAGE_EXTENSIONS)
                        .pick_file();
                }

                if self.crop.is_some() {
                    if self.ratio_picker(ui) {
                        let result = self.apply_ratio();
                        self.report(result);
                    }

                    if ui.button("Save Cropped Image").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Image", &IMAGE_EXTENSIONS)
                            .save_file()
                        {
                            let result = CropHost::save(self, &path);
                            self.report(result);
                        }
                    }

                    if let Some(crop) = &self.crop {
                        let data = crop.data();
                        ui.label(format!(
                            "{:.0} x {:.0} px",
                            data.crop_width, data.crop_height
                        ));
                    }
                }
            });

            if let Some(status) = &self.status {
                ui.colored_label(egui::Color32::LIGHT_RED, status);
            }
            ui.separator();

            if let Some(path) = to_open {
                let result = self.open(&path, ui.available_size());
                self.report(result);
            }

            if let Some(crop) = self.crop.as_mut() {
                ui.centered_and_justified(|ui| {
                    crop.show(ui);
                });
            }
        });
    }
}

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Crop Image",
        options,
        Box::new(|cc| Ok(Box::new(CropHost::new(cc)))),
    )
}
