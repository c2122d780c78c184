//! The eframe application driving the interactive mosaic view
//!
//! Each frame pumps one chunk of the active render pass, so the mosaic
//! fills incrementally while the UI stays responsive. Changing columns,
//! alpha, compositing mode, or pixelation restarts the render; hover size
//! applies immediately without one.

use crate::io::configuration::{
    HOVER_SIZE_STEP, MAX_HOVER_SIZE, MAX_TILE_COLUMNS, MIN_HOVER_SIZE, MIN_TILE_COLUMNS,
    RENDER_START_DELAY_MS, TILES_PER_STEP,
};
use crate::io::error::Result;
use crate::io::image::SampleSet;
use crate::render::blend::CompositeMode;
use crate::render::renderer::{MosaicRenderer, RenderConfig};
use image::RgbaImage;
use std::time::{Duration, Instant};

/// Run the viewer event loop until the window is closed
///
/// # Errors
///
/// Returns an error if the windowing backend fails to start.
pub fn run(
    source: RgbaImage,
    samples: SampleSet,
    config: RenderConfig,
    seed: Option<u64>,
) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("mosaicker"),
        ..Default::default()
    };

    eframe::run_native(
        "mosaicker",
        options,
        Box::new(move |_cc| Box::new(ViewerApp::new(source, samples, config, seed))),
    )?;
    Ok(())
}

struct ViewerApp {
    source: RgbaImage,
    samples: SampleSet,
    config: RenderConfig,
    seed: Option<u64>,
    renderer: Option<MosaicRenderer>,
    render_requested: bool,
    render_started: Option<Instant>,
    texture: Option<egui::TextureHandle>,
    last_pointer: Option<(f32, f32)>,
    error: Option<String>,
}

impl ViewerApp {
    fn new(
        source: RgbaImage,
        samples: SampleSet,
        config: RenderConfig,
        seed: Option<u64>,
    ) -> Self {
        Self {
            source,
            samples,
            config,
            seed,
            renderer: None,
            render_requested: true,
            render_started: None,
            texture: None,
            last_pointer: None,
            error: None,
        }
    }

    /// Replace any in-flight pass with a fresh one from the current config
    fn start_render(&mut self) {
        match MosaicRenderer::new(
            &self.source,
            &self.samples,
            self.config.sanitized(),
            self.seed,
        ) {
            Ok(renderer) => {
                self.renderer = Some(renderer);
                self.render_started = Some(Instant::now());
                self.last_pointer = None;
                self.error = None;
            }
            Err(e) => {
                self.renderer = None;
                self.error = Some(e.to_string());
            }
        }
    }

    fn upload_surface(&mut self, ctx: &egui::Context) {
        let Some(renderer) = &self.renderer else {
            return;
        };
        let pixels = renderer.surface_pixels();
        let size = [pixels.width() as usize, pixels.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_raw());
        let texture_options = egui::TextureOptions {
            magnification: egui::TextureFilter::Nearest,
            minification: egui::TextureFilter::Linear,
        };
        match &mut self.texture {
            Some(texture) => texture.set(color_image, texture_options),
            None => {
                self.texture = Some(ctx.load_texture("mosaic-surface", color_image, texture_options));
            }
        }
    }

    /// Advance the active pass by one chunk; returns whether pixels changed
    fn pump_render(&mut self, ctx: &egui::Context) -> bool {
        let Some(renderer) = &mut self.renderer else {
            return false;
        };
        if renderer.is_complete() {
            return false;
        }

        // Brief hold before the first chunk so the spinner gets a frame
        let started = self.render_started.get_or_insert_with(Instant::now);
        let mut stepped = false;
        if started.elapsed() >= Duration::from_millis(RENDER_START_DELAY_MS) {
            renderer.step(TILES_PER_STEP);
            stepped = true;
        }
        ctx.request_repaint();
        stepped
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Mosaic");
        ui.add_space(8.0);

        let mut restart = false;
        restart |= ui
            .add(
                egui::Slider::new(
                    &mut self.config.tile_columns,
                    MIN_TILE_COLUMNS..=MAX_TILE_COLUMNS,
                )
                .text("columns"),
            )
            .changed();
        restart |= ui
            .add(egui::Slider::new(&mut self.config.tile_alpha, 0.0..=1.0).text("tile alpha"))
            .changed();

        ui.horizontal(|ui| {
            ui.label("composite");
            egui::ComboBox::from_id_source("composite_mode_combo")
                .selected_text(self.config.composite.name())
                .width(140.0)
                .show_ui(ui, |ui: &mut egui::Ui| {
                    for &mode in CompositeMode::all() {
                        if ui
                            .selectable_label(mode == self.config.composite, mode.name())
                            .clicked()
                        {
                            self.config.composite = mode;
                            restart = true;
                        }
                    }
                });
        });

        restart |= ui.checkbox(&mut self.config.pixelated, "pixelate tiles").changed();

        // Applies to the next hover event; no re-render needed
        ui.add(
            egui::Slider::new(&mut self.config.hover_size, MIN_HOVER_SIZE..=MAX_HOVER_SIZE)
                .step_by(f64::from(HOVER_SIZE_STEP))
                .text("hover size"),
        );

        ui.add_space(8.0);
        if ui.button("re-render").clicked() {
            restart = true;
        }

        if let Some(renderer) = &self.renderer {
            if renderer.is_complete() {
                ui.label(format!("{} tiles", renderer.tiles_total()));
            } else {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(format!(
                        "{}/{} tiles",
                        renderer.tiles_drawn(),
                        renderer.tiles_total()
                    ));
                });
            }
        }

        if let Some(error) = &self.error {
            ui.add_space(8.0);
            ui.colored_label(egui::Color32::RED, error);
        }

        if restart {
            self.render_requested = true;
        }
    }

    /// Show the surface and return the pointer position over it, if any
    fn surface_view(&self, ui: &mut egui::Ui) -> Option<(f32, f32)> {
        let texture = self.texture.as_ref()?;
        let sized = egui::load::SizedTexture::from_handle(texture);
        let (rect, response) = ui.allocate_exact_size(sized.size, egui::Sense::hover());
        egui::Image::from_texture(sized).paint_at(ui, rect);

        if !response.hovered() {
            return None;
        }
        let pointer = ui.ctx().input(|i| i.pointer.hover_pos())?;
        let rel = pointer - rect.min;
        Some((rel.x, rel.y))
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.render_requested {
            self.render_requested = false;
            self.start_render();
            self.upload_surface(ctx);
        }

        if self.pump_render(ctx) {
            self.upload_surface(ctx);
        }

        egui::SidePanel::left("mosaic_controls")
            .default_width(220.0)
            .show(ctx, |ui| self.controls(ui));

        let pointer = egui::CentralPanel::default()
            .show(ctx, |ui| {
                egui::ScrollArea::both()
                    .show(ui, |ui| self.surface_view(ui))
                    .inner
            })
            .inner;

        // Hover magnification only reacts to pointer movement over a
        // completed pass; rapid repeats at one position are idempotent
        if let Some(pos) = pointer
            && self.last_pointer != Some(pos)
            && self.renderer.as_ref().is_some_and(MosaicRenderer::is_complete)
        {
            self.last_pointer = Some(pos);
            let hover_size = self.config.hover_size;
            let changed = self.renderer.as_mut().is_some_and(|renderer| {
                renderer.set_hover_size(hover_size);
                renderer.magnify_at(&self.samples, pos)
            });
            if changed {
                self.upload_surface(ctx);
            }
        }
    }
}
