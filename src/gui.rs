use crate::settings::SolverSettings;
use crate::sketch::{
    Color, PlacedResult, Point, PointerEvent, ResultRenderer, SessionState, SketchSession,
};
use eframe::egui;
use std::time::{Duration, Instant};

const CANVAS_TEXTURE: &str = "sketch-canvas";
const IDLE_REPAINT: Duration = Duration::from_millis(100);

pub struct SketchApp {
    session: SketchSession,
    swatches: Vec<Color>,
    texture: Option<egui::TextureHandle>,
    uploaded_revision: Option<u64>,
    canvas_origin: egui::Pos2,
}

impl SketchApp {
    pub fn new(session: SketchSession, settings: &SolverSettings) -> Self {
        Self {
            session,
            swatches: settings.swatches.clone(),
            texture: None,
            uploaded_revision: None,
            canvas_origin: egui::Pos2::ZERO,
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Reset").clicked() {
                self.session.reset();
            }
            ui.separator();

            let active = self.session.surface().color();
            for swatch in self.swatches.iter().copied() {
                let (rect, response) =
                    ui.allocate_exact_size(egui::vec2(24.0, 24.0), egui::Sense::click());
                let painter = ui.painter();
                painter.circle_filled(rect.center(), 10.0, to_color32(swatch));
                if swatch == active {
                    painter.circle_stroke(
                        rect.center(),
                        11.5,
                        egui::Stroke::new(2.0, egui::Color32::LIGHT_GRAY),
                    );
                }
                if response.clicked() {
                    self.session.set_color(swatch);
                }
            }
            ui.separator();

            let submitting = self.session.state() == SessionState::Submitting;
            if ui
                .add_enabled(!submitting, egui::Button::new("Run"))
                .clicked()
            {
                let _ = self.session.submit();
            }
            if submitting {
                ui.spinner();
            }
            if let Some(err) = self.session.last_error() {
                ui.colored_label(egui::Color32::LIGHT_RED, err.to_string());
            }
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::drag());
        let rect = response.rect;
        self.canvas_origin = rect.min;

        if !self.session.surface().is_initialized() && rect.width() >= 1.0 && rect.height() >= 1.0
        {
            self.session
                .init_surface(rect.width() as u32, rect.height() as u32);
        }

        let (pressed, down, released, press_origin, hover) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.press_origin(),
                i.pointer.hover_pos(),
            )
        });
        let local = |p: egui::Pos2| Point::new(p.x - rect.min.x, p.y - rect.min.y);

        if pressed && response.hovered() {
            if let Some(origin) = press_origin {
                self.session.handle_pointer(PointerEvent::Down(local(origin)));
            }
        }
        if self.session.surface().is_drawing() {
            match hover {
                Some(p) if rect.contains(p) => {
                    if down {
                        self.session.handle_pointer(PointerEvent::Move(local(p)));
                    }
                }
                _ => self.session.handle_pointer(PointerEvent::Leave),
            }
        }
        if released {
            self.session.handle_pointer(PointerEvent::Up);
        }

        painter.rect_filled(rect, 0.0, egui::Color32::BLACK);
        self.upload_canvas(ui.ctx());
        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                egui::Rect::from_min_size(rect.min, texture.size_vec2()),
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
    }

    fn upload_canvas(&mut self, ctx: &egui::Context) {
        let surface = self.session.surface();
        let revision = surface.revision();
        if self.texture.is_some() && self.uploaded_revision == Some(revision) {
            return;
        }
        let (Some((width, height)), Some(pixels)) = (surface.size(), surface.pixels()) else {
            return;
        };

        let image = egui::ColorImage::from_rgba_unmultiplied([width as usize, height as usize], pixels);
        match self.texture.as_mut() {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.texture =
                    Some(ctx.load_texture(CANVAS_TEXTURE, image, egui::TextureOptions::NEAREST));
            }
        }
        self.uploaded_revision = Some(revision);
    }
}

impl eframe::App for SketchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.session.tick(now);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.canvas(ui));

        let mut renderer = AreaRenderer {
            ctx,
            origin: self.canvas_origin,
        };
        self.session.render_results(&mut renderer);

        if self.session.has_pending_work() {
            let wait = self
                .session
                .next_wakeup()
                .map(|due| due.saturating_duration_since(now))
                .unwrap_or(IDLE_REPAINT)
                .min(IDLE_REPAINT);
            ctx.request_repaint_after(wait);
        }
    }
}

/// Shows each result as a draggable label floating over the canvas.
struct AreaRenderer<'a> {
    ctx: &'a egui::Context,
    origin: egui::Pos2,
}

impl ResultRenderer for AreaRenderer<'_> {
    fn render(&mut self, index: usize, result: &PlacedResult) -> Option<Point> {
        let pos = self.origin + egui::vec2(result.position.x, result.position.y);
        let response = egui::Area::new(egui::Id::new(("placed-result", index)))
            .order(egui::Order::Foreground)
            .current_pos(pos)
            .movable(true)
            .show(self.ctx, |ui| {
                egui::Frame::none()
                    .inner_margin(8.0)
                    .rounding(4.0)
                    .fill(egui::Color32::from_black_alpha(160))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(result.label())
                                .size(28.0)
                                .color(egui::Color32::WHITE),
                        )
                        .on_hover_text(&result.renderable_text);
                    });
            })
            .response;

        if !response.dragged() {
            return None;
        }
        let delta = self.ctx.input(|i| i.pointer.delta());
        let moved = response.rect.min + delta - self.origin;
        Some(Point::new(moved.x, moved.y))
    }
}

fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}
