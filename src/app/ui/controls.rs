use eframe::egui::{self, Align, Layout, Ui};

use super::super::ViewModel;
use super::super::events::InputEvent;
use super::super::style::ViewMode;

impl ViewModel {
    pub(in crate::app) fn draw_toolbar(
        &mut self,
        ui: &mut Ui,
        graph_path: &str,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        ui.horizontal(|ui| {
            ui.heading("repograph");
            ui.separator();
            ui.label(format!("source: {graph_path}"));
            ui.label(format!("nodes: {}", self.graph.node_count()));
            ui.label(format!("edges: {}", self.graph.edge_count()));
            if !self.graph.warnings.is_empty() {
                ui.colored_label(
                    egui::Color32::from_rgb(246, 190, 80),
                    format!("{} dropped", self.graph.warnings.len()),
                )
                .on_hover_text(self.graph.warnings.join("\n"));
            }

            let reload_button = ui.add_enabled(!is_reloading, egui::Button::new("Reload"));
            if reload_button.clicked() {
                *reload_requested = true;
            }

            ui.separator();
            ui.label("search:");
            let search_box = ui.add(
                egui::TextEdit::singleline(&mut self.search)
                    .desired_width(160.0)
                    .hint_text("node label"),
            );
            if search_box.changed() {
                self.search_cache = None;
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let full_window_label = match self.mode {
                    ViewMode::Container => "Full window",
                    ViewMode::FullWindow => "Exit full window",
                };
                if ui.button(full_window_label).clicked() {
                    self.pending_events.push_back(InputEvent::ToggleFullWindow);
                }

                if ui.button("Reset view").clicked() {
                    self.pending_events.push_back(InputEvent::ResetView);
                }
                if ui.button("+").clicked() {
                    self.pending_events.push_back(InputEvent::ZoomIn);
                }
                ui.label(format!("{:.0}%", self.viewport.scale() * 100.0));
                if ui.button("\u{2212}").clicked() {
                    self.pending_events.push_back(InputEvent::ZoomOut);
                }
            });
        });
    }
}
