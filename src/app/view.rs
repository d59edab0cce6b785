use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, vec2};

use super::ViewModel;
use super::events::InputEvent;
use super::render_utils::{circle_visible, draw_background, edge_visible};
use super::style;

const BASE_NODE_RADIUS: f32 = 10.0;
const SELECTION_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const SEARCH_MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);

impl ViewModel {
    fn node_screen_radius(scale: f32) -> f32 {
        (BASE_NODE_RADIUS * scale.powf(0.6)).clamp(3.0, 34.0)
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let now = ui.input(|input| input.time);

        draw_background(&painter, rect, &self.viewport.transform());

        if self.graph.nodes.is_empty() {
            self.process_events(now, rect);
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Graph has no nodes",
                FontId::proportional(14.0),
                Color32::from_gray(200),
            );
            return;
        }

        // Hit test against the transform as the user saw it last frame.
        let transform = self.viewport.transform();
        let hit_radius = Self::node_screen_radius(transform.scale) + 4.0;
        let pointer = ui.input(|input| input.pointer.hover_pos().or(input.pointer.interact_pos()));

        let hovered = pointer.filter(|pos| rect.contains(*pos)).and_then(|pos| {
            self.sim
                .nodes()
                .iter()
                .enumerate()
                .filter_map(|(index, node)| {
                    let screen = transform.world_to_screen(rect, node.pos);
                    let distance = screen.distance(pos);
                    (distance <= hit_radius).then_some((index, distance))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(index, _)| index)
        });
        self.hovered = hovered;

        if response.hovered() {
            let scroll = ui.input(|input| input.raw_scroll_delta.y);
            if scroll.abs() > f32::EPSILON
                && let Some(pointer) = pointer
            {
                self.pending_events.push_back(InputEvent::Scrolled {
                    pointer,
                    delta: scroll,
                });
            }
        }

        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pending_events.push_back(InputEvent::Panned {
                delta: response.drag_delta(),
            });
        }

        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(node) = hovered
        {
            self.drag_candidate = Some(node);
            self.pending_events.push_back(InputEvent::DragStarted { node });
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            match (self.drag_candidate, pointer) {
                (Some(node), Some(pointer)) => {
                    let world = transform.screen_to_world(rect, pointer);
                    self.pending_events
                        .push_back(InputEvent::DragMoved { node, world });
                }
                (None, _) => {
                    // Primary drag over empty canvas pans.
                    self.pending_events.push_back(InputEvent::Panned {
                        delta: response.drag_delta(),
                    });
                }
                _ => {}
            }
        }

        if response.drag_stopped_by(egui::PointerButton::Primary)
            && let Some(node) = self.drag_candidate.take()
        {
            self.pending_events.push_back(InputEvent::DragEnded { node });
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            self.pending_events
                .push_back(InputEvent::Clicked { node: hovered });
        }

        self.process_events(now, rect);

        let screen = ui.ctx().screen_rect();
        let fit_size = self.viewport_size(rect, screen);
        self.maybe_auto_fit(now, fit_size);
        let animating = self.viewport.animate(now);

        let sim_active = self.sim.tick();
        if sim_active || animating || response.dragged() || self.auto_fit_pending {
            ui.ctx().request_repaint();
        }

        let transform = self.viewport.transform();
        let scale = transform.scale;
        let radius = Self::node_screen_radius(scale);
        let positions = self
            .sim
            .nodes()
            .iter()
            .map(|node| transform.world_to_screen(rect, node.pos))
            .collect::<Vec<Pos2>>();

        let edge_width = (1.1 * scale.sqrt()).clamp(0.5, 3.0);
        for edge in &self.graph.edges {
            let start = positions[edge.from];
            let end = positions[edge.to];
            if !edge_visible(rect, start, end, 2.0) {
                continue;
            }

            let touches_selection = self
                .selected
                .is_some_and(|selected| edge.from == selected || edge.to == selected);
            let (width, color) = if touches_selection {
                (edge_width + 1.0, SELECTION_COLOR)
            } else {
                (edge_width, Color32::from_rgba_unmultiplied(120, 130, 140, 160))
            };
            painter.line_segment([start, end], Stroke::new(width, color));
        }

        let search_matches = self.search_matches().cloned();
        let hover_boost = self.hover_style.radius_boost(self.mode);
        for (index, node) in self.graph.nodes.iter().enumerate() {
            let position = positions[index];
            let is_hovered = self.hovered == Some(index);
            let draw_radius = if is_hovered { radius + hover_boost } else { radius };
            if !circle_visible(rect, position, draw_radius + 6.0) {
                continue;
            }

            let is_selected = self.selected == Some(index);
            let is_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index));

            painter.circle_filled(position, draw_radius, style::node_color(&node.kind));
            if is_selected {
                painter.circle_stroke(
                    position,
                    draw_radius + 4.0,
                    Stroke::new(2.0, SELECTION_COLOR),
                );
            }

            let (ring_width, ring_color) = if is_match {
                (2.0, SEARCH_MATCH_COLOR)
            } else {
                (1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190))
            };
            painter.circle_stroke(position, draw_radius, Stroke::new(ring_width, ring_color));

            let show_label = is_hovered || is_selected || is_match || scale > 1.1;
            if show_label {
                let font = if is_hovered {
                    FontId::proportional(13.5)
                } else {
                    FontId::proportional(12.0)
                };
                painter.text(
                    position + vec2(draw_radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    &node.label,
                    font,
                    Color32::from_gray(238),
                );
            }
        }

        if let Some(index) = self.hovered {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });

            let node = &self.graph.nodes[index];
            let text = format!(
                "{}  |  {}  |  {}",
                node.label,
                node.kind.name(),
                style::tooltip_text(node)
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}
