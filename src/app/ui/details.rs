use eframe::egui::{self, RichText, Ui};

use crate::graph::NodeKind;

use super::super::ViewModel;
use super::super::style::{node_color, tooltip_text};

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Node details");
        ui.add_space(6.0);

        let Some(selected) = self.selected else {
            ui.label("Select a node in the graph.");
            return;
        };
        let Some(node) = self.graph.nodes.get(selected) else {
            ui.label("Selected node no longer exists in the graph.");
            return;
        };

        ui.horizontal(|ui| {
            ui.label(RichText::new(&node.label).strong().color(node_color(&node.kind)));
            ui.label(node.kind.name());
        });
        ui.small(node.id.as_str());
        ui.add_space(6.0);
        ui.label(tooltip_text(node));

        match &node.kind {
            NodeKind::Function {
                external,
                parent_file,
                ..
            } => {
                if *external {
                    ui.label("Defined outside the analyzed repository.");
                }
                if let Some(parent) = parent_file {
                    ui.label(format!("Parent file: {parent}"));
                }
            }
            NodeKind::Import { source_file } => {
                ui.label(format!("Imported by: {source_file}"));
            }
            _ => {}
        }

        ui.separator();
        ui.label(RichText::new("Relationships").strong());

        let related = self
            .graph
            .edges_of(selected)
            .map(|(edge, neighbor)| {
                let outgoing = edge.from == selected;
                (edge.relation.clone(), edge.line, neighbor, outgoing)
            })
            .collect::<Vec<_>>();

        if related.is_empty() {
            ui.label("No edges touch this node.");
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .max_height(420.0)
            .show(ui, |ui| {
                for (relation, line, neighbor, outgoing) in related {
                    let Some(other) = self.graph.nodes.get(neighbor) else {
                        continue;
                    };

                    let arrow = if outgoing { "\u{2192}" } else { "\u{2190}" };
                    let mut label = format!("{arrow} {relation}: {}", other.label);
                    if let Some(line) = line {
                        label.push_str(&format!(" (line {line})"));
                    }

                    if ui.link(label).on_hover_text(other.id.as_str()).clicked() {
                        self.selected = Some(neighbor);
                    }
                }
            });
    }
}
