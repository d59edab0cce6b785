use eframe::egui::Color32;

use crate::graph::{GraphNode, NodeKind};

pub const FILE_COLOR: Color32 = Color32::from_rgb(96, 165, 250); // blue
pub const FUNCTION_COLOR: Color32 = Color32::from_rgb(74, 222, 128); // green
pub const EXTERNAL_FUNCTION_COLOR: Color32 = Color32::from_rgb(192, 132, 252); // purple
pub const CLASS_COLOR: Color32 = Color32::from_rgb(251, 146, 60); // orange
pub const IMPORT_COLOR: Color32 = Color32::from_rgb(248, 113, 113); // red
pub const UNKNOWN_COLOR: Color32 = Color32::from_rgb(148, 148, 148); // gray

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    Container,
    FullWindow,
}

#[derive(Clone, Copy, Debug)]
pub struct HoverStyle {
    pub container_radius_boost: f32,
    pub full_window_radius_boost: f32,
}

impl Default for HoverStyle {
    fn default() -> Self {
        Self {
            container_radius_boost: 3.0,
            full_window_radius_boost: 5.0,
        }
    }
}

impl HoverStyle {
    pub fn radius_boost(&self, mode: ViewMode) -> f32 {
        match mode {
            ViewMode::Container => self.container_radius_boost,
            ViewMode::FullWindow => self.full_window_radius_boost,
        }
    }
}

pub fn node_color(kind: &NodeKind) -> Color32 {
    match kind {
        NodeKind::File { .. } => FILE_COLOR,
        NodeKind::Function { external: true, .. } => EXTERNAL_FUNCTION_COLOR,
        NodeKind::Function { .. } => FUNCTION_COLOR,
        NodeKind::Class { .. } => CLASS_COLOR,
        NodeKind::Import { .. } => IMPORT_COLOR,
        NodeKind::Other { .. } => UNKNOWN_COLOR,
    }
}

fn line_range(start: Option<u32>, end: Option<u32>) -> String {
    match (start, end) {
        (Some(start), Some(end)) => format!(":{start}-{end}"),
        (Some(start), None) => format!(":{start}"),
        _ => String::new(),
    }
}

pub fn tooltip_text(node: &GraphNode) -> String {
    match &node.kind {
        NodeKind::File { path } => path.clone(),
        NodeKind::Function {
            path,
            external,
            parent_file,
            start_line,
            end_line,
        } => {
            if *external {
                match parent_file {
                    Some(parent) => format!("external, called from {parent}"),
                    None => "external".to_owned(),
                }
            } else {
                format!("{path}{}", line_range(*start_line, *end_line))
            }
        }
        NodeKind::Class {
            path,
            start_line,
            end_line,
        } => format!("{path}{}", line_range(*start_line, *end_line)),
        NodeKind::Import { source_file } => format!("from {source_file}"),
        NodeKind::Other { type_name } => format!("{} ({type_name})", node.label),
    }
}
