use eframe::egui::{Pos2, Vec2};

/// Pointer gestures and toolbar actions become messages; the view model
/// drains the queue in arrival order before ticking the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Scrolled { pointer: Pos2, delta: f32 },
    Panned { delta: Vec2 },
    ZoomIn,
    ZoomOut,
    ResetView,
    DragStarted { node: usize },
    DragMoved { node: usize, world: Vec2 },
    DragEnded { node: usize },
    Clicked { node: Option<usize> },
    ToggleFullWindow,
}
