use std::collections::{HashSet, VecDeque};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Rect, Vec2, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use log::warn;

use crate::graph::{CodeGraph, load_code_graph};

mod drag;
mod events;
mod render_utils;
mod sim;
mod style;
mod ui;
mod view;
mod viewport;

use drag::DragController;
use events::InputEvent;
use sim::{SimConfig, Simulation};
use style::{HoverStyle, ViewMode};
use viewport::{AUTO_FIT_DELAY_SECS, ViewportController};

const MIN_CONTAINER_SIZE: Vec2 = vec2(480.0, 360.0);

pub struct RepoGraphApp {
    graph_path: String,
    state: AppState,
    reload_rx: Option<Receiver<Result<CodeGraph, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<CodeGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct SearchMatches {
    query: String,
    matches: HashSet<usize>,
}

/// One loaded graph plus its simulation and interaction controllers.
/// Replaced wholesale when the input graph is revised.
struct ViewModel {
    graph: CodeGraph,
    sim: Simulation,
    viewport: ViewportController,
    drag: DragController,
    hover_style: HoverStyle,
    mode: ViewMode,
    selected: Option<usize>,
    hovered: Option<usize>,
    search: String,
    search_cache: Option<SearchMatches>,
    pending_events: VecDeque<InputEvent>,
    auto_fit_pending: bool,
    auto_fit_deadline: Option<f64>,
    drag_candidate: Option<usize>,
    full_window_toggle_requested: bool,
}

impl ViewModel {
    fn new(graph: CodeGraph) -> Self {
        let sim = Simulation::from_graph(&graph, SimConfig::default());
        Self {
            graph,
            sim,
            viewport: ViewportController::new(),
            drag: DragController::new(),
            hover_style: HoverStyle::default(),
            mode: ViewMode::Container,
            selected: None,
            hovered: None,
            search: String::new(),
            search_cache: None,
            pending_events: VecDeque::new(),
            auto_fit_pending: true,
            auto_fit_deadline: None,
            drag_candidate: None,
            full_window_toggle_requested: false,
        }
    }

    fn reset_layout(&mut self) {
        self.drag.cancel_all(&mut self.sim);
        self.sim = Simulation::from_graph(&self.graph, SimConfig::default());
        self.viewport.reset_immediate();
        self.drag_candidate = None;
        self.auto_fit_pending = true;
        self.auto_fit_deadline = None;
    }

    fn process_events(&mut self, now: f64, rect: Rect) {
        while let Some(event) = self.pending_events.pop_front() {
            match event {
                InputEvent::Scrolled { pointer, delta } => {
                    self.viewport.on_scroll(rect, pointer, delta);
                }
                InputEvent::Panned { delta } => self.viewport.on_pan(delta),
                InputEvent::ZoomIn => self.viewport.zoom_in(now),
                InputEvent::ZoomOut => self.viewport.zoom_out(now),
                InputEvent::ResetView => self.viewport.reset(now),
                InputEvent::DragStarted { node } => {
                    self.drag.begin(node, &mut self.sim);
                }
                InputEvent::DragMoved { node, world } => {
                    self.drag.update(node, world, &mut self.sim);
                }
                InputEvent::DragEnded { node } => self.drag.end(node, &mut self.sim),
                InputEvent::Clicked { node } => self.selected = node,
                InputEvent::ToggleFullWindow => self.full_window_toggle_requested = true,
            }
        }
    }

    /// One-shot auto-fit, armed on every graph (re)build and fired on a
    /// fixed delay after it.
    fn maybe_auto_fit(&mut self, now: f64, viewport_size: Vec2) {
        if !self.auto_fit_pending {
            return;
        }

        let deadline = *self
            .auto_fit_deadline
            .get_or_insert(now + AUTO_FIT_DELAY_SECS);
        if now < deadline {
            return;
        }

        self.auto_fit_pending = false;
        self.auto_fit_deadline = None;
        if let Some(bounds) = self.sim.bounds() {
            self.viewport.auto_fit(bounds, viewport_size, now);
        }
    }

    fn viewport_size(&self, rect: Rect, screen: Rect) -> Vec2 {
        match self.mode {
            ViewMode::Container => rect.size().max(MIN_CONTAINER_SIZE),
            ViewMode::FullWindow => screen.size(),
        }
    }

    fn search_matches(&mut self) -> Option<&HashSet<usize>> {
        let query = self.search.trim();
        if query.is_empty() {
            self.search_cache = None;
            return None;
        }

        let stale = self
            .search_cache
            .as_ref()
            .is_none_or(|cache| cache.query != query);
        if stale {
            let matcher = SkimMatcherV2::default();
            let matches = self
                .graph
                .nodes
                .iter()
                .enumerate()
                .filter_map(|(index, node)| matcher.fuzzy_match(&node.label, query).map(|_| index))
                .collect();
            self.search_cache = Some(SearchMatches {
                query: query.to_owned(),
                matches,
            });
        }

        self.search_cache.as_ref().map(|cache| &cache.matches)
    }

    /// No-op if the host reports no fullscreen support.
    fn apply_full_window_toggle(&mut self, ctx: &Context) {
        if !self.full_window_toggle_requested {
            return;
        }
        self.full_window_toggle_requested = false;

        let Some(fullscreen) = ctx.input(|input| input.viewport().fullscreen) else {
            warn!("host environment does not report fullscreen support, ignoring toggle");
            return;
        };

        let next_mode = match self.mode {
            ViewMode::Container => ViewMode::FullWindow,
            ViewMode::FullWindow => ViewMode::Container,
        };
        ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(!fullscreen));
        self.mode = next_mode;
        self.reset_layout();
    }

    fn show(
        &mut self,
        ctx: &Context,
        graph_path: &str,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        self.apply_full_window_toggle(ctx);

        egui::TopBottomPanel::top("toolbar")
            .resizable(false)
            .show(ctx, |ui| {
                self.draw_toolbar(ui, graph_path, reload_requested, is_reloading);
            });

        if self.selected.is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(340.0)
                .show(ctx, |ui| {
                    self.draw_details(ui);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_graph(ui);
        });
    }
}

impl RepoGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, graph_path: String) -> Self {
        let state = Self::start_load(graph_path.clone());
        Self {
            graph_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(graph_path: String) -> Receiver<Result<CodeGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_code_graph(&graph_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(graph_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(graph_path),
        }
    }
}

impl eframe::App for RepoGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(graph) => AppState::Ready(Box::new(ViewModel::new(graph))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading analysis graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load analysis graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.graph_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.graph_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.graph_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(graph) => AppState::Ready(Box::new(ViewModel::new(graph))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::sanitize_graph;
    use eframe::egui::pos2;

    fn sample_model() -> ViewModel {
        let raw: crate::graph::RawGraph = serde_json::from_str(
            r#"{
                "nodes": [
                    {"id": "a.py", "type": "file", "path": "a.py"},
                    {"id": "a.py::f", "type": "function", "path": "a.py"},
                    {"id": "os", "type": "import", "meta": {"source_file": "a.py"}}
                ],
                "edges": [
                    {"from": "a.py", "to": "a.py::f", "type": "contains"},
                    {"from": "a.py", "to": "os", "type": "imports"}
                ]
            }"#,
        )
        .expect("sample graph parses");
        ViewModel::new(sanitize_graph(&raw))
    }

    fn rect() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0))
    }

    #[test]
    fn events_are_processed_in_arrival_order() {
        let mut model = sample_model();
        model
            .pending_events
            .push_back(InputEvent::DragStarted { node: 0 });
        model.pending_events.push_back(InputEvent::DragMoved {
            node: 0,
            world: vec2(30.0, 10.0),
        });
        model
            .pending_events
            .push_back(InputEvent::Clicked { node: Some(1) });
        model
            .pending_events
            .push_back(InputEvent::DragEnded { node: 0 });

        model.process_events(0.0, rect());

        assert!(model.pending_events.is_empty());
        assert_eq!(model.sim.pinned(0), None, "drag ended after the move");
        assert_eq!(model.selected, Some(1));
        assert_eq!(model.sim.alpha_target(), 0.0);
    }

    #[test]
    fn clicking_empty_space_clears_the_selection() {
        let mut model = sample_model();
        model
            .pending_events
            .push_back(InputEvent::Clicked { node: Some(2) });
        model.process_events(0.0, rect());
        assert_eq!(model.selected, Some(2));

        model
            .pending_events
            .push_back(InputEvent::Clicked { node: None });
        model.process_events(0.0, rect());
        assert_eq!(model.selected, None);
    }

    #[test]
    fn auto_fit_waits_for_the_settle_delay_then_fires_once() {
        let mut model = sample_model();
        let size = vec2(800.0, 600.0);

        model.maybe_auto_fit(0.0, size);
        assert!(model.auto_fit_pending);
        assert_eq!(model.viewport.scale(), 1.0);

        model.maybe_auto_fit(1.0, size);
        assert!(model.auto_fit_pending, "before the 1.5s deadline");

        model.maybe_auto_fit(2.0, size);
        assert!(!model.auto_fit_pending);

        model.maybe_auto_fit(10.0, size);
        assert!(!model.auto_fit_pending);

        model.reset_layout();
        assert!(model.auto_fit_pending);
    }

    #[test]
    fn reset_layout_cancels_active_drags_and_pins() {
        let mut model = sample_model();
        model
            .pending_events
            .push_back(InputEvent::DragStarted { node: 1 });
        model.process_events(0.0, rect());
        assert_eq!(model.sim.alpha_target(), drag::DRAG_ALPHA_TARGET);

        model.reset_layout();
        assert_eq!(model.drag.active_count(), 0);
        assert_eq!(model.sim.alpha_target(), 0.0);
        assert_eq!(model.sim.pinned(1), None);
    }

    #[test]
    fn search_matches_are_cached_per_query() {
        let mut model = sample_model();
        model.search = "os".to_owned();
        let matches = model.search_matches().cloned().expect("matches");
        assert!(matches.contains(&2));

        model.search = String::new();
        assert!(model.search_matches().is_none());
    }

    #[test]
    fn container_viewport_size_has_a_floor() {
        let model = sample_model();
        let tiny = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 80.0));
        let screen = Rect::from_min_size(pos2(0.0, 0.0), vec2(1920.0, 1080.0));
        assert_eq!(model.viewport_size(tiny, screen), MIN_CONTAINER_SIZE);
    }
}
