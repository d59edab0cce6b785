use std::collections::HashSet;

use eframe::egui::Vec2;

use super::sim::Simulation;

pub const DRAG_ALPHA_TARGET: f32 = 0.3;

#[derive(Default)]
pub struct DragController {
    active: HashSet<usize>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_dragging(&self, node: usize) -> bool {
        self.active.contains(&node)
    }

    /// Free -> Dragging. Pins the node where the simulation currently has it;
    /// the first concurrent drag wakes the simulation.
    pub fn begin(&mut self, node: usize, sim: &mut Simulation) {
        if node >= sim.len() || !self.active.insert(node) {
            return;
        }

        if self.active.len() == 1 {
            sim.set_alpha_target(DRAG_ALPHA_TARGET);
        }
        let pos = sim.node(node).pos;
        sim.pin(node, pos);
    }

    /// Dragging -> Dragging: the pin follows the pointer.
    pub fn update(&mut self, node: usize, world: Vec2, sim: &mut Simulation) {
        if self.active.contains(&node) {
            sim.pin(node, world);
        }
    }

    /// Dragging -> Free. The last concurrent drag cools the simulation back
    /// down; the node resumes free simulated motion.
    pub fn end(&mut self, node: usize, sim: &mut Simulation) {
        if !self.active.remove(&node) {
            return;
        }

        sim.unpin(node);
        if self.active.is_empty() {
            sim.set_alpha_target(0.0);
        }
    }

    pub fn cancel_all(&mut self, sim: &mut Simulation) {
        for node in self.active.drain() {
            sim.unpin(node);
        }
        sim.set_alpha_target(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::super::sim::SimConfig;
    use super::*;
    use eframe::egui::vec2;

    fn sim_with(nodes: usize) -> Simulation {
        let positions = (0..nodes)
            .map(|i| vec2(i as f32 * 200.0, 0.0))
            .collect::<Vec<_>>();
        Simulation::from_positions(positions, Vec::new(), SimConfig::default())
    }

    #[test]
    fn drag_lifecycle_pins_then_releases_the_node() {
        let mut sim = sim_with(2);
        let mut drag = DragController::new();
        let before = sim.node(0).pos;

        drag.begin(0, &mut sim);
        assert_eq!(sim.pinned(0), Some(before));
        assert_eq!(sim.alpha_target(), DRAG_ALPHA_TARGET);

        drag.update(0, vec2(50.0, 60.0), &mut sim);
        assert_eq!(sim.pinned(0), Some(vec2(50.0, 60.0)));

        drag.end(0, &mut sim);
        assert_eq!(sim.pinned(0), None);
        assert_eq!(sim.alpha_target(), 0.0);

        let before = sim.node(0).pos;
        sim.tick();
        assert_ne!(sim.node(0).pos, before);
    }

    #[test]
    fn drag_start_does_not_move_the_node() {
        let mut sim = Simulation::from_positions(
            vec![vec2(120.0, -30.0), vec2(400.0, 0.0)],
            Vec::new(),
            SimConfig::default(),
        );
        let mut drag = DragController::new();

        // A press lands wherever the hit test accepted the pointer, which can
        // be off the node center; starting the drag must not snap the node.
        drag.begin(0, &mut sim);
        assert_eq!(sim.node(0).pos, vec2(120.0, -30.0));
        assert_eq!(sim.pinned(0), Some(vec2(120.0, -30.0)));

        sim.tick();
        assert_eq!(sim.node(0).pos, vec2(120.0, -30.0));
    }

    #[test]
    fn releasing_one_of_two_drags_keeps_the_sim_reheated() {
        let mut sim = sim_with(3);
        let mut drag = DragController::new();

        drag.begin(0, &mut sim);
        drag.begin(1, &mut sim);
        assert_eq!(drag.active_count(), 2);
        assert_eq!(sim.alpha_target(), DRAG_ALPHA_TARGET);

        drag.end(0, &mut sim);
        assert_eq!(sim.alpha_target(), DRAG_ALPHA_TARGET);
        assert!(drag.is_dragging(1));

        drag.end(1, &mut sim);
        assert_eq!(sim.alpha_target(), 0.0);
        assert_eq!(drag.active_count(), 0);
    }

    #[test]
    fn redundant_transitions_are_ignored() {
        let mut sim = sim_with(2);
        let mut drag = DragController::new();

        drag.begin(0, &mut sim);
        drag.update(0, vec2(1.0, 1.0), &mut sim);
        drag.begin(0, &mut sim);
        assert_eq!(drag.active_count(), 1);
        assert_eq!(sim.pinned(0), Some(vec2(1.0, 1.0)));

        drag.end(1, &mut sim);
        assert_eq!(sim.alpha_target(), DRAG_ALPHA_TARGET, "ending a non-drag must not cool down");

        drag.update(1, vec2(5.0, 5.0), &mut sim);
        assert_eq!(sim.pinned(1), None);

        drag.end(0, &mut sim);
        assert_eq!(sim.alpha_target(), 0.0);
    }

    #[test]
    fn out_of_range_node_is_rejected() {
        let mut sim = sim_with(1);
        let mut drag = DragController::new();
        drag.begin(7, &mut sim);
        assert_eq!(drag.active_count(), 0);
        assert_eq!(sim.alpha_target(), 0.0);
    }

    #[test]
    fn cancel_all_unpins_and_cools_down() {
        let mut sim = sim_with(3);
        let mut drag = DragController::new();
        drag.begin(0, &mut sim);
        drag.begin(2, &mut sim);

        drag.cancel_all(&mut sim);
        assert_eq!(drag.active_count(), 0);
        assert_eq!(sim.pinned(0), None);
        assert_eq!(sim.pinned(2), None);
        assert_eq!(sim.alpha_target(), 0.0);
    }
}
