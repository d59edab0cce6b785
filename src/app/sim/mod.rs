mod forces;
mod quadtree;

use eframe::egui::{Rect, Vec2, pos2, vec2};

use crate::graph::CodeGraph;
use crate::util::stable_pair;

use forces::{accumulate_charge_for_node, accumulate_collision_for_node, accumulate_link_forces};
use quadtree::QuadNode;

const PHYLLOTAXIS_ANGLE: f32 = 2.399_963;
const PHYLLOTAXIS_SPACING: f32 = 18.0;
const SEED_JITTER: f32 = 6.0;

#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
    pub link_distance: f32,
    pub link_strength: f32,
    /// Negative repels.
    pub charge_strength: f32,
    pub charge_softening: f32,
    pub charge_theta: f32,
    pub center_strength: f32,
    pub collision_radius: f32,
    pub collision_strength: f32,
    /// alpha += (target - alpha) * alpha_decay.
    pub alpha_decay: f32,
    pub alpha_min: f32,
    pub velocity_decay: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            link_distance: 150.0,
            link_strength: 0.1,
            charge_strength: -300.0,
            charge_softening: 1.0,
            charge_theta: 0.8,
            center_strength: 0.03,
            collision_radius: 20.0,
            collision_strength: 0.7,
            alpha_decay: 0.0228,
            alpha_min: 0.001,
            velocity_decay: 0.4,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SimNode {
    pub pos: Vec2,
    pub vel: Vec2,
    /// While set, the node is clamped here every tick regardless of forces.
    pub pinned: Option<Vec2>,
}

#[derive(Default)]
struct Scratch {
    positions: Vec<Vec2>,
    forces: Vec<Vec2>,
}

/// Layout context for one graph instance. Rebuilt whenever the input graph
/// or the view mode changes.
pub struct Simulation {
    nodes: Vec<SimNode>,
    edges: Vec<(usize, usize)>,
    alpha: f32,
    alpha_target: f32,
    config: SimConfig,
    scratch: Scratch,
}

fn seed_position(index: usize, id: &str) -> Vec2 {
    let radius = PHYLLOTAXIS_SPACING * ((index as f32) + 0.5).sqrt();
    let angle = (index as f32) * PHYLLOTAXIS_ANGLE;
    let (jx, jy) = stable_pair(id);
    vec2(angle.cos(), angle.sin()) * radius + vec2(jx, jy) * SEED_JITTER
}

impl Simulation {
    pub fn from_graph(graph: &CodeGraph, config: SimConfig) -> Self {
        let nodes = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| SimNode {
                pos: seed_position(index, &node.id),
                vel: Vec2::ZERO,
                pinned: None,
            })
            .collect();
        let edges = graph.edges.iter().map(|edge| (edge.from, edge.to)).collect();

        Self {
            nodes,
            edges,
            alpha: 1.0,
            alpha_target: 0.0,
            config,
            scratch: Scratch::default(),
        }
    }

    pub fn from_positions(
        positions: Vec<Vec2>,
        edges: Vec<(usize, usize)>,
        config: SimConfig,
    ) -> Self {
        let nodes = positions
            .into_iter()
            .map(|pos| SimNode {
                pos,
                vel: Vec2::ZERO,
                pinned: None,
            })
            .collect();

        Self {
            nodes,
            edges,
            alpha: 1.0,
            alpha_target: 0.0,
            config,
            scratch: Scratch::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> &SimNode {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.alpha > self.config.alpha_min || self.alpha_target > 0.0
    }

    pub fn pin(&mut self, index: usize, pos: Vec2) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pinned = Some(pos);
            node.pos = pos;
            node.vel = Vec2::ZERO;
        }
    }

    pub fn unpin(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pinned = None;
        }
    }

    pub fn pinned(&self, index: usize) -> Option<Vec2> {
        self.nodes.get(index).and_then(|node| node.pinned)
    }

    /// One relaxation step. Forces read a position snapshot, then velocities
    /// and positions integrate. Returns whether the simulation stays active.
    pub fn tick(&mut self) -> bool {
        if self.nodes.is_empty() || !self.is_active() {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

        let node_count = self.nodes.len();
        self.scratch.positions.clear();
        self.scratch
            .positions
            .extend(self.nodes.iter().map(|node| node.pos));
        self.scratch.forces.resize(node_count, Vec2::ZERO);
        self.scratch.forces.fill(Vec2::ZERO);

        let positions = &self.scratch.positions;
        let forces = &mut self.scratch.forces;

        if let Some(tree) = QuadNode::build(positions) {
            for (index, force) in forces.iter_mut().enumerate() {
                accumulate_charge_for_node(
                    &tree,
                    index,
                    positions,
                    self.config.charge_strength,
                    self.config.charge_softening,
                    self.config.charge_theta,
                    force,
                );
                accumulate_collision_for_node(
                    &tree,
                    index,
                    positions,
                    self.config.collision_radius,
                    self.config.collision_strength,
                    force,
                );
            }
        }

        accumulate_link_forces(
            &self.edges,
            positions,
            self.config.link_distance,
            self.config.link_strength,
            forces,
        );

        for (force, position) in forces.iter_mut().zip(positions.iter()) {
            *force -= *position * self.config.center_strength;
        }

        let velocity_retain = 1.0 - self.config.velocity_decay;
        for (node, force) in self.nodes.iter_mut().zip(forces.iter()) {
            if let Some(pin) = node.pinned {
                node.pos = pin;
                node.vel = Vec2::ZERO;
                continue;
            }

            node.vel = (node.vel + *force * self.alpha) * velocity_retain;
            node.pos += node.vel;
        }

        self.is_active()
    }

    pub fn bounds(&self) -> Option<Rect> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut min = pos2(f32::INFINITY, f32::INFINITY);
        let mut max = pos2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for node in &self.nodes {
            min.x = min.x.min(node.pos.x);
            min.y = min.y.min(node.pos.y);
            max.x = max.x.max(node.pos.x);
            max.y = max.y.max(node.pos.y);
        }

        Some(Rect::from_min_max(min, max))
    }
}
