use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

fn separation_direction(delta: Vec2, distance: f32, seed_a: usize, seed_b: usize) -> Vec2 {
    if distance > 0.0001 {
        delta / distance
    } else {
        // Deterministic split direction for coincident points.
        let angle = ((seed_a as f32) * 0.618_034 + (seed_b as f32) * 0.414_214)
            * std::f32::consts::TAU;
        vec2(angle.cos(), angle.sin())
    }
}

/// Both endpoints receive half the correction.
pub(super) fn accumulate_link_forces(
    edges: &[(usize, usize)],
    positions: &[Vec2],
    target_distance: f32,
    strength: f32,
    forces: &mut [Vec2],
) {
    for &(from, to) in edges {
        if from >= positions.len() || to >= positions.len() || from == to {
            continue;
        }

        let delta = positions[to] - positions[from];
        let distance = delta.length();
        let direction = separation_direction(delta, distance, from, to);
        let correction = direction * ((distance - target_distance) * strength * 0.5);

        forces[from] += correction;
        forces[to] -= correction;
    }
}

/// Barnes-Hut many-body force. Cells with side/distance below `theta` act
/// as a single body at their center of mass.
pub(super) fn accumulate_charge_for_node(
    tree: &QuadNode,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    softening: f32,
    theta: f32,
    force: &mut Vec2,
) {
    if tree.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if tree.is_leaf() {
        for &other in &tree.indices {
            if other == index {
                continue;
            }
            let delta = point - positions[other];
            let distance_sq = delta.length_sq();
            let distance = distance_sq.sqrt();
            let direction = separation_direction(delta, distance, index, other);
            *force += direction * ((-strength) / (distance_sq + softening));
        }
        return;
    }

    let delta = point - tree.center_of_mass;
    let distance_sq = delta.length_sq().max(0.0001);
    let distance = distance_sq.sqrt();
    let can_approximate =
        !tree.bounds.contains(point) && (tree.bounds.side_length() / distance) < theta;

    if can_approximate {
        let direction = delta / distance;
        *force += direction * (((-strength) * tree.mass) / (distance_sq + softening));
        return;
    }

    for child in tree.children.iter().flatten() {
        accumulate_charge_for_node(child, index, positions, strength, softening, theta, force);
    }
}

/// Cells farther than one disc diameter are pruned.
pub(super) fn accumulate_collision_for_node(
    tree: &QuadNode,
    index: usize,
    positions: &[Vec2],
    radius: f32,
    strength: f32,
    force: &mut Vec2,
) {
    let min_distance = radius * 2.0;
    if tree.bounds.distance_sq_to_point(positions[index]) > min_distance * min_distance {
        return;
    }

    if tree.is_leaf() {
        let point = positions[index];
        for &other in &tree.indices {
            if other == index {
                continue;
            }
            let delta = point - positions[other];
            let distance = delta.length();
            if distance >= min_distance {
                continue;
            }
            let direction = separation_direction(delta, distance, index, other);
            *force += direction * ((min_distance - distance) * strength);
        }
        return;
    }

    for child in tree.children.iter().flatten() {
        accumulate_collision_for_node(child, index, positions, radius, strength, force);
    }
}
