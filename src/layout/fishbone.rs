use std::collections::HashSet;

use super::types::{LayoutFrame, Positions, TreeIndex};
use crate::config::LayoutConfig;
use crate::model::{NodeId, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Top,
    Bottom,
}

impl Side {
    fn sign(self) -> f64 {
        match self {
            Side::Top => -1.0,
            Side::Bottom => 1.0,
        }
    }
}

/// Fishbone: root on the visible centre, main branches split into a top half
/// (first `ceil(n/2)`) and a bottom half, descendants fanning rightwards and
/// away from the spine.
pub(super) fn compute_fishbone_layout(
    root: NodeId,
    index: &TreeIndex<'_>,
    config: &LayoutConfig,
    frame: &LayoutFrame,
    positions: &mut Positions,
) {
    let fishbone = &config.fishbone;
    let center = frame.visible_center();
    let mut visited = HashSet::new();
    visited.insert(root);
    positions.insert(root, center);

    let branches = index.children(root);
    let half = branches.len().div_ceil(2);
    for (idx, branch) in branches.iter().enumerate() {
        if !visited.insert(*branch) {
            continue;
        }
        let (side, slot) = if idx < half {
            (Side::Top, idx)
        } else {
            (Side::Bottom, idx - half)
        };
        let position = Point::new(
            center.x - fishbone.main_spacing + slot as f64 * fishbone.branch_step_x,
            center.y + side.sign() * fishbone.branch_spacing_y,
        );
        positions.insert(*branch, position);
        layout_sub_branches(*branch, position, side, index, config, &mut visited, positions);
    }
}

fn layout_sub_branches(
    parent: NodeId,
    parent_position: Point,
    side: Side,
    index: &TreeIndex<'_>,
    config: &LayoutConfig,
    visited: &mut HashSet<NodeId>,
    positions: &mut Positions,
) {
    let fishbone = &config.fishbone;
    for (idx, child) in index.children(parent).iter().enumerate() {
        if !visited.insert(*child) {
            continue;
        }
        let position = Point::new(
            parent_position.x + fishbone.branch_spacing_x,
            parent_position.y + side.sign() * fishbone.sub_branch_step_y * (idx as f64 + 1.0),
        );
        positions.insert(*child, position);
        layout_sub_branches(*child, position, side, index, config, visited, positions);
    }
}
