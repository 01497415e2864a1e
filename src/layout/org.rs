use std::collections::HashSet;

use super::types::{LayoutFrame, Positions, TreeIndex};
use crate::config::LayoutConfig;
use crate::model::{NodeId, Point};

/// Organisation chart: one row per depth, each row centred on the visible
/// centre independently of the others.
pub(super) fn compute_org_layout(
    root: NodeId,
    index: &TreeIndex<'_>,
    config: &LayoutConfig,
    frame: &LayoutFrame,
    positions: &mut Positions,
) {
    let org = &config.org;
    let mut levels: Vec<Vec<NodeId>> = Vec::new();
    let mut visited = HashSet::new();
    collect_levels(root, 0, index, &mut visited, &mut levels);

    let center_x = frame.visible_center().x;
    for (depth, row) in levels.iter().enumerate() {
        let row_width = row.len() as f64 * org.spacing_x;
        let start_x = center_x - row_width / 2.0;
        let y = org.start_y + depth as f64 * org.spacing_y;
        for (idx, node_id) in row.iter().enumerate() {
            positions.insert(*node_id, Point::new(start_x + idx as f64 * org.spacing_x, y));
        }
    }
}

fn collect_levels(
    node_id: NodeId,
    depth: usize,
    index: &TreeIndex<'_>,
    visited: &mut HashSet<NodeId>,
    levels: &mut Vec<Vec<NodeId>>,
) {
    if index.node(node_id).is_none() || !visited.insert(node_id) {
        return;
    }
    if levels.len() <= depth {
        levels.resize_with(depth + 1, Vec::new);
    }
    levels[depth].push(node_id);
    for child in index.children(node_id) {
        collect_levels(*child, depth + 1, index, visited, levels);
    }
}
