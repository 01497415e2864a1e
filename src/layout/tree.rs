use std::collections::HashSet;

use super::text::measure_node;
use super::types::{LayoutFrame, Positions, TreeIndex};
use crate::config::LayoutConfig;
use crate::model::{NodeId, Point};

/// Horizontal tree: depth grows to the right, children stack downwards from
/// their parent's row.
pub(super) fn compute_tree_layout(
    root: NodeId,
    index: &TreeIndex<'_>,
    config: &LayoutConfig,
    frame: &LayoutFrame,
    positions: &mut Positions,
) {
    let tree = &config.tree;
    let center = frame.visible_center();
    let mut visited = HashSet::new();
    layout_subtree(
        root,
        Point::new(tree.start_x, center.y - tree.root_offset),
        index,
        config,
        &mut visited,
        positions,
    );
}

/// Places `node_id` at `origin` and its subtree below it. Returns the height
/// the subtree occupies; zero for an already visited node.
fn layout_subtree(
    node_id: NodeId,
    origin: Point,
    index: &TreeIndex<'_>,
    config: &LayoutConfig,
    visited: &mut HashSet<NodeId>,
    positions: &mut Positions,
) -> f64 {
    let Some(node) = index.node(node_id) else {
        return 0.0;
    };
    if !visited.insert(node_id) {
        return 0.0;
    }
    positions.insert(node_id, origin);

    let tree = &config.tree;
    let children = index.children(node_id);
    let mut total = 0.0;
    for (idx, child) in children.iter().enumerate() {
        let child_origin = Point::new(origin.x + tree.spacing_x, origin.y + total);
        total += layout_subtree(*child, child_origin, index, config, visited, positions);
        if idx + 1 < children.len() {
            total += tree.spacing_y;
        }
    }

    let slot = if total > 0.0 { total } else { tree.spacing_y };
    slot.max(measure_node(node, &config.node).height)
}
