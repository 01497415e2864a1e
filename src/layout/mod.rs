mod connections;
mod fishbone;
mod org;
mod text;
mod tree;
pub(crate) mod types;

pub use connections::{Connection, compute_connections, node_center};
pub use text::{label_lines, measure_node};
pub use types::{LayoutFrame, Positions};

use fishbone::compute_fishbone_layout;
use org::compute_org_layout;
use tree::compute_tree_layout;
use types::TreeIndex;

use crate::config::LayoutConfig;
use crate::graph::NodeStore;
use crate::model::{LayoutKind, NodeId};

/// Computes a position for every node in `store`.
///
/// Only the tree under the first level-0 node (in store order) is arranged;
/// every other node, and every node under `Free`, keeps its current position.
/// Cyclic or dangling parent links are skipped, never an error.
pub fn compute_layout(
    store: &NodeStore,
    kind: LayoutKind,
    config: &LayoutConfig,
    frame: &LayoutFrame,
) -> Positions {
    let mut positions: Positions = store
        .nodes()
        .iter()
        .map(|node| (node.id, node.position()))
        .collect();
    if kind == LayoutKind::Free {
        return positions;
    }
    let Some(root) = store.first_root() else {
        return positions;
    };
    let index = TreeIndex::new(store);
    match kind {
        LayoutKind::Tree => compute_tree_layout(root.id, &index, config, frame, &mut positions),
        LayoutKind::Org => compute_org_layout(root.id, &index, config, frame, &mut positions),
        LayoutKind::Fishbone => {
            compute_fishbone_layout(root.id, &index, config, frame, &mut positions)
        }
        LayoutKind::Free => {}
    }
    positions
}

/// Writes computed positions back into the store and returns the ids whose
/// position actually changed.
pub fn apply_positions(store: &mut NodeStore, positions: &Positions) -> Vec<NodeId> {
    let mut moved = Vec::new();
    for (id, position) in positions {
        let changed = store
            .get(*id)
            .is_some_and(|node| node.position() != *position);
        if changed && store.set_position(*id, *position) {
            moved.push(*id);
        }
    }
    moved
}
