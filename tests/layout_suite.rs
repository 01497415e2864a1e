use mindcanvas::{
    LayoutConfig, LayoutFrame, LayoutKind, NodeId, NodeStore, PanZoom, Point, Size,
    compute_connections, compute_layout,
};
use proptest::prelude::*;

fn frame() -> LayoutFrame {
    LayoutFrame::new(Size::new(1200.0, 800.0), PanZoom::default())
}

/// Builds a tree from a list of parent indices; entry `i` is the parent of
/// node `i + 1`, wrapped into range so every parent already exists.
fn build(parents: &[usize]) -> NodeStore {
    let mut store = NodeStore::new();
    store.create_node(None, "Root", 0.0, 0.0).expect("root");
    for (idx, parent) in parents.iter().enumerate() {
        let parent = NodeId((*parent % (idx + 1)) as u64);
        store
            .create_node(Some(parent), &format!("Node {}", idx + 1), 0.0, 0.0)
            .expect("child");
    }
    store
}

#[test]
fn scenario_tree_child_steps_right_of_root() {
    let mut store = NodeStore::new();
    let root = store.create_node(None, "Root", 100.0, 100.0).unwrap().clone();
    assert_eq!(root.id, NodeId(0));
    assert_eq!(root.parent_id, None);
    assert_eq!(root.level, 0);
    assert_eq!(root.position(), Point::new(100.0, 100.0));
    let child = store.create_node(Some(NodeId(0)), "Child", 0.0, 0.0).unwrap().clone();
    assert_eq!(child.id, NodeId(1));
    assert_eq!(child.parent_id, Some(NodeId(0)));
    assert_eq!(child.level, 1);

    let config = LayoutConfig::default();
    let positions = compute_layout(&store, LayoutKind::Tree, &config, &frame());
    assert_eq!(
        positions[&NodeId(1)].x - positions[&NodeId(0)].x,
        config.tree.spacing_x
    );
    assert_eq!(positions[&NodeId(1)].x, config.tree.start_x + config.tree.spacing_x);
}

#[test]
fn tree_siblings_never_overlap() {
    let store = build(&[0, 0, 0, 1, 1, 2, 4, 4, 4, 3]);
    let config = LayoutConfig::default();
    let positions = compute_layout(&store, LayoutKind::Tree, &config, &frame());
    for node in store.nodes() {
        let ys: Vec<f64> = store.children(node.id).map(|c| positions[&c.id].y).collect();
        for pair in ys.windows(2) {
            assert!(pair[1] - pair[0] >= config.tree.spacing_y, "{ys:?}");
        }
    }
}

#[test]
fn org_rows_share_y_per_depth() {
    let store = build(&[0, 0, 1, 1, 2, 3]);
    let config = LayoutConfig::default();
    let positions = compute_layout(&store, LayoutKind::Org, &config, &frame());
    for node in store.nodes() {
        let expected = config.org.start_y + node.level as f64 * config.org.spacing_y;
        assert_eq!(positions[&node.id].y, expected);
    }
}

#[test]
fn fishbone_descendants_keep_branch_side() {
    let store = build(&[0, 0, 0, 0, 1, 5, 3, 7]);
    let center_y = frame().visible_center().y;
    let positions =
        compute_layout(&store, LayoutKind::Fishbone, &LayoutConfig::default(), &frame());
    // Branches 1 and 2 are above the spine, 3 and 4 below.
    for (branch, above) in [(1u64, true), (3, false)] {
        let mut stack = vec![NodeId(branch)];
        while let Some(id) = stack.pop() {
            let y = positions[&id].y;
            assert_eq!(y < center_y, above, "node {id} at {y}");
            stack.extend(store.children(id).map(|c| c.id));
        }
    }
}

#[test]
fn connections_follow_strategy() {
    let store = build(&[0, 0, 1]);
    let config = LayoutConfig::default();
    for kind in LayoutKind::ALL {
        let connections = compute_connections(&store, kind, &config.node);
        assert_eq!(connections.len(), 3);
        let curved = matches!(kind, LayoutKind::Tree | LayoutKind::Org);
        assert!(connections.iter().all(|c| c.curved == curved));
        for connection in &connections {
            let path = connection.path_data();
            assert!(path.starts_with("M "));
            assert_eq!(path.contains(" Q "), curved);
        }
    }
}

proptest! {
    #[test]
    fn layouts_are_deterministic(parents in proptest::collection::vec(0usize..64, 0..40)) {
        let store = build(&parents);
        let config = LayoutConfig::default();
        for kind in LayoutKind::ALL {
            let first = compute_layout(&store, kind, &config, &frame());
            let second = compute_layout(&store, kind, &config, &frame());
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.len(), store.len());
        }
    }

    #[test]
    fn subtree_delete_leaves_no_orphans(
        parents in proptest::collection::vec(0usize..64, 1..40),
        target in 0u64..40,
    ) {
        let mut store = build(&parents);
        let removed = store.delete_subtree(NodeId(target % store.len() as u64));
        for node in store.nodes() {
            if let Some(parent) = node.parent_id {
                prop_assert!(!removed.contains(&parent));
                prop_assert!(store.get(parent).is_some());
            }
        }
    }

    #[test]
    fn levels_follow_parents(parents in proptest::collection::vec(0usize..64, 0..40)) {
        let store = build(&parents);
        for node in store.nodes() {
            let expected = match node.parent_id {
                Some(parent) => store.get(parent).map(|p| p.level + 1),
                None => Some(0),
            };
            prop_assert_eq!(Some(node.level), expected);
        }
    }
}
