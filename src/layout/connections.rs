use serde::Serialize;

use super::text::measure_node;
use super::types::TreeIndex;
use crate::config::NodeSizeConfig;
use crate::graph::NodeStore;
use crate::model::{LayoutKind, Node, NodeId, Point};

/// One parent-to-child edge between node centres.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    pub parent: NodeId,
    pub child: NodeId,
    pub from: Point,
    pub to: Point,
    pub curved: bool,
}

impl Connection {
    /// SVG path data. Curved edges bend through the horizontal midpoint with a
    /// quadratic control point and a smooth continuation to the child.
    pub fn path_data(&self) -> String {
        let (px, py) = (self.from.x, self.from.y);
        let (cx, cy) = (self.to.x, self.to.y);
        if self.curved {
            let mid_x = (px + cx) / 2.0;
            let mid_y = (py + cy) / 2.0;
            format!(
                "M {px:.2} {py:.2} Q {mid_x:.2} {py:.2} {mid_x:.2} {mid_y:.2} T {cx:.2} {cy:.2}"
            )
        } else {
            format!("M {px:.2} {py:.2} L {cx:.2} {cy:.2}")
        }
    }
}

pub fn compute_connections(
    store: &NodeStore,
    kind: LayoutKind,
    config: &NodeSizeConfig,
) -> Vec<Connection> {
    let index = TreeIndex::new(store);
    let curved = kind.curved_connections();
    store
        .nodes()
        .iter()
        .filter_map(|child| {
            let parent = index.node(child.parent_id?)?;
            Some(Connection {
                parent: parent.id,
                child: child.id,
                from: node_center(parent, config),
                to: node_center(child, config),
                curved,
            })
        })
        .collect()
}

pub fn node_center(node: &Node, config: &NodeSizeConfig) -> Point {
    let size = measure_node(node, config);
    Point::new(node.x + size.width / 2.0, node.y + size.height / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> NodeStore {
        let mut store = NodeStore::new();
        store.create_node(None, "", 0.0, 0.0).unwrap();
        store.create_node(Some(NodeId(0)), "", 100.0, 60.0).unwrap();
        store.create_node(Some(NodeId(1)), "", 200.0, 0.0).unwrap();
        store
    }

    #[test]
    fn one_connection_per_linked_child() {
        let connections =
            compute_connections(&store(), LayoutKind::Tree, &NodeSizeConfig::default());
        assert_eq!(connections.len(), 2);
        assert_eq!(connections[0].from, Point::new(20.0, 20.0));
        assert_eq!(connections[0].to, Point::new(113.0, 73.0));
        assert!(connections.iter().all(|c| c.curved));
    }

    #[test]
    fn curve_style_follows_layout() {
        for kind in LayoutKind::ALL {
            let connections = compute_connections(&store(), kind, &NodeSizeConfig::default());
            assert_eq!(connections[0].curved, matches!(kind, LayoutKind::Tree | LayoutKind::Org));
        }
    }

    #[test]
    fn path_data_shapes() {
        let mut connection = Connection {
            parent: NodeId(0),
            child: NodeId(1),
            from: Point::new(0.0, 0.0),
            to: Point::new(100.0, 50.0),
            curved: true,
        };
        assert_eq!(
            connection.path_data(),
            "M 0.00 0.00 Q 50.00 0.00 50.00 25.00 T 100.00 50.00"
        );
        connection.curved = false;
        assert_eq!(connection.path_data(), "M 0.00 0.00 L 100.00 50.00");
    }

    #[test]
    fn dangling_parent_is_skipped() {
        let mut store = NodeStore::new();
        store.replace(
            vec![Node {
                id: NodeId(4),
                parent_id: Some(NodeId(9)),
                text: String::new(),
                x: 0.0,
                y: 0.0,
                level: 1,
            }],
            5,
        );
        let connections = compute_connections(&store, LayoutKind::Free, &NodeSizeConfig::default());
        assert!(connections.is_empty());
    }
}
