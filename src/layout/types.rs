use std::collections::{BTreeMap, HashMap};

use crate::graph::NodeStore;
use crate::model::{Node, NodeId, PanZoom, Point, Size};

/// Computed top-left position per node.
pub type Positions = BTreeMap<NodeId, Point>;

/// What the layouts need to know about the screen: the container size and the
/// viewport at the time of layout, so roots can be centred on what is visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutFrame {
    pub container: Size,
    pub pan_zoom: PanZoom,
}

impl LayoutFrame {
    pub fn new(container: Size, pan_zoom: PanZoom) -> Self {
        Self {
            container,
            pan_zoom,
        }
    }

    pub fn visible_center(&self) -> Point {
        let scale = if self.pan_zoom.scale > 0.0 {
            self.pan_zoom.scale
        } else {
            1.0
        };
        Point::new(
            (self.container.width / 2.0 - self.pan_zoom.offset_x) / scale,
            (self.container.height / 2.0 - self.pan_zoom.offset_y) / scale,
        )
    }
}

/// Read-only id and parent lookups over a node set.
pub(crate) struct TreeIndex<'a> {
    nodes: HashMap<NodeId, &'a Node>,
    children: HashMap<NodeId, Vec<NodeId>>,
}

impl<'a> TreeIndex<'a> {
    pub(crate) fn new(store: &'a NodeStore) -> Self {
        Self {
            nodes: store.nodes().iter().map(|node| (node.id, node)).collect(),
            children: store.children_index(),
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&'a Node> {
        self.nodes.get(&id).copied()
    }

    pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}
