use crate::error::{Error, Result};
use crate::model::{Node, NodeId, Point};
use std::collections::{HashMap, HashSet};

/// Node set of the active workspace.
///
/// Nodes are kept in insertion order; that order is the child order used by
/// every layout and by subtree deletion.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    nodes: Vec<Node>,
    counter: u64,
    selected: Option<NodeId>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole node set, as done when a workspace is loaded.
    ///
    /// The id counter is bumped past every stored id so imported data with a
    /// stale counter cannot hand out duplicate ids.
    pub fn replace(&mut self, nodes: Vec<Node>, counter: u64) {
        let next_free = nodes.iter().map(|node| node.id.0 + 1).max().unwrap_or(0);
        self.nodes = nodes;
        self.counter = counter.max(next_free);
        self.selected = None;
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.counter = 0;
        self.selected = None;
    }

    pub fn create_node(
        &mut self,
        parent_id: Option<NodeId>,
        text: &str,
        x: f64,
        y: f64,
    ) -> Result<&Node> {
        if !x.is_finite() || !y.is_finite() {
            return Err(Error::NonFiniteCoordinate { x, y });
        }
        let level = match parent_id {
            Some(parent) => {
                let parent = self.get(parent).ok_or(Error::UnknownParent(parent))?;
                parent.level + 1
            }
            None => 0,
        };
        let id = NodeId(self.counter);
        self.counter += 1;
        self.nodes.push(Node {
            id,
            parent_id,
            text: text.to_string(),
            x,
            y,
            level,
        });
        let last = self.nodes.len() - 1;
        Ok(&self.nodes[last])
    }

    /// Removes `node_id` and every transitive child. Returns the removed ids
    /// in depth-first order; empty if the id is unknown.
    pub fn delete_subtree(&mut self, node_id: NodeId) -> Vec<NodeId> {
        if self.get(node_id).is_none() {
            return Vec::new();
        }
        let children = self.children_index();
        let mut removed = Vec::new();
        let mut visited = HashSet::new();
        collect_subtree(node_id, &children, &mut visited, &mut removed);

        self.nodes.retain(|node| !visited.contains(&node.id));
        if self.selected.is_some_and(|id| visited.contains(&id)) {
            self.selected = None;
        }
        removed
    }

    pub fn get(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == node_id)
    }

    pub fn get_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id == node_id)
    }

    pub fn children(&self, node_id: NodeId) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(move |node| node.parent_id == Some(node_id))
    }

    /// Parent id to ordered child ids, built once per traversal.
    pub fn children_index(&self) -> HashMap<NodeId, Vec<NodeId>> {
        let mut index: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for node in &self.nodes {
            if let Some(parent) = node.parent_id {
                index.entry(parent).or_default().push(node.id);
            }
        }
        index
    }

    /// First level-0 node in store order.
    pub fn first_root(&self) -> Option<&Node> {
        self.nodes.iter().find(|node| node.is_root())
    }

    /// Moves a node. Returns false for an unknown id or a non-finite position.
    pub fn set_position(&mut self, node_id: NodeId, position: Point) -> bool {
        if !position.x.is_finite() || !position.y.is_finite() {
            return false;
        }
        match self.get_mut(node_id) {
            Some(node) => {
                node.x = position.x;
                node.y = position.y;
                true
            }
            None => false,
        }
    }

    pub fn set_text(&mut self, node_id: NodeId, text: &str) -> Result<()> {
        let node = self.get_mut(node_id).ok_or(Error::UnknownNode(node_id))?;
        node.text = text.trim().to_string();
        Ok(())
    }

    pub fn select(&mut self, node_id: Option<NodeId>) {
        self.selected = node_id.filter(|id| self.get(*id).is_some());
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn collect_subtree(
    node_id: NodeId,
    children: &HashMap<NodeId, Vec<NodeId>>,
    visited: &mut HashSet<NodeId>,
    out: &mut Vec<NodeId>,
) {
    if !visited.insert(node_id) {
        return;
    }
    out.push(node_id);
    if let Some(kids) = children.get(&node_id) {
        for child in kids {
            collect_subtree(*child, children, visited, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NodeStore {
        let mut store = NodeStore::new();
        store.create_node(None, "Root", 100.0, 100.0).unwrap();
        store.create_node(Some(NodeId(0)), "A", 0.0, 0.0).unwrap();
        store.create_node(Some(NodeId(0)), "B", 0.0, 0.0).unwrap();
        store.create_node(Some(NodeId(1)), "A1", 0.0, 0.0).unwrap();
        store.create_node(Some(NodeId(3)), "A1a", 0.0, 0.0).unwrap();
        store
    }

    #[test]
    fn create_assigns_ids_and_levels() {
        let mut store = NodeStore::new();
        let root = store.create_node(None, "Root", 100.0, 100.0).unwrap().clone();
        assert_eq!(root.id, NodeId(0));
        assert_eq!(root.parent_id, None);
        assert_eq!(root.level, 0);
        assert_eq!((root.x, root.y), (100.0, 100.0));

        let child = store.create_node(Some(NodeId(0)), "Child", 0.0, 0.0).unwrap();
        assert_eq!(child.id, NodeId(1));
        assert_eq!(child.parent_id, Some(NodeId(0)));
        assert_eq!(child.level, 1);
    }

    #[test]
    fn create_rejects_unknown_parent() {
        let mut store = NodeStore::new();
        let err = store.create_node(Some(NodeId(7)), "x", 0.0, 0.0).unwrap_err();
        assert!(matches!(err, Error::UnknownParent(NodeId(7))));
        assert!(store.is_empty());
        assert_eq!(store.counter(), 0);
    }

    #[test]
    fn non_finite_positions_are_rejected() {
        let mut store = NodeStore::new();
        let err = store.create_node(None, "Root", f64::INFINITY, 0.0).unwrap_err();
        assert!(matches!(err, Error::NonFiniteCoordinate { .. }));
        assert!(store.create_node(None, "Root", 0.0, f64::NAN).is_err());
        assert_eq!(store.counter(), 0);

        store.create_node(None, "Root", 10.0, 20.0).unwrap();
        assert!(!store.set_position(NodeId(0), Point::new(f64::NEG_INFINITY, 0.0)));
        assert_eq!(store.get(NodeId(0)).unwrap().position(), Point::new(10.0, 20.0));
    }

    #[test]
    fn delete_subtree_removes_descendants() {
        let mut store = sample();
        store.select(Some(NodeId(4)));
        let removed = store.delete_subtree(NodeId(1));
        assert_eq!(removed, vec![NodeId(1), NodeId(3), NodeId(4)]);
        let ids: Vec<u64> = store.nodes().iter().map(|n| n.id.0).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(store.selected(), None);
        for node in store.nodes() {
            if let Some(parent) = node.parent_id {
                assert!(!removed.contains(&parent));
            }
        }
    }

    #[test]
    fn delete_unknown_is_noop() {
        let mut store = sample();
        store.select(Some(NodeId(2)));
        assert!(store.delete_subtree(NodeId(99)).is_empty());
        assert_eq!(store.len(), 5);
        assert_eq!(store.selected(), Some(NodeId(2)));
    }

    #[test]
    fn delete_survives_cyclic_parent_links() {
        let node = |id: u64, parent: Option<u64>, level: u32| Node {
            id: NodeId(id),
            parent_id: parent.map(NodeId),
            text: String::new(),
            x: 0.0,
            y: 0.0,
            level,
        };
        let nodes = vec![node(0, Some(1), 0), node(1, Some(0), 1), node(2, None, 0)];
        let mut store = NodeStore::new();
        store.replace(nodes, 0);
        let removed = store.delete_subtree(NodeId(0));
        assert_eq!(removed, vec![NodeId(0), NodeId(1)]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn children_keep_insertion_order() {
        let store = sample();
        let kids: Vec<&str> = store.children(NodeId(0)).map(|n| n.text.as_str()).collect();
        assert_eq!(kids, vec!["A", "B"]);
    }

    #[test]
    fn replace_repairs_stale_counter() {
        let mut store = NodeStore::new();
        store.replace(sample().nodes().to_vec(), 1);
        assert_eq!(store.counter(), 5);
        let node = store.create_node(None, "Other", 0.0, 0.0).unwrap();
        assert_eq!(node.id, NodeId(5));
    }

    #[test]
    fn set_text_trims() {
        let mut store = sample();
        store.set_text(NodeId(2), "  hello \n").unwrap();
        assert_eq!(store.get(NodeId(2)).unwrap().text, "hello");
        assert!(matches!(
            store.set_text(NodeId(42), "x"),
            Err(Error::UnknownNode(NodeId(42)))
        ));
    }
}
