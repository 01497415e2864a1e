use crate::config::NodeSizeConfig;
use crate::graph::NodeStore;
use crate::layout::{Connection, Positions, label_lines, measure_node};
use crate::model::LayoutKind;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub kind: String,
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: u64,
    pub parent_id: Option<u64>,
    pub level: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label_lines: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: u64,
    pub to: u64,
    pub curved: bool,
    pub path: String,
}

impl LayoutDump {
    /// Nodes take their coordinates from `positions` when present, otherwise
    /// from the store.
    pub fn new(
        store: &NodeStore,
        kind: LayoutKind,
        positions: &Positions,
        connections: &[Connection],
        config: &NodeSizeConfig,
    ) -> Self {
        let nodes: Vec<NodeDump> = store
            .nodes()
            .iter()
            .map(|node| {
                let size = measure_node(node, config);
                let position = positions.get(&node.id).copied().unwrap_or(node.position());
                NodeDump {
                    id: node.id.0,
                    parent_id: node.parent_id.map(|id| id.0),
                    level: node.level,
                    x: position.x,
                    y: position.y,
                    width: size.width,
                    height: size.height,
                    label_lines: label_lines(&node.text, config),
                }
            })
            .collect();

        let edges = connections
            .iter()
            .map(|edge| EdgeDump {
                from: edge.parent.0,
                to: edge.child.0,
                curved: edge.curved,
                path: edge.path_data(),
            })
            .collect();

        let width = nodes
            .iter()
            .map(|node| node.x + node.width)
            .fold(0.0, f64::max);
        let height = nodes
            .iter()
            .map(|node| node.y + node.height)
            .fold(0.0, f64::max);

        LayoutDump {
            kind: kind.to_string(),
            width,
            height,
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump(path: &Path, dump: &LayoutDump) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, dump)?;
    Ok(())
}
