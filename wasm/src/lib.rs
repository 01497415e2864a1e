use mindcanvas::config::LayoutConfig;
use mindcanvas::graph::NodeStore;
use mindcanvas::layout::{LayoutFrame, compute_connections, compute_layout};
use mindcanvas::model::{LayoutKind, PanZoom, Size, WorkspaceData};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewportOptions {
    width: f64,
    height: f64,
    #[serde(default)]
    pan_zoom: PanZoom,
}

#[derive(Debug, Serialize)]
struct PositionEntry {
    id: u64,
    x: f64,
    y: f64,
}

fn parse_kind(kind: &str) -> Result<LayoutKind, JsValue> {
    LayoutKind::from_token(kind)
        .ok_or_else(|| JsValue::from_str(&format!("unknown layout `{kind}`")))
}

fn load_store(data_json: &str) -> Result<NodeStore, JsValue> {
    let data: WorkspaceData =
        serde_json::from_str(data_json).map_err(|error| JsValue::from_str(&error.to_string()))?;
    let mut store = NodeStore::new();
    store.replace(data.nodes, data.node_id_counter);
    Ok(store)
}

fn layout_positions(
    data_json: &str,
    kind: &str,
    viewport_json: &str,
) -> Result<Vec<PositionEntry>, JsValue> {
    let kind = parse_kind(kind)?;
    let store = load_store(data_json)?;
    let viewport: ViewportOptions = serde_json::from_str(viewport_json)
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    let frame = LayoutFrame::new(Size::new(viewport.width, viewport.height), viewport.pan_zoom);
    let positions = compute_layout(&store, kind, &LayoutConfig::default(), &frame);
    Ok(positions
        .into_iter()
        .map(|(id, point)| PositionEntry {
            id: id.0,
            x: point.x,
            y: point.y,
        })
        .collect())
}

/// Lays out a workspace `data` document and returns `[{id, x, y}]` as JSON.
#[wasm_bindgen]
pub fn layout_workspace(
    data_json: &str,
    kind: &str,
    viewport_json: &str,
) -> Result<String, JsValue> {
    let positions = layout_positions(data_json, kind, viewport_json)?;
    serde_json::to_string(&positions).map_err(|error| JsValue::from_str(&error.to_string()))
}

/// SVG markup for the parent/child connections of a workspace `data` document.
#[wasm_bindgen]
pub fn connections_svg(
    data_json: &str,
    kind: &str,
    stroke: Option<String>,
) -> Result<String, JsValue> {
    let kind = parse_kind(kind)?;
    let store = load_store(data_json)?;
    let stroke = stroke.unwrap_or_else(|| "#8FA8FF".to_string());
    let config = LayoutConfig::default();
    let mut out = String::new();
    for connection in compute_connections(&store, kind, &config.node) {
        out.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{stroke}\" stroke-width=\"2\"/>",
            connection.path_data()
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use crate::layout_positions;

    const DATA: &str = r#"{"nodes":[
        {"id":0,"parentId":null,"text":"Root","x":0,"y":0,"level":0},
        {"id":1,"parentId":0,"text":"Child","x":0,"y":0,"level":1}
    ]}"#;

    #[test]
    fn lays_out_tree_from_browser_data() {
        let positions =
            layout_positions(DATA, "tree", r#"{"width":1000,"height":600}"#).expect("layout");
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[1].x, 340.0);
        assert_eq!(positions[0].y, 280.0);
    }
}
