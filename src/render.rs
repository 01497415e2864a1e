use crate::config::{NodeSizeConfig, RenderConfig};
use crate::layout::{Connection, label_lines, measure_node};
use crate::model::{Node, NodeId, PanZoom, Point};
use crate::theme::{Background, Theme};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

/// Visual side of the editor. Every hook is optional; the editor calls them
/// after each state change that affects what is drawn.
pub trait Renderer {
    fn clear(&mut self) {}
    fn render_node(&mut self, _node: &Node) {}
    fn move_node(&mut self, _id: NodeId, _position: Point) {}
    fn remove_node_visual(&mut self, _id: NodeId) {}
    fn draw_edges(&mut self, _connections: &[Connection]) {}
    fn apply_viewport(&mut self, _pan_zoom: PanZoom) {}
    fn apply_background(&mut self, _background: &str) {}
    fn apply_text_visibility(&mut self, _visible: bool) {}
    fn select_node(&mut self, _id: Option<NodeId>) {}
}

/// Informational callbacks; nothing in the editor depends on them.
pub trait Notifier {
    fn on_status(&mut self, _message: &str) {}
    fn on_selection_changed(&mut self, _id: Option<NodeId>) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {}

/// Sends status messages to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn on_status(&mut self, message: &str) {
        tracing::info!(target: "mindcanvas::status", "{message}");
    }

    fn on_selection_changed(&mut self, id: Option<NodeId>) {
        tracing::debug!(target: "mindcanvas::status", selected = ?id, "selection changed");
    }
}

/// Retained scene that can be serialised to a standalone SVG document.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    theme: Theme,
    node_config: NodeSizeConfig,
    render: RenderConfig,
    nodes: BTreeMap<NodeId, Node>,
    edges: Vec<Connection>,
    pan_zoom: PanZoom,
    background: Option<String>,
    text_visible: bool,
    selected: Option<NodeId>,
}

impl SvgRenderer {
    pub fn new(theme: Theme, node_config: NodeSizeConfig, render: RenderConfig) -> Self {
        Self {
            theme,
            node_config,
            render,
            nodes: BTreeMap::new(),
            edges: Vec::new(),
            pan_zoom: PanZoom::default(),
            background: None,
            text_visible: true,
            selected: None,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn to_svg(&self) -> String {
        let theme = &self.theme;
        let width = self.render.width;
        let height = self.render.height;
        let mut svg = String::new();

        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
        ));

        match self.background.as_deref().and_then(Background::parse) {
            Some(Background::Color(color)) => {
                svg.push_str(&format!(
                    "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
                    escape_xml(&color)
                ));
            }
            Some(Background::Image(url)) => {
                svg.push_str(&format!(
                    "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
                    theme.fallback_background
                ));
                svg.push_str(&format!(
                    "<image href=\"{}\" x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" preserveAspectRatio=\"xMidYMid slice\"/>",
                    escape_xml(&url)
                ));
            }
            None => {
                svg.push_str(&format!(
                    "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
                    theme.fallback_background
                ));
            }
        }

        svg.push_str(&format!(
            "<g transform=\"translate({:.2} {:.2}) scale({})\">",
            self.pan_zoom.offset_x, self.pan_zoom.offset_y, self.pan_zoom.scale
        ));

        for edge in &self.edges {
            if edge.curved {
                svg.push_str(&format!(
                    "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\" stroke-linecap=\"round\"/>",
                    edge.path_data(),
                    theme.line_color
                ));
            } else {
                svg.push_str(&format!(
                    "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"2\" stroke-linecap=\"round\"/>",
                    edge.from.x, edge.from.y, edge.to.x, edge.to.y, theme.line_color
                ));
            }
        }

        for node in self.nodes.values() {
            svg.push_str(&self.node_svg(node));
        }

        svg.push_str("</g></svg>");
        svg
    }

    fn node_svg(&self, node: &Node) -> String {
        let theme = &self.theme;
        let size = measure_node(node, &self.node_config);
        let (fill, text_fill) = if node.is_root() {
            (&theme.root_fill, &theme.root_text_color)
        } else {
            (&theme.node_fill, &theme.text_color)
        };
        let (stroke, stroke_width) = if self.selected == Some(node.id) {
            (&theme.selection_color, 2.5)
        } else {
            (&theme.node_border, 1.2)
        };
        let radius = size.height.min(24.0) / 2.0;

        let mut out = format!(
            "<g data-id=\"{}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{radius:.2}\" ry=\"{radius:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            node.id, node.x, node.y, size.width, size.height, fill, stroke, stroke_width
        );

        if self.text_visible && !node.text.is_empty() {
            let lines = label_lines(&node.text, &self.node_config);
            let line_height = self.node_config.font_size * self.node_config.line_height;
            let center_x = node.x + size.width / 2.0;
            let center_y = node.y + size.height / 2.0;
            let start_y = center_y - lines.len() as f64 * line_height / 2.0
                + self.node_config.font_size;
            out.push_str(&format!(
                "<text x=\"{center_x:.2}\" y=\"{start_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">",
                escape_xml(&theme.font_family),
                theme.font_size,
                text_fill
            ));
            for (idx, line) in lines.iter().enumerate() {
                let dy = if idx == 0 { 0.0 } else { line_height };
                out.push_str(&format!(
                    "<tspan x=\"{center_x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
                    escape_xml(line)
                ));
            }
            out.push_str("</text>");
        }

        out.push_str("</g>");
        out
    }
}

impl Renderer for SvgRenderer {
    fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.selected = None;
    }

    fn render_node(&mut self, node: &Node) {
        self.nodes.insert(node.id, node.clone());
    }

    fn move_node(&mut self, id: NodeId, position: Point) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.x = position.x;
            node.y = position.y;
        }
    }

    fn remove_node_visual(&mut self, id: NodeId) {
        self.nodes.remove(&id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    fn draw_edges(&mut self, connections: &[Connection]) {
        self.edges = connections.to_vec();
    }

    fn apply_viewport(&mut self, pan_zoom: PanZoom) {
        self.pan_zoom = pan_zoom;
    }

    fn apply_background(&mut self, background: &str) {
        self.background = Some(background.to_string());
    }

    fn apply_text_visibility(&mut self, visible: bool) {
        self.text_visible = visible;
    }

    fn select_node(&mut self, id: Option<NodeId>) {
        self.selected = id;
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|family| family.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| "sans-serif".to_string());
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width as f32, render_cfg.height as f32)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Invalid output size {}x{}",
                render_cfg.width,
                render_cfg.height
            )
        })?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeStore;
    use crate::layout::compute_connections;
    use crate::model::LayoutKind;

    fn scene(kind: LayoutKind) -> SvgRenderer {
        let mut store = NodeStore::new();
        store.create_node(None, "Root <main>", 100.0, 100.0).unwrap();
        store.create_node(Some(NodeId(0)), "Child & co", 300.0, 200.0).unwrap();
        let mut renderer = SvgRenderer::new(
            Theme::default(),
            NodeSizeConfig::default(),
            RenderConfig::default(),
        );
        for node in store.nodes() {
            renderer.render_node(node);
        }
        renderer.draw_edges(&compute_connections(&store, kind, &NodeSizeConfig::default()));
        renderer
    }

    #[test]
    fn svg_contains_escaped_labels_and_edges() {
        let svg = scene(LayoutKind::Tree).to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Root &lt;main&gt;"));
        assert!(svg.contains("Child &amp; co"));
        assert!(svg.contains("<path d=\"M "));
        assert!(!svg.contains("<line"));
    }

    #[test]
    fn straight_edges_for_fishbone() {
        let svg = scene(LayoutKind::Fishbone).to_svg();
        assert!(svg.contains("<line"));
    }

    #[test]
    fn hidden_text_and_selection() {
        let mut renderer = scene(LayoutKind::Free);
        renderer.apply_text_visibility(false);
        renderer.select_node(Some(NodeId(1)));
        let svg = renderer.to_svg();
        assert!(!svg.contains("<text"));
        assert!(svg.contains(&Theme::default().selection_color));
    }

    #[test]
    fn background_and_viewport() {
        let mut renderer = scene(LayoutKind::Free);
        renderer.apply_background("#123456");
        renderer.apply_viewport(PanZoom {
            scale: 2.0,
            offset_x: 10.0,
            offset_y: -5.0,
        });
        let svg = renderer.to_svg();
        assert!(svg.contains("fill=\"#123456\""));
        assert!(svg.contains("translate(10.00 -5.00) scale(2)"));

        renderer.apply_background("url('https://example.com/bg.jpg')");
        assert!(renderer.to_svg().contains("<image href=\"https://example.com/bg.jpg\""));
    }

    #[test]
    fn remove_and_clear() {
        let mut renderer = scene(LayoutKind::Tree);
        renderer.remove_node_visual(NodeId(1));
        assert_eq!(renderer.node_count(), 1);
        renderer.clear();
        assert_eq!(renderer.node_count(), 0);
        assert_eq!(renderer.edge_count(), 0);
    }
}
