use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeLayoutConfig {
    pub spacing_x: f64,
    pub spacing_y: f64,
    pub start_x: f64,
    /// Vertical offset of the root above the visible centre line.
    pub root_offset: f64,
}

impl Default for TreeLayoutConfig {
    fn default() -> Self {
        Self {
            spacing_x: 220.0,
            spacing_y: 90.0,
            start_x: 120.0,
            root_offset: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgLayoutConfig {
    pub spacing_x: f64,
    pub spacing_y: f64,
    pub start_y: f64,
}

impl Default for OrgLayoutConfig {
    fn default() -> Self {
        Self {
            spacing_x: 160.0,
            spacing_y: 130.0,
            start_y: 120.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishboneLayoutConfig {
    pub main_spacing: f64,
    pub branch_spacing_y: f64,
    pub branch_spacing_x: f64,
    pub branch_step_x: f64,
    pub sub_branch_step_y: f64,
}

impl Default for FishboneLayoutConfig {
    fn default() -> Self {
        Self {
            main_spacing: 320.0,
            branch_spacing_y: 110.0,
            branch_spacing_x: 170.0,
            branch_step_x: 140.0,
            sub_branch_step_y: 35.0,
        }
    }
}

/// Estimated node box, used wherever the rendered element size is needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSizeConfig {
    pub font_size: f64,
    pub line_height: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub root_min: f64,
    pub child_min: f64,
    pub max_label_width: f64,
}

impl Default for NodeSizeConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            line_height: 1.4,
            padding_x: 16.0,
            padding_y: 6.0,
            root_min: 40.0,
            child_min: 26.0,
            max_label_width: 180.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Offset used by "add child" from the toolbar or keyboard.
    pub quick_child: (f64, f64),
    /// Offset used by "add child" from the node context menu.
    pub menu_child: (f64, f64),
    /// Offset used when a child is created in free mode without a position.
    pub free_child: (f64, f64),
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            quick_child: (150.0, 80.0),
            menu_child: (100.0, 60.0),
            free_child: (120.0, 70.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LayoutConfig {
    pub tree: TreeLayoutConfig,
    pub org: OrgLayoutConfig,
    pub fishbone: FishboneLayoutConfig,
    pub node: NodeSizeConfig,
    pub placement: PlacementConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_step: f64,
    pub focus_scale: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 5.0,
            zoom_step: 1.1,
            focus_scale: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragConfig {
    pub margin: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self { margin: 20.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
    pub drag: DragConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    tree: Option<TreeOverrides>,
    org: Option<OrgOverrides>,
    fishbone: Option<FishboneOverrides>,
    node: Option<NodeOverrides>,
    viewport: Option<ViewportOverrides>,
    drag: Option<DragOverrides>,
    width: Option<f64>,
    height: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f64>,
    node_color: Option<String>,
    root_color: Option<String>,
    node_border_color: Option<String>,
    text_color: Option<String>,
    root_text_color: Option<String>,
    line_color: Option<String>,
    selection_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TreeOverrides {
    spacing_x: Option<f64>,
    spacing_y: Option<f64>,
    start_x: Option<f64>,
    root_offset: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct OrgOverrides {
    spacing_x: Option<f64>,
    spacing_y: Option<f64>,
    start_y: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct FishboneOverrides {
    main_spacing: Option<f64>,
    branch_spacing_y: Option<f64>,
    branch_spacing_x: Option<f64>,
    branch_step_x: Option<f64>,
    sub_branch_step_y: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct NodeOverrides {
    font_size: Option<f64>,
    padding_x: Option<f64>,
    padding_y: Option<f64>,
    root_min: Option<f64>,
    child_min: Option<f64>,
    max_label_width: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ViewportOverrides {
    min_scale: Option<f64>,
    max_scale: Option<f64>,
    zoom_step: Option<f64>,
    focus_scale: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct DragOverrides {
    margin: Option<f64>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a config document. JSON5 is accepted so hand-edited files may carry
/// comments and trailing commas.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "dark" | "nebula" | "default" => config.theme = Theme::nebula(),
            "light" => config.theme = Theme::light(),
            other => anyhow::bail!("unknown theme `{other}`"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.node_color {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.root_color {
            config.theme.root_fill = v;
        }
        if let Some(v) = vars.node_border_color {
            config.theme.node_border = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.root_text_color {
            config.theme.root_text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.selection_color {
            config.theme.selection_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.fallback_background = v;
        }
    }

    if let Some(tree) = parsed.tree {
        if let Some(v) = tree.spacing_x {
            config.layout.tree.spacing_x = v;
        }
        if let Some(v) = tree.spacing_y {
            config.layout.tree.spacing_y = v;
        }
        if let Some(v) = tree.start_x {
            config.layout.tree.start_x = v;
        }
        if let Some(v) = tree.root_offset {
            config.layout.tree.root_offset = v;
        }
    }

    if let Some(org) = parsed.org {
        if let Some(v) = org.spacing_x {
            config.layout.org.spacing_x = v;
        }
        if let Some(v) = org.spacing_y {
            config.layout.org.spacing_y = v;
        }
        if let Some(v) = org.start_y {
            config.layout.org.start_y = v;
        }
    }

    if let Some(fishbone) = parsed.fishbone {
        if let Some(v) = fishbone.main_spacing {
            config.layout.fishbone.main_spacing = v;
        }
        if let Some(v) = fishbone.branch_spacing_y {
            config.layout.fishbone.branch_spacing_y = v;
        }
        if let Some(v) = fishbone.branch_spacing_x {
            config.layout.fishbone.branch_spacing_x = v;
        }
        if let Some(v) = fishbone.branch_step_x {
            config.layout.fishbone.branch_step_x = v;
        }
        if let Some(v) = fishbone.sub_branch_step_y {
            config.layout.fishbone.sub_branch_step_y = v;
        }
    }

    if let Some(node) = parsed.node {
        if let Some(v) = node.font_size {
            config.layout.node.font_size = v;
        }
        if let Some(v) = node.padding_x {
            config.layout.node.padding_x = v;
        }
        if let Some(v) = node.padding_y {
            config.layout.node.padding_y = v;
        }
        if let Some(v) = node.root_min {
            config.layout.node.root_min = v;
        }
        if let Some(v) = node.child_min {
            config.layout.node.child_min = v;
        }
        if let Some(v) = node.max_label_width {
            config.layout.node.max_label_width = v;
        }
    }

    if let Some(viewport) = parsed.viewport {
        if let Some(v) = viewport.min_scale {
            config.viewport.min_scale = v;
        }
        if let Some(v) = viewport.max_scale {
            config.viewport.max_scale = v;
        }
        if let Some(v) = viewport.zoom_step {
            config.viewport.zoom_step = v;
        }
        if let Some(v) = viewport.focus_scale {
            config.viewport.focus_scale = v;
        }
        if config.viewport.min_scale <= 0.0 || config.viewport.min_scale > config.viewport.max_scale
        {
            anyhow::bail!(
                "invalid scale bounds [{}, {}]",
                config.viewport.min_scale,
                config.viewport.max_scale
            );
        }
    }

    if let Some(drag) = parsed.drag
        && let Some(v) = drag.margin
    {
        config.drag.margin = v;
    }

    if let Some(v) = parsed.width {
        config.render.width = v;
    }
    if let Some(v) = parsed.height {
        config.render.height = v;
    }

    ensure_finite(&config)?;
    Ok(config)
}

fn ensure_finite(config: &Config) -> anyhow::Result<()> {
    let layout = &config.layout;
    let values = [
        ("tree.spacingX", layout.tree.spacing_x),
        ("tree.spacingY", layout.tree.spacing_y),
        ("tree.startX", layout.tree.start_x),
        ("tree.rootOffset", layout.tree.root_offset),
        ("org.spacingX", layout.org.spacing_x),
        ("org.spacingY", layout.org.spacing_y),
        ("org.startY", layout.org.start_y),
        ("fishbone.mainSpacing", layout.fishbone.main_spacing),
        ("fishbone.branchSpacingY", layout.fishbone.branch_spacing_y),
        ("fishbone.branchSpacingX", layout.fishbone.branch_spacing_x),
        ("fishbone.branchStepX", layout.fishbone.branch_step_x),
        ("fishbone.subBranchStepY", layout.fishbone.sub_branch_step_y),
        ("node.fontSize", layout.node.font_size),
        ("node.paddingX", layout.node.padding_x),
        ("node.paddingY", layout.node.padding_y),
        ("node.rootMin", layout.node.root_min),
        ("node.childMin", layout.node.child_min),
        ("node.maxLabelWidth", layout.node.max_label_width),
        ("viewport.minScale", config.viewport.min_scale),
        ("viewport.maxScale", config.viewport.max_scale),
        ("viewport.zoomStep", config.viewport.zoom_step),
        ("viewport.focusScale", config.viewport.focus_scale),
        ("drag.margin", config.drag.margin),
        ("width", config.render.width),
        ("height", config.render.height),
        ("themeVariables.fontSize", config.theme.font_size),
    ];
    if let Some((name, value)) = values.iter().find(|(_, value)| !value.is_finite()) {
        anyhow::bail!("`{name}` must be a finite number, got {value}");
    }
    Ok(())
}
