use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_WORKSPACE_ID: &str = "default";
pub const DEFAULT_WORKSPACE_NAME: &str = "Default Workspace";
pub const DEFAULT_BACKGROUND: &str = "url('https://images.unsplash.com/photo-1451187580459-43490279c0fa?auto=format&fit=crop&w=1772&q=80')";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A labelled point in the diagram tree.
///
/// `level` is fixed when the node is created and is never recomputed; moving a
/// node only touches `x`/`y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub text: String,
    #[serde(deserialize_with = "null_as_zero")]
    pub x: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub y: f64,
    #[serde(default)]
    pub level: u32,
}

/// serde_json writes non-finite floats as `null`; read those back as 0.
fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl Node {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_root(&self) -> bool {
        self.level == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Free,
    Tree,
    Org,
    Fishbone,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 4] = [Self::Free, Self::Tree, Self::Org, Self::Fishbone];

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "free" => Some(Self::Free),
            "tree" => Some(Self::Tree),
            "org" => Some(Self::Org),
            "fishbone" => Some(Self::Fishbone),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Tree => "tree",
            Self::Org => "org",
            Self::Fishbone => "fishbone",
        }
    }

    /// Tree and org layouts draw curved connections, the rest straight lines.
    pub fn curved_connections(self) -> bool {
        matches!(self, Self::Tree | Self::Org)
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The persisted subset of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanZoom {
    #[serde(deserialize_with = "null_as_one")]
    pub scale: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub offset_x: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub offset_y: f64,
}

fn null_as_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(1.0))
}

impl Default for PanZoom {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceData {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub node_id_counter: u64,
    #[serde(default)]
    pub pan_zoom: PanZoom,
    #[serde(default)]
    pub current_layout: LayoutKind,
    #[serde(default = "default_background")]
    pub current_background: String,
    #[serde(default = "default_text_visible")]
    pub text_visible: bool,
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

fn default_text_visible() -> bool {
    true
}

impl WorkspaceData {
    pub fn seeded(background: &str) -> Self {
        Self {
            nodes: Vec::new(),
            node_id_counter: 0,
            pan_zoom: PanZoom::default(),
            current_layout: LayoutKind::Free,
            current_background: background.to_string(),
            text_visible: true,
        }
    }
}

impl Default for WorkspaceData {
    fn default() -> Self {
        Self::seeded(DEFAULT_BACKGROUND)
    }
}

/// Millisecond unix timestamps, as written by the browser front end.
pub type Timestamp = i64;

pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub data: WorkspaceData,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub last_modified: Timestamp,
}

impl Workspace {
    pub fn new(id: impl Into<String>, name: impl Into<String>, data: WorkspaceData) -> Self {
        let now = now_millis();
        Self {
            id: id.into(),
            name: name.into(),
            data,
            created_at: now,
            last_modified: now,
        }
    }
}

pub type WorkspaceMap = BTreeMap<String, Workspace>;

/// Shape of an exported workspace file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub workspace_name: String,
    pub export_date: String,
    pub data: WorkspaceData,
}
