#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod drag;
pub mod editor;
pub mod error;
pub mod graph;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod render;
pub mod store;
pub mod theme;
pub mod viewport;
pub mod workspace;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use editor::Editor;
pub use error::{Error, Result};
pub use graph::NodeStore;
pub use layout::{LayoutFrame, Positions, compute_connections, compute_layout};
pub use model::{LayoutKind, Node, NodeId, PanZoom, Point, Size, Workspace, WorkspaceData};
pub use render::{Notifier, Renderer, SvgRenderer};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use theme::Theme;
pub use viewport::{Viewport, ZoomDirection};
pub use workspace::{WorkingSet, WorkspaceManager};
