use crate::model::NodeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown parent node {0}")]
    UnknownParent(NodeId),
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("unknown workspace `{0}`")]
    UnknownWorkspace(String),
    #[error("workspace `{0}` cannot be deleted")]
    ProtectedWorkspace(String),
    #[error("malformed import: {0}")]
    MalformedImport(String),
    #[error("corrupt workspace store, starting with a fresh workspace list: {0}")]
    CorruptStore(#[source] serde_json::Error),
    #[error("dropped unreadable workspaces: {}", .0.join(", "))]
    UnreadableWorkspaces(Vec<String>),
    #[error("coordinates must be finite, got ({x}, {y})")]
    NonFiniteCoordinate { x: f64, y: f64 },
    #[error("a root node already exists")]
    RootExists,
    #[error("name must not be empty")]
    EmptyName,
    #[error("workspace has no nodes to export")]
    NothingToExport,
    #[error("store error on key `{key}`: {source}")]
    Store {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
