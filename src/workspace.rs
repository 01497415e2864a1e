use crate::config::ViewportConfig;
use crate::error::{Error, Result};
use crate::graph::NodeStore;
use crate::model::{
    DEFAULT_BACKGROUND, DEFAULT_WORKSPACE_ID, DEFAULT_WORKSPACE_NAME, ExportFile, LayoutKind,
    Timestamp, Workspace, WorkspaceData, WorkspaceMap, now_millis,
};
use crate::store::{KeyValueStore, LAST_ACTIVE_KEY, WORKSPACES_KEY};
use crate::viewport::Viewport;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Live state of the active workspace. Overwritten wholesale on load and
/// snapshotted back into the workspace record on save.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    pub nodes: NodeStore,
    pub viewport: Viewport,
    pub layout: LayoutKind,
    pub background: String,
    pub text_visible: bool,
}

impl WorkingSet {
    pub fn new(viewport: ViewportConfig) -> Self {
        Self {
            nodes: NodeStore::new(),
            viewport: Viewport::new(viewport),
            layout: LayoutKind::Free,
            background: DEFAULT_BACKGROUND.to_string(),
            text_visible: true,
        }
    }

    pub fn snapshot(&self) -> WorkspaceData {
        WorkspaceData {
            nodes: self.nodes.nodes().to_vec(),
            node_id_counter: self.nodes.counter(),
            pan_zoom: self.viewport.pan_zoom(),
            current_layout: self.layout,
            current_background: self.background.clone(),
            text_visible: self.text_visible,
        }
    }

    /// Replaces everything persisted; pan interaction state survives.
    pub fn restore(&mut self, data: &WorkspaceData) {
        self.nodes.replace(data.nodes.clone(), data.node_id_counter);
        self.viewport.restore(data.pan_zoom);
        self.layout = data.current_layout;
        self.background = if data.current_background.trim().is_empty() {
            DEFAULT_BACKGROUND.to_string()
        } else {
            data.current_background.clone()
        };
        self.text_visible = data.text_visible;
    }
}

impl Default for WorkingSet {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSummary {
    pub id: String,
    pub name: String,
    pub node_count: usize,
    pub last_modified: Timestamp,
    pub active: bool,
}

/// An export ready to be written: suggested file name plus the document.
#[derive(Debug, Clone)]
pub struct ExportedWorkspace {
    pub file_name: String,
    pub file: ExportFile,
}

impl ExportedWorkspace {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.file)?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportFile {
    workspace_name: Option<String>,
    data: WorkspaceData,
    created_at: Option<Timestamp>,
}

/// Owns every workspace record and the active id, writing the whole map
/// through to the backing store after each change.
#[derive(Debug)]
pub struct WorkspaceManager<S> {
    store: S,
    workspaces: WorkspaceMap,
    active: Option<String>,
    recovered: Option<Error>,
}

impl<S: KeyValueStore> WorkspaceManager<S> {
    /// Reads the workspace map from `store`. A map that does not parse at all
    /// is replaced by an empty one; a record that does not parse is dropped on
    /// its own. Either way the problem is kept for
    /// [`take_recovery`](Self::take_recovery). The default workspace is
    /// seeded if missing.
    pub fn open(store: S) -> Result<Self> {
        let mut recovered = None;
        let mut workspaces = WorkspaceMap::new();
        if let Some(raw) = store.get(WORKSPACES_KEY)? {
            match serde_json::from_str::<BTreeMap<String, Value>>(&raw) {
                Ok(records) => {
                    let mut dropped = Vec::new();
                    for (id, record) in records {
                        match serde_json::from_value::<Workspace>(record) {
                            Ok(workspace) => {
                                workspaces.insert(id, workspace);
                            }
                            Err(err) => {
                                warn!(
                                    workspace = %id,
                                    error = %err,
                                    "dropping unreadable workspace"
                                );
                                dropped.push(id);
                            }
                        }
                    }
                    if !dropped.is_empty() {
                        recovered = Some(Error::UnreadableWorkspaces(dropped));
                    }
                }
                Err(err) => {
                    warn!(error = %err, "workspace store is corrupt, starting empty");
                    recovered = Some(Error::CorruptStore(err));
                }
            }
        }
        // Records are keyed by id; the stored `id` field is not trusted.
        for (id, workspace) in workspaces.iter_mut() {
            workspace.id.clone_from(id);
        }
        workspaces
            .entry(DEFAULT_WORKSPACE_ID.to_string())
            .or_insert_with(|| {
                debug!("seeding default workspace");
                Workspace::new(
                    DEFAULT_WORKSPACE_ID,
                    DEFAULT_WORKSPACE_NAME,
                    WorkspaceData::default(),
                )
            });
        Ok(Self {
            store,
            workspaces,
            active: None,
            recovered,
        })
    }

    pub fn take_recovery(&mut self) -> Option<Error> {
        self.recovered.take()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&Workspace> {
        self.active.as_ref().and_then(|id| self.workspaces.get(id))
    }

    pub fn get(&self, id: &str) -> Option<&Workspace> {
        self.workspaces.get(id)
    }

    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }

    /// Id stored under the last-active key, if it still names a workspace.
    pub fn last_active(&self) -> Result<Option<String>> {
        let id = self.store.get(LAST_ACTIVE_KEY)?;
        Ok(id
            .map(|id| id.trim().to_string())
            .filter(|id| self.workspaces.contains_key(id)))
    }

    pub fn remember_active(&self) -> Result<()> {
        match &self.active {
            Some(id) => self.store.set(LAST_ACTIVE_KEY, id),
            None => Ok(()),
        }
    }

    /// Copies the working set into the active record without persisting.
    /// Returns false when nothing is active.
    pub fn snapshot_active(&mut self, working: &WorkingSet) -> bool {
        let Some(workspace) = self.active.as_ref().and_then(|id| self.workspaces.get_mut(id))
        else {
            return false;
        };
        workspace.data = working.snapshot();
        workspace.last_modified = now_millis();
        true
    }

    pub fn save_active(&mut self, working: &WorkingSet) -> Result<()> {
        if self.snapshot_active(working) {
            self.persist()?;
        }
        Ok(())
    }

    /// Writes the entire map to the backing store.
    pub fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.workspaces)?;
        self.store.set(WORKSPACES_KEY, &raw)
    }

    /// Makes `id` active. The outgoing workspace is saved first; an unknown
    /// id fails before anything is touched.
    pub fn load(&mut self, id: &str, working: &mut WorkingSet) -> Result<()> {
        if !self.workspaces.contains_key(id) {
            return Err(Error::UnknownWorkspace(id.to_string()));
        }
        self.save_active(working)?;
        let Some(workspace) = self.workspaces.get(id) else {
            return Err(Error::UnknownWorkspace(id.to_string()));
        };
        working.restore(&workspace.data);
        self.active = Some(id.to_string());
        info!(workspace = id, nodes = working.nodes.len(), "loaded workspace");
        Ok(())
    }

    /// Creates a workspace seeded with the working background and loads it.
    pub fn create(&mut self, name: Option<&str>, working: &mut WorkingSet) -> Result<String> {
        let name = match name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => name.to_string(),
            None => format!("New Workspace {}", self.workspaces.len() + 1),
        };
        let id = self.fresh_id();
        let background = if working.background.trim().is_empty() {
            DEFAULT_BACKGROUND
        } else {
            working.background.as_str()
        };
        let workspace = Workspace::new(id.clone(), name, WorkspaceData::seeded(background));
        self.workspaces.insert(id.clone(), workspace);
        self.persist()?;
        info!(workspace = %id, "created workspace");
        self.load(&id, working)?;
        Ok(id)
    }

    /// Removes a workspace. Deleting the active one loads the default.
    pub fn delete(&mut self, id: &str, working: &mut WorkingSet) -> Result<()> {
        if id == DEFAULT_WORKSPACE_ID {
            return Err(Error::ProtectedWorkspace(id.to_string()));
        }
        if self.workspaces.remove(id).is_none() {
            return Err(Error::UnknownWorkspace(id.to_string()));
        }
        self.persist()?;
        info!(workspace = id, "deleted workspace");
        if self.active.as_deref() == Some(id) {
            self.active = None;
            self.load(DEFAULT_WORKSPACE_ID, working)?;
        }
        Ok(())
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        let workspace = self
            .workspaces
            .get_mut(id)
            .ok_or_else(|| Error::UnknownWorkspace(id.to_string()))?;
        workspace.name = name.to_string();
        workspace.last_modified = now_millis();
        self.persist()?;
        debug!(workspace = id, name, "renamed workspace");
        Ok(())
    }

    /// Summaries, most recently modified first.
    pub fn list(&self) -> Vec<WorkspaceSummary> {
        let mut summaries: Vec<WorkspaceSummary> = self
            .workspaces
            .values()
            .map(|workspace| WorkspaceSummary {
                id: workspace.id.clone(),
                name: workspace.name.clone(),
                node_count: workspace.data.nodes.len(),
                last_modified: workspace.last_modified,
                active: self.active.as_deref() == Some(workspace.id.as_str()),
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.last_modified
                .cmp(&a.last_modified)
                .then_with(|| a.id.cmp(&b.id))
        });
        summaries
    }

    /// Saves, then packages the active workspace for export.
    pub fn export(&mut self, working: &WorkingSet) -> Result<ExportedWorkspace> {
        self.save_active(working)?;
        let workspace = self.active().ok_or(Error::NothingToExport)?;
        if workspace.data.nodes.is_empty() {
            return Err(Error::NothingToExport);
        }
        let now = Utc::now();
        Ok(ExportedWorkspace {
            file_name: export_file_name(&workspace.name, now),
            file: ExportFile {
                workspace_name: workspace.name.clone(),
                export_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
                data: workspace.data.clone(),
            },
        })
    }

    /// Adds the workspace described by an export document under a fresh id
    /// and loads it. A malformed document leaves every workspace untouched.
    pub fn import(&mut self, raw: &str, working: &mut WorkingSet) -> Result<String> {
        let value: Value =
            serde_json::from_str(raw).map_err(|err| Error::MalformedImport(err.to_string()))?;
        if value.pointer("/data/nodes").is_none_or(Value::is_null) {
            warn!("rejected import without data.nodes");
            return Err(Error::MalformedImport("missing data.nodes".to_string()));
        }
        let file: ImportFile =
            serde_json::from_value(value).map_err(|err| Error::MalformedImport(err.to_string()))?;

        let name = match file.workspace_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Imported Workspace {}", self.workspaces.len()),
        };
        let id = self.fresh_id();
        let mut workspace = Workspace::new(id.clone(), name, file.data);
        if let Some(created_at) = file.created_at {
            workspace.created_at = created_at;
        }
        self.workspaces.insert(id.clone(), workspace);
        self.persist()?;
        info!(workspace = %id, "imported workspace");
        self.load(&id, working)?;
        Ok(id)
    }

    fn fresh_id(&self) -> String {
        let mut stamp = now_millis();
        loop {
            let id = format!("workspace_{stamp}");
            if !self.workspaces.contains_key(&id) {
                return id;
            }
            stamp += 1;
        }
    }
}

pub fn export_file_name(workspace_name: &str, at: DateTime<Utc>) -> String {
    format!("mindmap_{}_{}.json", workspace_name, at.format("%Y-%m-%d"))
}
