use crate::config::Config;
use crate::drag::DragController;
use crate::error::{Error, Result};
use crate::layout::{
    Connection, LayoutFrame, apply_positions, compute_connections, compute_layout, measure_node,
    node_center,
};
use crate::model::{DEFAULT_WORKSPACE_ID, LayoutKind, Node, NodeId, Point, Size};
use crate::render::{LogNotifier, Notifier, NullRenderer, Renderer};
use crate::store::KeyValueStore;
use crate::viewport::ZoomDirection;
use crate::workspace::{ExportedWorkspace, WorkingSet, WorkspaceManager, WorkspaceSummary};
use tracing::{debug, warn};

pub const DEFAULT_ROOT_TEXT: &str = "Central Topic";

/// The single editing context: working set of the active workspace plus the
/// controllers and collaborators that act on it.
///
/// Every mutating operation redraws through the [`Renderer`] and writes the
/// active workspace through to the store before returning.
pub struct Editor<S, R = NullRenderer, N = LogNotifier> {
    working: WorkingSet,
    drag: DragController,
    workspaces: WorkspaceManager<S>,
    config: Config,
    container: Size,
    renderer: R,
    notifier: N,
}

impl<S: KeyValueStore, R: Renderer, N: Notifier> Editor<S, R, N> {
    /// Opens the store and loads the last active workspace, falling back to
    /// the default one. An empty default workspace gets a root node.
    pub fn open(
        store: S,
        renderer: R,
        notifier: N,
        config: Config,
        container: Size,
    ) -> Result<Self> {
        let mut workspaces = WorkspaceManager::open(store)?;
        let mut editor_notifier = notifier;
        if let Some(err) = workspaces.take_recovery() {
            editor_notifier.on_status(&err.to_string());
        }
        let mut working = WorkingSet::new(config.viewport.clone());
        let target = workspaces
            .last_active()?
            .unwrap_or_else(|| DEFAULT_WORKSPACE_ID.to_string());
        workspaces.load(&target, &mut working)?;

        let mut editor = Self {
            working,
            drag: DragController::new(config.drag.clone()),
            workspaces,
            config,
            container,
            renderer,
            notifier: editor_notifier,
        };
        editor.after_load();
        if editor.working.nodes.is_empty()
            && editor.workspaces.active_id() == Some(DEFAULT_WORKSPACE_ID)
        {
            editor.create_node(None, DEFAULT_ROOT_TEXT, None)?;
        }
        editor.notifier.on_status("Ready");
        Ok(editor)
    }

    pub fn working(&self) -> &WorkingSet {
        &self.working
    }

    pub fn nodes(&self) -> &[Node] {
        self.working.nodes.nodes()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.working.nodes.get(id)
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.working.nodes.selected()
    }

    pub fn layout(&self) -> LayoutKind {
        self.working.layout
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn active_workspace(&self) -> Option<&str> {
        self.workspaces.active_id()
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn resize(&mut self, container: Size) {
        self.container = container;
    }

    pub fn connections(&self) -> Vec<Connection> {
        compute_connections(&self.working.nodes, self.working.layout, &self.config.layout.node)
    }

    pub fn save(&mut self) -> Result<()> {
        self.workspaces.save_active(&self.working)
    }

    /// Adds a node. Without an explicit position a root goes to the visible
    /// centre and, in free mode, a child goes next to its parent; other
    /// children start at the origin and are placed by the active layout.
    pub fn create_node(
        &mut self,
        parent: Option<NodeId>,
        text: &str,
        position: Option<Point>,
    ) -> Result<NodeId> {
        let position = match position {
            Some(position) => position,
            None => self.default_position(parent),
        };
        let created = self
            .working
            .nodes
            .create_node(parent, text, position.x, position.y)
            .cloned();
        let node = self.report_error(created)?;
        debug!(node = %node.id, parent = ?parent, "created node");
        self.renderer.render_node(&node);
        if self.working.layout != LayoutKind::Free {
            self.relayout();
        }
        self.draw_edges();
        self.select(Some(node.id));
        self.save()?;
        Ok(node.id)
    }

    pub fn add_root(&mut self, text: &str) -> Result<NodeId> {
        if self.working.nodes.first_root().is_some() {
            self.notifier.on_status("A root node already exists");
            return Err(Error::RootExists);
        }
        self.create_node(None, text, None)
    }

    /// Adds a child at the quick-add offset from its parent.
    pub fn add_child(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        let (dx, dy) = self.config.layout.placement.quick_child;
        self.add_child_offset(parent, text, dx, dy)
    }

    /// Adds a child at the context-menu offset from its parent.
    pub fn add_child_from_menu(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        let (dx, dy) = self.config.layout.placement.menu_child;
        self.add_child_offset(parent, text, dx, dy)
    }

    /// Adds a child under the selected node, if any.
    pub fn add_child_to_selected(&mut self, text: &str) -> Result<Option<NodeId>> {
        match self.selected() {
            Some(parent) => self.add_child(parent, text).map(Some),
            None => {
                self.notifier.on_status("Select a node first");
                Ok(None)
            }
        }
    }

    fn add_child_offset(&mut self, parent: NodeId, text: &str, dx: f64, dy: f64) -> Result<NodeId> {
        let origin = self
            .working
            .nodes
            .get(parent)
            .map(Node::position)
            .ok_or(Error::UnknownParent(parent));
        let origin = self.report_error(origin)?;
        self.create_node(Some(parent), text, Some(Point::new(origin.x + dx, origin.y + dy)))
    }

    pub fn edit_text(&mut self, id: NodeId, text: &str) -> Result<()> {
        let edited = self.working.nodes.set_text(id, text);
        self.report_error(edited)?;
        if let Some(node) = self.working.nodes.get(id) {
            self.renderer.render_node(node);
        }
        self.draw_edges();
        self.save()
    }

    /// Deletes a node with its whole subtree. Unknown ids are ignored.
    pub fn delete_node(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        let was_selected = self.selected();
        let removed = self.working.nodes.delete_subtree(id);
        if removed.is_empty() {
            return Ok(removed);
        }
        for node in &removed {
            self.renderer.remove_node_visual(*node);
        }
        if self.drag.cancel_if(&removed) {
            debug!(node = %id, "cancelled drag of deleted node");
        }
        if was_selected != self.selected() {
            self.renderer.select_node(None);
            self.notifier.on_selection_changed(None);
        }
        self.draw_edges();
        self.save()?;
        self.notifier.on_status("Node deleted");
        Ok(removed)
    }

    /// Removes every node and resets layout and viewport. Background and
    /// text visibility are kept.
    pub fn clear_map(&mut self) -> Result<()> {
        if self.working.nodes.is_empty() {
            self.notifier.on_status("The canvas is already empty");
            return Ok(());
        }
        self.working.nodes.clear();
        self.working.layout = LayoutKind::Free;
        self.working.viewport.reset();
        self.drag.end();
        self.renderer.clear();
        self.renderer.apply_viewport(self.working.viewport.pan_zoom());
        self.notifier.on_selection_changed(None);
        self.save()?;
        self.notifier.on_status("Canvas cleared");
        Ok(())
    }

    pub fn apply_layout(&mut self, kind: LayoutKind) -> Result<()> {
        self.working.layout = kind;
        if kind != LayoutKind::Free {
            self.relayout();
            self.draw_edges();
        }
        self.save()
    }

    /// Recomputes positions for the current strategy without saving.
    fn relayout(&mut self) {
        let frame = LayoutFrame::new(self.container, self.working.viewport.pan_zoom());
        let positions = compute_layout(
            &self.working.nodes,
            self.working.layout,
            &self.config.layout,
            &frame,
        );
        let moved = apply_positions(&mut self.working.nodes, &positions);
        debug!(layout = %self.working.layout, moved = moved.len(), "applied layout");
        for id in moved {
            if let Some(position) = positions.get(&id) {
                self.renderer.move_node(id, *position);
            }
        }
    }

    pub fn set_background(&mut self, value: &str) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(());
        }
        self.working.background = value.to_string();
        self.renderer.apply_background(value);
        self.save()?;
        self.notifier.on_status("Background changed");
        Ok(())
    }

    pub fn toggle_text_visibility(&mut self) -> Result<bool> {
        self.working.text_visible = !self.working.text_visible;
        self.renderer.apply_text_visibility(self.working.text_visible);
        self.save()?;
        self.notifier.on_status(if self.working.text_visible {
            "Text shown"
        } else {
            "Text hidden"
        });
        Ok(self.working.text_visible)
    }

    pub fn select(&mut self, id: Option<NodeId>) {
        let before = self.selected();
        self.working.nodes.select(id);
        let after = self.selected();
        if before != after {
            self.renderer.select_node(after);
            self.notifier.on_selection_changed(after);
        }
    }

    /// Zooms to the focus scale with the node centred in the container.
    pub fn focus_node(&mut self, id: NodeId) -> Result<()> {
        let center = self
            .working
            .nodes
            .get(id)
            .map(|node| node_center(node, &self.config.layout.node))
            .ok_or(Error::UnknownNode(id));
        let center = self.report_error(center)?;
        self.working.viewport.focus_on(center, self.container);
        self.renderer.apply_viewport(self.working.viewport.pan_zoom());
        self.draw_edges();
        self.select(Some(id));
        self.save()?;
        self.notifier.on_status("Focused on node");
        Ok(())
    }

    /// Focuses the first root. Returns false when there is none.
    pub fn focus_root(&mut self) -> Result<bool> {
        match self.working.nodes.first_root().map(|node| node.id) {
            Some(root) => {
                self.focus_node(root)?;
                Ok(true)
            }
            None => {
                self.notifier.on_status("No root node found");
                Ok(false)
            }
        }
    }

    pub fn begin_drag(&mut self, id: NodeId, screen_x: f64, screen_y: f64) -> bool {
        let Some(node) = self.working.nodes.get(id) else {
            return false;
        };
        let size = measure_node(node, &self.config.layout.node);
        self.select(Some(id));
        self.drag.begin(
            id,
            screen_x,
            screen_y,
            &self.working.nodes,
            &self.working.viewport,
            size,
        )
    }

    pub fn update_drag(&mut self, screen_x: f64, screen_y: f64) -> Option<Point> {
        let (id, position) = self.drag.update(
            screen_x,
            screen_y,
            &mut self.working.nodes,
            &self.working.viewport,
            self.container,
        )?;
        self.renderer.move_node(id, position);
        self.draw_edges();
        Some(position)
    }

    pub fn end_drag(&mut self) -> Result<Option<NodeId>> {
        match self.drag.end() {
            Some(id) => {
                self.save()?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    /// Starts panning the canvas; clicking the background drops the selection.
    pub fn begin_pan(&mut self, screen_x: f64, screen_y: f64) {
        self.working.viewport.begin_pan(screen_x, screen_y);
        self.select(None);
    }

    pub fn pan_move(&mut self, screen_x: f64, screen_y: f64) -> bool {
        if !self.working.viewport.pan_to(screen_x, screen_y) {
            return false;
        }
        self.renderer.apply_viewport(self.working.viewport.pan_zoom());
        true
    }

    pub fn end_pan(&mut self) -> Result<bool> {
        if !self.working.viewport.end_pan() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    pub fn zoom(&mut self, screen_x: f64, screen_y: f64, direction: ZoomDirection) -> Result<f64> {
        self.working.viewport.zoom_at(screen_x, screen_y, direction);
        self.renderer.apply_viewport(self.working.viewport.pan_zoom());
        self.draw_edges();
        self.save()?;
        Ok(self.working.viewport.scale())
    }

    pub fn create_workspace(&mut self, name: Option<&str>) -> Result<String> {
        self.drag.end();
        let created = self.workspaces.create(name, &mut self.working);
        let id = self.report_error(created)?;
        self.after_load();
        self.report_switch();
        Ok(id)
    }

    pub fn switch_workspace(&mut self, id: &str) -> Result<()> {
        let loaded = self.workspaces.load(id, &mut self.working);
        self.report_error(loaded)?;
        self.drag.end();
        self.after_load();
        self.report_switch();
        Ok(())
    }

    pub fn delete_workspace(&mut self, id: &str) -> Result<()> {
        let was_active = self.workspaces.active_id() == Some(id);
        let deleted = self.workspaces.delete(id, &mut self.working);
        self.report_error(deleted)?;
        if was_active {
            self.drag.end();
            self.after_load();
        }
        self.notifier.on_status("Workspace deleted");
        Ok(())
    }

    pub fn rename_workspace(&mut self, id: &str, name: &str) -> Result<()> {
        let renamed = self.workspaces.rename(id, name);
        self.report_error(renamed)?;
        self.notifier.on_status("Workspace renamed");
        Ok(())
    }

    pub fn workspaces(&self) -> Vec<WorkspaceSummary> {
        self.workspaces.list()
    }

    pub fn export_active(&mut self) -> Result<ExportedWorkspace> {
        match self.workspaces.export(&self.working) {
            Ok(exported) => {
                self.notifier.on_status("Export ready");
                Ok(exported)
            }
            Err(err) => {
                self.notifier.on_status(&format!("Nothing exported: {err}"));
                Err(err)
            }
        }
    }

    pub fn import(&mut self, raw: &str) -> Result<String> {
        let id = match self.workspaces.import(raw, &mut self.working) {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, "import failed");
                self.notifier.on_status(&format!("Import failed: {err}"));
                return Err(err);
            }
        };
        self.drag.end();
        self.after_load();
        let name = self
            .workspaces
            .get(&id)
            .map(|workspace| workspace.name.clone())
            .unwrap_or_default();
        self.notifier.on_status(&format!("Imported: {name}"));
        Ok(id)
    }

    /// Saves the active workspace and remembers it for the next session.
    pub fn end_session(&mut self) -> Result<()> {
        self.save()?;
        self.workspaces.remember_active()
    }

    /// Re-issues every renderer hook for the current working set.
    pub fn redraw(&mut self) {
        self.renderer.clear();
        self.renderer.apply_background(&self.working.background);
        self.renderer.apply_text_visibility(self.working.text_visible);
        self.renderer.apply_viewport(self.working.viewport.pan_zoom());
        for node in self.working.nodes.nodes() {
            self.renderer.render_node(node);
        }
        self.draw_edges();
        self.renderer.select_node(self.selected());
    }

    fn after_load(&mut self) {
        if self.working.layout != LayoutKind::Free {
            self.relayout();
        }
        self.redraw();
    }

    /// Surfaces a failed operation as a status message before returning it.
    fn report_error<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.notifier.on_status(&format!("Error: {err}"));
        }
        result
    }

    fn report_switch(&mut self) {
        let name = self
            .workspaces
            .active()
            .map(|workspace| workspace.name.clone())
            .unwrap_or_default();
        self.notifier.on_status(&format!("Switched to workspace: {name}"));
    }

    fn draw_edges(&mut self) {
        let connections = self.connections();
        self.renderer.draw_edges(&connections);
    }

    fn default_position(&self, parent: Option<NodeId>) -> Point {
        let placement = &self.config.layout.placement;
        match parent {
            None => {
                let center = self.working.viewport.visible_center(self.container);
                let half = self.config.layout.node.root_min / 2.0;
                Point::new(center.x - half, center.y - half)
            }
            Some(_) if self.working.layout != LayoutKind::Free => Point::default(),
            Some(parent) => self
                .working
                .nodes
                .get(parent)
                .map(|node| {
                    Point::new(
                        node.x + placement.free_child.0,
                        node.y + placement.free_child.1,
                    )
                })
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PanZoom;
    use crate::render::SvgRenderer;
    use crate::store::{LAST_ACTIVE_KEY, MemoryStore};

    #[derive(Default)]
    struct Recorder {
        statuses: Vec<String>,
        selections: Vec<Option<NodeId>>,
    }

    impl Notifier for Recorder {
        fn on_status(&mut self, message: &str) {
            self.statuses.push(message.to_string());
        }

        fn on_selection_changed(&mut self, id: Option<NodeId>) {
            self.selections.push(id);
        }
    }

    const CONTAINER: Size = Size::new(1000.0, 600.0);

    fn editor(store: &MemoryStore) -> Editor<&MemoryStore, NullRenderer, Recorder> {
        Editor::open(
            store,
            NullRenderer,
            Recorder::default(),
            Config::default(),
            CONTAINER,
        )
        .unwrap()
    }

    #[test]
    fn open_seeds_central_topic() {
        let store = MemoryStore::new();
        let editor = editor(&store);
        assert_eq!(editor.active_workspace(), Some(DEFAULT_WORKSPACE_ID));
        let root = &editor.nodes()[0];
        assert_eq!(root.text, DEFAULT_ROOT_TEXT);
        assert_eq!(root.position(), Point::new(480.0, 280.0));
        assert_eq!(editor.notifier().statuses.last().map(String::as_str), Some("Ready"));
    }

    #[test]
    fn corrupt_store_reports_and_recovers() {
        let store = MemoryStore::with_entry("workspaces", "][");
        let editor = editor(&store);
        assert!(editor.notifier().statuses[0].contains("corrupt"));
        assert_eq!(editor.nodes().len(), 1);
    }

    #[test]
    fn failures_surface_as_status() {
        let store = MemoryStore::new();
        let mut editor = editor(&store);
        let ghost = NodeId(42);
        assert!(matches!(editor.add_child(ghost, "x"), Err(Error::UnknownParent(_))));
        assert!(matches!(
            editor.create_node(Some(ghost), "x", Some(Point::new(1.0, 1.0))),
            Err(Error::UnknownParent(_))
        ));
        assert!(matches!(editor.edit_text(ghost, "x"), Err(Error::UnknownNode(_))));
        assert!(matches!(editor.focus_node(ghost), Err(Error::UnknownNode(_))));
        assert!(matches!(
            editor.rename_workspace(DEFAULT_WORKSPACE_ID, "  "),
            Err(Error::EmptyName)
        ));
        assert!(matches!(
            editor.create_node(None, "far", Some(Point::new(f64::NAN, 0.0))),
            Err(Error::NonFiniteCoordinate { .. })
        ));
        let errors = editor
            .notifier()
            .statuses
            .iter()
            .filter(|status| status.starts_with("Error: "))
            .count();
        assert_eq!(errors, 6);
        assert_eq!(editor.nodes().len(), 1);
    }

    #[test]
    fn add_root_rejects_second_root() {
        let store = MemoryStore::new();
        let mut editor = editor(&store);
        assert!(matches!(editor.add_root("Another"), Err(Error::RootExists)));
        assert_eq!(editor.nodes().len(), 1);
    }

    #[test]
    fn children_follow_active_layout() {
        let store = MemoryStore::new();
        let mut editor = editor(&store);
        let root = editor.nodes()[0].id;
        let free = editor.create_node(Some(root), "free", None).unwrap();
        assert_eq!(editor.node(free).unwrap().position(), Point::new(600.0, 350.0));
        assert_eq!(editor.selected(), Some(free));

        let quick = editor.add_child(root, "quick").unwrap();
        assert_eq!(editor.node(quick).unwrap().position(), Point::new(630.0, 360.0));
        let menu = editor.add_child_from_menu(root, "menu").unwrap();
        assert_eq!(editor.node(menu).unwrap().position(), Point::new(580.0, 340.0));

        editor.apply_layout(LayoutKind::Tree).unwrap();
        let child = editor.create_node(Some(root), "tree", None).unwrap();
        let tree = &editor.config().layout.tree;
        assert_eq!(editor.node(child).unwrap().x, tree.start_x + tree.spacing_x);
    }

    #[test]
    fn delete_clears_selection_and_drag() {
        let store = MemoryStore::new();
        let mut editor = editor(&store);
        let root = editor.nodes()[0].id;
        let child = editor.add_child(root, "child").unwrap();
        let grandchild = editor.add_child(child, "grandchild").unwrap();
        assert!(editor.begin_drag(grandchild, 10.0, 10.0));
        let removed = editor.delete_node(child).unwrap();
        assert_eq!(removed, vec![child, grandchild]);
        assert_eq!(editor.selected(), None);
        assert_eq!(editor.update_drag(50.0, 50.0), None);
        assert_eq!(editor.notifier().selections.last(), Some(&None));
        assert!(editor.delete_node(NodeId(99)).unwrap().is_empty());
    }

    #[test]
    fn drag_is_clamped_and_saved() {
        let store = MemoryStore::new();
        let mut editor = editor(&store);
        let root = editor.nodes()[0].id;
        assert!(editor.begin_drag(root, 500.0, 300.0));
        let position = editor.update_drag(-400.0, 5000.0).unwrap();
        // 600 - 40 - 20
        assert_eq!(position, Point::new(20.0, 540.0));
        assert_eq!(editor.end_drag().unwrap(), Some(root));
        assert_eq!(editor.end_drag().unwrap(), None);
        let raw = store.get("workspaces").unwrap().unwrap();
        assert!(raw.contains("\"y\":540"));
    }

    #[test]
    fn pan_and_zoom_update_viewport() {
        let store = MemoryStore::new();
        let mut editor = editor(&store);
        editor.begin_pan(10.0, 10.0);
        assert!(editor.pan_move(30.0, 5.0));
        assert!(editor.end_pan().unwrap());
        assert!(!editor.end_pan().unwrap());
        assert!(!editor.pan_move(0.0, 0.0));
        assert_eq!(editor.working().viewport.offset(), Point::new(20.0, -5.0));
        let scale = editor.zoom(0.0, 0.0, ZoomDirection::In).unwrap();
        assert!((scale - 1.1).abs() < 1e-12);
    }

    #[test]
    fn focus_centres_node() {
        let store = MemoryStore::new();
        let mut editor = editor(&store);
        assert!(editor.focus_root().unwrap());
        let expected = node_center(&editor.nodes()[0], &editor.config().layout.node);
        let viewport = &editor.working().viewport;
        assert_eq!(viewport.scale(), 1.5);
        let center = viewport.visible_center(CONTAINER);
        assert!((center.x - expected.x).abs() < 1e-9 && (center.y - expected.y).abs() < 1e-9);
        assert!(matches!(editor.focus_node(NodeId(42)), Err(Error::UnknownNode(_))));
    }

    #[test]
    fn clear_map_resets_layout_and_viewport() {
        let store = MemoryStore::new();
        let mut editor = editor(&store);
        editor.set_background("#224466").unwrap();
        editor.apply_layout(LayoutKind::Org).unwrap();
        editor.zoom(100.0, 100.0, ZoomDirection::Out).unwrap();
        editor.clear_map().unwrap();
        assert!(editor.nodes().is_empty());
        assert_eq!(editor.layout(), LayoutKind::Free);
        assert_eq!(editor.working().viewport.pan_zoom(), PanZoom::default());
        assert_eq!(editor.working().background, "#224466");
        let root = editor.create_node(None, "again", None).unwrap();
        assert_eq!(root, NodeId(0));
    }

    #[test]
    fn switching_round_trips_and_persists_session() {
        let store = MemoryStore::new();
        let id = {
            let mut editor = editor(&store);
            let id = editor.create_workspace(Some("Plans")).unwrap();
            assert!(editor.nodes().is_empty());
            let root = editor.add_root("Plan").unwrap();
            editor.add_child(root, "Step").unwrap();
            editor.toggle_text_visibility().unwrap();
            editor.switch_workspace(DEFAULT_WORKSPACE_ID).unwrap();
            assert_eq!(editor.nodes().len(), 1);
            editor.switch_workspace(&id).unwrap();
            assert_eq!(editor.nodes().len(), 2);
            assert!(!editor.working().text_visible);
            assert!(editor.switch_workspace("missing").is_err());
            editor.end_session().unwrap();
            id
        };
        assert_eq!(store.get(LAST_ACTIVE_KEY).unwrap().as_deref(), Some(id.as_str()));
        let reopened = editor(&store);
        assert_eq!(reopened.active_workspace(), Some(id.as_str()));
        assert_eq!(reopened.nodes().len(), 2);
    }

    #[test]
    fn import_export_round_trip() {
        let store = MemoryStore::new();
        let mut editor = editor(&store);
        let exported = editor.export_active().unwrap();
        let id = editor.import(&exported.to_json().unwrap()).unwrap();
        assert_eq!(editor.active_workspace(), Some(id.as_str()));
        assert_eq!(editor.nodes().len(), 1);
        assert_eq!(editor.workspaces().len(), 2);
        assert!(matches!(editor.import("{}"), Err(Error::MalformedImport(_))));
        assert_eq!(editor.workspaces().len(), 2);
    }

    #[test]
    fn delete_active_workspace_reloads_default() {
        let store = MemoryStore::new();
        let mut editor = editor(&store);
        let id = editor.create_workspace(None).unwrap();
        editor.delete_workspace(&id).unwrap();
        assert_eq!(editor.active_workspace(), Some(DEFAULT_WORKSPACE_ID));
        assert!(matches!(
            editor.delete_workspace(DEFAULT_WORKSPACE_ID),
            Err(Error::ProtectedWorkspace(_))
        ));
    }

    #[test]
    fn svg_renderer_tracks_scene() {
        let store = MemoryStore::new();
        let config = Config::default();
        let renderer = SvgRenderer::new(
            config.theme.clone(),
            config.layout.node.clone(),
            config.render.clone(),
        );
        let mut editor =
            Editor::open(&store, renderer, LogNotifier, config, CONTAINER).unwrap();
        let root = editor.nodes()[0].id;
        editor.add_child(root, "Leaf").unwrap();
        assert_eq!(editor.renderer().node_count(), 2);
        assert_eq!(editor.renderer().edge_count(), 1);
        assert!(editor.renderer().to_svg().contains("Leaf"));
    }
}
