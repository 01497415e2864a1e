use crate::config::DragConfig;
use crate::graph::NodeStore;
use crate::model::{NodeId, Point, Size};
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        node: NodeId,
        /// Pointer position minus node position, in canvas units.
        offset: Point,
        /// Size of the dragged node's box, used by the clamp.
        size: Size,
    },
}

/// Moves a single node with the pointer, keeping it inside the visible part
/// of the container at the current zoom.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    config: DragConfig,
}

impl DragController {
    pub fn new(config: DragConfig) -> Self {
        Self {
            state: DragState::Idle,
            config,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn dragged(&self) -> Option<NodeId> {
        match self.state {
            DragState::Dragging { node, .. } => Some(node),
            DragState::Idle => None,
        }
    }

    /// Starts dragging `node`. Returns false when the node is unknown or a
    /// drag is already running; the running drag is left untouched.
    pub fn begin(
        &mut self,
        node: NodeId,
        screen_x: f64,
        screen_y: f64,
        store: &NodeStore,
        viewport: &Viewport,
        size: Size,
    ) -> bool {
        if self.dragged().is_some() {
            return false;
        }
        let Some(target) = store.get(node) else {
            return false;
        };
        let pointer = viewport.to_canvas(screen_x, screen_y);
        self.state = DragState::Dragging {
            node,
            offset: Point::new(pointer.x - target.x, pointer.y - target.y),
            size,
        };
        true
    }

    /// Moves the dragged node under the pointer. Returns the node and its new
    /// position, or `None` when idle.
    pub fn update(
        &mut self,
        screen_x: f64,
        screen_y: f64,
        store: &mut NodeStore,
        viewport: &Viewport,
        container: Size,
    ) -> Option<(NodeId, Point)> {
        let DragState::Dragging { node, offset, size } = self.state else {
            return None;
        };
        let pointer = viewport.to_canvas(screen_x, screen_y);
        let scale = viewport.scale();
        let margin = self.config.margin;
        let position = Point::new(
            clamp_axis(
                pointer.x - offset.x,
                margin,
                container.width / scale - size.width - margin,
            ),
            clamp_axis(
                pointer.y - offset.y,
                margin,
                container.height / scale - size.height - margin,
            ),
        );
        if !store.set_position(node, position) {
            self.state = DragState::Idle;
            return None;
        }
        Some((node, position))
    }

    /// Ends the drag, returning the node that was being dragged.
    pub fn end(&mut self) -> Option<NodeId> {
        let node = self.dragged();
        self.state = DragState::Idle;
        node
    }

    /// Drops the drag if its node is among `removed`.
    pub fn cancel_if(&mut self, removed: &[NodeId]) -> bool {
        match self.dragged() {
            Some(node) if removed.contains(&node) => {
                self.state = DragState::Idle;
                true
            }
            _ => false,
        }
    }
}

/// Like `f64::clamp`, but a window narrower than the node pins it to the
/// lower bound instead of panicking.
fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}
