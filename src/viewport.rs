use crate::config::ViewportConfig;
use crate::model::{PanZoom, Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Wheel convention: scrolling up (negative delta) zooms in.
    pub fn from_wheel(delta_y: f64) -> Self {
        if delta_y < 0.0 { Self::In } else { Self::Out }
    }
}

/// Screen/canvas transform: `screen = canvas * scale + offset`.
///
/// Screen coordinates are relative to the container's own origin.
#[derive(Debug, Clone)]
pub struct Viewport {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    is_panning: bool,
    last_pan: Point,
    config: ViewportConfig,
}

impl Viewport {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            is_panning: false,
            last_pan: Point::default(),
            config,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Point {
        Point::new(self.offset_x, self.offset_y)
    }

    pub fn is_panning(&self) -> bool {
        self.is_panning
    }

    pub fn pan_zoom(&self) -> PanZoom {
        PanZoom {
            scale: self.scale,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
        }
    }

    /// Overwrites the persisted fields; pan interaction state is kept.
    pub fn restore(&mut self, pan_zoom: PanZoom) {
        self.scale = if pan_zoom.scale.is_finite() {
            pan_zoom.scale.clamp(self.config.min_scale, self.config.max_scale)
        } else {
            1.0
        };
        self.offset_x = finite_or_zero(pan_zoom.offset_x);
        self.offset_y = finite_or_zero(pan_zoom.offset_y);
    }

    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
        self.is_panning = false;
        self.last_pan = Point::default();
    }

    /// Shifts the offsets. An axis whose result would not be finite is left
    /// unchanged.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let x = self.offset_x + dx;
        let y = self.offset_y + dy;
        if x.is_finite() {
            self.offset_x = x;
        }
        if y.is_finite() {
            self.offset_y = y;
        }
    }

    /// Rescales by one zoom step keeping the canvas point under
    /// `(screen_x, screen_y)` fixed on screen. Returns whether the scale changed.
    pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, direction: ZoomDirection) -> bool {
        if !screen_x.is_finite() || !screen_y.is_finite() {
            return false;
        }
        let old_scale = self.scale;
        let stepped = match direction {
            ZoomDirection::In => old_scale * self.config.zoom_step,
            ZoomDirection::Out => old_scale / self.config.zoom_step,
        };
        let new_scale = stepped.clamp(self.config.min_scale, self.config.max_scale);
        let ratio = new_scale / old_scale;
        self.scale = new_scale;
        self.offset_x = screen_x - (screen_x - self.offset_x) * ratio;
        self.offset_y = screen_y - (screen_y - self.offset_y) * ratio;
        new_scale != old_scale
    }

    pub fn to_canvas(&self, screen_x: f64, screen_y: f64) -> Point {
        Point::new(
            (screen_x - self.offset_x) / self.scale,
            (screen_y - self.offset_y) / self.scale,
        )
    }

    pub fn to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.scale + self.offset_x,
            canvas.y * self.scale + self.offset_y,
        )
    }

    /// Canvas point currently shown at the centre of the container.
    pub fn visible_center(&self, container: Size) -> Point {
        self.to_canvas(container.width / 2.0, container.height / 2.0)
    }

    /// Sets the focus scale and centres `canvas_center` in the container.
    pub fn focus_on(&mut self, canvas_center: Point, container: Size) {
        if !canvas_center.x.is_finite() || !canvas_center.y.is_finite() {
            return;
        }
        let scale = self
            .config
            .focus_scale
            .clamp(self.config.min_scale, self.config.max_scale);
        self.scale = scale;
        self.offset_x = container.width / 2.0 - canvas_center.x * scale;
        self.offset_y = container.height / 2.0 - canvas_center.y * scale;
    }

    pub fn begin_pan(&mut self, screen_x: f64, screen_y: f64) {
        self.is_panning = true;
        self.last_pan = Point::new(screen_x, screen_y);
    }

    /// Pans by the pointer movement since the last event; ignored unless a
    /// pan is in progress.
    pub fn pan_to(&mut self, screen_x: f64, screen_y: f64) -> bool {
        if !self.is_panning {
            return false;
        }
        let dx = screen_x - self.last_pan.x;
        let dy = screen_y - self.last_pan.y;
        self.pan_by(dx, dy);
        self.last_pan = Point::new(screen_x, screen_y);
        true
    }

    /// Returns whether a pan was actually in progress.
    pub fn end_pan(&mut self) -> bool {
        std::mem::replace(&mut self.is_panning, false)
    }

    /// CSS transform equivalent of this viewport, origin at `0 0`.
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px,{}px) scale({})",
            self.offset_x, self.offset_y, self.scale
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
