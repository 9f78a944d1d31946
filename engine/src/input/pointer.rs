//! Pointer State Tracker
//!
//! Tracks the cursor, the held button and the motion accumulated while it is
//! held. Drag deltas and scroll accumulate between frames and are consumed
//! once per frame by the camera rig. A press released within
//! [`CLICK_THRESHOLD_PX`] of where it started is reported as a click, so
//! orbiting the camera never selects objects by accident.

use glam::Vec2;

/// Maximum pointer travel (pixels) between press and release for a click.
pub const CLICK_THRESHOLD_PX: f32 = 4.0;

/// Pointer buttons the explorer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Orbit (left button / single touch)
    Primary,
    /// Pan (right button)
    Secondary,
    /// Dolly (middle button)
    Middle,
}

/// A completed click in window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    pub button: PointerButton,
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    button: PointerButton,
    origin: Vec2,
    /// Furthest distance travelled from `origin` during the press.
    max_travel: f32,
}

#[derive(Debug, Clone, Default)]
pub struct PointerState {
    position: Vec2,
    press: Option<Press>,
    drag_delta: Vec2,
    /// Button released with drag motion the frame has not consumed yet.
    pending_release: Option<PointerButton>,
    scroll: f32,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Button currently held, if any.
    pub fn held(&self) -> Option<PointerButton> {
        self.press.map(|p| p.button)
    }

    /// Record cursor motion. While a button is held the motion accumulates
    /// into the drag delta.
    pub fn move_to(&mut self, x: f32, y: f32) {
        let next = Vec2::new(x, y);
        if let Some(press) = self.press.as_mut() {
            self.drag_delta += next - self.position;
            press.max_travel = press.max_travel.max(next.distance(press.origin));
        }
        self.position = next;
    }

    /// Start a press. A second button pressed while one is held is ignored.
    pub fn press(&mut self, button: PointerButton) {
        if self.press.is_some() {
            return;
        }
        self.flush_release();
        self.press = Some(Press {
            button,
            origin: self.position,
            max_travel: 0.0,
        });
    }

    /// End a press, returning a click when the pointer stayed put.
    ///
    /// Motion not yet consumed stays pending for the released button, so the
    /// next [`consume_drag`](Self::consume_drag) still applies it.
    pub fn release(&mut self, button: PointerButton) -> Option<Click> {
        let press = self.press.filter(|p| p.button == button)?;
        self.press = None;
        if self.drag_delta != Vec2::ZERO {
            self.pending_release = Some(button);
        }
        (press.max_travel <= CLICK_THRESHOLD_PX).then_some(Click {
            button,
            position: self.position,
        })
    }

    /// Accumulate wheel motion (positive = zoom in).
    pub fn scroll(&mut self, lines: f32) {
        self.scroll += lines;
    }

    /// Take the drag delta accumulated since the last call, tagged with the
    /// held or just-released button. Returns `None` when nothing moved.
    pub fn consume_drag(&mut self) -> Option<(PointerButton, Vec2)> {
        let delta = std::mem::take(&mut self.drag_delta);
        let button = self
            .press
            .map(|p| p.button)
            .or(self.pending_release.take())?;
        (delta != Vec2::ZERO).then_some((button, delta))
    }

    pub fn consume_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.scroll)
    }

    /// Drop any held button, e.g. when the window loses focus.
    pub fn cancel(&mut self) {
        self.press = None;
        self.flush_release();
    }

    fn flush_release(&mut self) {
        self.pending_release = None;
        self.drag_delta = Vec2::ZERO;
    }
}
