use tracing::{trace, warn};

use crate::model::WindowId;
use crate::sys::geometry::Point;

/// An in-progress floating-window reposition gesture. Captures where the
/// pointer and the window were when the button went down; every move applies
/// the accumulated delta to that original origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub window: WindowId,
    start_pointer: Point,
    start_origin: Point,
}

/// At most one drag exists system-wide. There is no multi-pointer support, so
/// beginning a new drag simply supersedes any session still open.
#[derive(Debug, Default)]
pub struct DragManager {
    session: Option<DragSession>,
}

impl DragManager {
    pub fn new() -> Self { Self::default() }

    pub fn begin(&mut self, window: WindowId, pointer: Point, origin: Point) {
        if let Some(prior) = self.session.replace(DragSession {
            window,
            start_pointer: pointer,
            start_origin: origin,
        }) {
            warn!(superseded = ?prior.window, "drag started while another was active");
        }
        trace!(?window, ?pointer, "drag began");
    }

    /// New window origin for a pointer move; `None` when no drag is active.
    /// Applied directly to the window frame, bypassing layout recompute.
    pub fn update(&self, pointer: Point) -> Option<(WindowId, Point)> {
        let session = self.session.as_ref()?;
        let origin = session.start_origin.offset_by(
            pointer.x - session.start_pointer.x,
            pointer.y - session.start_pointer.y,
        );
        Some((session.window, origin))
    }

    pub fn end(&mut self) -> Option<WindowId> {
        let window = self.session.take().map(|s| s.window);
        if let Some(window) = window {
            trace!(?window, "drag ended");
        }
        window
    }

    pub fn is_dragging(&self) -> bool { self.session.is_some() }

    pub fn dragged_window(&self) -> Option<WindowId> { self.session.map(|s| s.window) }

    /// Drops the session if it targets `window`. Used when the dragged window
    /// is closed out from under the gesture.
    pub fn cancel_for(&mut self, window: WindowId) {
        if self.dragged_window() == Some(window) {
            self.session = None;
        }
    }
}
