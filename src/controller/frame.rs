use std::sync::Arc;

use winit::window::Window;

/// Handle for one requested display frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// Per-display-frame callback source. A request arms exactly one future tick.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameId;
    fn cancel_frame(&mut self, id: FrameId);
}

/// Maps frame requests onto `RedrawRequested` events.
///
/// winit cannot withdraw a redraw request, so cancellation only forgets the
/// id; the controller ignores redraws it no longer holds an armed id for.
pub struct WindowScheduler {
    window: Arc<Window>,
    next: u64,
    pending: Option<FrameId>,
}

impl WindowScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next: 0,
            pending: None,
        }
    }

    pub fn pending(&self) -> Option<FrameId> {
        self.pending
    }
}

impl FrameScheduler for WindowScheduler {
    fn request_frame(&mut self) -> FrameId {
        self.next += 1;
        let id = FrameId(self.next);
        self.pending = Some(id);
        self.window.request_redraw();
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if self.pending == Some(id) {
            self.pending = None;
        }
    }
}
