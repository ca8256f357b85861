//! Trailing-edge coalescing of redraw requests.
//!
//! Slider drags fire far more often than a frame can be rendered. The UI
//! calls [`FrameCoalescer::request`] on every change and
//! [`FrameCoalescer::on_frame`] once per refresh tick; only the newest
//! pending value is handed out, at most once per tick.

/// Holds at most one pending value. Newer requests overwrite older ones.
#[derive(Debug, Clone)]
pub struct FrameCoalescer<T> {
    pending: Option<T>,
    dropped: u64,
}

impl<T> Default for FrameCoalescer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameCoalescer<T> {
    pub fn new() -> Self {
        Self { pending: None, dropped: 0 }
    }

    /// Schedule `value` for the next tick, replacing anything pending.
    pub fn request(&mut self, value: T) {
        if self.pending.replace(value).is_some() {
            self.dropped += 1;
        }
    }

    /// Take the pending value, if any. Call once per refresh tick.
    pub fn on_frame(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value without handing it out.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Requests overwritten before their tick came.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
