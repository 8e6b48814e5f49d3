//! Resize throttling
//!
//! Container resizes can fire continuously while a window is dragged. The
//! throttle lets the first size through immediately, then holds the latest
//! size until the interval has elapsed and flushes it on the next animation
//! frame. At most one size is released per frame.

/// Minimum spacing between released sizes
pub const RESIZE_THROTTLE_MS: u64 = 100;

#[derive(Debug, Clone)]
pub struct ResizeThrottle {
    interval_ms: u64,
    last_release: Option<u64>,
    pending: Option<(f64, f64)>,
}

impl Default for ResizeThrottle {
    fn default() -> Self {
        Self::new(RESIZE_THROTTLE_MS)
    }
}

impl ResizeThrottle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_release: None,
            pending: None,
        }
    }

    fn ready(&self, now_ms: u64) -> bool {
        self.last_release
            .map_or(true, |last| now_ms.saturating_sub(last) >= self.interval_ms)
    }

    /// Record an observed size. Returns it straight away on the leading edge.
    pub fn observe(&mut self, width: f64, height: f64, now_ms: u64) -> Option<(f64, f64)> {
        if self.ready(now_ms) {
            self.last_release = Some(now_ms);
            self.pending = None;
            Some((width, height))
        } else {
            self.pending = Some((width, height));
            None
        }
    }

    /// Called once per animation frame; releases the trailing size when due
    pub fn on_frame(&mut self, now_ms: u64) -> Option<(f64, f64)> {
        if self.pending.is_some() && self.ready(now_ms) {
            self.last_release = Some(now_ms);
            self.pending.take()
        } else {
            None
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
