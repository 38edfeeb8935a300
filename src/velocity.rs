/// Default quiet period after which a scroll is considered finished.
pub const QUIET_PERIOD_MS: f64 = 150.0;

/// Scroll velocity derived from successive scroll offsets.
///
/// Times are milliseconds on a single monotonic clock (`performance.now()` and frame
/// timestamps in the browser), so both the scroll listener and the frame loop can feed it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollVelocity {
    last_offset: f64,
    velocity: f64,
    scrolling: bool,
    quiet_period: f64,
    /// When the current scroll is considered over, unless another event arrives first.
    settle_at: Option<f64>,
}

impl ScrollVelocity {
    pub fn new(initial_offset: f64, quiet_period: f64) -> Self {
        Self {
            last_offset: initial_offset,
            velocity: 0.0,
            scrolling: false,
            quiet_period,
            settle_at: None,
        }
    }

    pub fn on_scroll(&mut self, offset: f64, now: f64) {
        self.velocity = offset - self.last_offset;
        self.last_offset = offset;
        self.scrolling = true;
        // Every event pushes the deadline back, like restarting a debounce timer.
        self.settle_at = Some(now + self.quiet_period);
    }

    /// Settles the velocity to zero once the quiet period has passed without a scroll event.
    /// Returns whether this call settled it.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.settle_at {
            Some(deadline) if now >= deadline => {
                self.settle();
                true
            }
            _ => false,
        }
    }

    pub fn settle(&mut self) {
        self.velocity = 0.0;
        self.scrolling = false;
        self.settle_at = None;
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    pub fn offset(&self) -> f64 {
        self.last_offset
    }
}

impl Default for ScrollVelocity {
    fn default() -> Self {
        Self::new(0.0, QUIET_PERIOD_MS)
    }
}
