/// Render-loop gate: starts at most once and throttles frames to a rate.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameClock {
    interval: f64,
    last: f64,
    started: bool,
    frame_count: u64,
}

impl FrameClock {
    /// Clock accepting at most `frame_rate` frames per second.
    #[must_use]
    pub fn new(frame_rate: f64) -> Self {
        let interval = if frame_rate > 0.0 { 1000.0 / frame_rate } else { 0.0 };
        Self {
            interval,
            last: 0.0,
            started: false,
            frame_count: 0,
        }
    }

    /// Marks the loop as started. Returns `false` if it already was.
    pub fn start(&mut self) -> bool {
        !std::mem::replace(&mut self.started, true)
    }

    #[inline]
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Accepts the frame at `now` (ms) and returns the time since the last
    /// accepted frame, or `None` if it arrived too early. The first accepted
    /// frame reports a delta of zero.
    pub fn tick(&mut self, now: f64) -> Option<f64> {
        let delta = now - self.last;
        if delta < self.interval {
            return None;
        }
        self.last = now;
        self.frame_count += 1;
        Some(if self.frame_count == 1 { 0.0 } else { delta })
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    #[must_use]
    pub fn interval(&self) -> f64 {
        self.interval
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60.0)
    }
}
