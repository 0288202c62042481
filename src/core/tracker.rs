//! Rolling behavior tracker: trailing windows over scroll telemetry
//!
//! Two fixed-capacity FIFO windows: raw event timestamps and the
//! instantaneous velocities derived from them. Degenerate windows resolve
//! to safe defaults (velocity 1.0, trend 0.0) instead of failing.

use std::collections::VecDeque;

use crate::TRACKER_WINDOW;

/// Trailing-window tracker for scroll velocity and its trend
#[derive(Debug, Clone)]
pub struct RollingTracker {
    timestamps: VecDeque<f64>,
    velocities: VecDeque<f64>,
    capacity: usize,
}

impl Default for RollingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RollingTracker {
    /// Create a tracker with the default window capacity
    pub fn new() -> Self {
        Self::with_capacity(TRACKER_WINDOW)
    }

    /// Create a tracker with a custom window capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            timestamps: VecDeque::with_capacity(capacity),
            velocities: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a visibility event timestamp (seconds)
    pub fn record(&mut self, now_secs: f64) {
        if self.timestamps.len() == self.capacity {
            self.timestamps.pop_front();
        }
        self.timestamps.push_back(now_secs);

        let v = self.velocity();
        if self.velocities.len() == self.capacity {
            self.velocities.pop_front();
        }
        self.velocities.push_back(v);
    }

    /// Instantaneous velocity: samples per second across the window
    ///
    /// Defaults to 1.0 with fewer than 2 samples or a zero span.
    pub fn velocity(&self) -> f64 {
        if self.timestamps.len() < 2 {
            return 1.0;
        }
        let first = self.timestamps.front().copied().unwrap_or(0.0);
        let last = self.timestamps.back().copied().unwrap_or(0.0);
        let span = last - first;
        if span <= 0.0 {
            return 1.0;
        }
        self.timestamps.len() as f64 / span
    }

    /// Velocity trend: least-squares slope of velocity against sample index
    ///
    /// 0.0 with fewer than 3 samples or a degenerate fit.
    pub fn trend(&self) -> f64 {
        let n = self.velocities.len();
        if n < 3 {
            return 0.0;
        }

        let nf = n as f64;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;
        let mut sum_xx = 0.0;
        for (i, v) in self.velocities.iter().enumerate() {
            let x = i as f64;
            sum_x += x;
            sum_y += v;
            sum_xy += x * v;
            sum_xx += x * x;
        }

        let denom = nf * sum_xx - sum_x * sum_x;
        if denom.abs() < f64::EPSILON {
            return 0.0;
        }
        (nf * sum_xy - sum_x * sum_y) / denom
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
