//! Coverage plateau detection.
//!
//! Watches the fuzzer's cumulative coverage stream through a sliding window
//! and decides when the campaign has stalled. State machine:
//! `Idle -> Triggered -> Cooldown -> Idle`, where `Triggered` is transient:
//! `should_trigger` returns true exactly once and the detector is already in
//! `Cooldown` when it does. Cooldown expires by timestamp regardless of
//! coverage behavior during it.

use std::collections::VecDeque;

use seedbridge_types::CoverageSample;

use crate::config::BridgeConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetectorState {
    Idle,
    Cooldown { until_ms: u64 },
}

pub struct StallDetector {
    window_ms: u64,
    max_samples: usize,
    epsilon: u64,
    cooldown_ms: u64,
    window: VecDeque<CoverageSample>,
    state: DetectorState,
}

impl StallDetector {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            window_ms: config.stall_window_secs * 1000,
            max_samples: config.stall_window_samples.max(2),
            epsilon: config.stall_epsilon,
            cooldown_ms: config.cooldown_secs * 1000,
            window: VecDeque::new(),
            state: DetectorState::Idle,
        }
    }

    /// Feed one reading. Samples arrive in timestamp order; cadence is
    /// unbounded in both directions.
    pub fn observe(&mut self, sample: CoverageSample) {
        if let DetectorState::Cooldown { until_ms } = self.state {
            if sample.timestamp_ms >= until_ms {
                self.state = DetectorState::Idle;
            }
        }

        self.window.push_back(sample);

        // Evict from the front, but keep one sample older than the window
        // span so the delta always covers at least `window_ms` once enough
        // history exists.
        while self.window.len() > 2
            && self.window[1].timestamp_ms + self.window_ms <= sample.timestamp_ms
        {
            self.window.pop_front();
        }
        while self.window.len() > self.max_samples {
            self.window.pop_front();
        }
    }

    /// Decide whether a plateau has occurred. Returns true at most once per
    /// cooldown period; on true, the detector has already entered cooldown.
    pub fn should_trigger(&mut self) -> bool {
        if self.state != DetectorState::Idle {
            return false;
        }

        let (Some(first), Some(last)) = (self.window.front(), self.window.back()) else {
            return false;
        };
        if first.timestamp_ms == last.timestamp_ms {
            return false;
        }

        // A burst of samples over a short wall-clock span is not a full
        // window; require real elapsed time unless the sample cap forced
        // eviction.
        let span = last.timestamp_ms - first.timestamp_ms;
        let window_full = span >= self.window_ms || self.window.len() >= self.max_samples;
        if !window_full {
            return false;
        }

        let delta = last.covered.saturating_sub(first.covered);
        if delta > self.epsilon {
            return false;
        }

        self.state = DetectorState::Cooldown {
            until_ms: last.timestamp_ms + self.cooldown_ms,
        };
        true
    }

    /// Whether the detector is waiting out a cooldown.
    pub fn in_cooldown(&self) -> bool {
        matches!(self.state, DetectorState::Cooldown { .. })
    }

    /// Samples currently retained.
    pub fn window_len(&self) -> usize {
        self.window.len()
    }
}
