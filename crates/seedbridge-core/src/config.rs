/// Bridge configuration — solver deadline, plateau window, trigger pacing.
use serde::{Deserialize, Serialize};

/// Recognized configuration surface for a bridged campaign.
///
/// The cooldown should be sized to exceed typical solver invocation latency;
/// the coordinator additionally caps in-flight invocations at one per target,
/// so a mis-sized cooldown degrades to suppressed triggers, never to
/// duplicate subprocesses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Hard wall-clock deadline per solver invocation, in seconds.
    pub solver_timeout_secs: u64,
    /// Width of the coverage sliding window, in seconds.
    pub stall_window_secs: u64,
    /// Cap on retained samples, for unbounded-cadence feeds.
    pub stall_window_samples: usize,
    /// Largest coverage delta across the window still considered "no
    /// progress". Zero means any new edge resets the plateau.
    pub stall_epsilon: u64,
    /// Minimum seconds between triggers.
    pub cooldown_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            solver_timeout_secs: 60,
            stall_window_secs: 30,
            stall_window_samples: 256,
            stall_epsilon: 0,
            cooldown_secs: 120, // 2x the solver deadline
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cooldown_exceeds_solver_deadline() {
        let cfg = BridgeConfig::default();
        assert!(cfg.cooldown_secs > cfg.solver_timeout_secs);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let cfg = BridgeConfig {
            stall_epsilon: 3,
            ..BridgeConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: BridgeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stall_epsilon, 3);
        assert_eq!(back.stall_window_secs, cfg.stall_window_secs);
    }
}
