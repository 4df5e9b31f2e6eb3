//! Supervising layer of the bridge: plateau detection over the fuzzer's
//! coverage feed, and the coordinator loop that turns a stall into a
//! solver-derived corpus seed.

pub mod analytics;
pub mod config;
pub mod coordinator;
pub mod stall;

pub use analytics::{BridgeStats, CampaignSummary};
pub use config::BridgeConfig;
pub use coordinator::HybridCoordinator;
pub use stall::StallDetector;
