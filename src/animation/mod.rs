// Per-frame animation drivers: idle blinking, audio lip-sync and the resting pose.

pub mod blink;
pub mod lip_sync;
pub mod pose;

pub use blink::{BlinkController, BlinkJitter, BlinkPhase, BlinkState, FixedJitter, RandomJitter};
pub use lip_sync::{AudioAnalysisState, LipSyncAnalyzer, mouth_volume};
pub use pose::apply_resting_pose;
