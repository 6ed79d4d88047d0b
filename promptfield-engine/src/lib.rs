//! Promptfield Engine — mixer + scheduler + halo field + realtime glue.
//!
//! Crate layout:
//! - [`mixer`]     : prompt store, weight-vector sinks, notices
//! - [`autopilot`] : the recurring shuffle scheduler
//! - [`field`]     : halo animation derived from the weight vector
//! - [`backdrop`]  : throttled background-gradient summary
//! - [`profiles`]  : built-in prompt profiles (moods)
//! - [`analysis`]  : boundary to the external analysis/generation service
//! - [`engine`]    : the `Engine` object a host steps once per frame
//!
//! The engine is single-threaded and clock-injected: hosts feed measured
//! frame deltas into `Engine::tick`, and every timer (auto-pilot deadline,
//! backdrop throttle, shape cadence) runs off that accumulated clock.

pub mod analysis;
pub mod autopilot;
pub mod backdrop;
pub mod engine;
pub mod field;
pub mod mixer;
pub mod profiles;

// Re-export some commonly used items to make downstream imports ergonomic.
pub use autopilot::{AutoPilot, IntervalMode, ShuffleStyle};
pub use engine::{AnalysisToken, Engine, EngineConfig};
pub use field::{FieldSim, Halo, MotionModel};
pub use mixer::{Mixer, Notice, PlaybackState, PromptView, WeightSink};
