//! Simulation harness: a scripted host player and overlay renderer that
//! exercise the full sequencing flow without a real video player or
//! renderer SDK. Used by the demo binary and the end-to-end tests.

pub mod player;
pub mod renderer;

pub use player::{HostCommand, PlayerSim, SimOutcome, SimulatedPlayer};
pub use renderer::{ScriptedOutcome, ScriptedOverlayRenderer};
