//! Ad-pod sequencing and interactive-overlay handoff for CTV ad breaks.
//!
//! A mixed ad pod — a trueX choice card, IDVx interactive ads, regular
//! video creatives — plays out as one or two host-player timelines. The
//! sequencer decides when segments play back-to-back, when the player
//! pauses for an externally rendered overlay, and when the break resumes or
//! terminates, with a failsafe timeout guaranteeing forward progress when
//! the overlay never reports completion.

pub mod config;
pub mod error;
pub mod overlay;
pub mod pod;
pub mod sequencer;
pub mod sim;

pub use error::{PodError, Result};
