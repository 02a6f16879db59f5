//! Pattern-driven flickering for any number of lights from one shared tick.
//!
//! A style is a string of letters, `a` for dark up to `z` for full brightness. Lights
//! attached to a style ease from one letter's level to the next, one step per
//! transition time, looping forever until they are detached.

pub mod config;
pub mod defaults;
pub mod entitystate;
pub mod error;
pub mod flicker;
pub mod intervaltimer;
pub mod lifecycle;
pub mod light;
pub mod olaoutput;
pub mod overlay;
pub mod pattern;
pub mod scheduler;
pub mod style;

#[cfg(test)]
pub(crate) mod testing;

pub use entitystate::RetargetPolicy;
pub use error::FlickerError;
pub use flicker::{Flicker, FlickerOptions};
pub use light::{Light, LightRef};
pub use overlay::{DebugOverlay, LogOverlay, NoOverlay};
pub use style::StyleId;
