use serde::Deserialize;

use crate::light::LightRef;
use crate::overlay::OverlayHandle;
use crate::pattern::Pattern;

/// How an attach decides that a state still needs its first target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetargetPolicy {
    /// A target of exactly zero counts as unassigned, so attaching again while a
    /// pattern step sits on `a` recomputes the target.
    #[default]
    ZeroSentinel,
    /// Only a state that never had a target gets one.
    Explicit,
}

pub struct EntityState {
    light: LightRef,
    current_index: usize,
    elapsed: f64,
    current_brightness: f64,
    target_brightness: f64,
    target_assigned: bool,
    max_brightness: f64,
    pub(crate) debug_handle: Option<OverlayHandle>,
}

impl EntityState {
    /// Captures the light's brightness right now as the ceiling for this attachment.
    pub fn new(light: LightRef, start_index: usize) -> EntityState {
        let brightness = light.brightness();

        EntityState {
            light,
            current_index: start_index,
            elapsed: 0.0,
            current_brightness: brightness,
            target_brightness: 0.0,
            target_assigned: false,
            max_brightness: brightness,
            debug_handle: None,
        }
    }

    pub fn light(&self) -> &LightRef {
        &self.light
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn current_brightness(&self) -> f64 {
        self.current_brightness
    }

    pub fn target_brightness(&self) -> f64 {
        self.target_brightness
    }

    pub fn max_brightness(&self) -> f64 {
        self.max_brightness
    }

    pub fn target_assigned(&self) -> bool {
        self.target_assigned
    }

    pub fn has_debug(&self) -> bool {
        self.debug_handle.is_some()
    }

    pub fn needs_target(&self, policy: RetargetPolicy) -> bool {
        match policy {
            RetargetPolicy::ZeroSentinel => self.target_brightness == 0.0,
            RetargetPolicy::Explicit => !self.target_assigned,
        }
    }

    /// Points the state at the level of its current pattern step.
    pub fn assign_target(&mut self, pattern: &Pattern) {
        self.target_brightness = pattern.level(self.current_index) * self.max_brightness;
        self.target_assigned = true;
    }

    /// Moves brightness toward the target by the share of the transition that has elapsed.
    ///
    /// `alpha` is measured from the moment the target was set but applied to the
    /// already-moved brightness, so each tick covers a growing fraction of the remaining
    /// distance. The resulting curve eases into the target instead of ramping linearly.
    /// Once a full transition has passed the next pattern step becomes the target.
    pub fn advance(&mut self, delta_time: f64, pattern: &Pattern, transition: f64) {
        self.elapsed += delta_time;
        let alpha = (self.elapsed / transition).min(1.0);

        let moved = self.current_brightness
            + (self.target_brightness - self.current_brightness) * alpha;
        self.current_brightness = moved.min(self.max_brightness).max(0.0);

        if alpha >= 1.0 {
            self.elapsed = 0.0;
            self.current_index = pattern.next_index(self.current_index);
            self.assign_target(pattern);
        }
    }
}
