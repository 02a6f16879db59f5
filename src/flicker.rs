use std::collections::HashMap;

use crate::defaults::DEFAULT_STYLES;
use crate::entitystate::{EntityState, RetargetPolicy};
use crate::error::FlickerError;
use crate::light::{LightKey, LightRef};
use crate::overlay::{DebugOverlay, NoOverlay};
use crate::scheduler::{tick_style, TickScheduler};
use crate::style::{Style, StyleId, StyleRegistry};

pub const DEFAULT_TRANSITION: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlickerOptions {
    /// Seconds per pattern step for styles created without an explicit transition time
    pub default_transition: f64,
    pub retarget: RetargetPolicy,
}

impl FlickerOptions {
    pub fn new() -> FlickerOptions {
        FlickerOptions {
            default_transition: DEFAULT_TRANSITION,
            retarget: RetargetPolicy::default(),
        }
    }
}

impl Default for FlickerOptions {
    fn default() -> Self {
        FlickerOptions::new()
    }
}

/// Animates any number of lights through letter-encoded brightness patterns.
///
/// All styles, their attached lights and the shared tick live here. The host calls
/// [`Flicker::tick`] once per frame while [`Flicker::is_ticking`] is true.
pub struct Flicker {
    pub(crate) options: FlickerOptions,
    pub(crate) registry: StyleRegistry,
    pub(crate) scheduler: TickScheduler,
    pub(crate) overlay: Box<dyn DebugOverlay>,
    pub(crate) attachments: HashMap<LightKey, StyleId>,
}

impl Flicker {
    pub fn new(options: FlickerOptions) -> Flicker {
        Flicker::with_overlay(options, Box::new(NoOverlay))
    }

    pub fn with_overlay(options: FlickerOptions, overlay: Box<dyn DebugOverlay>) -> Flicker {
        Flicker {
            options,
            registry: StyleRegistry::new(),
            scheduler: TickScheduler::new(),
            overlay,
            attachments: HashMap::new(),
        }
    }

    /// Registers the numbered default styles that are not currently registered.
    pub fn init(&mut self) -> Result<usize, FlickerError> {
        let mut registered = 0;
        for (index, sequence) in DEFAULT_STYLES {
            let id = StyleId::Index(*index);
            if self.registry.contains(&id) {
                continue;
            }

            self.registry
                .create(id, sequence, self.options.default_transition)?;
            registered += 1;
        }

        log::debug!("Registered {registered} default styles");
        Ok(registered)
    }

    pub fn options(&self) -> &FlickerOptions {
        &self.options
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    pub fn lookup(&self, id: &StyleId) -> Option<&Style> {
        self.registry.lookup(id)
    }

    /// The style `light` is currently flickering with, if any.
    pub fn attachment(&self, light: &LightRef) -> Option<&StyleId> {
        self.attachments.get(&light.key())
    }

    pub fn is_ticking(&self) -> bool {
        self.scheduler.is_subscribed()
    }

    pub fn create_custom_style(
        &mut self,
        id: impl Into<StyleId>,
        sequence: &str,
        transition: Option<f64>,
    ) -> Result<&Style, FlickerError> {
        let transition = transition.unwrap_or(self.options.default_transition);
        self.registry.create(id.into(), sequence, transition)
    }

    /// Starts flickering `light` with the given style.
    ///
    /// `start_index` is the 1-based pattern position to begin at; it is floored and
    /// clamped into the pattern and only matters when the light is not attached yet.
    /// A light already flickering with another style is moved over to this one.
    pub fn start_flicker(
        &mut self,
        light: &LightRef,
        id: &StyleId,
        debug: bool,
        start_index: Option<f64>,
    ) -> Result<(), FlickerError> {
        if !self.registry.contains(id) {
            log::warn!(
                "Cannot flicker {}: style {id} does not exist",
                light.label()
            );
            return Err(FlickerError::UnknownStyle(id.clone()));
        }

        let key = light.key();
        if let Some(previous) = self.attachments.get(&key).cloned() {
            if &previous != id {
                log::debug!("Moving {} from style {previous} to {id}", light.label());
                self.stop_flicker(light, &previous);
            }
        }

        let style = match self.registry.get_mut(id) {
            Some(style) => style,
            None => return Err(FlickerError::UnknownStyle(id.clone())),
        };

        let start = match start_index {
            Some(index) => style.pattern.clamp_index(index),
            None => 1,
        };
        let state = style
            .entities
            .entry(key)
            .or_insert_with(|| EntityState::new(light.clone(), start));

        if state.needs_target(self.options.retarget) {
            state.assign_target(&style.pattern);
        }

        if debug && state.debug_handle.is_none() {
            state.debug_handle = self.overlay.acquire(light);
        }

        self.scheduler.activate(style);
        self.attachments.insert(key, id.clone());
        Ok(())
    }

    pub fn stop_flicker(&mut self, light: &LightRef, id: &StyleId) {
        let key = light.key();
        let state = match self.registry.get_mut(id) {
            Some(style) => style.entities.remove(&key),
            None => return,
        };

        if let Some(state) = state {
            self.release_state(key, state);
            self.collapse_if_idle(id);
        }
    }

    /// Detaches every light of the style and forgets the style. Absent ids are ignored.
    pub fn remove_style(&mut self, id: &StyleId) {
        let mut style = match self.registry.take(id) {
            Some(style) => style,
            None => return,
        };

        self.scheduler.deactivate(&mut style);
        let count = style.entities.len();
        for (key, state) in style.entities.drain() {
            self.release_state(key, state);
        }

        log::debug!("Removed style {id}, released {count} lights");
    }

    pub fn tick(&mut self, delta_time: f64) {
        if !self.scheduler.is_subscribed() {
            return;
        }

        let active = self.scheduler.active().to_vec();
        for id in &active {
            let removed = match self.registry.get_mut(id) {
                Some(style) => tick_style(style, delta_time, self.overlay.as_mut()),
                None => {
                    self.scheduler.forget(id);
                    continue;
                }
            };

            for (key, state) in removed {
                log::info!("{} left the scene, stopping its flicker", state.light().label());
                self.release_state(key, state);
            }
            self.collapse_if_idle(id);
        }
    }
}
