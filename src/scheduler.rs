use crate::entitystate::EntityState;
use crate::light::LightKey;
use crate::overlay::{format_debug_text, DebugOverlay};
use crate::style::{Style, StyleId};

/// The single per-frame driver for every style that has lights attached.
///
/// Styles are kept in activation order. The scheduler is "subscribed" to the host
/// clock exactly while that list is non-empty.
pub struct TickScheduler {
    active: Vec<StyleId>,
}

impl TickScheduler {
    pub fn new() -> TickScheduler {
        TickScheduler { active: Vec::new() }
    }

    pub fn is_subscribed(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn active(&self) -> &[StyleId] {
        &self.active
    }

    /// Starting an already active style is a no-op.
    pub fn activate(&mut self, style: &mut Style) {
        if style.tick_active {
            return;
        }

        if self.active.is_empty() {
            log::debug!("Tick subscription started");
        }
        style.tick_active = true;
        self.active.push(style.id().clone());
    }

    pub fn deactivate(&mut self, style: &mut Style) {
        style.tick_active = false;
        self.forget(style.id());
    }

    pub(crate) fn forget(&mut self, id: &StyleId) {
        let before = self.active.len();
        self.active.retain(|active| active != id);

        if before > 0 && self.active.is_empty() {
            log::debug!("Tick subscription stopped");
        }
    }

    pub fn stop_all(&mut self) {
        if !self.active.is_empty() {
            log::debug!("Tick subscription stopped");
        }
        self.active.clear();
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        TickScheduler::new()
    }
}

/// Advances every light of `style` by `delta_time`.
///
/// Lights that are no longer live are taken out of the style and handed back so the
/// caller can finish detaching them.
pub(crate) fn tick_style(
    style: &mut Style,
    delta_time: f64,
    overlay: &mut dyn DebugOverlay,
) -> Vec<(LightKey, EntityState)> {
    let mut dead = Vec::new();
    for (key, state) in &style.entities {
        if !state.light().is_live() {
            dead.push(*key);
        }
    }

    let mut removed = Vec::with_capacity(dead.len());
    for key in dead {
        if let Some(state) = style.entities.remove(&key) {
            removed.push((key, state));
        }
    }

    let transition = style.transition();
    for state in style.entities.values_mut() {
        state.advance(delta_time, &style.pattern, transition);
        state.light().set_brightness(state.current_brightness());

        if let Some(handle) = state.debug_handle {
            let text = format_debug_text(
                &style.id,
                &style.pattern,
                state.current_index(),
                state.current_brightness(),
                state.max_brightness(),
            );
            overlay.update(handle, &text);
        }
    }

    removed
}
