//! Keeps "a style has lights" and "a style is ticking" in step, and tears everything
//! down on shutdown.

use crate::entitystate::EntityState;
use crate::flicker::Flicker;
use crate::light::LightKey;
use crate::style::StyleId;

impl Flicker {
    /// Finishes detaching a state that was already taken out of its style.
    pub(crate) fn release_state(&mut self, key: LightKey, mut state: EntityState) {
        if state.light().is_live() {
            state.light().set_brightness(state.max_brightness());
        }

        if let Some(handle) = state.debug_handle.take() {
            self.overlay.release(handle);
        }

        self.attachments.remove(&key);
    }

    /// Deletes the style if its last light is gone.
    pub(crate) fn collapse_if_idle(&mut self, id: &StyleId) {
        let idle = match self.registry.lookup(id) {
            Some(style) => style.entity_count() == 0,
            None => false,
        };
        if !idle {
            return;
        }

        if let Some(mut style) = self.registry.take(id) {
            self.scheduler.deactivate(&mut style);
            log::debug!("Style {id} has no lights left, removing it");
        }
    }

    /// Stops ticking and releases every debug visualization.
    ///
    /// Styles and attached lights are left as they are; lights keep their last
    /// brightness. Calling it more than once is harmless.
    pub fn shutdown(&mut self) {
        let mut released = 0;
        for style in self.registry.styles_mut() {
            style.tick_active = false;
            for state in style.entities.values_mut() {
                if let Some(handle) = state.debug_handle.take() {
                    self.overlay.release(handle);
                    released += 1;
                }
            }
        }
        self.scheduler.stop_all();

        if released > 0 {
            log::debug!("Released {released} debug overlays");
        }
    }
}

impl Drop for Flicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use crate::flicker::{Flicker, FlickerOptions};
    use crate::style::StyleId;
    use crate::testing::{RecordingOverlay, TestLight};

    #[test]
    fn shutdown_stops_ticking_and_releases_overlays() {
        let (overlay, log) = RecordingOverlay::new();
        let mut flicker = Flicker::with_overlay(FlickerOptions::new(), Box::new(overlay));
        flicker.init().unwrap();
        let (first_host, first) = TestLight::shared(5.0);
        let (_, second) = TestLight::shared(5.0);
        let (_, third) = TestLight::shared(5.0);
        flicker.start_flicker(&first, &StyleId::from(1), true, None).unwrap();
        flicker.start_flicker(&second, &StyleId::from(2), true, None).unwrap();
        flicker.start_flicker(&third, &StyleId::from(2), false, None).unwrap();
        flicker.tick(0.05);

        flicker.shutdown();
        assert!(!flicker.is_ticking());
        assert_eq!(log.borrow().released.len(), 2);
        assert!(!flicker.lookup(&StyleId::from(1)).unwrap().tick_active());

        let writes = first_host.borrow().writes;
        flicker.tick(0.05);
        assert_eq!(first_host.borrow().writes, writes);

        flicker.shutdown();
        assert_eq!(log.borrow().released.len(), 2);
    }

    #[test]
    fn dropping_releases_outstanding_overlays() {
        let (overlay, log) = RecordingOverlay::new();
        {
            let mut flicker = Flicker::with_overlay(FlickerOptions::new(), Box::new(overlay));
            flicker.create_custom_style("s", "az", None).unwrap();
            let (_, light) = TestLight::shared(1.0);
            flicker.start_flicker(&light, &StyleId::from("s"), true, None).unwrap();
        }
        assert_eq!(log.borrow().released.len(), 1);
    }

    #[test]
    fn restarting_after_shutdown_resumes_ticking() {
        let mut flicker = Flicker::new(FlickerOptions::new());
        flicker.create_custom_style("s", "az", Some(1.0)).unwrap();
        let (host, light) = TestLight::shared(4.0);
        flicker.start_flicker(&light, &StyleId::from("s"), false, None).unwrap();
        flicker.shutdown();

        flicker.start_flicker(&light, &StyleId::from("s"), false, None).unwrap();
        assert!(flicker.is_ticking());
        flicker.tick(0.5);
        assert_eq!(host.borrow().level, 2.0);
    }
}
