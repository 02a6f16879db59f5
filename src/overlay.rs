//! Optional debug visualization of flickering lights.
//!
//! The flicker core only ever talks to a [`DebugOverlay`]; with [`NoOverlay`] installed it
//! behaves exactly as it does with any other implementation.

use std::collections::HashMap;

use crate::light::LightRef;
use crate::pattern::Pattern;
use crate::style::StyleId;

const BAR_WIDTH: usize = 20;
const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '░';

/// Opaque reference to one visualization owned by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayHandle(u64);

impl OverlayHandle {
    pub fn new(id: u64) -> OverlayHandle {
        OverlayHandle(id)
    }
}

pub trait DebugOverlay {
    /// Creates a visualization for `light`, or `None` if the overlay can't show one.
    fn acquire(&mut self, light: &LightRef) -> Option<OverlayHandle>;
    fn update(&mut self, handle: OverlayHandle, text: &str);
    fn release(&mut self, handle: OverlayHandle);
}

pub struct NoOverlay;

impl DebugOverlay for NoOverlay {
    fn acquire(&mut self, _light: &LightRef) -> Option<OverlayHandle> {
        None
    }

    fn update(&mut self, _handle: OverlayHandle, _text: &str) {}

    fn release(&mut self, _handle: OverlayHandle) {}
}

pub struct LogOverlay {
    labels: HashMap<OverlayHandle, String>,
    next_id: u64,
}

impl LogOverlay {
    pub fn new() -> LogOverlay {
        LogOverlay {
            labels: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn active(&self) -> usize {
        self.labels.len()
    }
}

impl Default for LogOverlay {
    fn default() -> Self {
        LogOverlay::new()
    }
}

impl DebugOverlay for LogOverlay {
    fn acquire(&mut self, light: &LightRef) -> Option<OverlayHandle> {
        self.next_id += 1;
        let handle = OverlayHandle(self.next_id);
        self.labels.insert(handle, light.label());
        Some(handle)
    }

    fn update(&mut self, handle: OverlayHandle, text: &str) {
        if let Some(label) = self.labels.get(&handle) {
            log::debug!(target: "flackerlicht::overlay", "{label}: {text}");
        }
    }

    fn release(&mut self, handle: OverlayHandle) {
        self.labels.remove(&handle);
    }
}

pub fn brightness_bar(current: f64, max: f64) -> String {
    let ratio = if max > 0.0 {
        (current / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;

    let mut bar = String::with_capacity(BAR_WIDTH * BAR_FILLED.len_utf8());
    for i in 0..BAR_WIDTH {
        bar.push(if i < filled { BAR_FILLED } else { BAR_EMPTY });
    }
    bar
}

pub(crate) fn format_debug_text(
    style: &StyleId,
    pattern: &Pattern,
    index: usize,
    current: f64,
    max: f64,
) -> String {
    format!(
        "style {} | '{}' {}/{} | {:.2}/{:.2} | {}",
        style,
        pattern.symbol(index),
        index,
        pattern.len(),
        current,
        max,
        brightness_bar(current, max)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestLight;

    #[test]
    fn bar_is_always_twenty_glyphs() {
        for (current, max) in [(0.0, 10.0), (5.0, 10.0), (10.0, 10.0), (3.0, 0.0)] {
            assert_eq!(brightness_bar(current, max).chars().count(), 20);
        }
    }

    #[test]
    fn bar_fill_is_proportional() {
        assert_eq!(brightness_bar(0.0, 10.0), "░".repeat(20));
        assert_eq!(brightness_bar(10.0, 10.0), "█".repeat(20));
        assert_eq!(
            brightness_bar(2.5, 10.0),
            format!("{}{}", "█".repeat(5), "░".repeat(15))
        );
    }

    #[test]
    fn debug_text_lists_symbol_position_and_levels() {
        let pattern = Pattern::parse("abz").unwrap();
        let text = format_debug_text(&StyleId::from("torch"), &pattern, 3, 5.0, 10.0);

        assert!(text.starts_with("style torch | 'z' 3/3 | 5.00/10.00 | "));
        assert!(text.ends_with(&format!("{}{}", "█".repeat(10), "░".repeat(10))));
    }

    #[test]
    fn log_overlay_tracks_handles() {
        let mut overlay = LogOverlay::new();
        let light = LightRef::new(TestLight::new(1.0));

        let first = overlay.acquire(&light).unwrap();
        let second = overlay.acquire(&light).unwrap();
        assert_ne!(first, second);
        assert_eq!(overlay.active(), 2);

        overlay.update(first, "hello");
        overlay.release(first);
        overlay.release(second);
        assert_eq!(overlay.active(), 0);
    }

    #[test]
    fn no_overlay_hands_out_nothing() {
        let light = LightRef::new(TestLight::new(1.0));
        assert!(NoOverlay.acquire(&light).is_none());
    }
}
