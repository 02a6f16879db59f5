//! Helpers shared by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::light::{Light, LightRef};
use crate::overlay::{DebugOverlay, OverlayHandle};

// Translated from https://floating-point-gui.de/errors/comparison/
pub fn nearly_equal(a: f64, b: f64, epsilon: f64) -> bool {
    let abs_a = a.abs();
    let abs_b = b.abs();
    let diff = (a - b).abs();

    if a == b {
        // shortcut, handles infinities
        true
    } else if a == 0.0 || b == 0.0 || (abs_a + abs_b) < f64::MIN_POSITIVE {
        // relative error is meaningless this close to zero
        diff < epsilon
    } else {
        diff / (abs_a + abs_b).min(f64::MAX) < epsilon
    }
}

pub struct TestLight {
    pub level: f64,
    pub live: bool,
    pub writes: usize,
}

impl TestLight {
    pub fn new(level: f64) -> TestLight {
        TestLight {
            level,
            live: true,
            writes: 0,
        }
    }

    /// Returns the host side and the handle handed to the flicker core.
    pub fn shared(level: f64) -> (Rc<RefCell<TestLight>>, LightRef) {
        let shared = Rc::new(RefCell::new(TestLight::new(level)));
        let light = LightRef::from(Rc::clone(&shared));
        (shared, light)
    }
}

impl Light for TestLight {
    fn brightness(&self) -> f64 {
        self.level
    }

    fn set_brightness(&mut self, brightness: f64) {
        self.level = brightness;
        self.writes += 1;
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

#[derive(Default)]
pub struct OverlayLog {
    pub acquired: usize,
    pub released: Vec<OverlayHandle>,
    pub updates: Vec<(OverlayHandle, String)>,
}

/// Overlay that records every call into a shared log.
pub struct RecordingOverlay {
    pub log: Rc<RefCell<OverlayLog>>,
    next: u64,
}

impl RecordingOverlay {
    pub fn new() -> (RecordingOverlay, Rc<RefCell<OverlayLog>>) {
        let log = Rc::new(RefCell::new(OverlayLog::default()));
        let overlay = RecordingOverlay {
            log: Rc::clone(&log),
            next: 0,
        };
        (overlay, log)
    }
}

impl DebugOverlay for RecordingOverlay {
    fn acquire(&mut self, _light: &LightRef) -> Option<OverlayHandle> {
        self.next += 1;
        self.log.borrow_mut().acquired += 1;
        Some(OverlayHandle::new(self.next))
    }

    fn update(&mut self, handle: OverlayHandle, text: &str) {
        self.log.borrow_mut().updates.push((handle, text.to_string()));
    }

    fn release(&mut self, handle: OverlayHandle) {
        self.log.borrow_mut().released.push(handle);
    }
}
