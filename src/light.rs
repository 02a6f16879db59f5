use std::cell::RefCell;
use std::rc::Rc;

/// Anything with a dimmable brightness that can be flickered.
pub trait Light {
    fn brightness(&self) -> f64;
    fn set_brightness(&mut self, brightness: f64);

    /// False once the light has left the scene; the scheduler then drops it.
    fn is_live(&self) -> bool;

    /// Short human-readable name used by debug output.
    fn label(&self) -> String {
        "light".to_string()
    }
}

/// Identity of a light, derived from the address of its shared cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightKey(usize);

#[derive(Clone)]
pub struct LightRef(Rc<RefCell<dyn Light>>);

impl LightRef {
    pub fn new<L: Light + 'static>(light: L) -> LightRef {
        LightRef(Rc::new(RefCell::new(light)))
    }

    pub fn from_shared(light: Rc<RefCell<dyn Light>>) -> LightRef {
        LightRef(light)
    }

    pub fn key(&self) -> LightKey {
        LightKey(Rc::as_ptr(&self.0) as *const () as usize)
    }

    pub fn brightness(&self) -> f64 {
        self.0.borrow().brightness()
    }

    pub fn set_brightness(&self, brightness: f64) {
        self.0.borrow_mut().set_brightness(brightness);
    }

    pub fn is_live(&self) -> bool {
        self.0.borrow().is_live()
    }

    pub fn label(&self) -> String {
        self.0.borrow().label()
    }
}

impl<L: Light + 'static> From<Rc<RefCell<L>>> for LightRef {
    fn from(light: Rc<RefCell<L>>) -> Self {
        LightRef(light)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestLight;

    #[test]
    fn key_follows_the_shared_cell() {
        let shared = Rc::new(RefCell::new(TestLight::new(3.0)));
        let a = LightRef::from(Rc::clone(&shared));
        let b = LightRef::from(Rc::clone(&shared));
        let other = LightRef::new(TestLight::new(3.0));

        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), other.key());
    }

    #[test]
    fn writes_reach_the_host_light() {
        let shared = Rc::new(RefCell::new(TestLight::new(3.0)));
        let light = LightRef::from(Rc::clone(&shared));

        light.set_brightness(1.5);
        assert_eq!(shared.borrow().level, 1.5);

        shared.borrow_mut().live = false;
        assert!(!light.is_live());
    }
}
