use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::entitystate::EntityState;
use crate::error::FlickerError;
use crate::light::LightKey;
use crate::pattern::Pattern;

/// Key of a style: the numbered defaults or a caller-chosen name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleId {
    Index(u32),
    Name(String),
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleId::Index(index) => write!(f, "{index}"),
            StyleId::Name(name) => write!(f, "{name}"),
        }
    }
}

impl From<u32> for StyleId {
    fn from(index: u32) -> Self {
        StyleId::Index(index)
    }
}

impl From<&str> for StyleId {
    fn from(name: &str) -> Self {
        StyleId::Name(name.to_string())
    }
}

impl From<String> for StyleId {
    fn from(name: String) -> Self {
        StyleId::Name(name)
    }
}

/// A style id as it appears in a configuration file, before validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawStyleId {
    Integer(i64),
    Text(String),
    Float(f64),
    Flag(bool),
}

impl TryFrom<RawStyleId> for StyleId {
    type Error = FlickerError;

    fn try_from(raw: RawStyleId) -> Result<Self, Self::Error> {
        let invalid = FlickerError::InvalidArgumentType {
            argument: "style id",
            expected: "a non-negative integer or a non-empty name",
        };

        match raw {
            RawStyleId::Integer(index) => match u32::try_from(index) {
                Ok(index) => Ok(StyleId::Index(index)),
                Err(_) => Err(invalid),
            },
            RawStyleId::Text(name) => {
                if name.trim().is_empty() {
                    return Err(invalid);
                }
                // Numeric names refer to the numbered styles
                match name.parse::<u32>() {
                    Ok(index) => Ok(StyleId::Index(index)),
                    Err(_) => Ok(StyleId::Name(name)),
                }
            }
            RawStyleId::Float(_) | RawStyleId::Flag(_) => Err(invalid),
        }
    }
}

/// Checks that a transition time is a usable number of seconds.
pub fn validate_transition(seconds: f64) -> Result<f64, FlickerError> {
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err(FlickerError::InvalidArgumentType {
            argument: "transition time",
            expected: "a positive number of seconds",
        })
    }
}

pub struct Style {
    pub(crate) id: StyleId,
    pub(crate) pattern: Pattern,
    pub(crate) transition: f64,
    pub(crate) entities: HashMap<LightKey, EntityState>,
    pub(crate) tick_active: bool,
}

impl Style {
    pub fn id(&self) -> &StyleId {
        &self.id
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Seconds spent on each pattern step.
    pub fn transition(&self) -> f64 {
        self.transition
    }

    pub fn tick_active(&self) -> bool {
        self.tick_active
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entity(&self, key: LightKey) -> Option<&EntityState> {
        self.entities.get(&key)
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityState> {
        self.entities.values()
    }
}

pub struct StyleRegistry {
    styles: HashMap<StyleId, Style>,
}

impl StyleRegistry {
    pub fn new() -> StyleRegistry {
        StyleRegistry {
            styles: HashMap::new(),
        }
    }

    pub fn create(
        &mut self,
        id: StyleId,
        sequence: &str,
        transition: f64,
    ) -> Result<&Style, FlickerError> {
        if self.styles.contains_key(&id) {
            return Err(FlickerError::DuplicateStyleId(id));
        }

        let pattern = Pattern::parse(sequence)?;
        let transition = validate_transition(transition)?;

        log::debug!("Created style {id}: {pattern} every {transition}s");
        let style = Style {
            id: id.clone(),
            pattern,
            transition,
            entities: HashMap::new(),
            tick_active: false,
        };

        Ok(self.styles.entry(id).or_insert(style))
    }

    pub fn lookup(&self, id: &StyleId) -> Option<&Style> {
        self.styles.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &StyleId) -> Option<&mut Style> {
        self.styles.get_mut(id)
    }

    pub(crate) fn take(&mut self, id: &StyleId) -> Option<Style> {
        self.styles.remove(id)
    }

    pub(crate) fn styles_mut(&mut self) -> impl Iterator<Item = &mut Style> {
        self.styles.values_mut()
    }

    pub fn contains(&self, id: &StyleId) -> bool {
        self.styles.contains_key(id)
    }

    pub fn ids(&self) -> Vec<StyleId> {
        let mut ids: Vec<StyleId> = self.styles.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        StyleRegistry::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_lookup() {
        let mut registry = StyleRegistry::new();
        let style = registry.create(StyleId::from("torch"), "mnm", 0.25).unwrap();

        assert_eq!(style.pattern().to_string(), "mnm");
        assert_eq!(style.transition(), 0.25);
        assert_eq!(style.entity_count(), 0);
        assert!(!style.tick_active());

        assert!(registry.lookup(&StyleId::from("torch")).is_some());
        assert!(registry.lookup(&StyleId::from(1)).is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut registry = StyleRegistry::new();
        registry.create(StyleId::from(4), "ma", 0.1).unwrap();

        assert_eq!(
            registry.create(StyleId::from(4), "zz", 0.1).err(),
            Some(FlickerError::DuplicateStyleId(StyleId::Index(4)))
        );
        assert_eq!(
            registry.lookup(&StyleId::from(4)).unwrap().pattern().to_string(),
            "ma"
        );
    }

    #[test]
    fn failed_creation_leaves_nothing_behind() {
        let mut registry = StyleRegistry::new();

        assert_eq!(
            registry.create(StyleId::from("x"), "", 0.1).err(),
            Some(FlickerError::EmptySequence)
        );
        assert!(matches!(
            registry.create(StyleId::from("x"), "ab1", 0.1).err(),
            Some(FlickerError::InvalidSymbol { symbol: '1', .. })
        ));
        assert!(matches!(
            registry.create(StyleId::from("x"), "ab", 0.0).err(),
            Some(FlickerError::InvalidArgumentType { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn ids_are_sorted() {
        let mut registry = StyleRegistry::new();
        registry.create(StyleId::from("b"), "a", 0.1).unwrap();
        registry.create(StyleId::from(2), "a", 0.1).unwrap();
        registry.create(StyleId::from(1), "a", 0.1).unwrap();

        assert_eq!(
            registry.ids(),
            vec![StyleId::from(1), StyleId::from(2), StyleId::from("b")]
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn raw_ids_convert_or_fail_with_argument_type() {
        assert_eq!(
            StyleId::try_from(RawStyleId::Integer(11)),
            Ok(StyleId::Index(11))
        );
        assert_eq!(
            StyleId::try_from(RawStyleId::Text("63".to_string())),
            Ok(StyleId::Index(63))
        );
        assert_eq!(
            StyleId::try_from(RawStyleId::Text("torch".to_string())),
            Ok(StyleId::from("torch"))
        );

        for raw in [
            RawStyleId::Integer(-1),
            RawStyleId::Text("  ".to_string()),
            RawStyleId::Float(1.5),
            RawStyleId::Flag(true),
        ] {
            assert!(matches!(
                StyleId::try_from(raw),
                Err(FlickerError::InvalidArgumentType { .. })
            ));
        }
    }

    #[test]
    fn transition_must_be_positive_and_finite() {
        assert_eq!(validate_transition(0.5), Ok(0.5));
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(validate_transition(bad).is_err());
        }
    }
}
