use std::path::Path;

use config_file::FromConfigFile;
use serde::Deserialize;

use crate::entitystate::RetargetPolicy;
use crate::error::FlickerError;
use crate::flicker::{Flicker, FlickerOptions, DEFAULT_TRANSITION};
use crate::style::{validate_transition, RawStyleId, StyleId};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlackerConfig {
    pub frame_rate: f64,
    pub ola_address: String,
    pub universe: u16,
    pub default_transition: f64,
    pub retarget: RetargetPolicy,
    pub styles: Vec<StyleConfig>,
    pub lights: Vec<LightConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StyleConfig {
    pub id: RawStyleId,
    pub sequence: String,
    pub transition_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LightConfig {
    pub channel: u16,
    #[serde(default = "full_level")]
    pub level: f64,
    pub style: RawStyleId,
    #[serde(default)]
    pub debug: bool,
    pub start_index: Option<f64>,
}

fn full_level() -> f64 {
    255.0
}

impl Default for FlackerConfig {
    fn default() -> Self {
        FlackerConfig {
            frame_rate: 30.0,
            ola_address: "127.0.0.1:7770".to_string(),
            universe: 0,
            default_transition: DEFAULT_TRANSITION,
            retarget: RetargetPolicy::default(),
            styles: Vec::new(),
            lights: Vec::new(),
        }
    }
}

impl FlackerConfig {
    pub fn load(path: &Path) -> Result<FlackerConfig, String> {
        match FlackerConfig::from_config_file(path) {
            Ok(config) => Ok(config),
            Err(err) => Err(format!("Cannot read {}: {:?}", path.display(), err)),
        }
    }

    pub fn flicker_options(&self) -> Result<FlickerOptions, FlickerError> {
        Ok(FlickerOptions {
            default_transition: validate_transition(self.default_transition)?,
            retarget: self.retarget,
        })
    }

    /// Registers every configured style, stopping at the first invalid one.
    pub fn register_styles(&self, flicker: &mut Flicker) -> Result<usize, FlickerError> {
        for style in &self.styles {
            let id = StyleId::try_from(style.id.clone())?;
            flicker.create_custom_style(id, &style.sequence, style.transition_time)?;
        }

        Ok(self.styles.len())
    }
}

impl LightConfig {
    pub fn style_id(&self) -> Result<StyleId, FlickerError> {
        StyleId::try_from(self.style.clone())
    }
}
