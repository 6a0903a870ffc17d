//! Functions for loading application settings.

use std::path::Path;

use crate::errors::*;
use crate::video::ContextParams;
use crate::window::WindowParams;

use super::time::TimeParams;

/// A structure containing configuration data for the frame loop, which are
/// used to specify hardware setup stuff to create the window and the render
/// context. Missing fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowParams,
    pub context: ContextParams,
    pub time: TimeParams,
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self> {
        let settings = serde_json::from_str(text).context("Malformed settings.")?;
        Ok(settings)
    }

    /// Reads settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = crate::assets::load_string(path)?;
        Settings::from_json(&text)
    }
}
