use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::color::DEFAULT_COLOR;
use crate::error::Result;
use crate::layout::LayoutPolicy;

/// What drives file color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// One color per extension
    #[default]
    Size,
    /// Extension color shaded by the file's relative risk index
    Risk,
}

/// Diagram settings supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramConfig {
    #[serde(default, alias = "type")]
    pub mode: ColorMode,
    #[serde(default)]
    pub layout: LayoutPolicy,
    /// Extension (or whole file name) -> color
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default = "default_color")]
    pub default_color: String,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            mode: ColorMode::default(),
            layout: LayoutPolicy::default(),
            colors: BTreeMap::new(),
            default_color: default_color(),
        }
    }
}

impl DiagramConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
