use std::collections::BTreeMap;

use crate::config::DiagramConfig;

/// Intensity used when coloring by size, and the top of the risk band
pub const FULL_INTENSITY: u8 = 100;

/// Color used when a key has no configured color
pub const DEFAULT_COLOR: &str = "gray";

/// Maps a file's color key and intensity to a fill color
pub trait FileColorMapper {
    fn map(&self, key: &str, intensity: u8) -> String;

    fn map_default(&self, key: &str) -> String {
        self.map(key, FULL_INTENSITY)
    }
}

/// Color lookup key for a file name.
///
/// The extension including its dot (`Program.cs` -> `.cs`). Names without an
/// extension, including dotfiles, use the whole name (`.gitignore`, `CODEOWNERS`).
pub fn color_key(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => &file_name[dot..],
        _ => file_name,
    }
}

/// Color mapper backed by a static key -> color table
#[derive(Debug, Clone)]
pub struct TableColorMapper {
    table: BTreeMap<String, String>,
    default_color: String,
}

impl TableColorMapper {
    pub fn new(table: BTreeMap<String, String>, default_color: impl Into<String>) -> Self {
        Self {
            table,
            default_color: default_color.into(),
        }
    }

    pub fn from_config(config: &DiagramConfig) -> Self {
        Self::new(config.colors.clone(), config.default_color.clone())
    }
}

impl<K, V> FromIterator<(K, V)> for TableColorMapper
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let table = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::new(table, DEFAULT_COLOR)
    }
}

impl FileColorMapper for TableColorMapper {
    fn map(&self, key: &str, intensity: u8) -> String {
        let color = match self.table.get(key) {
            Some(color) => color,
            None => {
                tracing::debug!(key, "no color configured, using default");
                &self.default_color
            }
        };
        shade(color, intensity)
    }
}

/// Tint a `#rrggbb` color toward white as intensity drops below full.
/// Other color strings are returned unchanged.
fn shade(color: &str, intensity: u8) -> String {
    if intensity >= FULL_INTENSITY {
        return color.to_string();
    }
    let Some(rgb) = parse_hex(color) else {
        return color.to_string();
    };

    let intensity = u32::from(intensity);
    let tint = |channel: u8| {
        let distance = 255 - u32::from(channel);
        255 - (distance * intensity + 50) / 100
    };
    format!("#{:02x}{:02x}{:02x}", tint(rgb[0]), tint(rgb[1]), tint(rgb[2]))
}

fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}
