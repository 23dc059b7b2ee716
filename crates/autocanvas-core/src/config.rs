//! Construction options for a forwarding surface.

use crate::host::dimension_from_f64;
use serde::{Deserialize, Deserializer};

/// Surface construction options.
///
/// Leaving `width` or `height` out, or giving anything other than a number
/// of at least one pixel, makes the surface track the viewport.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SurfaceConfig {
    #[serde(deserialize_with = "lenient_dimension")]
    pub width: Option<u32>,
    #[serde(deserialize_with = "lenient_dimension")]
    pub height: Option<u32>,
    /// Drawing context kind requested from the element.
    pub context: String,
    /// Selector of the body element the surface is inserted before.
    pub anchor: String,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            context: "2d".to_string(),
            anchor: "script".to_string(),
        }
    }
}

impl SurfaceConfig {
    /// Fixed-size surface.
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Parse options from a JSON object. Missing keys take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

fn lenient_dimension<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_f64)
        .and_then(dimension_from_f64))
}
