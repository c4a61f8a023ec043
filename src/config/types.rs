use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::color::Color;
use crate::fetch::{FetchRequest, RequestOptions};

// ---------------------------------------------------------------------------
// Custom Color deserialization
// ---------------------------------------------------------------------------

/// Deserialize an `Option<Color>` from a TOML string value.
pub(crate) mod color_de {
    use serde::{self, Deserialize, Deserializer};

    use crate::color::Color;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Option::deserialize(deserializer)?;
        s.map(|s| Color::parse(&s, "<theme>"))
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint: EndpointConfig,
    pub defaults: Defaults,
    pub layout: LayoutConfig,
    pub theme: Theme,
}

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/firmware/signatures.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub headers: BTreeMap<String, String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_owned(),
            timeout_secs: 30,
            headers: BTreeMap::new(),
        }
    }
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// The fetch key this config describes.
    pub fn to_request(&self) -> FetchRequest {
        FetchRequest::new(self.url.clone()).with_options(RequestOptions {
            timeout: Some(self.timeout()),
            headers: self
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// `strftime` format for the Build Date column.
    pub date_format: String,
    /// How long a notice stays on screen.
    pub notice_seconds: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_owned(),
            notice_seconds: 6,
        }
    }
}

impl Defaults {
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_seconds)
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width units per terminal cell, used against the layout breakpoint.
    pub cell_width_units: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_width_units: 8,
        }
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Theme {
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub header: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub text: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub faint: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub selected_bg: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub border: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub error: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub active_filter: Option<Color>,
}
