use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub const DEFAULT_API_URL: &str = "https://apis.codante.io/olympic-games/countries";
pub const DEFAULT_PAGE_URL: &str = "https://www.olympics.com/en/milano-cortina-2026/medals";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
pub enum SourceKind {
    #[default]
    #[strum(serialize = "api")]
    #[serde(rename = "api")]
    Api,
    #[strum(serialize = "page")]
    #[serde(rename = "page")]
    Page,
}

impl SourceKind {
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            SourceKind::Api => DEFAULT_API_URL,
            SourceKind::Page => DEFAULT_PAGE_URL,
        }
    }
}

/// Everything one run needs, in one place.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct BoardConfig {
    #[builder(default)]
    pub source: SourceKind,
    #[builder(default = "DEFAULT_API_URL.to_string()")]
    pub endpoint: String,
    #[builder(default = "PathBuf::from(\"participants.json\")")]
    pub participants_file: PathBuf,
    #[builder(default = "PathBuf::from(\"index.html\")")]
    pub output_file: PathBuf,
    /// Browser auto-refresh interval written into the page, in seconds.
    #[builder(default = "300")]
    pub refresh_secs: u32,
    /// Deadline for the rendered page to produce a parseable medal table.
    #[builder(default = "30")]
    pub page_timeout_secs: u64,
    /// Pause between readiness polls of the rendered page.
    #[builder(default = "2")]
    pub page_poll_secs: u64,
}
