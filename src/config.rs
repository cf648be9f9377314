//! Search option tables and runtime settings.
//!
//! The location, furniture and owner tables are data, not code: they are
//! read from `config/search_options.json` at startup so site query syntax
//! can change without a rebuild.

use crate::error::ScoutError;
use crate::scrapers::types::MAX_LOCATION;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_OPTIONS_PATH: &str = "config/search_options.json";
pub const DEFAULT_BASE_URL: &str = "https://krisha.kz";

/// One searchable region of the site
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Location {
    pub name: String,
    /// Path segment inserted after `/arenda/kvartiry/`
    pub path: String,
}

/// Query fragments selected by a boolean search flag
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FlagFragments {
    #[serde(rename = "true")]
    pub enabled: String,
    #[serde(rename = "false")]
    pub disabled: String,
}

impl FlagFragments {
    pub fn get(&self, flag: bool) -> &str {
        if flag {
            &self.enabled
        } else {
            &self.disabled
        }
    }
}

/// The three lookup tables the search URL is assembled from
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SearchOptions {
    /// Indexed by location code
    pub locations: Vec<Location>,
    pub furniture: FlagFragments,
    pub owner: FlagFragments,
}

impl SearchOptions {
    /// Load the tables from a JSON file. Any failure here is fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScoutError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ScoutError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ScoutError> {
        let options: SearchOptions = serde_json::from_str(raw)?;
        options.validate()?;
        Ok(options)
    }

    fn validate(&self) -> Result<(), ScoutError> {
        let required = MAX_LOCATION as usize + 1;
        if self.locations.len() < required {
            return Err(ScoutError::ConfigInvalid(format!(
                "expected {} locations, found {}",
                required,
                self.locations.len()
            )));
        }
        Ok(())
    }

    pub fn location(&self, code: u32) -> Option<&Location> {
        self.locations.get(code as usize)
    }
}

/// What the pagination loop does when a page has no "next" link
/// before the page bound is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnMissingNext {
    /// Keep fetching the current URL until the bound is exhausted
    #[default]
    Repeat,
    /// End the loop at the last page that was actually linked
    Stop,
}

/// Runtime settings for a scrape run
#[derive(Debug, Clone)]
pub struct ScoutConfig {
    pub base_url: String,
    /// Courtesy pause between page fetches
    pub pacing_delay: Duration,
    /// Timeout for the initial reachability check only
    pub health_timeout: Duration,
    pub output_dir: PathBuf,
    pub on_missing_next: OnMissingNext,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            pacing_delay: Duration::from_millis(500),
            health_timeout: Duration::from_secs(5),
            output_dir: PathBuf::from("data"),
            on_missing_next: OnMissingNext::default(),
        }
    }
}

impl ScoutConfig {
    /// Base URL without a trailing slash
    pub fn home_page(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
