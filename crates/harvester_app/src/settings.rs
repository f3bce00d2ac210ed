use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use engine_logging::engine_info;
use harvester_core::DEFAULT_MAX_ROUNDS;
use harvester_engine::{BrowserOptions, FetchSettings, SurfaceSelectors, WaitPolicy};
use serde::{Deserialize, Serialize};

/// Optional RON settings file; every missing field keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// DevTools endpoint of an already running browser; `None` launches one.
    pub browser_url: Option<String>,
    pub browser: BrowserSettings,
    pub fetch: FetchFileSettings,
    pub discovery: DiscoverySettings,
    pub selectors: SurfaceSelectors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub executable: Option<PathBuf>,
    pub args: Vec<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchFileSettings {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: Option<String>,
    /// Empty accepts any content type.
    pub allowed_content_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    pub reveal_multiplier: u32,
    pub max_rounds: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            browser_url: None,
            browser: BrowserSettings::default(),
            fetch: FetchFileSettings::default(),
            discovery: DiscoverySettings::default(),
            selectors: SurfaceSelectors::default(),
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        let options = BrowserOptions::default();
        Self {
            executable: options.executable,
            args: options.args,
            request_timeout_secs: options.request_timeout.as_secs(),
        }
    }
}

impl Default for FetchFileSettings {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            redirect_limit: fetch.redirect_limit,
            max_bytes: fetch.max_bytes,
            user_agent: fetch.user_agent,
            allowed_content_types: fetch.allowed_content_types,
        }
    }
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            reveal_multiplier: 4,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl AppSettings {
    /// Reads the settings file, or returns defaults when none was given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings: AppSettings = ron::from_str(&content)
            .with_context(|| format!("failed to parse settings from {}", path.display()))?;
        engine_info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn browser_options(&self, headed: bool) -> BrowserOptions {
        BrowserOptions {
            headless: !headed,
            executable: self.browser.executable.clone(),
            args: self.browser.args.clone(),
            request_timeout: Duration::from_secs(self.browser.request_timeout_secs),
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.fetch.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.fetch.request_timeout_secs),
            redirect_limit: self.fetch.redirect_limit,
            max_bytes: self.fetch.max_bytes,
            user_agent: self.fetch.user_agent.clone(),
            allowed_content_types: self.fetch.allowed_content_types.clone(),
        }
    }

    pub fn wait_policy(&self, unit: Duration) -> WaitPolicy {
        WaitPolicy {
            unit,
            reveal_multiplier: self.discovery.reveal_multiplier,
            max_rounds: self.discovery.max_rounds,
        }
    }
}
