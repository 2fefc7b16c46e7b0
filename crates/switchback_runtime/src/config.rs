//! Host configuration.
//!
//! ```toml
//! [router]
//! command_prefix = "/"
//!
//! [session]
//! player = "alice"
//! grants = ["switchback.chunk"]
//! online = ["bob", "carol"]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use switchback_foundation::{Error, ErrorContext, Result};
use switchback_router::RouterConfig;

/// Everything the host reads from its configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Router messages and descriptor grammar.
    pub router: RouterConfig,
    /// Who is typing and who else is online.
    pub session: SessionOptions,
}

/// Session setup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Act as this player instead of the console.
    pub player: Option<String>,
    /// Permissions granted to the player.
    pub grants: Vec<String>,
    /// Other players to mark online.
    pub online: Vec<String>,
}

impl HostConfig {
    /// Parses configuration text.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the text is not valid TOML for this
    /// schema or the router settings are inconsistent.
    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::config(e.to_string()))?;
        config.router.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let context = || ErrorContext::new().with_source(path.display().to_string());
        let text = fs::read_to_string(path).map_err(|e| Error::config(e.to_string()).with_context(context()))?;
        Self::parse(&text).map_err(|e| e.with_context(context()))
    }
}
