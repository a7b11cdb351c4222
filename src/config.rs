//! Runtime configuration resolved from CLI flags and the environment.

use crate::catalog::{builtin_catalog, load_catalog, Catalog};
use crate::error::{HubError, HubResult};
use crate::notify::DispatchConfig;
use crate::recommend::{load_rules, Recommender, BUILTIN_RECOMMENDER};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Data directory name under the home directory
const DATA_DIR: &str = ".knowledge-hub";

/// Default simulated "thinking" time before a chat reply is shown
pub const DEFAULT_REPLY_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Where the local store lives
    pub data_dir: PathBuf,

    /// JSON catalog replacing the built-in one
    pub catalog_path: Option<PathBuf>,

    /// JSON rule table replacing the built-in one
    pub rules_path: Option<PathBuf>,

    /// Whether commands need a remembered login
    pub require_login: bool,

    pub reply_delay: Duration,

    /// Set when the dispatch webhook is fully configured
    pub dispatch: Option<DispatchConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DATA_DIR),
            catalog_path: None,
            rules_path: None,
            require_login: true,
            reply_delay: Duration::from_millis(DEFAULT_REPLY_DELAY_MS),
            dispatch: None,
        }
    }
}

/// `~/.knowledge-hub`
pub fn default_data_dir() -> HubResult<PathBuf> {
    let home = dirs::home_dir().ok_or(HubError::NoHomeDir)?;
    Ok(home.join(DATA_DIR))
}

impl Config {
    /// Catalog from `catalog_path`, or the built-in one
    pub fn catalog(&self) -> HubResult<Catalog> {
        match &self.catalog_path {
            Some(path) => load_catalog(path),
            None => Ok(builtin_catalog()),
        }
    }

    /// Rule table from `rules_path`, or the built-in one
    pub fn recommender(&self) -> HubResult<Recommender> {
        match &self.rules_path {
            Some(path) => load_rules(path),
            None => Ok(BUILTIN_RECOMMENDER.clone()),
        }
    }

    pub fn log_summary(&self) {
        debug!(
            "Config: data_dir={:?} catalog={:?} rules={:?} require_login={} delay={:?} dispatch={}",
            self.data_dir,
            self.catalog_path,
            self.rules_path,
            self.require_login,
            self.reply_delay,
            self.dispatch.is_some()
        );
    }
}
