//! Best-effort announcement of new submissions via GitHub `repository_dispatch`.
//!
//! Notification never fails a submission; the outcome is only reported back.

use crate::submission::Submission;
use serde_json::json;
use std::env;
use tracing::{debug, warn};

const GITHUB_API: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";
const DISPATCH_EVENT: &str = "tool_submission";

/// What happened to the notification for one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// No webhook configured
    Skipped,
    Delivered,
    /// Webhook rejected the request or was unreachable
    Failed(String),
}

impl NotifyOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, NotifyOutcome::Failed(_))
    }
}

pub trait Notifier {
    fn notify(&self, submission: &Submission) -> NotifyOutcome;
}

/// Used when dispatch is not configured
#[derive(Debug, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _submission: &Submission) -> NotifyOutcome {
        NotifyOutcome::Skipped
    }
}

/// Repository that receives `tool_submission` dispatch events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// API root, `https://api.github.com` unless overridden
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    pub token: String,
}

impl DispatchConfig {
    /// Only configured when owner, repo and token are all set and non-empty
    pub fn new(owner: Option<String>, repo: Option<String>, token: Option<String>) -> Option<Self> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Some(Self {
            api_base: GITHUB_API.to_string(),
            owner: non_empty(owner)?,
            repo: non_empty(repo)?,
            token: non_empty(token)?,
        })
    }

    /// Point at another API root (GitHub Enterprise, local test servers)
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// Read `GITHUB_OWNER`, `GITHUB_REPO` and `GITHUB_DISPATCH_TOKEN`;
    /// `GITHUB_API_URL` overrides the API root when set
    pub fn from_env() -> Option<Self> {
        let config = Self::new(
            env::var("GITHUB_OWNER").ok(),
            env::var("GITHUB_REPO").ok(),
            env::var("GITHUB_DISPATCH_TOKEN").ok(),
        )?;
        match env::var("GITHUB_API_URL") {
            Ok(base) if !base.trim().is_empty() => Some(config.with_api_base(base.trim())),
            _ => Some(config),
        }
    }

    pub fn dispatch_url(&self) -> String {
        format!("{}/repos/{}/{}/dispatches", self.api_base, self.owner, self.repo)
    }
}

/// Posts a `repository_dispatch` event per submission
#[derive(Debug)]
pub struct GithubDispatch {
    config: DispatchConfig,
}

impl GithubDispatch {
    pub fn new(config: DispatchConfig) -> Self {
        Self { config }
    }
}

/// Request body: `{"event_type": "tool_submission", "client_payload": <submission>}`
pub fn dispatch_payload(submission: &Submission) -> serde_json::Value {
    json!({
        "event_type": DISPATCH_EVENT,
        "client_payload": submission,
    })
}

impl Notifier for GithubDispatch {
    fn notify(&self, submission: &Submission) -> NotifyOutcome {
        let url = self.config.dispatch_url();
        debug!("Dispatching submission {} to {}", submission.id, url);

        let result = ureq::post(&url)
            .set("Accept", "application/vnd.github+json")
            .set("Authorization", &format!("Bearer {}", self.config.token))
            .set("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .send_json(dispatch_payload(submission));

        match result {
            Ok(response) => {
                debug!("Dispatch accepted with status {}", response.status());
                NotifyOutcome::Delivered
            }
            Err(ureq::Error::Status(code, _)) => {
                warn!("Dispatch rejected with status {}", code);
                NotifyOutcome::Failed(format!("HTTP {}", code))
            }
            Err(e) => {
                warn!("Dispatch failed: {}", e);
                NotifyOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Pick the notifier for an optional dispatch configuration
pub fn notifier_for(config: Option<DispatchConfig>) -> Box<dyn Notifier> {
    match config {
        Some(config) => Box::new(GithubDispatch::new(config)),
        None => Box::new(NoopNotifier),
    }
}
