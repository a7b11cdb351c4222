//! User-proposed catalog entries: drafting, validation and the local queue.

use crate::catalog::EntryKind;
use crate::error::{HubError, HubResult};
use crate::notify::{Notifier, NotifyOutcome};
use crate::storage::{KvStore, SUBMISSIONS_KEY};
use chrono::{DateTime, SecondsFormat, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

lazy_static! {
    static ref RE_HTTP_URL: Regex = Regex::new(r"(?i)^https?://[^\s/?#]+[^\s]*$").unwrap();
}

pub const THANKS_MESSAGE: &str = "提交成功！感谢您的贡献，我们会尽快审核。";
pub const NOTIFY_FAILED_MESSAGE: &str = "提交成功！但消息通知失败，请稍后再试或联系管理员。";

// ============================================================================
// Types
// ============================================================================

/// A queued submission (camelCase JSON, also the dispatch payload)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Unix milliseconds at submission time
    pub id: String,
    pub category: EntryKind,
    pub tool_name: String,
    pub website: String,
    pub description: String,
    /// Only populated for tools
    #[serde(default)]
    pub tags: Vec<String>,
    /// Only populated for AI apps
    #[serde(default)]
    pub scenarios: Vec<String>,
    pub submitter: String,
    /// RFC 3339, UTC, millisecond precision
    pub submitted_at: String,
}

/// Form state before submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionDraft {
    pub category: EntryKind,
    pub tool_name: String,
    pub website: String,
    pub description: String,
    tags: Vec<String>,
    scenarios: Vec<String>,
}

impl Default for SubmissionDraft {
    fn default() -> Self {
        Self::new(EntryKind::Tool)
    }
}

/// Trimmed, non-blank, not already present
fn push_label(labels: &mut Vec<String>, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || labels.iter().any(|l| l == value) {
        return false;
    }
    labels.push(value.to_string());
    true
}

fn drop_label(labels: &mut Vec<String>, value: &str) -> bool {
    let before = labels.len();
    labels.retain(|l| l != value);
    labels.len() != before
}

fn required(value: &str, field: &'static str) -> HubResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(HubError::MissingField(field));
    }
    Ok(value.to_string())
}

impl SubmissionDraft {
    pub fn new(category: EntryKind) -> Self {
        Self {
            category,
            tool_name: String::new(),
            website: String::new(),
            description: String::new(),
            tags: Vec::new(),
            scenarios: Vec::new(),
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn scenarios(&self) -> &[String] {
        &self.scenarios
    }

    pub fn add_tag(&mut self, tag: &str) -> bool {
        push_label(&mut self.tags, tag)
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        drop_label(&mut self.tags, tag)
    }

    pub fn add_scenario(&mut self, scenario: &str) -> bool {
        push_label(&mut self.scenarios, scenario)
    }

    pub fn remove_scenario(&mut self, scenario: &str) -> bool {
        drop_label(&mut self.scenarios, scenario)
    }

    /// Validate and stamp the draft. Labels of the other category are dropped.
    pub fn finalize(&self, submitter: &str, now: DateTime<Utc>) -> HubResult<Submission> {
        let tool_name = required(&self.tool_name, "toolName")?;
        let website = required(&self.website, "website")?;
        let description = required(&self.description, "description")?;

        if !RE_HTTP_URL.is_match(&website) {
            return Err(HubError::InvalidUrl(website));
        }
        if self.category == EntryKind::AiApp && self.scenarios.is_empty() {
            return Err(HubError::MissingField("scenarios"));
        }

        let (tags, scenarios) = match self.category {
            EntryKind::Tool => (self.tags.clone(), Vec::new()),
            EntryKind::AiApp => (Vec::new(), self.scenarios.clone()),
        };

        Ok(Submission {
            id: now.timestamp_millis().to_string(),
            category: self.category,
            tool_name,
            website,
            description,
            tags,
            scenarios,
            submitter: submitter.to_string(),
            submitted_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }
}

// ============================================================================
// Queue
// ============================================================================

/// Submissions queued in the local store, oldest first
pub fn queued(store: &dyn KvStore) -> HubResult<Vec<Submission>> {
    match store.get(SUBMISSIONS_KEY) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value).map_err(|e| HubError::StoreFormat {
            key: SUBMISSIONS_KEY.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Append to the queue
pub fn enqueue(store: &mut dyn KvStore, submission: &Submission) -> HubResult<usize> {
    let mut all = queued(store)?;
    all.push(submission.clone());
    store.set(SUBMISSIONS_KEY, serde_json::to_value(&all)?)?;
    debug!("Queued submission {} ({} pending)", submission.id, all.len());
    Ok(all.len())
}

// ============================================================================
// Submit
// ============================================================================

/// Result of a submission: it is always queued, notification may have failed
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    pub submission: Submission,
    pub notification: NotifyOutcome,
}

impl SubmitReceipt {
    pub fn message(&self) -> &'static str {
        if self.notification.is_failure() {
            NOTIFY_FAILED_MESSAGE
        } else {
            THANKS_MESSAGE
        }
    }
}

/// Finalize the draft, queue it locally, then notify
pub fn submit(
    store: &mut dyn KvStore,
    notifier: &dyn Notifier,
    draft: &SubmissionDraft,
    submitter: &str,
) -> HubResult<SubmitReceipt> {
    submit_at(store, notifier, draft, submitter, Utc::now())
}

pub fn submit_at(
    store: &mut dyn KvStore,
    notifier: &dyn Notifier,
    draft: &SubmissionDraft,
    submitter: &str,
    now: DateTime<Utc>,
) -> HubResult<SubmitReceipt> {
    let submission = draft.finalize(submitter, now)?;
    enqueue(store, &submission)?;

    let notification = notifier.notify(&submission);
    info!(
        "Submitted {} '{}' by {} (notification: {:?})",
        submission.category.as_str(),
        submission.tool_name,
        submitter,
        notification
    );

    Ok(SubmitReceipt {
        submission,
        notification,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoopNotifier;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;
    use serde_json::json;

    struct FailingNotifier;

    impl Notifier for FailingNotifier {
        fn notify(&self, _submission: &Submission) -> NotifyOutcome {
            NotifyOutcome::Failed("HTTP 401".to_string())
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 18, 8, 30, 0).unwrap()
    }

    fn tool_draft() -> SubmissionDraft {
        let mut draft = SubmissionDraft::new(EntryKind::Tool);
        draft.tool_name = "  Excalidraw ".to_string();
        draft.website = "https://excalidraw.com".to_string();
        draft.description = "手绘风流程图".to_string();
        draft.add_tag("流程图");
        draft
    }

    #[test]
    fn test_labels_are_trimmed_and_deduplicated() {
        let mut draft = SubmissionDraft::default();
        assert!(draft.add_tag(" 设计 "));
        assert!(!draft.add_tag("设计"));
        assert!(!draft.add_tag("   "));
        assert!(draft.add_tag("效率"));
        assert_eq!(draft.tags(), ["设计", "效率"]);

        assert!(draft.remove_tag("设计"));
        assert!(!draft.remove_tag("设计"));
        assert_eq!(draft.tags(), ["效率"]);
    }

    #[test]
    fn test_finalize_stamps_and_trims() {
        let submission = tool_draft().finalize("alice", fixed_now()).unwrap();
        assert_eq!(submission.tool_name, "Excalidraw");
        assert_eq!(submission.submitter, "alice");
        assert_eq!(submission.submitted_at, "2026-01-18T08:30:00.000Z");
        assert_eq!(submission.id, fixed_now().timestamp_millis().to_string());
        assert_eq!(submission.tags, vec!["流程图"]);
    }

    #[test]
    fn test_finalize_keeps_only_category_labels() {
        let mut draft = tool_draft();
        draft.add_scenario("写作");
        let tool = draft.finalize("alice", fixed_now()).unwrap();
        assert!(tool.scenarios.is_empty());

        draft.category = EntryKind::AiApp;
        let app = draft.finalize("alice", fixed_now()).unwrap();
        assert!(app.tags.is_empty());
        assert_eq!(app.scenarios, vec!["写作"]);
    }

    #[test]
    fn test_finalize_requires_fields() {
        let mut draft = tool_draft();
        draft.description = "  ".to_string();
        assert!(matches!(
            draft.finalize("alice", fixed_now()),
            Err(HubError::MissingField("description"))
        ));

        let mut draft = tool_draft();
        draft.tool_name.clear();
        assert!(matches!(
            draft.finalize("alice", fixed_now()),
            Err(HubError::MissingField("toolName"))
        ));
    }

    #[test]
    fn test_ai_app_needs_a_scenario() {
        let mut draft = tool_draft();
        draft.category = EntryKind::AiApp;
        assert!(matches!(
            draft.finalize("alice", fixed_now()),
            Err(HubError::MissingField("scenarios"))
        ));

        // tags do not count for AI apps
        assert!(!draft.tags().is_empty());
        assert!(draft.add_scenario("研究"));
        assert!(draft.finalize("alice", fixed_now()).is_ok());

        // tools never need scenarios
        draft.category = EntryKind::Tool;
        draft.remove_scenario("研究");
        assert!(draft.finalize("alice", fixed_now()).is_ok());
    }

    #[test]
    fn test_finalize_rejects_bad_urls() {
        for bad in ["excalidraw.com", "ftp://x.org", "https://", "https://exa mple.com"] {
            let mut draft = tool_draft();
            draft.website = bad.to_string();
            assert!(
                matches!(draft.finalize("a", fixed_now()), Err(HubError::InvalidUrl(_))),
                "{bad} should be rejected"
            );
        }
        let mut draft = tool_draft();
        draft.website = "HTTP://Example.com/path?q=1".to_string();
        assert!(draft.finalize("a", fixed_now()).is_ok());
    }

    #[test]
    fn test_submission_json_shape() {
        let submission = tool_draft().finalize("alice", fixed_now()).unwrap();
        let value = serde_json::to_value(&submission).unwrap();
        assert_eq!(value["toolName"], "Excalidraw");
        assert_eq!(value["category"], "tool");
        assert_eq!(value["submittedAt"], "2026-01-18T08:30:00.000Z");
        assert_eq!(value["scenarios"], json!([]));
    }

    #[test]
    fn test_submit_queues_in_order() {
        let mut store = MemoryStore::default();
        let first = submit_at(&mut store, &NoopNotifier, &tool_draft(), "alice", fixed_now())
            .unwrap();
        assert_eq!(first.notification, NotifyOutcome::Skipped);
        assert_eq!(first.message(), THANKS_MESSAGE);

        let mut second = SubmissionDraft::new(EntryKind::AiApp);
        second.tool_name = "Perplexity".to_string();
        second.website = "https://www.perplexity.ai".to_string();
        second.description = "带引用的 AI 搜索".to_string();
        second.add_scenario("研究");
        submit(&mut store, &NoopNotifier, &second, "bob").unwrap();

        let all = queued(&store).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], first.submission);
        assert_eq!(all[1].tool_name, "Perplexity");
        assert_eq!(all[1].category, EntryKind::AiApp);
    }

    #[test]
    fn test_failed_notification_still_queues() {
        let mut store = MemoryStore::default();
        let receipt =
            submit_at(&mut store, &FailingNotifier, &tool_draft(), "alice", fixed_now()).unwrap();
        assert!(receipt.notification.is_failure());
        assert_eq!(receipt.message(), NOTIFY_FAILED_MESSAGE);
        assert_eq!(queued(&store).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_draft_is_not_queued() {
        let mut store = MemoryStore::default();
        let mut draft = tool_draft();
        draft.website = "nope".to_string();
        assert!(submit(&mut store, &NoopNotifier, &draft, "alice").is_err());
        assert!(queued(&store).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_queue_reported() {
        let mut store = MemoryStore::default();
        store.set(SUBMISSIONS_KEY, json!({"not": "an array"})).unwrap();
        assert!(matches!(queued(&store), Err(HubError::StoreFormat { .. })));
        assert!(enqueue(&mut store, &tool_draft().finalize("a", fixed_now()).unwrap()).is_err());
    }
}
