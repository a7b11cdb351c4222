//! Keyword-triggered recommendations for the chat assistant.
//!
//! A [`Recommender`] owns an ordered rule table. Every rule whose keywords
//! occur in the lower-cased message contributes its recommendation, in table
//! order. When nothing fires, the fixed fallback sequence is returned instead,
//! so a result is never empty.
//!
//! Keyword checks are plain substring containment: "ai" also fires inside
//! "email" or "detail".

use crate::error::{HubError, HubResult};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

// ============================================================================
// Rule Types
// ============================================================================

/// A suggested tool returned to the conversational caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub url: String,
    /// Why this tool fits the request
    pub reason: String,
}

impl Recommendation {
    pub fn new(name: &str, url: &str, reason: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Trigger keywords mapped to one recommendation.
///
/// Fires when the message contains ANY keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keywords: Vec<String>,
    pub recommendation: Recommendation,
}

impl KeywordRule {
    pub fn new(keywords: &[&str], recommendation: Recommendation) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            recommendation,
        }
    }

    /// `lowered` must already be lower-cased
    fn fires(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| {
            let kw_lower = keyword.to_lowercase();
            !kw_lower.is_empty() && lowered.contains(&kw_lower)
        })
    }
}

/// Serializable form of a rule table (`--rules` file)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    /// Evaluated in this order
    pub rules: Vec<KeywordRule>,

    /// Returned when no rule fires
    pub fallback: Vec<Recommendation>,
}

// ============================================================================
// Recommender
// ============================================================================

/// Immutable rule table plus fallback, evaluated per message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommender {
    rules: Vec<KeywordRule>,
    fallback: Vec<Recommendation>,
}

impl Recommender {
    /// Fails with [`HubError::EmptyFallback`] if `fallback` is empty
    pub fn new(rules: Vec<KeywordRule>, fallback: Vec<Recommendation>) -> HubResult<Self> {
        if fallback.is_empty() {
            return Err(HubError::EmptyFallback);
        }
        Ok(Self { rules, fallback })
    }

    pub fn from_table(table: RuleTable) -> HubResult<Self> {
        Self::new(table.rules, table.fallback)
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &[Recommendation] {
        &self.fallback
    }

    /// Recommendations for `message`: every firing rule in table order, or
    /// the fallback sequence when none fire. Never empty.
    pub fn recommend(&self, message: &str) -> Vec<Recommendation> {
        let lowered = message.to_lowercase();

        let fired: Vec<Recommendation> = self
            .rules
            .iter()
            .filter(|rule| rule.fires(&lowered))
            .map(|rule| rule.recommendation.clone())
            .collect();

        if fired.is_empty() {
            debug!("No keyword rule fired, using {} fallback(s)", self.fallback.len());
            return self.fallback.clone();
        }

        debug!("{} keyword rule(s) fired", fired.len());
        fired
    }
}

/// Load a rule table from JSON (`{"rules": [...], "fallback": [...]}`)
pub fn load_rules(path: &Path) -> HubResult<Recommender> {
    let content = fs::read_to_string(path).map_err(|e| HubError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let table: RuleTable = serde_json::from_str(&content).map_err(|e| HubError::FileParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    debug!("Loaded {} keyword rules from {:?}", table.rules.len(), path);
    Recommender::from_table(table)
}

// ============================================================================
// Built-in Table
// ============================================================================

lazy_static! {
    /// The assistant's shipped rule table
    pub static ref BUILTIN_RECOMMENDER: Recommender = Recommender {
        rules: builtin_rules(),
        fallback: builtin_fallback(),
    };
}

/// Research, knowledge base, writing, diagrams, design, imagery, automation
pub fn builtin_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new(
            &["资料", "查询", "搜索", "引用"],
            Recommendation::new(
                "Perplexity",
                "https://www.perplexity.ai",
                "适合查资料并自动附带引用来源",
            ),
        ),
        KeywordRule::new(
            &["知识库", "协作", "团队", "文档"],
            Recommendation::new("Notion", "https://www.notion.so", "适合搭建个人或团队知识库"),
        ),
        KeywordRule::new(
            &["写作", "文案", "ai", "问答", "竞品", "报告"],
            Recommendation::new("ChatGPT", "https://chat.openai.com", "适合需求拆解与方案生成"),
        ),
        KeywordRule::new(
            &["流程图", "图表", "画"],
            Recommendation::new(
                "Excalidraw",
                "https://excalidraw.com",
                "适合快速绘制手绘风流程图",
            ),
        ),
        KeywordRule::new(
            &["设计", "ppt", "海报"],
            Recommendation::new(
                "Canva",
                "https://www.canva.com",
                "适合快速制作演示文稿与视觉设计",
            ),
        ),
        KeywordRule::new(
            &["图片", "图像", "创意"],
            Recommendation::new(
                "Midjourney",
                "https://www.midjourney.com",
                "适合 AI 图像生成与创意探索",
            ),
        ),
        KeywordRule::new(
            &["自动化", "工作流"],
            Recommendation::new("Manus", "https://manus.im/app", "manus是一个自动化工具流程。"),
        ),
    ]
}

pub fn builtin_fallback() -> Vec<Recommendation> {
    vec![
        Recommendation::new(
            "ChatGPT",
            "https://chat.openai.com",
            "通用型 AI 助手，适合各类问答与写作需求",
        ),
        Recommendation::new("Sora", "https://sora.chatgpt.com/explore", "AI生成视频的工具"),
    ]
}

// ============================================================================
// Tests
// ============================================================================
