//! Conversation state for the recommendation assistant.

use crate::recommend::{Recommendation, Recommender};
use serde::Serialize;
use tracing::debug;

/// Lead-in text of every assistant reply
pub const REPLY_LEAD: &str = "根据您的需求，我推荐以下工具：";

/// One-click requests offered under the chat box
pub const QUICK_TAGS: [&str; 5] = [
    "写文案",
    "做 PPT",
    "查资料（带引用）",
    "画流程图",
    "AI生成视频",
];

/// Shown while the conversation is still empty
pub const EXAMPLE_QUESTIONS: [&str; 3] = [
    "我想找一个能做竞品分析并生成报告的工具",
    "帮我推荐适合团队协作的知识库工具",
    "有哪些 AI 工具可以帮助我提高写作效率？",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Recommendation>>,
}

/// Ordered history of user messages and assistant replies
#[derive(Debug, Default, Serialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Record `input` and the assistant's reply. Blank input is ignored.
    pub fn send(&mut self, input: &str, recommender: &Recommender) -> Option<&ChatMessage> {
        let content = input.trim();
        if content.is_empty() {
            debug!("Ignoring blank chat input");
            return None;
        }

        let user = ChatMessage {
            id: self.next_id(),
            role: Role::User,
            content: content.to_string(),
            recommendations: None,
        };
        self.messages.push(user);

        let reply = ChatMessage {
            id: self.next_id(),
            role: Role::Assistant,
            content: REPLY_LEAD.to_string(),
            recommendations: Some(recommender.recommend(content)),
        };
        self.messages.push(reply);

        self.messages.last()
    }

    fn next_id(&self) -> String {
        (self.messages.len() + 1).to_string()
    }
}
