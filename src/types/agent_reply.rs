use serde::{Deserialize, Serialize};

use crate::types::Source;

/// A successful answer from the agent service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentReply {
    /// The server-assigned thread identifier.
    pub thread_id: String,

    /// The assistant's answer.
    pub answer: String,

    /// Citations for the answer; absent and `null` both map to `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
}

impl AgentReply {
    /// Create a new `AgentReply` without sources.
    pub fn new(thread_id: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            answer: answer.into(),
            sources: None,
        }
    }

    /// Attach sources to the reply.
    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = Some(sources);
        self
    }
}

/// Body returned by the service health check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PingReply {
    /// Greeting reported by the service.
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reply_without_sources() {
        let reply: AgentReply =
            serde_json::from_value(json!({"thread_id": "t1", "answer": "Hi!"})).unwrap();
        assert_eq!(reply, AgentReply::new("t1", "Hi!"));
    }

    #[test]
    fn reply_with_null_sources() {
        let reply: AgentReply = serde_json::from_value(json!({
            "thread_id": "t1",
            "answer": "Hi!",
            "sources": null
        }))
        .unwrap();
        assert!(reply.sources.is_none());
    }

    #[test]
    fn reply_with_sources() {
        let reply: AgentReply = serde_json::from_value(json!({
            "thread_id": "t1",
            "answer": "See the code.",
            "sources": [
                {"title": "Doc", "url": "http://x", "description": "d", "keywords": "k"}
            ]
        }))
        .unwrap();
        let sources = reply.sources.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title, "Doc");
        assert_eq!(sources[0].url, "http://x");
    }

    #[test]
    fn reply_missing_answer_is_rejected() {
        let result = serde_json::from_value::<AgentReply>(json!({"thread_id": "t1"}));
        assert!(result.is_err());
    }

    #[test]
    fn ping_reply() {
        let reply: PingReply = serde_json::from_value(json!({"message": "AI Demo"})).unwrap();
        assert_eq!(reply.message, "AI Demo");
    }
}
