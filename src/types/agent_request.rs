use serde::{Deserialize, Serialize};

/// Body of a POST to the agent endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentRequest {
    /// The raw user text.
    pub message: String,
}

impl AgentRequest {
    /// Create a new `AgentRequest`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn request_serialization() {
        let request = AgentRequest::new("Hello");
        assert_eq!(to_value(&request).unwrap(), json!({"message": "Hello"}));
    }
}
