use serde::{Deserialize, Serialize};

/// One turn of conversation, in the wire format the completion API expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl ChatMessage {
    pub fn system(content: String) -> Self {
        ChatMessage { role: Role::System, content }
    }

    pub fn user(content: String) -> Self {
        ChatMessage { role: Role::User, content }
    }

    pub fn assistant(content: String) -> Self {
        ChatMessage { role: Role::Assistant, content }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = ChatMessage::user("hi".to_string());
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hi");
    }
}
