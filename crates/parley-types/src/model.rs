//! Chat model registry records.
//!
//! A chat model describes an upstream completion endpoint and how to
//! authenticate against it.

use serde::{Deserialize, Serialize};

/// A configured upstream chat model endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatModel {
    pub id: i32,
    pub name: String,
    pub label: String,
    pub is_default: bool,
    pub url: String,
    pub api_auth_header: String,
    pub api_auth_key: String,
}

impl ChatModel {
    /// The auth key with everything but the last four characters masked.
    pub fn masked_key(&self) -> String {
        let chars: Vec<char> = self.api_auth_key.chars().collect();
        if chars.len() <= 4 {
            "****".to_string()
        } else {
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("****{tail}")
        }
    }
}

/// Insert parameters for a chat model.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChatModelParams {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub is_default: bool,
    pub url: String,
    #[serde(default)]
    pub api_auth_header: String,
    #[serde(default)]
    pub api_auth_key: String,
}

/// Full update of a chat model addressed by id.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateChatModelParams {
    pub id: i32,
    pub name: String,
    pub label: String,
    pub is_default: bool,
    pub url: String,
    pub api_auth_header: String,
    pub api_auth_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(key: &str) -> ChatModel {
        ChatModel {
            id: 1,
            name: "gpt-4o".to_string(),
            label: "GPT-4o".to_string(),
            is_default: true,
            url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_auth_header: "Authorization".to_string(),
            api_auth_key: key.to_string(),
        }
    }

    #[test]
    fn test_masked_key() {
        assert_eq!(model("sk-abcdef1234").masked_key(), "****1234");
        assert_eq!(model("abc").masked_key(), "****");
    }
}
