//! Conversion of stored prompts and messages into display bubbles.
//!
//! Prompts and messages render with different timestamp formats: prompts
//! carry an AM/PM suffix after a 24-hour clock, messages do not. The web
//! client keys off both shapes, so they stay as they are.

use parley_types::chat::{ChatMessage, ChatPrompt, MessageRole};
use parley_types::error::ChatError;
use parley_types::history::{RequestOption, SimpleChatMessage};

/// Display format for prompt timestamps, e.g. `2024-03-01 14:05:09PM`.
pub const PROMPT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%p";

/// Display format for message timestamps, e.g. `2024-03-01 14:05:09`.
pub const MESSAGE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A validated page request.
///
/// The store offset is `number - 1` rows, NOT `(number - 1) * size`: page 2
/// skips a single row. Clients depend on this windowing, so it is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: i32,
    size: i32,
}

impl Page {
    /// Validate a 1-based page number and a positive page size.
    pub fn new(number: i32, size: i32) -> Result<Self, ChatError> {
        if number < 1 {
            return Err(ChatError::Validation(format!(
                "page number must be >= 1, got {number}"
            )));
        }
        if size < 1 {
            return Err(ChatError::Validation(format!(
                "page size must be >= 1, got {size}"
            )));
        }
        Ok(Self { number, size })
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Rows to skip in the store.
    pub fn offset(&self) -> i64 {
        i64::from(self.number) - 1
    }

    /// Rows to take from the store.
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

/// Render the prompt at position `index` of its session.
///
/// Inversion alternates by position (even index renders as user-authored)
/// regardless of the prompt's actual role.
pub fn prompt_to_simple(prompt: &ChatPrompt, index: usize) -> SimpleChatMessage {
    SimpleChatMessage {
        uuid: prompt.uuid.clone(),
        date_time: prompt.updated_at.format(PROMPT_TIME_FORMAT).to_string(),
        text: prompt.content.clone(),
        inversion: index % 2 == 0,
        error: false,
        loading: false,
        is_prompt: true,
        request_options: RequestOption {
            prompt: prompt.content.clone(),
            options: None,
        },
    }
}

/// Render a conversational message. Only user turns are inverted.
pub fn message_to_simple(message: &ChatMessage) -> SimpleChatMessage {
    SimpleChatMessage {
        uuid: message.uuid.clone(),
        date_time: message.updated_at.format(MESSAGE_TIME_FORMAT).to_string(),
        text: message.content.clone(),
        inversion: message.role == MessageRole::User,
        error: false,
        loading: false,
        is_prompt: false,
        request_options: RequestOption {
            prompt: message.content.clone(),
            options: None,
        },
    }
}

/// Prompts block first, then the message page. Not chronological across the
/// boundary.
pub fn merge_history(prompts: &[ChatPrompt], messages: &[ChatMessage]) -> Vec<SimpleChatMessage> {
    let mut merged = Vec::with_capacity(prompts.len() + messages.len());
    merged.extend(
        prompts
            .iter()
            .enumerate()
            .map(|(idx, prompt)| prompt_to_simple(prompt, idx)),
    );
    merged.extend(messages.iter().map(message_to_simple));
    merged
}
