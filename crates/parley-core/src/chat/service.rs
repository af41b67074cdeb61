//! Chat message service: message CRUD and history assembly.
//!
//! `ChatMessageService` wraps the message and prompt repositories. Every store
//! failure is returned as `ChatError::Storage` with a context string naming
//! the operation; nothing is retried or swallowed here.

use parley_types::chat::{
    ChatMessage, CreateChatMessageParams, MessageRole, UpdateChatMessageByUuidParams,
    UpdateChatMessageParams,
};
use parley_types::error::{ChatError, RepositoryError};
use parley_types::history::SimpleChatMessage;
use tracing::{debug, info};

use crate::chat::history::{Page, merge_history};
use crate::repository::message::ChatMessageRepository;
use crate::repository::prompt::ChatPromptRepository;

/// Orchestrates message persistence and the merged history view.
///
/// Generic over the repositories to maintain clean architecture
/// (parley-core never depends on parley-infra).
pub struct ChatMessageService<M: ChatMessageRepository, P: ChatPromptRepository> {
    messages: M,
    prompts: P,
}

fn require_session_uuid(session_uuid: &str) -> Result<(), ChatError> {
    if session_uuid.trim().is_empty() {
        return Err(ChatError::Validation(
            "session uuid must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn require_positive(name: &str, value: i32) -> Result<(), ChatError> {
    if value < 1 {
        return Err(ChatError::Validation(format!(
            "{name} must be >= 1, got {value}"
        )));
    }
    Ok(())
}

/// Map a repository error from a write that targets one row.
fn not_found_or_storage(entity: String, context: &str) -> impl FnOnce(RepositoryError) -> ChatError + '_ {
    move |e| match e {
        RepositoryError::NotFound => ChatError::NotFound(entity),
        other => ChatError::storage(context)(other),
    }
}

impl<M: ChatMessageRepository, P: ChatPromptRepository> ChatMessageService<M, P> {
    pub fn new(messages: M, prompts: P) -> Self {
        Self { messages, prompts }
    }

    /// Access the message repository.
    pub fn message_repo(&self) -> &M {
        &self.messages
    }

    // --- History assembly ---

    /// Assemble the display history of a session.
    ///
    /// Fetches every prompt of the session (unpaginated) and one page of
    /// messages, renders both, and returns the prompts block followed by the
    /// messages block. Read-only; identical store state yields identical output.
    pub async fn get_chat_history_by_session(
        &self,
        session_uuid: &str,
        page_num: i32,
        page_size: i32,
    ) -> Result<Vec<SimpleChatMessage>, ChatError> {
        require_session_uuid(session_uuid)?;
        let page = Page::new(page_num, page_size)?;

        let prompts = self
            .prompts
            .list_by_session_uuid(session_uuid)
            .await
            .map_err(ChatError::storage("fail to get prompt"))?;

        let messages = self
            .messages
            .list_by_session_uuid(session_uuid, page.offset(), page.limit())
            .await
            .map_err(ChatError::storage("fail to get message"))?;

        debug!(
            session_uuid = %session_uuid,
            page = page.number(),
            prompts = prompts.len(),
            messages = messages.len(),
            "Assembled chat history"
        );

        Ok(merge_history(&prompts, &messages))
    }

    /// One raw page of a session's messages (offset = page number - 1).
    pub async fn get_chat_messages_by_session(
        &self,
        session_uuid: &str,
        page_num: i32,
        page_size: i32,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        require_session_uuid(session_uuid)?;
        let page = Page::new(page_num, page_size)?;

        self.messages
            .list_by_session_uuid(session_uuid, page.offset(), page.limit())
            .await
            .map_err(ChatError::storage("failed to retrieve message"))
    }

    /// The `limit` most recent messages of a session, oldest first.
    pub async fn get_latest_messages_by_session(
        &self,
        session_uuid: &str,
        limit: i32,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        require_session_uuid(session_uuid)?;
        require_positive("limit", limit)?;

        self.messages
            .latest_by_session_uuid(session_uuid, i64::from(limit))
            .await
            .map_err(ChatError::storage("failed to retrieve latest messages"))
    }

    /// The last `n` messages of a session plus pinned ones, oldest first.
    pub async fn get_last_n_chat_messages(
        &self,
        session_uuid: &str,
        n: i32,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        require_session_uuid(session_uuid)?;
        require_positive("n", n)?;

        self.messages
            .last_n_by_session_uuid(session_uuid, i64::from(n))
            .await
            .map_err(ChatError::storage("failed to retrieve newest message"))
    }

    /// The earliest message of a session.
    pub async fn get_first_message_by_session(
        &self,
        session_uuid: &str,
    ) -> Result<ChatMessage, ChatError> {
        require_session_uuid(session_uuid)?;

        self.messages
            .first_by_session_uuid(session_uuid)
            .await
            .map_err(ChatError::storage("failed to retrieve first message"))?
            .ok_or_else(|| ChatError::NotFound(format!("first message of session {session_uuid}")))
    }

    /// Total messages across the sessions a user owns.
    pub async fn get_chat_messages_count(&self, user_id: i32) -> Result<i64, ChatError> {
        self.messages
            .count_by_user(user_id)
            .await
            .map_err(ChatError::storage("failed to count messages"))
    }

    // --- Message CRUD ---

    pub async fn create_chat_message(
        &self,
        params: &CreateChatMessageParams,
    ) -> Result<ChatMessage, ChatError> {
        let message = self
            .messages
            .create(params)
            .await
            .map_err(ChatError::storage("failed to create message"))?;
        debug!(uuid = %message.uuid, session_uuid = %message.chat_session_uuid, "Message created");
        Ok(message)
    }

    /// Append a turn to a session.
    pub async fn add_message(
        &self,
        session_uuid: &str,
        uuid: &str,
        role: MessageRole,
        content: &str,
        raw: serde_json::Value,
    ) -> Result<ChatMessage, ChatError> {
        require_session_uuid(session_uuid)?;
        let params = CreateChatMessageParams {
            chat_session_uuid: session_uuid.to_string(),
            uuid: uuid.to_string(),
            role,
            content: content.to_string(),
            raw,
            token_count: 0,
        };
        self.create_chat_message(&params).await
    }

    pub async fn get_chat_message_by_id(&self, id: i32) -> Result<ChatMessage, ChatError> {
        self.messages
            .get_by_id(id)
            .await
            .map_err(ChatError::storage("failed to retrieve message"))?
            .ok_or_else(|| ChatError::NotFound(format!("chat message {id}")))
    }

    pub async fn get_chat_message_by_uuid(&self, uuid: &str) -> Result<ChatMessage, ChatError> {
        self.messages
            .get_by_uuid(uuid)
            .await
            .map_err(ChatError::storage("failed to retrieve message"))?
            .ok_or_else(|| ChatError::NotFound(format!("chat message {uuid}")))
    }

    pub async fn get_all_chat_messages(&self) -> Result<Vec<ChatMessage>, ChatError> {
        self.messages
            .list_all()
            .await
            .map_err(ChatError::storage("failed to retrieve messages"))
    }

    pub async fn update_chat_message(
        &self,
        params: &UpdateChatMessageParams,
    ) -> Result<ChatMessage, ChatError> {
        self.messages
            .update(params)
            .await
            .map_err(not_found_or_storage(
                format!("chat message {}", params.id),
                "failed to update message",
            ))
    }

    pub async fn update_chat_message_by_uuid(
        &self,
        params: &UpdateChatMessageByUuidParams,
    ) -> Result<ChatMessage, ChatError> {
        self.messages
            .update_by_uuid(params)
            .await
            .map_err(not_found_or_storage(
                format!("chat message {}", params.uuid),
                "failed to update message",
            ))
    }

    pub async fn delete_chat_message(&self, id: i32) -> Result<(), ChatError> {
        self.messages
            .delete(id)
            .await
            .map_err(not_found_or_storage(
                format!("chat message {id}"),
                "failed to delete message",
            ))
    }

    pub async fn delete_chat_message_by_uuid(&self, uuid: &str) -> Result<(), ChatError> {
        self.messages
            .delete_by_uuid(uuid)
            .await
            .map_err(not_found_or_storage(
                format!("chat message {uuid}"),
                "failed to delete message",
            ))
    }

    /// Remove every message of a session. Returns the number removed.
    pub async fn delete_chat_messages_by_session(
        &self,
        session_uuid: &str,
    ) -> Result<u64, ChatError> {
        require_session_uuid(session_uuid)?;
        let removed = self
            .messages
            .delete_by_session_uuid(session_uuid)
            .await
            .map_err(ChatError::storage("failed to delete session messages"))?;
        info!(session_uuid = %session_uuid, removed, "Session messages deleted");
        Ok(removed)
    }
}
