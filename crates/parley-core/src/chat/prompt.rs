//! Chat prompt service.

use parley_types::chat::{ChatPrompt, CreateChatPromptParams, UpdateChatPromptByUuidParams};
use parley_types::error::{ChatError, RepositoryError};
use tracing::debug;

use crate::repository::prompt::ChatPromptRepository;

/// CRUD over session-level prompts.
pub struct ChatPromptService<P: ChatPromptRepository> {
    repo: P,
}

impl<P: ChatPromptRepository> ChatPromptService<P> {
    pub fn new(repo: P) -> Self {
        Self { repo }
    }

    pub async fn create_chat_prompt(
        &self,
        params: &CreateChatPromptParams,
    ) -> Result<ChatPrompt, ChatError> {
        if params.chat_session_uuid.trim().is_empty() {
            return Err(ChatError::Validation(
                "session uuid must not be empty".to_string(),
            ));
        }
        let prompt = self
            .repo
            .create(params)
            .await
            .map_err(ChatError::storage("failed to create prompt"))?;
        debug!(uuid = %prompt.uuid, session_uuid = %prompt.chat_session_uuid, "Prompt created");
        Ok(prompt)
    }

    pub async fn get_chat_prompt_by_id(&self, id: i32) -> Result<ChatPrompt, ChatError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(ChatError::storage("failed to retrieve prompt"))?
            .ok_or_else(|| ChatError::NotFound(format!("chat prompt {id}")))
    }

    pub async fn get_chat_prompt_by_uuid(&self, uuid: &str) -> Result<ChatPrompt, ChatError> {
        self.repo
            .get_by_uuid(uuid)
            .await
            .map_err(ChatError::storage("failed to retrieve prompt"))?
            .ok_or_else(|| ChatError::NotFound(format!("chat prompt {uuid}")))
    }

    pub async fn update_chat_prompt_by_uuid(
        &self,
        params: &UpdateChatPromptByUuidParams,
    ) -> Result<ChatPrompt, ChatError> {
        self.repo.update_by_uuid(params).await.map_err(|e| match e {
            RepositoryError::NotFound => ChatError::NotFound(format!("chat prompt {}", params.uuid)),
            other => ChatError::storage("failed to update prompt")(other),
        })
    }

    pub async fn delete_chat_prompt_by_uuid(&self, uuid: &str) -> Result<(), ChatError> {
        self.repo.delete_by_uuid(uuid).await.map_err(|e| match e {
            RepositoryError::NotFound => ChatError::NotFound(format!("chat prompt {uuid}")),
            other => ChatError::storage("failed to delete prompt")(other),
        })
    }

    /// Every prompt of a session, in natural order.
    pub async fn get_chat_prompts_by_session_uuid(
        &self,
        session_uuid: &str,
    ) -> Result<Vec<ChatPrompt>, ChatError> {
        self.repo
            .list_by_session_uuid(session_uuid)
            .await
            .map_err(ChatError::storage("fail to get prompt"))
    }

    pub async fn get_all_chat_prompts(&self) -> Result<Vec<ChatPrompt>, ChatError> {
        self.repo
            .list_all()
            .await
            .map_err(ChatError::storage("failed to retrieve prompts"))
    }
}
