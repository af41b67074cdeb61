//! Chat model registry service.
//!
//! Straight CRUD over upstream model endpoints. The single-default invariant
//! is enforced by the repository's write transaction; this layer validates
//! input and maps errors.

use parley_types::error::{ChatModelError, RepositoryError};
use parley_types::model::{ChatModel, CreateChatModelParams, UpdateChatModelParams};
use tracing::info;

use crate::repository::chat_model::ChatModelRepository;

pub struct ChatModelService<R: ChatModelRepository> {
    repo: R,
}

fn validate(name: &str, url: &str) -> Result<(), ChatModelError> {
    if name.trim().is_empty() {
        return Err(ChatModelError::Validation("name cannot be empty".to_string()));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ChatModelError::Validation(format!(
            "url must be http(s), got '{url}'"
        )));
    }
    Ok(())
}

fn map_write_error(name: &str) -> impl FnOnce(RepositoryError) -> ChatModelError + '_ {
    move |e| match e {
        RepositoryError::NotFound => ChatModelError::NotFound,
        RepositoryError::Conflict(_) => ChatModelError::Conflict(name.to_string()),
        other => ChatModelError::Storage(other.to_string()),
    }
}

fn storage(e: RepositoryError) -> ChatModelError {
    ChatModelError::Storage(e.to_string())
}

impl<R: ChatModelRepository> ChatModelService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create_chat_model(
        &self,
        params: &CreateChatModelParams,
    ) -> Result<ChatModel, ChatModelError> {
        validate(&params.name, &params.url)?;
        let model = self
            .repo
            .create(params)
            .await
            .map_err(map_write_error(&params.name))?;
        info!(name = %model.name, is_default = model.is_default, "Chat model registered");
        Ok(model)
    }

    pub async fn chat_model_by_id(&self, id: i32) -> Result<ChatModel, ChatModelError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(ChatModelError::NotFound)
    }

    pub async fn chat_model_by_name(&self, name: &str) -> Result<ChatModel, ChatModelError> {
        self.repo
            .get_by_name(name)
            .await
            .map_err(storage)?
            .ok_or(ChatModelError::NotFound)
    }

    pub async fn update_chat_model(
        &self,
        params: &UpdateChatModelParams,
    ) -> Result<ChatModel, ChatModelError> {
        validate(&params.name, &params.url)?;
        self.repo
            .update(params)
            .await
            .map_err(map_write_error(&params.name))
    }

    /// Rotate only the auth key of a model.
    pub async fn update_chat_model_key(
        &self,
        id: i32,
        api_auth_key: &str,
    ) -> Result<ChatModel, ChatModelError> {
        let model = self
            .repo
            .update_key(id, api_auth_key)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ChatModelError::NotFound,
                other => storage(other),
            })?;
        info!(name = %model.name, key = %model.masked_key(), "Chat model key rotated");
        Ok(model)
    }

    pub async fn delete_chat_model(&self, id: i32) -> Result<(), ChatModelError> {
        self.repo.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => ChatModelError::NotFound,
            other => storage(other),
        })
    }

    /// All models ordered by id.
    pub async fn list_chat_models(&self) -> Result<Vec<ChatModel>, ChatModelError> {
        self.repo.list().await.map_err(storage)
    }

    pub async fn get_default_chat_model(&self) -> Result<ChatModel, ChatModelError> {
        self.repo
            .get_default()
            .await
            .map_err(storage)?
            .ok_or(ChatModelError::NotFound)
    }

    /// Mark one model as the default, clearing the flag everywhere else.
    pub async fn set_default_chat_model(&self, name: &str) -> Result<ChatModel, ChatModelError> {
        let model = self.chat_model_by_name(name).await?;
        self.update_chat_model(&UpdateChatModelParams {
            id: model.id,
            name: model.name,
            label: model.label,
            is_default: true,
            url: model.url,
            api_auth_header: model.api_auth_header,
            api_auth_key: model.api_auth_key,
        })
        .await
    }
}
