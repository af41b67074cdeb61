//! Service layer for peer components that sit beside the chat core.

pub mod chat_model;
