//! HTTP request handlers for the REST API.

pub mod auth;
pub mod chat_model;
pub mod history;
