//! Shared domain types for Parley.
//!
//! This crate contains the domain types used across the Parley chat backend:
//! chat sessions, messages, prompts, the merged history view, auth users,
//! chat model records, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
