//! Business logic and repository trait definitions for Parley.
//!
//! This crate defines the "ports" (repository and capability traits) that the
//! infrastructure layer implements, plus the services built on them: history
//! assembly, the auth gateway, and the chat model registry. It depends only on
//! `parley-types` -- never on `parley-infra` or any database/IO crate.

pub mod auth;
pub mod chat;
pub mod repository;
pub mod service;
