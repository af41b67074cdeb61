//! Auth gateway: credential checks and the session token lifecycle.

pub mod capability;
pub mod revocation;
pub mod service;
