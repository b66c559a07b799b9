//! Serialized project amends

pub mod service;

pub use service::{AmendFuture, AmendService, TARGET_DELIMITER};
