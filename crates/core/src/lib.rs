//! pantsbridge - IDE-side engine for Pants workspaces
//!
//! This crate provides functionality to:
//! - Parse and validate Pants target specs against the targets a workspace declares
//! - Memoize `pants list` queries so concurrent lookups share one subprocess
//! - Build a dependency graph from `pants export` output and slice it by depth
//! - Amend an imported fastpass/BSP project, one amend at a time
pub mod address;
pub mod amend;
pub mod bsp;
pub mod cache;
pub mod command;
pub mod config;
pub mod error;
pub mod graph;
pub mod interfaces;
pub mod services;
pub mod session;
pub mod validator;

#[cfg(test)]
mod test_support;

// Re-export commonly used types and traits
pub use address::{AddressKind, TargetAddress};
pub use error::{Error, Result};

// Re-export main API components
pub use amend::{AmendFuture, AmendService};
pub use bsp::BspProject;
pub use cache::TargetListCache;
pub use config::Config;
pub use graph::{BuildGraph, ProjectInfo};
pub use session::Session;
pub use validator::{Preview, TargetSpecValidator};
