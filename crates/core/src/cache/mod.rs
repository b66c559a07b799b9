//! Caching of build-tool target listings

pub mod target_list_cache;

// Re-export the main cache type
pub use target_list_cache::{SharedTargets, TargetList, TargetListCache};
