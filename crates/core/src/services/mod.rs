//! Service implementations for the interface traits
//!
//! Concrete, subprocess and filesystem backed collaborators.

pub mod fastpass_amender;
pub mod fs_project_root;
pub mod pants_cli;

pub use fastpass_amender::FastpassAmender;
pub use fs_project_root::{FsProjectRoot, find_build_root};
pub use pants_cli::PantsCli;
