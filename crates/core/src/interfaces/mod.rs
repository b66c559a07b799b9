//! Seams to the external collaborators
//!
//! The IDE project model and the build tool are consumed through these
//! traits so the engine can be driven by real subprocesses or by in-memory
//! fakes.

pub mod amender;
pub mod project_root;
pub mod target_lister;

pub use amender::{Amender, PendingAmend};
pub use project_root::ProjectRoot;
pub use target_lister::TargetLister;
