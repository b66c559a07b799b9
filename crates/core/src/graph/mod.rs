//! Project metadata and the target dependency graph built from it

pub mod build_graph;
pub mod model;

pub use build_graph::{BuildGraph, TargetNode};
pub use model::{LibraryJars, ProjectInfo, SourceRoot, TargetInfo};
