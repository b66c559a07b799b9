//! Target spec validation and preview

pub mod spec_validator;

pub use spec_validator::{Expansion, Preview, TargetSpecValidator, expand};
