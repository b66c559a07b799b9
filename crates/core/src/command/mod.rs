//! External command construction and execution

pub mod tool_command;

// Re-export commonly used types
pub use tool_command::{ProcessOutput, RunningCommand, ToolCommand, complete_on_timeout};
