pub mod command_breakdown;
pub mod formatter;

pub use command_breakdown::print_command_breakdown;
pub use formatter::{describe_error, preview_to_json, print_graph_summary, print_preview};
