pub mod amend;
pub mod graph;
pub mod list;
pub mod preview;
pub mod selected;

pub use amend::amend_command;
pub use graph::graph_command;
pub use list::list_command;
pub use preview::preview_command;
pub use selected::selected_command;
