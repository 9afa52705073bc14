pub mod actions;
pub mod commands;
pub mod mutation;

pub use actions::Editor;
pub use commands::{Command, CommandStack};
pub use mutation::DiagramMutation;
