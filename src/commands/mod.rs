// Commands module - Command Pattern implementation

mod check;
mod command;

pub use check::CheckCommand;
pub use command::Command;
