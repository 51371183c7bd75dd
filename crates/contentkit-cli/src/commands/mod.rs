pub mod assign;
pub mod diff;
pub mod sync;
pub mod validate;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;
