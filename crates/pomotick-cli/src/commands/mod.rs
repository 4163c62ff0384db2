pub mod config;
pub mod settings;
pub mod stats;
pub mod task;
pub mod timer;

/// Return type shared by every command handler.
pub type CmdResult = Result<(), Box<dyn std::error::Error>>;
