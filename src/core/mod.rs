pub mod config;
pub mod orchestrator;
pub mod session;
pub mod terminal;
