pub mod analyze;
pub mod config;
pub mod models;

// Re-export handler functions for convenience
pub use analyze::handle_analyze_command;
pub use config::handle_config_command;
pub use models::{handle_models_command, handle_serve_command};
