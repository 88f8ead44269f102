//! Configuration module for siteharvest
//!
//! Handles loading, parsing, and validating TOML configuration files. The
//! config file is optional: every setting has a documented default.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BackendKind, Config, DatabaseConfig, ScraperConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default};
pub use validation::validate;
