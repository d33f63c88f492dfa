/// Database configuration and connection management
pub mod database;

/// Lending policy configuration loading from config.toml
pub mod policy;
