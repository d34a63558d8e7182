/// Database configuration and connection management
pub mod database;

/// Menu seed configuration from menus.toml
pub mod menus;
