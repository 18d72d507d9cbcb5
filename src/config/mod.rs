pub mod load;
pub mod types;

pub use types::{Config, DEFAULT_CONFIG_FILE, RawConfig, normalize_extension};
