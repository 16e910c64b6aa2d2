//! Configuration: `passlock.toml` settings and platform paths.

pub mod paths;
pub mod settings;

pub use paths::{config_dir, vault_root};
pub use settings::Settings;
