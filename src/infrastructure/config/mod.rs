//! Layered configuration for the decision engine
//!
//! Defaults, `.reckon/config.yaml`, `.reckon/local.yaml` and `RECKON_*`
//! environment variables are merged with figment, then validated.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader, CONFIG_DIR, ENV_PREFIX};
