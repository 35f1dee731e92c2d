mod config;
mod error;
mod interner;

pub use config::{AppConfig, AppConfigExt, DEFAULT_PAGE_SIZE};
pub use error::ConfigError;
pub use interner::{IStr, intern, resolve};
