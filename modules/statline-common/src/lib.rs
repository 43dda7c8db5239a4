pub mod config;
pub mod error;
pub mod leagues;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, ExtractError, InvalidateError, LoadError};
pub use leagues::season_table;
pub use types::*;
