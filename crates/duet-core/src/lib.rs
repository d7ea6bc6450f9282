pub mod config;
pub mod error;
pub mod reminder;
pub mod types;

pub use config::Config;
pub use error::{CoreError, Result};
