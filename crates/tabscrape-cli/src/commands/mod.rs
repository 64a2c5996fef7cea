//! Command implementations.

pub mod chunk;
pub mod config;
pub mod scrape;

pub use self::chunk::execute_chunk;
pub use self::config::execute_config;
pub use self::scrape::execute_scrape;
