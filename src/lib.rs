// Public library re-exports for integration tests and external use.
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod index;
pub mod progress;
pub mod report;
pub mod resolver;
pub mod spoilers;
pub mod types;

// Keep main.rs thin and have it call into the library functions.
pub use error::{ImportError, Result};
pub use import::run_import;
pub use types::WinnerEntry;
