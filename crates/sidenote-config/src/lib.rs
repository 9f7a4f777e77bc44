//! # Sidenote Configuration
//!
//! Configuration for the sidenote note store: where notes live, which
//! categories are always offered, and how the store directory is scanned.
//!
//! Values are resolved with the precedence
//! `defaults < config file < environment < command line`.
//!
//! ```rust,no_run
//! use sidenote_config::{ConfigLoader, Overrides};
//!
//! let config = ConfigLoader::new()
//!     .load(None, Overrides::default())
//!     .expect("config");
//! println!("notes live in {}", config.directory.display());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
mod loader;

pub use config::*;
pub use error::*;
pub use loader::*;
