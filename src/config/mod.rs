//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → MirrorConfig (validated, immutable)
//!
//! On file change (--watch):
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → new config sent to the server, mirror settings swapped atomically
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; an empty file is a valid config
//! - Only `[mirror]` is applied on reload; listener changes need a restart

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ListenerConfig, LogFormat, MirrorConfig, MirrorSettings, ObservabilityConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
