//! Startup configuration: file discovery, environment overrides, and
//! one-shot resolution into an immutable value.
//!
//! Configuration is read exactly once at process start. Everything
//! downstream receives the resolved value by reference; nothing re-reads
//! locale or timezone per invocation.

pub mod loader;
pub mod resolve;
pub mod schema;

pub use loader::{discover_and_load, load_config};
pub use resolve::{EnvOverrides, ResolvedConfig, resolve};
pub use schema::RollcallConfig;
