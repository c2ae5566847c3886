//! Declarative client for JFrog Distribution
//!
//! This crate maps JFrog Distribution's REST resources (permission targets,
//! release bundles v1, signing keys, vault-backed signing keys) onto typed
//! configuration, wire, and state models, and drives their Create / Read /
//! Update / Delete lifecycles against the Distribution API.
//!
//! # Module Structure
//!
//! - [`client`] - Authenticated HTTP client for the Distribution API
//! - [`resources`] - Per-resource models, converters, validation, and lifecycle
//! - [`validate`] - Constraint checking with field-path violation reporting
//! - [`tristate`] - Unset / null / value wrapper for optional fields
//! - [`error`] - Typed error kinds shared across the crate
//! - [`usage`] - Fire-and-forget usage telemetry
//! - [`config`] - Persistent CLI configuration
//!
//! # Example
//!
//! ```ignore
//! use distctl::client::DistClient;
//! use distctl::resources::permission;
//!
//! async fn example() -> Result<(), distctl::error::DistError> {
//!     let client = DistClient::new("https://myinstance.jfrog.io", "token")?;
//!     let state = permission::read(&client, "my-permission").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod resources;
pub mod tristate;
pub mod usage;
pub mod validate;

/// Version injected at compile time via DISTCTL_VERSION env var (set by CI/CD),
/// or the crate version for local builds.
pub const VERSION: &str = match option_env!("DISTCTL_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};
