//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or defaults
//!     → loader.rs (parse & deserialize, resolve credential from env)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → handed to HttpServer at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - The environment is read once by the loader, never by handlers

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ApiKey, CorsConfig, ListenerConfig, ObservabilityConfig, ProxyConfig, RouteConfig,
    SecurityConfig, UpstreamConfig,
};
pub use validation::ValidationError;
