//! Gemini forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! inbound body
//!     → handler.rs (method/body preconditions)
//!     → payload.rs (InboundRequest → UpstreamPayload)
//!     → client.rs (one POST to generateContent)
//!     → error.rs (failure kind → status + { error, details })
//! ```

pub mod client;
pub mod error;
pub mod handler;
pub mod payload;

pub use client::GeminiClient;
pub use error::{ErrorEnvelope, ProxyError};
pub use handler::{forward, proxy_handler};
pub use payload::{InboundRequest, UpstreamPayload};
