//! HTTP surface for the heroes roster.
//!
//! # Responsibility
//! - Load server configuration from the environment.
//! - Own the store connection for the process lifetime.
//! - Map REST routes onto `heroes_core` use-cases.

pub mod config;
pub mod context;
pub mod http;

pub use crate::config::{ConfigError, ServerConfig};
pub use crate::context::AppContext;
pub use crate::http::{create_router, create_router_with_body_limit, ApiError, DEFAULT_BODY_LIMIT};
