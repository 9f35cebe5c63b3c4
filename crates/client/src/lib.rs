//! Owner API client and operator session driver.
//!
//! - [`api`] — typed HTTP wrappers for the owner service-request endpoints.
//! - [`config`] — environment-driven client configuration.
//! - [`session`] — runs the core workflow against an API implementation.

pub mod api;
pub mod config;
pub mod session;

pub use api::{ApiError, OwnerApi, ServiceRequestApi};
pub use config::{ClientConfig, ConfigError};
pub use session::{Session, SessionEvent};
