//! Domain records, workflow state machine, and view derivation for the
//! staffdesk operator console.
//!
//! This crate has no internal or transport dependencies so that it can be
//! driven by any front end and tested without a network.

pub mod error;
pub mod messages;
pub mod models;
pub mod types;
pub mod view;
pub mod workflow;

pub use error::{CoreError, RemoteFailure};
pub use view::View;
pub use workflow::{Effect, Phase, Workflow};
