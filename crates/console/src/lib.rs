//! `staffdesk-console` library crate.
//!
//! Command parser, text renderer and console loop pieces, exposed for
//! integration testing. The binary entrypoint lives in `main.rs`.

pub mod app;
pub mod commands;
pub mod render;
