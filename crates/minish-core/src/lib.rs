//! A miniature shell over an in-memory filesystem.
//!
//! Lines are tokenized, expanded and globbed into
//! [`InputArgs`](models::InputArgs), then dispatched to builtin commands
//! running against a [`VirtualFs`](core::VirtualFs). Nothing here touches the
//! host filesystem; persisting a session is left to the caller through the
//! serde representations of [`Node`](models::Node) and
//! [`Environment`](core::Environment).

pub mod config;
pub mod core;
pub mod models;
