//! Explicit wiring of the entity facades.
//!
//! # Responsibility
//! - Build every facade from one caller-owned store connection.
//! - Keep callers decoupled from how facades are constructed.

pub mod library;
