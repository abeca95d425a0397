//! Skycast Core - Shared domain types.
//!
//! This crate provides the types used across all Skycast components:
//! - `web` - The city weather board (HTTP server, store, weather client)
//! - `cli` - Command-line tools for migrations, seeding and refreshes
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, city names and coordinates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
