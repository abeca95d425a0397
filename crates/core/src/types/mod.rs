//! Core types for Skycast.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod city_name;
pub mod coordinates;
pub mod id;

pub use city_name::{CityName, CityNameError};
pub use coordinates::{Coordinates, CoordinatesError};
pub use id::*;
