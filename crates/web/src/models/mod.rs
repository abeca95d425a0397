//! Domain models for the weather board.

pub mod city;

pub use city::{DefaultCity, NewCity, TrackedCity, ValidationError, WeatherReading};
