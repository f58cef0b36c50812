//! Core business logic for shutter.

pub mod services;

pub use services::*;
