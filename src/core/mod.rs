//! Core types and constants for the anchor store

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
