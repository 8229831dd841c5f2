//! Durable storage of anchor records

pub mod anchor_store;
pub mod error;

pub use anchor_store::AnchorStore;
pub use error::{StoreError, StoreResult};
