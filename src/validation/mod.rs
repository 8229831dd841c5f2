//! Record validation

pub mod record;

pub use record::{duplicate_ids, validate_finite, validate_placement, validate_shape, ValidationError};
