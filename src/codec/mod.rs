//! Conversion between anchor records and their textual form

pub mod json;

pub use json::JsonAnchorCodec;

use crate::validation::ValidationError;
use std::string::FromUtf8Error;

/// Codec errors
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode anchor data: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode anchor data: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("anchor data is not valid UTF-8: {0}")]
    InvalidUtf8(#[source] FromUtf8Error),

    #[error("cannot encode anchor: {0}")]
    NonFinite(#[source] ValidationError),
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Encode/decode capability for one record type.
pub trait AnchorCodec {
    type Record;

    /// Encode a single record as a self-contained document
    fn serialize_one(&self, record: &Self::Record) -> CodecResult<String>;

    /// Encode each record separately, one document per record
    fn serialize_many(&self, records: &[Self::Record]) -> CodecResult<Vec<String>> {
        records.iter().map(|record| self.serialize_one(record)).collect()
    }

    /// Encode all records as a single array document
    fn serialize_array(&self, records: &[Self::Record]) -> CodecResult<String>;

    /// Decode raw bytes into document text
    fn decode_text(&self, bytes: Vec<u8>) -> CodecResult<String> {
        String::from_utf8(bytes).map_err(CodecError::InvalidUtf8)
    }

    /// Decode a single record document
    fn parse_one(&self, input: &str) -> CodecResult<Self::Record>;

    /// Decode an array document into its records, in document order
    fn parse_many(&self, input: &str) -> CodecResult<Vec<Self::Record>>;
}
