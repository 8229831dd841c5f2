//! JSON codec for anchor records

use crate::codec::{AnchorCodec, CodecError, CodecResult};
use crate::core::AnchorRecord;
use crate::validation::validate_finite;

/// `serde_json` backed codec. Compact output unless `pretty` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAnchorCodec {
    pretty: bool,
}

impl JsonAnchorCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    fn encode<T: serde::Serialize + ?Sized>(&self, value: &T) -> CodecResult<String> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        encoded.map_err(CodecError::Encode)
    }
}

impl AnchorCodec for JsonAnchorCodec {
    type Record = AnchorRecord;

    // serde_json writes non-finite floats as `null`, which would not decode.
    fn serialize_one(&self, record: &AnchorRecord) -> CodecResult<String> {
        validate_finite(record).map_err(CodecError::NonFinite)?;
        self.encode(record)
    }

    fn serialize_array(&self, records: &[AnchorRecord]) -> CodecResult<String> {
        for record in records {
            validate_finite(record).map_err(CodecError::NonFinite)?;
        }
        self.encode(records)
    }

    fn parse_one(&self, input: &str) -> CodecResult<AnchorRecord> {
        serde_json::from_str(input).map_err(CodecError::Decode)
    }

    fn parse_many(&self, input: &str) -> CodecResult<Vec<AnchorRecord>> {
        serde_json::from_str(input).map_err(CodecError::Decode)
    }
}
