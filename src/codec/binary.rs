//! Compact binary codec backed by bincode.
//!
//! Bincode is not self-describing: internally tagged enums
//! (`#[serde(tag = "...")]`) and untagged enums can be encoded but not
//! decoded. Use externally tagged enums with this codec.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Codec, CodecError};

#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(value).map_err(CodecError::from)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        bincode::deserialize(bytes).map_err(CodecError::from)
    }
}
