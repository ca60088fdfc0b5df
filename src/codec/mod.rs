//! Codec boundary: how a record's value becomes bytes and back.
//!
//! The engine never serializes anything itself. It hands the value and its
//! serde implementation (selected at compile time through the
//! [`TypeDescriptor`](crate::TypeDescriptor)) to a [`Codec`].
//!
//! Two codecs ship with the crate:
//!
//! - [`JsonCodec`] (default): one UTF-8 JSON document per file
//! - [`BincodeCodec`]: compact binary, for payloads nobody needs to read by hand

pub mod binary;
pub mod json;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use binary::BincodeCodec;
pub use json::JsonCodec;

/// Error produced by a codec. Kept opaque so any serde backend fits.
pub type CodecError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Encode/decode capability injected into the engine.
pub trait Codec: Send + Sync + 'static {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError>;

    /// Whether encoded bytes are human-readable text (used for debug logging).
    fn is_text(&self) -> bool {
        false
    }
}
