//! Binary encoding for ndau values.
//!
//! Fixed-width little-endian integers, so every scalar occupies exactly
//! eight bytes on the wire.

use bincode::config::{Configuration, Fixint, LittleEndian};
use bincode::{Decode, Encode};

use crate::error::NdauError;

type Config = Configuration<LittleEndian, Fixint>;

/// The shared bincode configuration.
pub fn config() -> Config {
    bincode::config::standard().with_fixed_int_encoding()
}

/// Encodes a value with [`config`].
pub fn encode<T: Encode>(value: &T) -> Result<Vec<u8>, NdauError> {
    bincode::encode_to_vec(value, config()).map_err(|e| NdauError::Codec(e.to_string()))
}

/// Decodes a value, rejecting trailing bytes.
pub fn decode<T: Decode<()>>(bytes: &[u8]) -> Result<T, NdauError> {
    let (value, read) = bincode::decode_from_slice(bytes, config())
        .map_err(|e| NdauError::Codec(e.to_string()))?;
    if read != bytes.len() {
        return Err(NdauError::Codec(format!(
            "{} trailing bytes",
            bytes.len() - read
        )));
    }
    Ok(value)
}
