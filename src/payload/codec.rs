//! Slot codec
//!
//! Frames a serde value as a fixed-width bincode body followed by a CRC32.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::AvlError;

/// Trailing checksum size in bytes
pub const CRC_SIZE: usize = 4;

/// Encode `value` into `buf`: bincode body, zero padding, then CRC32 of the body
///
/// A non-empty value must not serialize to all zero bytes, since that is
/// how the empty sentinel is recognized.
pub fn encode_slot<T: Serialize>(value: &T, buf: &mut [u8]) -> Result<()> {
    if buf.len() <= CRC_SIZE {
        return Err(AvlError::Serialization(format!(
            "slot of {} bytes cannot hold a checksummed record",
            buf.len()
        )));
    }
    let body_len = buf.len() - CRC_SIZE;

    let encoded_len = bincode::serialized_size(value)? as usize;
    if encoded_len > body_len {
        return Err(AvlError::Serialization(format!(
            "record needs {} bytes but slot body holds {}",
            encoded_len, body_len
        )));
    }

    let (body, crc) = buf.split_at_mut(body_len);
    body.fill(0);
    bincode::serialize_into(&mut body[..encoded_len], value)?;
    crc.copy_from_slice(&crc32fast::hash(body).to_le_bytes());

    Ok(())
}

/// Decode a slot written by [`encode_slot`]
///
/// Returns `Ok(None)` for the empty sentinel (an all-zero body).
pub fn decode_slot<T: DeserializeOwned>(buf: &[u8]) -> Result<Option<T>> {
    if buf.len() <= CRC_SIZE {
        return Err(AvlError::Serialization(format!(
            "slot of {} bytes cannot hold a checksummed record",
            buf.len()
        )));
    }
    let (body, crc) = buf.split_at(buf.len() - CRC_SIZE);

    if body.iter().all(|&b| b == 0) {
        return Ok(None);
    }

    let stored = u32::from_le_bytes([crc[0], crc[1], crc[2], crc[3]]);
    let computed = crc32fast::hash(body);
    if stored != computed {
        return Err(AvlError::Corruption(format!(
            "slot checksum mismatch: stored {:#010x}, computed {:#010x}",
            stored, computed
        )));
    }

    Ok(Some(bincode::deserialize(body)?))
}

/// Zero a slot buffer so it decodes as the empty sentinel
pub fn clear_slot(buf: &mut [u8]) {
    buf.fill(0);
}
