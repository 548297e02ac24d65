//! Payload Module
//!
//! The record contract consumed by the tree engine, plus a CRC-framed slot
//! codec and a concrete record type.
//!
//! ## Responsibilities
//! - Declare the fixed slot length of a record type
//! - Encode/decode a record to/from one slot buffer
//! - Distinguish a wiped slot from real data
//! - Order records by key
//! - Carry the AVL height and the virtual index inline
//!
//! ## Slot Format (serde payloads)
//! ```text
//! ┌──────────────────────────────┬─────────┐
//! │ bincode body (LENGTH - 4)    │ CRC (4) │
//! └──────────────────────────────┴─────────┘
//! ```
//! An all-zero body is the empty sentinel, which is also what a file hole
//! reads back as.

pub mod codec;
mod id_record;
mod model;

pub use codec::{decode_slot, encode_slot, CRC_SIZE};
pub use id_record::IdRecord;
pub use model::Payload;
