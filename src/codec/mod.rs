//! Tagged codec module
//!
//! This module contains the three lossless codecs over the value model:
//! - Storage codec (native TEXT/INTEGER cells, tagged blobs)
//! - SQL-literal codec (tokens spliced into query text)
//! - Wire codec (tagged text for crossing process/CLI/HTTP boundaries)

pub mod sql;
pub mod storage;
pub mod wire;

pub use sql::encode_sql_literal;
pub use storage::{decode_storage, encode_storage, StorageCell};
pub use wire::{
    decode_transport, decode_wire, encode_transport, encode_wire, structured_from_text,
    structured_to_text, ResponsePayload,
};
