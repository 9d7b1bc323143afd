use serde::{Deserialize, Serialize};

use crate::digest;
use crate::error::FilepartError;

/// One persisted chunk: identity fields, a self-reported checksum of the
/// raw payload, and the payload itself hex-encoded for text-safe
/// transport.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ChunkRecord {
    pub file_name: String,
    pub chunk_number: u64,
    pub total_chunks: u64,
    pub chunk_checksum: String,
    pub chunk_data: String,
}

impl ChunkRecord {
    /// Build a record from a raw payload slice. The checksum is computed
    /// over the raw bytes, before hex encoding.
    pub fn from_payload(
        file_name: &str,
        chunk_number: u64,
        total_chunks: u64,
        payload: &[u8],
    ) -> Self {
        ChunkRecord {
            file_name: file_name.to_string(),
            chunk_number,
            total_chunks,
            chunk_checksum: digest::checksum_hex(payload),
            chunk_data: hex::encode(payload),
        }
    }

    /// Decode `chunk_data` back into raw payload bytes.
    pub fn decode_payload(&self) -> Result<Vec<u8>, FilepartError> {
        hex::decode(&self.chunk_data).map_err(|source| FilepartError::Decode {
            file_name: self.file_name.clone(),
            chunk_number: self.chunk_number,
            source,
        })
    }
}

/// Standard record name for a chunk: `file.bin_02_04.json`.
/// This names the record; ordering is always taken from the
/// `chunk_number` field, never parsed back out of the name.
pub fn chunk_file_name(file_name: &str, chunk_number: u64, total_chunks: u64) -> String {
    format!("{file_name}_{chunk_number:02}_{total_chunks:02}.json")
}
