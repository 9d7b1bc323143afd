use serde::{Deserialize, Serialize};

use crate::error::FilepartError;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ChunkEntry {
    pub chunk_file: String,
    pub chunk_number: u64,
    pub total_chunks: u64,
    pub chunk_checksum: String,
}

/// The ordered index of all chunks belonging to one source file. The
/// manifest's copy of each chunk checksum is the trusted value; a chunk
/// record's own checksum is only a self-assertion.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Manifest {
    pub file_name: String,
    pub file_checksum: String,
    pub chunks: Vec<ChunkEntry>,
}

impl Manifest {
    /// Check that `chunks` is a contiguous ascending run `1..=total` with
    /// a consistent `total_chunks` across every entry. Returns the total.
    pub fn validate(&self) -> Result<u64, FilepartError> {
        let malformed = |reason: String| FilepartError::ManifestMalformed {
            file_name: self.file_name.clone(),
            reason,
        };
        let first = match self.chunks.first() {
            Some(entry) => entry,
            None => return Err(malformed("manifest lists no chunks".to_string())),
        };
        let total = first.total_chunks;
        if total as usize != self.chunks.len() {
            return Err(malformed(format!(
                "total_chunks is {} but {} entries are listed",
                total,
                self.chunks.len()
            )));
        }
        for (i, entry) in self.chunks.iter().enumerate() {
            let expected = i as u64 + 1;
            if entry.chunk_number != expected {
                return Err(malformed(format!(
                    "entry {} has chunk_number {}, expected {}",
                    i, entry.chunk_number, expected
                )));
            }
            if entry.total_chunks != total {
                return Err(malformed(format!(
                    "entry {} has total_chunks {}, expected {}",
                    i, entry.total_chunks, total
                )));
            }
        }
        Ok(total)
    }
}

/// Standard record name for a manifest: `file.bin_manifest.json`.
pub fn manifest_file_name(file_name: &str) -> String {
    format!("{file_name}_manifest.json")
}
