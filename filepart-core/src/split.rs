use rayon::prelude::*;
use tracing::debug;

use crate::chunk::{chunk_file_name, ChunkRecord};
use crate::digest;
use crate::error::FilepartError;
use crate::manifest::{ChunkEntry, Manifest};

pub struct SplitConfig {
    pub chunk_size: usize,
}

/// Everything one split run produces: the manifest plus the chunk
/// records it references, in ascending chunk order. Persisting them is
/// the caller's job.
#[derive(Debug)]
pub struct SplitOutput {
    pub manifest: Manifest,
    pub chunks: Vec<ChunkRecord>,
}

/// Partition `bytes` into `chunk_size`-byte slices, checksum and
/// hex-encode each, and build the manifest tying them together.
///
/// An empty source yields a single zero-length chunk so its manifest
/// round-trips like any other file. Splitting the same input with the
/// same chunk size always produces identical records; no timestamps or
/// other run-dependent metadata are embedded.
pub fn split(
    bytes: &[u8],
    file_name: &str,
    cfg: &SplitConfig,
) -> Result<SplitOutput, FilepartError> {
    if cfg.chunk_size == 0 {
        return Err(FilepartError::InvalidChunkSize(0));
    }

    let parts: Vec<&[u8]> = if bytes.is_empty() {
        vec![&bytes[..]]
    } else {
        bytes.chunks(cfg.chunk_size).collect()
    };
    let total = parts.len() as u64;
    debug!(file_name, total, chunk_size = cfg.chunk_size, "splitting");

    // Partitions have no data dependency on each other; hash and encode
    // them in parallel. collect() returns them in partition order.
    let chunks: Vec<ChunkRecord> = parts
        .par_iter()
        .enumerate()
        .map(|(i, payload)| ChunkRecord::from_payload(file_name, i as u64 + 1, total, payload))
        .collect();

    let entries: Vec<ChunkEntry> = chunks
        .iter()
        .map(|c| ChunkEntry {
            chunk_file: chunk_file_name(file_name, c.chunk_number, total),
            chunk_number: c.chunk_number,
            total_chunks: total,
            chunk_checksum: c.chunk_checksum.clone(),
        })
        .collect();

    let manifest = Manifest {
        file_name: file_name.to_string(),
        file_checksum: digest::checksum_hex(bytes),
        chunks: entries,
    };

    Ok(SplitOutput { manifest, chunks })
}
