use tracing::debug;

use crate::chunk::ChunkRecord;
use crate::digest;
use crate::error::FilepartError;
use crate::manifest::{ChunkEntry, Manifest};

/// Supplies chunk records during reassembly and verification, usually by
/// reading them back from wherever the splitter's output was stored.
/// Implementations report a record they cannot produce as
/// [`FilepartError::ChunkMissing`].
pub trait ChunkSource {
    fn load(&mut self, entry: &ChunkEntry) -> Result<ChunkRecord, FilepartError>;
}

/// Rebuild the original byte sequence described by `manifest`.
///
/// Chunks are loaded and verified in ascending order so the first
/// corrupt record fails the run immediately. The returned bytes have
/// passed every per-chunk check and the whole-file checksum; no
/// partially verified data is ever handed back.
pub fn reassemble(
    manifest: &Manifest,
    source: &mut dyn ChunkSource,
) -> Result<Vec<u8>, FilepartError> {
    let total = manifest.validate()?;

    let mut bytes: Vec<u8> = Vec::new();
    for entry in &manifest.chunks {
        let payload = checked_payload(manifest, entry, source)?;
        bytes.extend_from_slice(&payload);
    }

    let whole = digest::checksum_hex(&bytes);
    if whole != manifest.file_checksum {
        return Err(FilepartError::WholeFileChecksumMismatch {
            file_name: manifest.file_name.clone(),
            expected: manifest.file_checksum.clone(),
            actual: whole,
        });
    }
    debug!(
        file_name = %manifest.file_name,
        total,
        bytes = bytes.len(),
        "reassembled"
    );
    Ok(bytes)
}

/// Load one chunk and run the full per-chunk check chain: identity
/// fields, payload decode, then digest against both the record's own
/// checksum and the manifest's copy. Requiring both to agree catches a
/// corrupted record and a substituted-but-internally-consistent one.
pub(crate) fn checked_payload(
    manifest: &Manifest,
    entry: &ChunkEntry,
    source: &mut dyn ChunkSource,
) -> Result<Vec<u8>, FilepartError> {
    let chunk = source.load(entry)?;
    check_identity(manifest, entry, &chunk)?;
    let payload = chunk.decode_payload()?;
    let actual = digest::checksum_hex(&payload);
    if actual != entry.chunk_checksum || actual != chunk.chunk_checksum {
        let expected = if actual != entry.chunk_checksum {
            entry.chunk_checksum.clone()
        } else {
            chunk.chunk_checksum.clone()
        };
        return Err(FilepartError::ChunkChecksumMismatch {
            file_name: manifest.file_name.clone(),
            chunk_number: entry.chunk_number,
            expected,
            actual,
        });
    }
    Ok(payload)
}

fn check_identity(
    manifest: &Manifest,
    entry: &ChunkEntry,
    chunk: &ChunkRecord,
) -> Result<(), FilepartError> {
    let mismatch = |field: &'static str, expected: String, actual: String| {
        FilepartError::ChunkIdentityMismatch {
            file_name: manifest.file_name.clone(),
            chunk_number: entry.chunk_number,
            field,
            expected,
            actual,
        }
    };
    if chunk.file_name != manifest.file_name {
        return Err(mismatch(
            "file_name",
            manifest.file_name.clone(),
            chunk.file_name.clone(),
        ));
    }
    if chunk.chunk_number != entry.chunk_number {
        return Err(mismatch(
            "chunk_number",
            entry.chunk_number.to_string(),
            chunk.chunk_number.to_string(),
        ));
    }
    if chunk.total_chunks != entry.total_chunks {
        return Err(mismatch(
            "total_chunks",
            entry.total_chunks.to_string(),
            chunk.total_chunks.to_string(),
        ));
    }
    Ok(())
}
