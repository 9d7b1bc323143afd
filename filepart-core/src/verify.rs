use tracing::debug;

use crate::assemble::{checked_payload, ChunkSource};
use crate::digest;
use crate::error::FilepartError;
use crate::manifest::Manifest;

#[derive(Debug, Clone)]
pub struct VerifyReport {
    pub chunks_ok: u64,
    pub chunks_bad: u64,
    pub whole_ok: bool,
}

/// Check every chunk record against the manifest without rebuilding the
/// file. Unlike [`crate::assemble::reassemble`] this does not stop at
/// the first bad chunk; failures are counted so the caller can report
/// overall health. A malformed manifest is still an error, not a count.
pub fn verify(
    manifest: &Manifest,
    source: &mut dyn ChunkSource,
) -> Result<VerifyReport, FilepartError> {
    manifest.validate()?;

    let mut chunks_ok = 0u64;
    let mut chunks_bad = 0u64;
    let mut payloads: Vec<Vec<u8>> = Vec::with_capacity(manifest.chunks.len());
    for entry in &manifest.chunks {
        match checked_payload(manifest, entry, source) {
            Ok(payload) => {
                chunks_ok += 1;
                payloads.push(payload);
            }
            Err(err) => {
                chunks_bad += 1;
                debug!(chunk = entry.chunk_number, %err, "chunk failed verification");
            }
        }
    }

    let whole_ok = chunks_bad == 0
        && digest::checksum_hex(&payloads.concat()) == manifest.file_checksum;

    Ok(VerifyReport { chunks_ok, chunks_bad, whole_ok })
}
