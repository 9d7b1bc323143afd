use thiserror::Error;

/// Errors surfaced by splitting, verification, and reassembly.
///
/// Every variant is terminal for the current operation; nothing is
/// retried internally. Variants carry the offending chunk number and
/// file name so callers can report exactly which record failed.
#[derive(Error, Debug)]
pub enum FilepartError {
    /// Chunk size of zero bytes.
    #[error("chunk size must be at least 1 byte, got {0}")]
    InvalidChunkSize(usize),

    /// The manifest's entry list violates the ordering/count invariants.
    #[error("malformed manifest for '{file_name}': {reason}")]
    ManifestMalformed { file_name: String, reason: String },

    /// A chunk record referenced by the manifest could not be produced.
    #[error("cannot load chunk {chunk_number} ('{chunk_file}'): {reason}")]
    ChunkMissing {
        chunk_file: String,
        chunk_number: u64,
        reason: String,
    },

    /// A loaded chunk record disagrees with its manifest entry about
    /// which chunk it is.
    #[error("chunk {chunk_number} of '{file_name}' does not match its manifest entry: {field} is '{actual}', expected '{expected}'")]
    ChunkIdentityMismatch {
        file_name: String,
        chunk_number: u64,
        field: &'static str,
        expected: String,
        actual: String,
    },

    /// The chunk payload is not valid hex.
    #[error("chunk {chunk_number} of '{file_name}' has an undecodable payload")]
    Decode {
        file_name: String,
        chunk_number: u64,
        #[source]
        source: hex::FromHexError,
    },

    /// The recomputed payload digest disagrees with the recorded one.
    #[error("checksum mismatch in chunk {chunk_number} of '{file_name}': expected {expected}, got {actual}")]
    ChunkChecksumMismatch {
        file_name: String,
        chunk_number: u64,
        expected: String,
        actual: String,
    },

    /// The reassembled byte sequence does not hash to the manifest's
    /// whole-file checksum.
    #[error("whole-file checksum mismatch for '{file_name}': expected {expected}, got {actual}")]
    WholeFileChecksumMismatch {
        file_name: String,
        expected: String,
        actual: String,
    },
}
