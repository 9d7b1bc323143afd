use blake3;

/// BLAKE3 digest of `bytes` as a lowercase hex string.
/// Chunk records and manifests must agree on this algorithm; mixing
/// digests across a split/reassemble pair is a format break.
pub fn checksum_hex(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
