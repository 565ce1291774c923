use std::fmt::Write;

use atrium_core::{AppError, AppResult};
use sha2::{Digest, Sha256};

/// Generates a random refresh secret.
///
/// Returns `(raw_secret_hex, sha256_hash_hex)`.
pub(super) fn generate_secret() -> AppResult<(String, String)> {
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes).map_err(|error| {
        AppError::Internal(format!("failed to generate refresh secret: {error}"))
    })?;

    let raw_secret = to_hex(&bytes);
    let hash = hash_secret(&raw_secret);
    Ok((raw_secret, hash))
}

/// Computes the stored SHA-256 digest of a refresh secret.
pub(super) fn hash_secret(raw_secret: &str) -> String {
    to_hex(&Sha256::digest(raw_secret.as_bytes()))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut acc, byte| {
            let _ = write!(acc, "{byte:02x}");
            acc
        })
}
