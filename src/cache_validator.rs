use crate::errors::AppError;
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};

/// Validates cached bureau records using SHA-256 checksums
///
/// The per-CUIT caches are a latency shim, never a system of record. This
/// module protects them against corruption by:
/// 1. Generating a checksum when a record is cached
/// 2. Validating the checksum when a record is retrieved
/// 3. Rejecting corrupted or tampered entries, forcing a fresh fetch
///
/// # Security Model
///
/// - Uses SHA-256 for cryptographic hash generation
/// - Stores checksum alongside the serialized record
/// - Validates on retrieval to detect tampering
/// - Falls back to a fresh bureau fetch if validation fails

/// Wrapper for a cached record with integrity validation
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ValidatedCacheEntry {
    /// The serialized record (JSON string)
    pub data: String,
    /// SHA-256 checksum of the data (hex encoded)
    pub checksum: String,
}

impl ValidatedCacheEntry {
    /// Serializes a record into a checksummed cache entry.
    ///
    /// Returns the JSON string to store as the cache value.
    pub fn encode<T: Serialize>(record: &T) -> Result<String, AppError> {
        let data = serde_json::to_string(record).map_err(|e| {
            AppError::InternalError(format!("Failed to serialize record for caching: {}", e))
        })?;
        let checksum = Self::compute_checksum(&data);
        let entry = Self { data, checksum };
        serde_json::to_string(&entry).map_err(|e| {
            AppError::InternalError(format!("Failed to serialize cache entry: {}", e))
        })
    }

    /// Deserializes and validates a cache entry back into a record.
    ///
    /// Returns `None` if the entry is corrupted, tampered, or does not
    /// decode into the requested record type — the caller refetches.
    pub fn decode<T: DeserializeOwned>(serialized: &str) -> Option<T> {
        let entry: ValidatedCacheEntry = serde_json::from_str(serialized).ok()?;

        if !entry.is_valid() {
            // Checksum mismatch - cache poisoned
            tracing::warn!(
                "Cache validation failed: checksum mismatch. Expected: {}, Data length: {}",
                entry.checksum,
                entry.data.len()
            );
            return None;
        }

        serde_json::from_str(&entry.data).ok()
    }

    /// Computes SHA-256 checksum of the data
    fn compute_checksum(data: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Validates the integrity of the cached data
    ///
    /// Returns true if the checksum matches, false if tampered
    pub fn is_valid(&self) -> bool {
        let computed = Self::compute_checksum(&self.data);
        computed == self.checksum
    }
}
