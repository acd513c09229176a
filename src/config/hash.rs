//! Fingerprinting for idempotence checks.
//!
//! This module provides deterministic hashing of the typed values tree and
//! of resolved manifest sets. Every map in both structures is ordered, so
//! the canonical JSON encoding is stable and can be hashed directly.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{AutoDeployError, Result};
use crate::resolver::ResolvedManifestSet;

use super::spec::ChartValues;

/// Hasher for computing values and manifest fingerprints.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigHasher;

impl ConfigHasher {
    /// Creates a new hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes a hash of the typed chart values.
    ///
    /// Defaults are materialized before hashing, so setting a key to its
    /// default value does not change the hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the values cannot be encoded.
    pub fn hash_values(&self, values: &ChartValues) -> Result<String> {
        Self::hash_serialized(values)
    }

    /// Computes a hash of a resolved manifest set.
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be encoded.
    pub fn hash_manifests(&self, manifests: &ResolvedManifestSet) -> Result<String> {
        Self::hash_serialized(manifests)
    }

    /// Computes a short hash (first 8 characters) for display purposes.
    #[must_use]
    pub fn short_hash(&self, hash: &str) -> String {
        hash.chars().take(8).collect()
    }

    /// Compares two hashes to determine if they are equal.
    #[must_use]
    pub fn hashes_match(hash1: &str, hash2: &str) -> bool {
        if hash1.len() != hash2.len() {
            return false;
        }

        hash1
            .bytes()
            .zip(hash2.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    fn hash_serialized<T: Serialize>(value: &T) -> Result<String> {
        let mut hasher = Sha256::new();
        serde_json::to_writer(&mut hasher, value)
            .map_err(|e| AutoDeployError::internal(format!("Failed to encode for hashing: {e}")))?;
        Ok(hex::encode(hasher.finalize()))
    }
}
