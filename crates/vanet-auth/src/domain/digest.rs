//! # Digest Engine
//!
//! Multi-algorithm hashing over `canonicalize(message) || salt`.
//!
//! The algorithm set is closed. Names are parsed once when the engine is built;
//! an unknown name stops startup instead of being skipped per message.

use super::canonical::canonicalize;
use super::entities::{DigestSet, HashTiming, Message};
use super::errors::AuthError;
use super::salt::Salt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Supported digest algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename = "sha256")]
    Sha256,
    #[serde(rename = "md5")]
    Md5,
    #[serde(rename = "sha1")]
    Sha1,
    /// BLAKE2b with a 512-bit output
    #[serde(rename = "blake2b")]
    Blake2b,
    #[serde(rename = "sha3_256")]
    Sha3_256,
}

impl HashAlgorithm {
    /// Every supported algorithm, in the default configuration order.
    pub const ALL: [HashAlgorithm; 5] = [
        HashAlgorithm::Sha256,
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Blake2b,
        HashAlgorithm::Sha3_256,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Blake2b => "blake2b",
            HashAlgorithm::Sha3_256 => "sha3_256",
        }
    }

    /// Digest length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Sha256 | HashAlgorithm::Sha3_256 => 32,
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Blake2b => 64,
        }
    }

    fn digest_fn(self) -> DigestFn {
        match self {
            HashAlgorithm::Sha256 => digest_with::<sha2::Sha256>,
            HashAlgorithm::Md5 => digest_with::<md5::Md5>,
            HashAlgorithm::Sha1 => digest_with::<sha1::Sha1>,
            HashAlgorithm::Blake2b => digest_with::<blake2::Blake2b512>,
            HashAlgorithm::Sha3_256 => digest_with::<sha3::Sha3_256>,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "md5" => Ok(HashAlgorithm::Md5),
            "sha1" | "sha-1" => Ok(HashAlgorithm::Sha1),
            "blake2b" => Ok(HashAlgorithm::Blake2b),
            "sha3_256" | "sha3-256" => Ok(HashAlgorithm::Sha3_256),
            _ => Err(AuthError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

type DigestFn = fn(&[u8]) -> Vec<u8>;

fn digest_with<D: sha2::Digest>(input: &[u8]) -> Vec<u8> {
    D::digest(input).to_vec()
}

// =============================================================================
// DIGEST ENGINE
// =============================================================================

/// Computes a [`DigestSet`] for a fixed, validated algorithm set.
#[derive(Clone)]
pub struct DigestEngine {
    table: Vec<(HashAlgorithm, DigestFn)>,
}

impl DigestEngine {
    /// Build an engine from an already-parsed algorithm list.
    ///
    /// Duplicates are collapsed, keeping the first occurrence.
    pub fn new(algorithms: &[HashAlgorithm]) -> Result<Self, AuthError> {
        if algorithms.is_empty() {
            return Err(AuthError::EmptyAlgorithmSet);
        }

        let mut table: Vec<(HashAlgorithm, DigestFn)> = Vec::with_capacity(algorithms.len());
        for &algorithm in algorithms {
            if !table.iter().any(|(a, _)| *a == algorithm) {
                table.push((algorithm, algorithm.digest_fn()));
            }
        }

        Ok(Self { table })
    }

    /// Build an engine from configured names, failing on the first unknown one.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, AuthError> {
        let algorithms = names
            .iter()
            .map(|n| n.as_ref().parse::<HashAlgorithm>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&algorithms)
    }

    /// Engine over every supported algorithm.
    pub fn all() -> Self {
        Self {
            table: HashAlgorithm::ALL
                .iter()
                .map(|a| (*a, a.digest_fn()))
                .collect(),
        }
    }

    /// Configured algorithms, in configuration order.
    pub fn algorithms(&self) -> Vec<HashAlgorithm> {
        self.table.iter().map(|(a, _)| *a).collect()
    }

    /// Hash `canonicalize(message) || salt` with every configured algorithm.
    pub fn compute(&self, message: &Message, salt: &Salt) -> DigestSet {
        let mut input = canonicalize(message);
        input.extend_from_slice(salt.as_bytes());

        let mut set = DigestSet::new();
        for (algorithm, digest) in &self.table {
            let start = Instant::now();
            let bytes = digest(&input);
            let elapsed = start.elapsed();

            set.insert(*algorithm, bytes);
            set.push_timing(HashTiming {
                algorithm: *algorithm,
                elapsed_secs: elapsed.as_secs_f64(),
            });
        }
        set
    }
}

impl Default for DigestEngine {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Debug for DigestEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestEngine")
            .field("algorithms", &self.algorithms())
            .finish()
    }
}
