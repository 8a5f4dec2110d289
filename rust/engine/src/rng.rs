//! Cryptographically strong randomness for shuffling.
//!
//! All draws go through an [`EntropySource`]. Production code uses [`OsEntropy`],
//! which reads the operating system CSPRNG and fails loudly when it is unavailable.
//! [`SeededEntropy`] runs ChaCha20 from a recorded [`ShuffleSeed`] so an audited
//! shuffle can be replayed bit for bit.

use std::fmt;

use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng, TryRngCore};
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

use crate::errors::{ErrorCode, GameError};
use crate::logger;

pub const SEED_LEN: usize = 32;

/// Source of uniformly random bytes.
pub trait EntropySource {
    fn try_fill(&mut self, buf: &mut [u8]) -> Result<(), GameError>;
}

/// The operating system CSPRNG. There is no weaker fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn try_fill(&mut self, buf: &mut [u8]) -> Result<(), GameError> {
        OsRng.try_fill_bytes(buf).map_err(|e| {
            tracing::error!(error = %e, "secure_entropy_unavailable");
            GameError::new(
                ErrorCode::EntropyUnavailable,
                "No secure random source available",
            )
        })
    }
}

/// ChaCha20 keyed by a [`ShuffleSeed`]; deterministic for a given seed.
pub struct SeededEntropy {
    rng: ChaCha20Rng,
}

impl SeededEntropy {
    pub fn new(seed: &ShuffleSeed) -> Self {
        Self {
            rng: ChaCha20Rng::from_seed(seed.0),
        }
    }
}

impl fmt::Debug for SeededEntropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SeededEntropy(..)")
    }
}

impl EntropySource for SeededEntropy {
    fn try_fill(&mut self, buf: &mut [u8]) -> Result<(), GameError> {
        self.rng.fill_bytes(buf);
        Ok(())
    }
}

/// 32 bytes of shuffle seed material.
///
/// `Debug` never prints the bytes; only the SHA-256 fingerprint is ever shown.
#[derive(Clone, PartialEq, Eq)]
pub struct ShuffleSeed([u8; SEED_LEN]);

impl ShuffleSeed {
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(hex: &str) -> Result<Self, GameError> {
        let hex = hex.trim();
        if hex.len() != SEED_LEN * 2 || !hex.is_ascii() {
            return Err(GameError::new(
                ErrorCode::InvalidGameState,
                format!("Seed must be {} hex characters", SEED_LEN * 2),
            ));
        }
        let mut out = [0u8; SEED_LEN];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| {
                GameError::new(ErrorCode::InvalidGameState, "Seed is not valid hex")
            })?;
        }
        Ok(Self(out))
    }

    /// Hex encoding of the raw seed. Only for audit storage and replay, never for logs.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    /// Full SHA-256 commitment to the seed, safe to publish before the reveal.
    pub fn commitment(&self) -> String {
        logger::sha256_hex(&self.0)
    }

    /// Short tag suitable for log lines.
    pub fn fingerprint(&self) -> String {
        let mut c = self.commitment();
        c.truncate(logger::FINGERPRINT_LEN);
        c
    }

    /// Child seed for the `index`-th hand of a session keyed by this seed.
    pub fn derive(&self, index: u64) -> ShuffleSeed {
        let mut hasher = Sha256::new();
        hasher.update(self.0);
        hasher.update(index.to_be_bytes());
        let mut out = [0u8; SEED_LEN];
        out.copy_from_slice(&hasher.finalize());
        ShuffleSeed(out)
    }
}

impl fmt::Debug for ShuffleSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShuffleSeed({})", self.fingerprint())
    }
}

pub fn secure_random_bytes(len: usize) -> Result<Vec<u8>, GameError> {
    let mut buf = vec![0u8; len];
    OsEntropy.try_fill(&mut buf)?;
    Ok(buf)
}

/// Fresh seed from the OS CSPRNG.
pub fn generate_secure_seed() -> Result<ShuffleSeed, GameError> {
    let mut bytes = [0u8; SEED_LEN];
    OsEntropy.try_fill(&mut bytes)?;
    Ok(ShuffleSeed(bytes))
}

/// Uniform integer in `[0, max)`.
///
/// Draws the minimum number of bytes covering `max` and rejects samples that fall in
/// the incomplete top block, so the result is never modulo-biased.
pub fn secure_random_int<E: EntropySource + ?Sized>(
    src: &mut E,
    max: u32,
) -> Result<u32, GameError> {
    if max == 0 {
        return Err(GameError::new(
            ErrorCode::InvalidGameState,
            "Max must be positive",
        ));
    }
    if max == 1 {
        return Ok(0);
    }
    let bits = 32 - (max - 1).leading_zeros();
    let bytes_needed = bits.div_ceil(8) as usize;
    let range: u64 = 1u64 << (bytes_needed * 8);
    let valid_range = (range / max as u64) * max as u64;

    let mut buf = [0u8; 4];
    loop {
        src.try_fill(&mut buf[..bytes_needed])?;
        let value = buf[..bytes_needed]
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | *b as u64);
        if value < valid_range {
            return Ok((value % max as u64) as u32);
        }
    }
}

/// In-place Fisher–Yates driven by [`secure_random_int`].
pub fn secure_shuffle<T, E: EntropySource + ?Sized>(
    src: &mut E,
    items: &mut [T],
) -> Result<(), GameError> {
    for i in (1..items.len()).rev() {
        let j = secure_random_int(src, (i + 1) as u32)? as usize;
        items.swap(i, j);
    }
    Ok(())
}
