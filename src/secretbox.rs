//! Authenticated symmetric encryption for small messages at a 20-year
//! security level.
//!
//! The interface is modelled on NaCl's secretbox, but the construction is
//! AES-128 in CTR mode with HMAC-SHA-256 over the IV and ciphertext.
//! Messages are secured with [`seal`] and recovered with [`open`]; a sealed
//! box is exactly [`OVERHEAD`] bytes longer than its message and the message
//! length is not obscured. Keys that were not produced by [`generate_key`]
//! must be [`KEY_SIZE`] bytes long, which [`key_is_suitable`] checks in
//! constant time.

use alloc::vec::Vec;

use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::{
    error::BoxError,
    symmetric::{self, Aes128Sha256, SymmetricSuite},
};

// CONSTANTS
// ================================================================================================

/// Number of bytes in a valid key.
pub const KEY_SIZE: usize = Aes128Sha256::KEY_SIZE;

/// Number of bytes a sealed box grows over its message.
pub const OVERHEAD: usize = Aes128Sha256::OVERHEAD;

/// Version of the box suite's wire formats and key layouts.
pub const VERSION_STRING: &str = crate::VERSION_STRING;

/// A secretbox key; zeroed on drop.
pub type Key = Zeroizing<Vec<u8>>;

// OPERATIONS
// ================================================================================================

/// Generates a key suitable for sealing and opening boxes, using the
/// operating system CSPRNG.
#[cfg(feature = "std")]
pub fn generate_key() -> Key {
    generate_key_with_rng(&mut rand::rngs::OsRng)
}

/// Generates a key suitable for sealing and opening boxes, using the
/// provided random number generator.
pub fn generate_key_with_rng<R: CryptoRng + RngCore>(rng: &mut R) -> Key {
    symmetric::generate_key::<Aes128Sha256, _>(rng)
}

/// Seals `message` under `key` using the operating system CSPRNG for the
/// IV. The box is [`OVERHEAD`] bytes longer than the message.
#[cfg(feature = "std")]
pub fn seal(message: &[u8], key: &[u8]) -> Result<Vec<u8>, BoxError> {
    seal_with_rng(&mut rand::rngs::OsRng, message, key)
}

/// Seals `message` under `key`, drawing the IV from `rng`.
pub fn seal_with_rng<R: CryptoRng + RngCore>(
    rng: &mut R,
    message: &[u8],
    key: &[u8],
) -> Result<Vec<u8>, BoxError> {
    symmetric::seal::<Aes128Sha256, _>(rng, message, key)
}

/// Authenticates and decrypts a sealed box. The returned message is
/// [`OVERHEAD`] bytes shorter than the box. On failure no plaintext is
/// returned and the box must be discarded.
pub fn open(sealed: &[u8], key: &[u8]) -> Result<Vec<u8>, BoxError> {
    symmetric::open::<Aes128Sha256>(sealed, key)
}

/// Returns true if `key` has the proper length for this profile.
pub fn key_is_suitable(key: &[u8]) -> bool {
    symmetric::key_is_suitable::<Aes128Sha256>(key)
}

// TESTS
// ================================================================================================
