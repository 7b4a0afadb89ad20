//! Authenticated public-key encryption at a 20-year security level.
//!
//! The interface is modelled on NaCl's box: sealing generates an ephemeral
//! ECDH keypair over NIST P-256, derives a fresh [`crate::secretbox`] key
//! from the exchange with the recipient's public key, and prepends the
//! ephemeral public key to the sealed message. Opening runs the exchange
//! from the recipient's side. Signed boxes carry an ECDSA P-256 signature
//! over the message (before encryption) and are opened with
//! [`open_and_verify`].
//!
//! The module is named `box_` because `box` is a reserved word in Rust.

use alloc::vec::Vec;

use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::{
    ec::{self, derive_shared_key, EcSuite, P256},
    error::BoxError,
    secretbox,
    symmetric::{self, Aes128Sha256, SymmetricSuite},
};

// CONSTANTS
// ================================================================================================

/// Exact byte length of a private-key scalar.
pub const PRIVATE_KEY_SIZE: usize = P256::PRIVATE_KEY_SIZE;

/// Exact byte length of an uncompressed public-key point.
pub const PUBLIC_KEY_SIZE: usize = P256::PUBLIC_KEY_SIZE;

/// Byte length of a signature: r and s, each zero-padded to 32 bytes.
pub const SIGNATURE_SIZE: usize = 64;

/// Byte length of the symmetric key derived from an ECDH exchange.
pub const SHARED_KEY_SIZE: usize = secretbox::KEY_SIZE;

/// Number of bytes a sealed box grows over its message.
pub const OVERHEAD: usize = PUBLIC_KEY_SIZE + secretbox::OVERHEAD;

/// Number of bytes a signed and sealed box grows over its message.
pub const SIGNED_OVERHEAD: usize = OVERHEAD + SIGNATURE_SIZE;

/// Version of the box suite's wire formats and key layouts.
pub const VERSION_STRING: &str = crate::VERSION_STRING;

/// A private key: the raw big-endian P-256 scalar; zeroed on drop.
pub type PrivateKey = Zeroizing<Vec<u8>>;

/// A public key: the uncompressed SEC1 encoding of a P-256 point.
pub type PublicKey = Vec<u8>;

// KEY MANAGEMENT
// ================================================================================================

/// Generates a keypair using the operating system CSPRNG.
#[cfg(feature = "std")]
pub fn generate_key() -> (PrivateKey, PublicKey) {
    generate_key_with_rng(&mut rand::rngs::OsRng)
}

/// Generates a keypair using the provided random number generator.
pub fn generate_key_with_rng<R: CryptoRng + RngCore>(rng: &mut R) -> (PrivateKey, PublicKey) {
    P256::generate_keypair(rng)
}

/// Returns true only when at least one key is supplied and every supplied
/// key has the exact length for this profile. Length checks are
/// constant-time since they gate cryptographic processing.
pub fn key_is_suitable(private: Option<&[u8]>, public: Option<&[u8]>) -> bool {
    ec::keys_are_suitable(private, public, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE)
}

// SEALING AND OPENING
// ================================================================================================

/// Seals `message` for `peer` using the operating system CSPRNG.
#[cfg(feature = "std")]
pub fn seal(message: &[u8], peer: &[u8]) -> Result<Vec<u8>, BoxError> {
    seal_with_rng(&mut rand::rngs::OsRng, message, peer)
}

/// Seals `message` for `peer`. The box is [`OVERHEAD`] bytes longer than the
/// message and does not depend on any long-term sender key.
pub fn seal_with_rng<R: CryptoRng + RngCore>(
    rng: &mut R,
    message: &[u8],
    peer: &[u8],
) -> Result<Vec<u8>, BoxError> {
    if !key_is_suitable(None, Some(peer)) {
        return Err(BoxError);
    }

    let (ephemeral_private, ephemeral_public) = P256::generate_keypair(rng);
    let shared =
        derive_shared_key::<P256>(&ephemeral_private, peer, Aes128Sha256::CRYPT_KEY_SIZE)?;
    let sealed = symmetric::seal::<Aes128Sha256, _>(rng, message, &shared)?;

    let mut out = Vec::with_capacity(PUBLIC_KEY_SIZE + sealed.len());
    out.extend_from_slice(&ephemeral_public);
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Authenticates and decrypts a sealed box. The returned message is
/// [`OVERHEAD`] bytes shorter than the box. On failure no plaintext is
/// returned and the box must be discarded.
pub fn open(sealed: &[u8], private: &[u8]) -> Result<Vec<u8>, BoxError> {
    if !key_is_suitable(Some(private), None) {
        return Err(BoxError);
    }
    if sealed.len() < OVERHEAD {
        return Err(BoxError);
    }

    let (ephemeral_public, body) = sealed.split_at(PUBLIC_KEY_SIZE);
    let shared = derive_shared_key::<P256>(private, ephemeral_public, Aes128Sha256::CRYPT_KEY_SIZE)?;
    symmetric::open::<Aes128Sha256>(body, &shared)
}

// SIGNED BOXES
// ================================================================================================

/// Signs `message` and seals it for `peer` using the operating system
/// CSPRNG.
#[cfg(feature = "std")]
pub fn sign_and_seal(
    message: &[u8],
    private: &[u8],
    public: &[u8],
    peer: &[u8],
) -> Result<Vec<u8>, BoxError> {
    sign_and_seal_with_rng(&mut rand::rngs::OsRng, message, private, public, peer)
}

/// Signs `message` with the sender's keypair and seals message and signature
/// for `peer`. The box is [`SIGNED_OVERHEAD`] bytes longer than the message.
pub fn sign_and_seal_with_rng<R: CryptoRng + RngCore>(
    rng: &mut R,
    message: &[u8],
    private: &[u8],
    public: &[u8],
    peer: &[u8],
) -> Result<Vec<u8>, BoxError> {
    if !key_is_suitable(Some(private), Some(public)) {
        return Err(BoxError);
    }

    let (r, s) = P256::sign(message, private)?;
    let mut signed = Zeroizing::new(Vec::with_capacity(message.len() + SIGNATURE_SIZE));
    signed.extend_from_slice(message);
    signed.extend_from_slice(&r);
    signed.extend_from_slice(&s);
    seal_with_rng(rng, &signed, peer)
}

/// Opens a signed box and verifies the signature against `signer_public`.
/// If the box cannot be opened or the signature does not match, no message
/// is returned.
pub fn open_and_verify(
    sealed: &[u8],
    private: &[u8],
    signer_public: &[u8],
) -> Result<Vec<u8>, BoxError> {
    if !key_is_suitable(None, Some(signer_public)) {
        return Err(BoxError);
    }

    let signed = Zeroizing::new(open(sealed, private)?);
    if signed.len() <= SIGNATURE_SIZE {
        return Err(BoxError);
    }
    let (message, signature) = signed.split_at(signed.len() - SIGNATURE_SIZE);
    let (r, s) = signature.split_at(SIGNATURE_SIZE / 2);
    if !P256::verify(message, r, s, signer_public) {
        return Err(BoxError);
    }
    Ok(message.to_vec())
}

// TESTS
// ================================================================================================
