//! Authenticated public-key encryption at a 50-year security level.
//!
//! Sealing generates an ephemeral ECDH keypair over NIST P-521, derives a
//! fresh [`crate::strongbox`] key from the exchange with the recipient's
//! public key, and wraps everything in a typed envelope:
//!
//! ```text
//! type(1) ‖ Frame(ephemeral public key) ‖ Frame(strongbox(payload))
//! ```
//!
//! where a frame is a u32 big-endian length prefix followed by its payload.
//! The type byte distinguishes unsigned boxes, signed boxes, and the shared
//! (multi-recipient) variants; every open operation requires the exact type
//! it expects, so a box produced by one variant can never be passed off as
//! another.
//!
//! Beyond seal/open the module provides detached signatures over ECDSA
//! P-521 with SHA-384 ([`sign`], [`verify`]), key attestation ([`sign_key`],
//! [`verify_signed_key`]), a precomputed [`shared_key`] for callers that
//! exchange many messages with one peer, and shared boxes that deliver a
//! single payload to any of N recipients (see [`seal_shared`]).

use alloc::vec::Vec;

use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::{
    ec::{self, derive_shared_key, EcSuite, P521},
    error::BoxError,
    strongbox,
    symmetric::{self, Aes256Sha384, SymmetricSuite},
    wire::{self, FrameReader, FrameWriter},
};

mod shared;
pub use shared::{
    open_shared, open_shared_and_verify, seal_shared_with_rng, sign_and_seal_shared_with_rng,
};
#[cfg(feature = "std")]
pub use shared::{seal_shared, sign_and_seal_shared};

#[cfg(test)]
mod tests;

// CONSTANTS
// ================================================================================================

/// Exact byte length of a private-key scalar.
pub const PRIVATE_KEY_SIZE: usize = P521::PRIVATE_KEY_SIZE;

/// Exact byte length of an uncompressed public-key point.
pub const PUBLIC_KEY_SIZE: usize = P521::PUBLIC_KEY_SIZE;

/// Upper bound on the wire length of a signature: two frames carrying
/// full-width 66-byte scalars.
pub const SIG_SIZE: usize = 140;

/// Byte length of the symmetric key derived from an ECDH exchange.
pub const SHARED_KEY_SIZE: usize = strongbox::KEY_SIZE;

/// Envelope framing cost: the type byte plus two frame length prefixes.
const FRAMING_OVERHEAD: usize = 1 + wire::LEN_PREFIX_SIZE * 2;

/// Number of bytes a sealed box grows over its message.
pub const OVERHEAD: usize = FRAMING_OVERHEAD + PUBLIC_KEY_SIZE + strongbox::OVERHEAD;

/// Number of bytes a signed and sealed box grows over its message, counting
/// the signature at its [`SIG_SIZE`] ceiling. The actual box exceeds the
/// message by at most this plus the two inner frame prefixes.
pub const SIGNED_OVERHEAD: usize = OVERHEAD + SIG_SIZE;

/// Version of the box suite's wire formats and key layouts.
pub const VERSION_STRING: &str = crate::VERSION_STRING;

/// Tag byte introducing the recipient list of a shared box.
pub(crate) const PEER_LIST_TAG: u8 = 21;

/// A private key: the raw big-endian P-521 scalar; zeroed on drop.
pub type PrivateKey = Zeroizing<Vec<u8>>;

/// A public key: the uncompressed SEC1 encoding of a P-521 point.
pub type PublicKey = Vec<u8>;

// BOX TYPES
// ================================================================================================

/// Envelope discriminator carried in the first byte of every box.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxType {
    /// A sealed message without a signature.
    Unsigned = 1,
    /// A sealed message accompanied by a signature over the plaintext.
    Signed = 2,
    /// A message sealed once and wrapped for several recipients.
    Shared = 11,
    /// A shared box whose payload carries a signature over the plaintext.
    SharedSigned = 12,
}

impl TryFrom<u8> for BoxType {
    type Error = BoxError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(BoxType::Unsigned),
            2 => Ok(BoxType::Signed),
            11 => Ok(BoxType::Shared),
            12 => Ok(BoxType::SharedSigned),
            _ => Err(BoxError),
        }
    }
}

/// Reports whether a box claims to carry a signature that opening will
/// verify.
pub fn box_is_signed(sealed: &[u8]) -> bool {
    matches!(
        sealed.first().copied().map(BoxType::try_from),
        Some(Ok(BoxType::Signed)) | Some(Ok(BoxType::SharedSigned))
    )
}

// KEY MANAGEMENT
// ================================================================================================

/// Generates a keypair using the operating system CSPRNG.
#[cfg(feature = "std")]
pub fn generate_key() -> (PrivateKey, PublicKey) {
    generate_key_with_rng(&mut rand::rngs::OsRng)
}

/// Generates a keypair using the provided random number generator.
pub fn generate_key_with_rng<R: CryptoRng + RngCore>(rng: &mut R) -> (PrivateKey, PublicKey) {
    P521::generate_keypair(rng)
}

/// Returns true only when at least one key is supplied and every supplied
/// key has the exact length for this profile. Length checks are
/// constant-time since they gate cryptographic processing.
pub fn key_is_suitable(private: Option<&[u8]>, public: Option<&[u8]>) -> bool {
    ec::keys_are_suitable(private, public, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE)
}

/// Computes the symmetric key shared between `private` and `peer`. The
/// result is a ready-to-use strongbox key of [`SHARED_KEY_SIZE`] bytes and
/// is zeroed on drop; both sides of the exchange derive the same key.
pub fn shared_key(private: &[u8], peer: &[u8]) -> Result<Zeroizing<Vec<u8>>, BoxError> {
    if !key_is_suitable(Some(private), Some(peer)) {
        return Err(BoxError);
    }
    Ok(derive_shared_key::<P521>(private, peer, Aes256Sha384::CRYPT_KEY_SIZE)?)
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
    seal_box(rng, message, peer, BoxType::Unsigned)
}

/// Authenticates and decrypts a sealed box. The returned message is
/// [`OVERHEAD`] bytes shorter than the box. Boxes of any other type,
/// including signed ones, are rejected.
pub fn open(sealed: &[u8], private: &[u8]) -> Result<Vec<u8>, BoxError> {
    open_box(sealed, private, BoxType::Unsigned)
}

/// Seals `payload` into an envelope of the given type.
pub(crate) fn seal_box<R: CryptoRng + RngCore>(
    rng: &mut R,
    payload: &[u8],
    peer: &[u8],
    box_type: BoxType,
) -> Result<Vec<u8>, BoxError> {
    if !key_is_suitable(None, Some(peer)) {
        return Err(BoxError);
    }

    let (ephemeral_private, ephemeral_public) = P521::generate_keypair(rng);
    let shared =
        derive_shared_key::<P521>(&ephemeral_private, peer, Aes256Sha384::CRYPT_KEY_SIZE)?;
    let sealed = symmetric::seal::<Aes256Sha384, _>(rng, payload, &shared)?;

    let mut envelope = FrameWriter::with_capacity(payload.len() + OVERHEAD);
    envelope.write_tag(box_type as u8);
    envelope.write_frame(&ephemeral_public)?;
    envelope.write_frame(&sealed)?;
    Ok(envelope.into_bytes())
}

/// Opens an envelope, requiring its type byte to match `expected`.
pub(crate) fn open_box(
    sealed: &[u8],
    private: &[u8],
    expected: BoxType,
) -> Result<Vec<u8>, BoxError> {
    if !key_is_suitable(Some(private), None) {
        return Err(BoxError);
    }
    if sealed.len() < OVERHEAD {
        return Err(BoxError);
    }

    let mut reader = FrameReader::new(sealed);
    let box_type = BoxType::try_from(reader.read_tag()?)?;
    if box_type != expected {
        return Err(BoxError);
    }
    let ephemeral_public = reader.next_frame()?;
    let body = reader.next_frame()?;

    let shared = derive_shared_key::<P521>(private, ephemeral_public, Aes256Sha384::CRYPT_KEY_SIZE)?;
    symmetric::open::<Aes256Sha384>(body, &shared)
}

// SIGNATURES
// ================================================================================================

/// Signs `message` with ECDSA P-521 over its SHA-384 digest. The signature
/// is two frames carrying minimal big-endian r and s, at most [`SIG_SIZE`]
/// bytes in total.
pub fn sign(message: &[u8], private: &[u8], public: &[u8]) -> Result<Vec<u8>, BoxError> {
    if !key_is_suitable(Some(private), Some(public)) {
        return Err(BoxError);
    }

    let (r, s) = P521::sign(message, private)?;
    let mut writer = FrameWriter::with_capacity(SIG_SIZE);
    writer.write_frame(ec::trim_scalar(&r))?;
    writer.write_frame(ec::trim_scalar(&s))?;
    Ok(writer.into_bytes())
}

/// Verifies a detached signature produced by [`sign`] against `peer`.
pub fn verify(message: &[u8], signature: &[u8], peer: &[u8]) -> bool {
    if !key_is_suitable(None, Some(peer)) {
        return false;
    }

    let mut reader = FrameReader::new(signature);
    let (Ok(r), Ok(s)) = (reader.next_frame(), reader.next_frame()) else {
        return false;
    };
    P521::verify(message, r, s, peer)
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

/// Signs `message` with the sender's keypair and seals the framed message
/// and signature for `peer` in a [`BoxType::Signed`] envelope.
pub fn sign_and_seal_with_rng<R: CryptoRng + RngCore>(
    rng: &mut R,
    message: &[u8],
    private: &[u8],
    public: &[u8],
    peer: &[u8],
) -> Result<Vec<u8>, BoxError> {
    let payload = signed_payload(message, private, public)?;
    seal_box(rng, &payload, peer, BoxType::Signed)
}

/// Opens a signed box and verifies the signature against `signer_public`.
/// If the box cannot be opened, has the wrong type, or the signature does
/// not match, no message is returned.
pub fn open_and_verify(
    sealed: &[u8],
    private: &[u8],
    signer_public: &[u8],
) -> Result<Vec<u8>, BoxError> {
    let payload = Zeroizing::new(open_box(sealed, private, BoxType::Signed)?);
    let (message, signature) = split_signed_payload(&payload)?;
    if !verify(message, signature, signer_public) {
        return Err(BoxError);
    }
    Ok(message.to_vec())
}

/// Builds `Frame(message) ‖ Frame(signature)` in a buffer zeroed on drop.
pub(crate) fn signed_payload(
    message: &[u8],
    private: &[u8],
    public: &[u8],
) -> Result<Zeroizing<Vec<u8>>, BoxError> {
    let signature = sign(message, private, public)?;
    let mut payload = Zeroizing::new(Vec::with_capacity(
        message.len() + signature.len() + wire::LEN_PREFIX_SIZE * 2,
    ));
    wire::write_frame_into(&mut payload, message)?;
    wire::write_frame_into(&mut payload, &signature)?;
    Ok(payload)
}

/// Splits an opened signed payload back into message and signature.
pub(crate) fn split_signed_payload(payload: &[u8]) -> Result<(&[u8], &[u8]), BoxError> {
    let mut reader = FrameReader::new(payload);
    let message = reader.next_frame()?;
    let signature = reader.next_frame()?;
    Ok((message, signature))
}

// KEY SIGNING
// ================================================================================================

/// Produces an attestation over `peer`: the signer vouches for the peer's
/// public key by signing its SHA-384 digest.
pub fn sign_key(private: &[u8], public: &[u8], peer: &[u8]) -> Result<Vec<u8>, BoxError> {
    if !key_is_suitable(None, Some(peer)) {
        return Err(BoxError);
    }
    sign(peer, private, public)
}

/// Checks an attestation produced by [`sign_key`] over `peer` against the
/// signer's public key.
pub fn verify_signed_key(peer: &[u8], signer_public: &[u8], signature: &[u8]) -> bool {
    if !key_is_suitable(None, Some(peer)) {
        return false;
    }
    verify(peer, signature, signer_public)
}
