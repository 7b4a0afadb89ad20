//! Elliptic-curve suite descriptors for the public-key profiles.
//!
//! Key material crosses this boundary as raw bytes: private keys are
//! big-endian scalars at the exact curve width, public keys are SEC1
//! uncompressed points. The shared secret handed back by
//! [`EcSuite::diffie_hellman`] is the X coordinate of the ECDH point
//! serialized as a fixed-width field element, so the downstream key split is
//! deterministic even when the coordinate has leading zero bytes.

use alloc::vec::Vec;

use p256::elliptic_curve::{ecdh::diffie_hellman, sec1::ToEncodedPoint};
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256, Sha384};
use subtle::{Choice, ConstantTimeEq};
use thiserror::Error;
use zeroize::Zeroizing;

// ERROR TYPE
// ================================================================================================

/// Errors from curve-level helpers; collapsed to the opaque public error at
/// the profile layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum EcError {
    /// The private-key bytes do not encode a valid scalar.
    #[error("invalid private key scalar")]
    InvalidPrivateKey,
    /// The public-key bytes do not decode to a point on the curve.
    #[error("invalid public key point")]
    InvalidPublicKey,
    /// The signing primitive rejected the input.
    #[error("signing failed")]
    SigningFailed,
}

// SUITE DESCRIPTOR
// ================================================================================================

/// Descriptor for one elliptic-curve profile.
pub(crate) trait EcSuite {
    /// Exact byte length of a private-key scalar.
    const PRIVATE_KEY_SIZE: usize;
    /// Exact byte length of an uncompressed public-key point.
    const PUBLIC_KEY_SIZE: usize;
    /// Output length of the profile digest.
    const DIGEST_SIZE: usize;

    /// Generates a keypair as (big-endian scalar, uncompressed SEC1 point).
    fn generate_keypair<R: CryptoRng + RngCore>(rng: &mut R) -> (Zeroizing<Vec<u8>>, Vec<u8>);

    /// Computes the ECDH shared point and returns its X coordinate as a
    /// fixed-width big-endian byte string of the curve's field size.
    fn diffie_hellman(private: &[u8], peer: &[u8]) -> Result<Zeroizing<Vec<u8>>, EcError>;

    /// Computes the profile digest of `data`.
    fn digest(data: &[u8]) -> Vec<u8>;

    /// Signs the profile digest of `message`, returning the fixed-width
    /// big-endian (r, s) halves.
    fn sign(message: &[u8], private: &[u8]) -> Result<(Vec<u8>, Vec<u8>), EcError>;

    /// Verifies (r, s) halves, given at full or minimal width, against the
    /// profile digest of `message`.
    fn verify(message: &[u8], r: &[u8], s: &[u8], peer: &[u8]) -> bool;
}

/// NIST P-256 with SHA-256, the 20-year profile.
pub(crate) struct P256;

impl EcSuite for P256 {
    const PRIVATE_KEY_SIZE: usize = 32;
    const PUBLIC_KEY_SIZE: usize = 65;
    const DIGEST_SIZE: usize = 32;

    fn generate_keypair<R: CryptoRng + RngCore>(rng: &mut R) -> (Zeroizing<Vec<u8>>, Vec<u8>) {
        let secret = p256::SecretKey::random(rng);
        let private = Zeroizing::new(secret.to_bytes().as_slice().to_vec());
        let public = secret.public_key().to_encoded_point(false).as_bytes().to_vec();
        (private, public)
    }

    fn diffie_hellman(private: &[u8], peer: &[u8]) -> Result<Zeroizing<Vec<u8>>, EcError> {
        let secret =
            p256::SecretKey::from_slice(private).map_err(|_| EcError::InvalidPrivateKey)?;
        let peer =
            p256::PublicKey::from_sec1_bytes(peer).map_err(|_| EcError::InvalidPublicKey)?;
        let shared = diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
        Ok(Zeroizing::new(shared.raw_secret_bytes().as_slice().to_vec()))
    }

    fn digest(data: &[u8]) -> Vec<u8> {
        Sha256::digest(data).as_slice().to_vec()
    }

    fn sign(message: &[u8], private: &[u8]) -> Result<(Vec<u8>, Vec<u8>), EcError> {
        use p256::ecdsa::signature::hazmat::PrehashSigner;

        let key =
            p256::ecdsa::SigningKey::from_slice(private).map_err(|_| EcError::InvalidPrivateKey)?;
        let digest = Sha256::digest(message);
        let signature: p256::ecdsa::Signature =
            key.sign_prehash(digest.as_slice()).map_err(|_| EcError::SigningFailed)?;
        let (r, s) = signature.split_bytes();
        Ok((r.as_slice().to_vec(), s.as_slice().to_vec()))
    }

    fn verify(message: &[u8], r: &[u8], s: &[u8], peer: &[u8]) -> bool {
        use p256::ecdsa::signature::hazmat::PrehashVerifier;

        let (Some(r), Some(s)) = (pad_scalar::<32>(r), pad_scalar::<32>(s)) else {
            return false;
        };
        let Ok(key) = p256::ecdsa::VerifyingKey::from_sec1_bytes(peer) else {
            return false;
        };
        let Ok(signature) = p256::ecdsa::Signature::from_scalars(
            p256::FieldBytes::clone_from_slice(&r),
            p256::FieldBytes::clone_from_slice(&s),
        ) else {
            return false;
        };
        let digest = Sha256::digest(message);
        key.verify_prehash(digest.as_slice(), &signature).is_ok()
    }
}

/// NIST P-521 with SHA-384, the 50-year profile.
pub(crate) struct P521;

impl EcSuite for P521 {
    const PRIVATE_KEY_SIZE: usize = 66;
    const PUBLIC_KEY_SIZE: usize = 133;
    const DIGEST_SIZE: usize = 48;

    fn generate_keypair<R: CryptoRng + RngCore>(rng: &mut R) -> (Zeroizing<Vec<u8>>, Vec<u8>) {
        let secret = p521::SecretKey::random(rng);
        let private = Zeroizing::new(secret.to_bytes().as_slice().to_vec());
        let public = secret.public_key().to_encoded_point(false).as_bytes().to_vec();
        (private, public)
    }

    fn diffie_hellman(private: &[u8], peer: &[u8]) -> Result<Zeroizing<Vec<u8>>, EcError> {
        let secret =
            p521::SecretKey::from_slice(private).map_err(|_| EcError::InvalidPrivateKey)?;
        let peer =
            p521::PublicKey::from_sec1_bytes(peer).map_err(|_| EcError::InvalidPublicKey)?;
        let shared = diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
        Ok(Zeroizing::new(shared.raw_secret_bytes().as_slice().to_vec()))
    }

    fn digest(data: &[u8]) -> Vec<u8> {
        Sha384::digest(data).as_slice().to_vec()
    }

    fn sign(message: &[u8], private: &[u8]) -> Result<(Vec<u8>, Vec<u8>), EcError> {
        use p521::ecdsa::signature::hazmat::PrehashSigner;

        let key =
            p521::ecdsa::SigningKey::from_slice(private).map_err(|_| EcError::InvalidPrivateKey)?;
        let digest = Sha384::digest(message);
        let signature: p521::ecdsa::Signature =
            key.sign_prehash(digest.as_slice()).map_err(|_| EcError::SigningFailed)?;
        let (r, s) = signature.split_bytes();
        Ok((r.as_slice().to_vec(), s.as_slice().to_vec()))
    }

    fn verify(message: &[u8], r: &[u8], s: &[u8], peer: &[u8]) -> bool {
        use p521::ecdsa::signature::hazmat::PrehashVerifier;

        let (Some(r), Some(s)) = (pad_scalar::<66>(r), pad_scalar::<66>(s)) else {
            return false;
        };
        let Ok(key) = p521::ecdsa::VerifyingKey::from_sec1_bytes(peer) else {
            return false;
        };
        let Ok(signature) = p521::ecdsa::Signature::from_scalars(
            p521::FieldBytes::clone_from_slice(&r),
            p521::FieldBytes::clone_from_slice(&s),
        ) else {
            return false;
        };
        let digest = Sha384::digest(message);
        key.verify_prehash(digest.as_slice(), &signature).is_ok()
    }
}

// KEY DERIVATION
// ================================================================================================

/// Derives a symmetric box key from an ECDH exchange.
///
/// The first `crypt_key_size` bytes of the shared X coordinate become the
/// cipher key; the profile digest of the remainder becomes the MAC key, so
/// the two halves are not correlated.
pub(crate) fn derive_shared_key<E: EcSuite>(
    private: &[u8],
    peer: &[u8],
    crypt_key_size: usize,
) -> Result<Zeroizing<Vec<u8>>, EcError> {
    let shared = E::diffie_hellman(private, peer)?;
    let (enc, mac) = shared.split_at(crypt_key_size);
    let mac_key = Zeroizing::new(E::digest(mac));

    let mut key = Zeroizing::new(Vec::with_capacity(crypt_key_size + E::DIGEST_SIZE));
    key.extend_from_slice(enc);
    key.extend_from_slice(&mac_key);
    Ok(key)
}

// KEY VALIDATION
// ================================================================================================

/// Validates optional key material against exact profile lengths.
///
/// Returns true only when at least one key is supplied and every supplied
/// key has its exact length. Length comparisons are constant-time since this
/// gates cryptographic processing.
pub(crate) fn keys_are_suitable(
    private: Option<&[u8]>,
    public: Option<&[u8]>,
    private_len: usize,
    public_len: usize,
) -> bool {
    if private.is_none() && public.is_none() {
        return false;
    }
    let mut ok = Choice::from(1);
    if let Some(key) = private {
        ok &= (key.len() as u32).ct_eq(&(private_len as u32));
    }
    if let Some(key) = public {
        ok &= (key.len() as u32).ct_eq(&(public_len as u32));
    }
    ok.into()
}

// HELPERS
// ================================================================================================

/// Strips leading zero bytes from a big-endian scalar; the wire form carries
/// minimal-length integers.
pub(crate) fn trim_scalar(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

/// Left-pads a big-endian scalar to `N` bytes; rejects wider input.
fn pad_scalar<const N: usize>(bytes: &[u8]) -> Option<[u8; N]> {
    if bytes.len() > N {
        return None;
    }
    let mut out = [0u8; N];
    out[N - bytes.len()..].copy_from_slice(bytes);
    Some(out)
}

// TESTS
// ================================================================================================
