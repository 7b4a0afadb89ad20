//! Generic encrypt-then-MAC construction shared by the symmetric profiles.
//!
//! Both profiles seal a message as `IV ‖ AES-CTR(m) ‖ HMAC(IV ‖ ciphertext)`
//! and differ only in cipher and MAC strength, captured by a
//! [`SymmetricSuite`] descriptor. The MAC covers the IV together with the
//! ciphertext, and tag as well as key-length comparisons are constant-time.

use alloc::vec::Vec;

use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::{digest::KeyInit, Hmac, Mac};
use rand::{CryptoRng, RngCore};
use sha2::{Sha256, Sha384};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::BoxError;

// CONSTANTS
// ================================================================================================

/// Number of bytes in the random IV placed at the front of every box.
pub(crate) const IV_SIZE: usize = 16;

// SUITE DESCRIPTOR
// ================================================================================================

/// Descriptor for one symmetric profile.
pub(crate) trait SymmetricSuite {
    /// Bytes of the key devoted to the stream cipher.
    const CRYPT_KEY_SIZE: usize;
    /// Bytes of the key devoted to the MAC.
    const TAG_KEY_SIZE: usize;
    /// Total key length.
    const KEY_SIZE: usize = Self::CRYPT_KEY_SIZE + Self::TAG_KEY_SIZE;
    /// Length of the MAC tag appended to the ciphertext.
    const TAG_SIZE: usize;
    /// Ciphertext expansion: IV plus tag.
    const OVERHEAD: usize = IV_SIZE + Self::TAG_SIZE;

    /// The stream cipher keyed with the first [`Self::CRYPT_KEY_SIZE`] bytes.
    type Cipher: KeyIvInit + StreamCipher;
    /// The MAC keyed with the remaining [`Self::TAG_KEY_SIZE`] bytes.
    type Mac: Mac + KeyInit;
}

/// AES-128-CTR with HMAC-SHA-256, the 20-year profile.
pub(crate) struct Aes128Sha256;

impl SymmetricSuite for Aes128Sha256 {
    const CRYPT_KEY_SIZE: usize = 16;
    const TAG_KEY_SIZE: usize = 32;
    const TAG_SIZE: usize = 32;

    type Cipher = ctr::Ctr128BE<aes::Aes128>;
    type Mac = Hmac<Sha256>;
}

/// AES-256-CTR with HMAC-SHA-384, the 50-year profile.
pub(crate) struct Aes256Sha384;

impl SymmetricSuite for Aes256Sha384 {
    const CRYPT_KEY_SIZE: usize = 32;
    const TAG_KEY_SIZE: usize = 48;
    const TAG_SIZE: usize = 48;

    type Cipher = ctr::Ctr128BE<aes::Aes256>;
    type Mac = Hmac<Sha384>;
}

// OPERATIONS
// ================================================================================================

/// Generates a fresh random key for the suite.
pub(crate) fn generate_key<S: SymmetricSuite, R: CryptoRng + RngCore>(
    rng: &mut R,
) -> Zeroizing<Vec<u8>> {
    let mut key = Zeroizing::new(vec![0u8; S::KEY_SIZE]);
    rng.fill_bytes(&mut key);
    key
}

/// Validates the key length in constant time.
pub(crate) fn key_is_suitable<S: SymmetricSuite>(key: &[u8]) -> bool {
    (key.len() as u32).ct_eq(&(S::KEY_SIZE as u32)).into()
}

/// Seals `message` under `key`, producing `IV ‖ ciphertext ‖ tag`.
pub(crate) fn seal<S: SymmetricSuite, R: CryptoRng + RngCore>(
    rng: &mut R,
    message: &[u8],
    key: &[u8],
) -> Result<Vec<u8>, BoxError> {
    if !key_is_suitable::<S>(key) {
        return Err(BoxError);
    }

    let mut out = Vec::with_capacity(message.len() + S::OVERHEAD);
    let mut iv = [0u8; IV_SIZE];
    rng.fill_bytes(&mut iv);
    out.extend_from_slice(&iv);
    out.extend_from_slice(message);

    let mut cipher =
        S::Cipher::new_from_slices(&key[..S::CRYPT_KEY_SIZE], &iv).map_err(|_| BoxError)?;
    cipher.apply_keystream(&mut out[IV_SIZE..]);

    let mut mac =
        <S::Mac as Mac>::new_from_slice(&key[S::CRYPT_KEY_SIZE..]).map_err(|_| BoxError)?;
    mac.update(&out);
    let tag = mac.finalize().into_bytes();
    out.extend_from_slice(tag.as_slice());
    Ok(out)
}

/// Opens a sealed box, verifying the tag before any plaintext is produced.
pub(crate) fn open<S: SymmetricSuite>(sealed: &[u8], key: &[u8]) -> Result<Vec<u8>, BoxError> {
    if !key_is_suitable::<S>(key) {
        return Err(BoxError);
    }
    if sealed.len() <= S::OVERHEAD {
        return Err(BoxError);
    }

    let (body, tag) = sealed.split_at(sealed.len() - S::TAG_SIZE);
    let mut mac =
        <S::Mac as Mac>::new_from_slice(&key[S::CRYPT_KEY_SIZE..]).map_err(|_| BoxError)?;
    mac.update(body);
    let expected = mac.finalize().into_bytes();
    if !bool::from(expected.as_slice().ct_eq(tag)) {
        return Err(BoxError);
    }

    let (iv, ciphertext) = body.split_at(IV_SIZE);
    let mut message = ciphertext.to_vec();
    let mut cipher = S::Cipher::new_from_slices(&key[..S::CRYPT_KEY_SIZE], iv).map_err(|_| BoxError)?;
    cipher.apply_keystream(&mut message);
    Ok(message)
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use rand::rngs::OsRng;

    use super::*;

    #[test]
    fn both_suites_roundtrip() {
        let message = b"suite parity check";

        let key = generate_key::<Aes128Sha256, _>(&mut OsRng);
        let sealed = seal::<Aes128Sha256, _>(&mut OsRng, message, &key).unwrap();
        assert_eq!(sealed.len(), message.len() + Aes128Sha256::OVERHEAD);
        assert_eq!(open::<Aes128Sha256>(&sealed, &key).unwrap(), message);

        let key = generate_key::<Aes256Sha384, _>(&mut OsRng);
        let sealed = seal::<Aes256Sha384, _>(&mut OsRng, message, &key).unwrap();
        assert_eq!(sealed.len(), message.len() + Aes256Sha384::OVERHEAD);
        assert_eq!(open::<Aes256Sha384>(&sealed, &key).unwrap(), message);
    }

    #[test]
    fn derived_sizes_are_consistent() {
        assert_eq!(Aes128Sha256::KEY_SIZE, 48);
        assert_eq!(Aes128Sha256::OVERHEAD, 48);
        assert_eq!(Aes256Sha384::KEY_SIZE, 80);
        assert_eq!(Aes256Sha384::OVERHEAD, 64);
    }

    #[test]
    fn tag_is_checked_before_decryption() {
        let key = generate_key::<Aes128Sha256, _>(&mut OsRng);
        let mut sealed = seal::<Aes128Sha256, _>(&mut OsRng, b"covered", &key).unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert!(open::<Aes128Sha256>(&sealed, &key).is_err());
    }
}
