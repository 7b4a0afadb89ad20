//! Authenticated symmetric encryption for small messages at a 50-year
//! security level, assuming the keys are not compromised.
//!
//! The construction mirrors [`crate::secretbox`] with the strength turned
//! up: AES-256 in CTR mode with HMAC-SHA-384 over the IV and ciphertext.
//! Keys are [`KEY_SIZE`] bytes and a sealed box is [`OVERHEAD`] bytes longer
//! than its message.

use alloc::vec::Vec;

use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::{
    error::BoxError,
    symmetric::{self, Aes256Sha384, SymmetricSuite},
};

// CONSTANTS
// ================================================================================================

/// Number of bytes in a valid key.
pub const KEY_SIZE: usize = Aes256Sha384::KEY_SIZE;

/// Number of bytes a sealed box grows over its message.
pub const OVERHEAD: usize = Aes256Sha384::OVERHEAD;

/// Version of the box suite's wire formats and key layouts.
pub const VERSION_STRING: &str = crate::VERSION_STRING;

/// A strongbox key; zeroed on drop.
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
    symmetric::generate_key::<Aes256Sha384, _>(rng)
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
    symmetric::seal::<Aes256Sha384, _>(rng, message, key)
}

/// Authenticates and decrypts a sealed box. The returned message is
/// [`OVERHEAD`] bytes shorter than the box. On failure no plaintext is
/// returned and the box must be discarded.
pub fn open(sealed: &[u8], key: &[u8]) -> Result<Vec<u8>, BoxError> {
    symmetric::open::<Aes256Sha384>(sealed, key)
}

/// Returns true if `key` has the proper length for this profile.
pub fn key_is_suitable(key: &[u8]) -> bool {
    symmetric::key_is_suitable::<Aes256Sha384>(key)
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::rngs::OsRng;

    use super::*;

    #[test]
    fn generated_keys_are_suitable_and_distinct() {
        let k1 = generate_key();
        let k2 = generate_key();
        assert_eq!(k1.len(), KEY_SIZE);
        assert!(key_is_suitable(&k1));
        assert_ne!(k1.as_slice(), k2.as_slice());
    }

    #[test]
    fn seal_then_open_roundtrips() {
        let key = generate_key();
        let message = b"Jayne, go play with your rainstick.";
        let sealed = seal(message, &key).unwrap();
        assert_eq!(sealed.len(), message.len() + OVERHEAD);
        assert_eq!(open(&sealed, &key).unwrap(), message);
    }

    #[test]
    fn wrong_key_is_rejected() {
        let key = generate_key();
        let other = generate_key();
        let sealed = seal(b"for one key only", &key).unwrap();
        assert!(open(&sealed, &other).is_err());
    }

    #[test]
    fn every_byte_is_covered_by_the_tag() {
        let key = generate_key();
        let sealed = seal(b"flip me", &key).unwrap();
        for i in 0..sealed.len() {
            let mut mutated = sealed.clone();
            mutated[i] ^= 0x01;
            assert!(open(&mutated, &key).is_err(), "mutation at byte {i} was accepted");
        }
    }

    #[test]
    fn truncated_boxes_are_rejected() {
        let key = generate_key();
        let sealed = seal(b"short", &key).unwrap();
        assert!(open(&sealed[..OVERHEAD], &key).is_err());
        assert!(open(&[], &key).is_err());
    }

    #[test]
    fn bad_key_lengths_are_rejected() {
        assert!(!key_is_suitable(&[]));
        assert!(!key_is_suitable(&[0u8; KEY_SIZE - 1]));
        assert!(!key_is_suitable(&[0u8; KEY_SIZE + 1]));
        assert!(key_is_suitable(&[0u8; KEY_SIZE]));

        // A secretbox-sized key must not be accepted here.
        assert!(!key_is_suitable(&[0u8; crate::secretbox::KEY_SIZE]));
    }

    proptest! {
        #[test]
        fn roundtrip_holds_for_arbitrary_messages(message in proptest::collection::vec(any::<u8>(), 1..2048)) {
            let key = generate_key_with_rng(&mut OsRng);
            let sealed = seal_with_rng(&mut OsRng, &message, &key).unwrap();
            prop_assert_eq!(sealed.len(), message.len() + OVERHEAD);
            prop_assert_eq!(open(&sealed, &key).unwrap(), message);
        }
    }
}
