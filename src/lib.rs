#![no_std]

//! NaCl-style authenticated encryption boxes built from NIST-approved
//! primitives.
//!
//! The crate ships two symmetric profiles and two public-key profiles, each
//! pairing a cipher suite with a target security lifetime:
//!
//! - [`secretbox`] - AES-128-CTR + HMAC-SHA-256 over caller-supplied keys
//!   (20-year security)
//! - [`strongbox`] - AES-256-CTR + HMAC-SHA-384 over caller-supplied keys
//!   (50-year security)
//! - [`box_`] - hybrid encryption over NIST P-256 delivering a fresh
//!   secretbox key per message, with optional ECDSA signatures
//! - [`stoutbox`] - hybrid encryption over NIST P-521 delivering a fresh
//!   strongbox key per message, with typed envelopes, detached signatures,
//!   key attestation, and multi-recipient shared boxes
//!
//! A box is a self-contained authenticated ciphertext: sealing a message
//! binds it to a fresh random IV (and, for the public-key profiles, a fresh
//! ephemeral keypair), and opening verifies the MAC in constant time before
//! any plaintext is released. Message lengths are not obscured.
//!
//! Every operation that consumes randomness exists in two forms: the plain
//! name uses the operating system CSPRNG and requires the `std` feature,
//! while the `_with_rng` form accepts any [`rand::CryptoRng`] source, which
//! also makes deterministic testing possible.
//!
//! All failures surface as the opaque [`BoxError`]; on failure no partial
//! output is ever returned.

#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod ec;
mod error;
mod symmetric;

pub mod box_;
pub mod secretbox;
pub mod stoutbox;
pub mod strongbox;
pub mod wire;

pub use error::BoxError;

// CONSTANTS
// ================================================================================================

/// Version of the box suite's wire formats and key layouts.
pub const VERSION_STRING: &str = "2.0.0";
