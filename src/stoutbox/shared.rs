//! Shared boxes: one sealed payload openable by any of N recipients.
//!
//! The payload is sealed once under a fresh strongbox key, and that key is
//! wrapped separately for every recipient under the key derived from the
//! sender's ephemeral scalar and the recipient's public key. The envelope
//! carries the recipient list in the clear:
//!
//! ```text
//! type(1)
//! ‖ Frame(ephemeral public key)
//! ‖ Frame( peerListTag(1) ‖ Frame(u32 N) ‖ Frame(pub_1) ‖ Frame(wrap_1) ‖ … )
//! ‖ Frame(strongbox(payload))
//! ```
//!
//! Recipients locate their entry by public key; the first matching entry is
//! used. The list order is preserved from sealing and the scan touches only
//! public data.

use alloc::vec::Vec;

use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use super::{
    key_is_suitable, signed_payload, split_signed_payload, verify, BoxType, OVERHEAD,
    PEER_LIST_TAG,
};
use crate::{
    ec::{derive_shared_key, EcSuite, P521},
    error::BoxError,
    symmetric::{self, Aes256Sha384, SymmetricSuite},
    wire::{FrameReader, FrameWriter},
};

// SEALING
// ================================================================================================

/// Seals `message` for every key in `peers` using the operating system
/// CSPRNG.
#[cfg(feature = "std")]
pub fn seal_shared<P: AsRef<[u8]>>(message: &[u8], peers: &[P]) -> Result<Vec<u8>, BoxError> {
    seal_shared_with_rng(&mut rand::rngs::OsRng, message, peers)
}

/// Seals `message` so that any single key in `peers` can open it. Fails if
/// the recipient list is empty or contains an unsuitable key.
pub fn seal_shared_with_rng<R: CryptoRng + RngCore, P: AsRef<[u8]>>(
    rng: &mut R,
    message: &[u8],
    peers: &[P],
) -> Result<Vec<u8>, BoxError> {
    seal_shared_payload(rng, message, peers, BoxType::Shared)
}

/// Signs `message` and seals it for every key in `peers` using the
/// operating system CSPRNG.
#[cfg(feature = "std")]
pub fn sign_and_seal_shared<P: AsRef<[u8]>>(
    message: &[u8],
    peers: &[P],
    private: &[u8],
    public: &[u8],
) -> Result<Vec<u8>, BoxError> {
    sign_and_seal_shared_with_rng(&mut rand::rngs::OsRng, message, peers, private, public)
}

/// Signs `message` with the sender's keypair and seals the framed message
/// and signature for every key in `peers`.
pub fn sign_and_seal_shared_with_rng<R: CryptoRng + RngCore, P: AsRef<[u8]>>(
    rng: &mut R,
    message: &[u8],
    peers: &[P],
    private: &[u8],
    public: &[u8],
) -> Result<Vec<u8>, BoxError> {
    let payload = signed_payload(message, private, public)?;
    seal_shared_payload(rng, &payload, peers, BoxType::SharedSigned)
}

// OPENING
// ================================================================================================

/// Opens a shared box with the recipient's keypair. Fails if `public` is
/// not in the recipient list, if the matching wrap does not open, or if the
/// box is not of the shared unsigned type.
pub fn open_shared(sealed: &[u8], private: &[u8], public: &[u8]) -> Result<Vec<u8>, BoxError> {
    open_shared_payload(sealed, private, public, BoxType::Shared)
}

/// Opens a signed shared box and verifies the signature against
/// `signer_public`. On any failure no message is returned.
pub fn open_shared_and_verify(
    sealed: &[u8],
    private: &[u8],
    public: &[u8],
    signer_public: &[u8],
) -> Result<Vec<u8>, BoxError> {
    let payload =
        Zeroizing::new(open_shared_payload(sealed, private, public, BoxType::SharedSigned)?);
    let (message, signature) = split_signed_payload(&payload)?;
    if !verify(message, signature, signer_public) {
        return Err(BoxError);
    }
    Ok(message.to_vec())
}

// INTERNAL
// ================================================================================================

fn seal_shared_payload<R: CryptoRng + RngCore, P: AsRef<[u8]>>(
    rng: &mut R,
    payload: &[u8],
    peers: &[P],
    box_type: BoxType,
) -> Result<Vec<u8>, BoxError> {
    if peers.is_empty() {
        return Err(BoxError);
    }

    let (ephemeral_private, ephemeral_public) = P521::generate_keypair(rng);
    let payload_key = symmetric::generate_key::<Aes256Sha384, _>(rng);

    let mut peer_list = FrameWriter::new();
    peer_list.write_tag(PEER_LIST_TAG);
    peer_list.write_u32(u32::try_from(peers.len()).map_err(|_| BoxError)?)?;
    for peer in peers {
        let peer = peer.as_ref();
        if !key_is_suitable(None, Some(peer)) {
            return Err(BoxError);
        }
        let wrap_key =
            derive_shared_key::<P521>(&ephemeral_private, peer, Aes256Sha384::CRYPT_KEY_SIZE)?;
        let wrap = symmetric::seal::<Aes256Sha384, _>(rng, &payload_key, &wrap_key)?;
        peer_list.write_frame(peer)?;
        peer_list.write_frame(&wrap)?;
    }

    let sealed_payload = symmetric::seal::<Aes256Sha384, _>(rng, payload, &payload_key)?;

    let mut envelope = FrameWriter::with_capacity(payload.len() + OVERHEAD);
    envelope.write_tag(box_type as u8);
    envelope.write_frame(&ephemeral_public)?;
    envelope.write_frame(&peer_list.into_bytes())?;
    envelope.write_frame(&sealed_payload)?;
    Ok(envelope.into_bytes())
}

fn open_shared_payload(
    sealed: &[u8],
    private: &[u8],
    public: &[u8],
    expected: BoxType,
) -> Result<Vec<u8>, BoxError> {
    if !key_is_suitable(Some(private), Some(public)) {
        return Err(BoxError);
    }

    let mut reader = FrameReader::new(sealed);
    let box_type = BoxType::try_from(reader.read_tag()?)?;
    if box_type != expected {
        return Err(BoxError);
    }
    let ephemeral_public = reader.next_frame()?;
    let peer_list = reader.next_frame()?;
    let sealed_payload = reader.next_frame()?;

    let mut entries = FrameReader::new(peer_list);
    if entries.read_tag()? != PEER_LIST_TAG {
        return Err(BoxError);
    }
    let count = entries.next_u32()?;

    let mut payload_key = None;
    for _ in 0..count {
        let peer = entries.next_frame()?;
        let wrap = entries.next_frame()?;
        if peer == public {
            let wrap_key =
                derive_shared_key::<P521>(private, ephemeral_public, Aes256Sha384::CRYPT_KEY_SIZE)?;
            payload_key = Some(Zeroizing::new(symmetric::open::<Aes256Sha384>(wrap, &wrap_key)?));
            break;
        }
    }

    let payload_key = payload_key.ok_or(BoxError)?;
    symmetric::open::<Aes256Sha384>(sealed_payload, &payload_key)
}
