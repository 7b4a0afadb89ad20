use super::*;
use crate::strongbox;

const TEST_MESSAGES: &[&str] = &[
    "Hello, world.",
    "Yes... yes. This is a fertile land, and we will thrive.",
    "Ah! Curse your sudden but inevitable betrayal!",
    "Jayne, go play with your rainstick.",
];

fn keypairs(count: usize) -> Vec<(PrivateKey, PublicKey)> {
    (0..count).map(|_| generate_key()).collect()
}

// KEYS
// ================================================================================================

#[test]
fn generated_keys_have_profile_lengths() {
    let (private, public) = generate_key();
    assert_eq!(private.len(), PRIVATE_KEY_SIZE);
    assert_eq!(public.len(), PUBLIC_KEY_SIZE);
    assert_eq!(public[0], 0x04);
    assert!(key_is_suitable(Some(&private), Some(&public)));
}

#[test]
fn key_validation_rejects_bad_lengths_and_empty_input() {
    assert!(!key_is_suitable(None, None));
    assert!(!key_is_suitable(Some(&[0u8; PRIVATE_KEY_SIZE + 1]), None));
    assert!(!key_is_suitable(None, Some(&[0u8; PUBLIC_KEY_SIZE - 1])));

    let (private, public) = generate_key();
    assert!(key_is_suitable(Some(&private), None));
    assert!(key_is_suitable(None, Some(&public)));
    assert!(!key_is_suitable(Some(&private), Some(&public[..132])));
}

#[test]
fn shared_key_agrees_and_drives_strongbox() {
    let (a_private, a_public) = generate_key();
    let (b_private, b_public) = generate_key();

    let ab = shared_key(&a_private, &b_public).unwrap();
    let ba = shared_key(&b_private, &a_public).unwrap();
    assert_eq!(ab.as_slice(), ba.as_slice());
    assert_eq!(ab.len(), SHARED_KEY_SIZE);

    let sealed = strongbox::seal(b"precomputed", &ab).unwrap();
    assert_eq!(strongbox::open(&sealed, &ba).unwrap(), b"precomputed");
}

// UNSIGNED BOXES
// ================================================================================================

#[test]
fn seal_then_open_roundtrips() {
    let (private, public) = generate_key();
    for message in TEST_MESSAGES {
        let sealed = seal(message.as_bytes(), &public).unwrap();
        assert_eq!(sealed.len(), message.len() + OVERHEAD);
        assert_eq!(open(&sealed, &private).unwrap(), message.as_bytes());
    }
}

#[test]
fn unsigned_boxes_lead_with_their_type_byte() {
    let (_, public) = generate_key();
    let sealed = seal(b"Hello, world.", &public).unwrap();
    assert_eq!(sealed[0], 0x01);
    assert!(!box_is_signed(&sealed));
}

#[test]
fn wrong_recipient_cannot_open() {
    let (_, public) = generate_key();
    let (other_private, _) = generate_key();
    let sealed = seal(b"addressed elsewhere", &public).unwrap();
    assert!(open(&sealed, &other_private).is_err());
}

#[test]
fn bit_flips_anywhere_are_rejected() {
    let (private, public) = generate_key();
    let sealed = seal(b"Hello, world.", &public).unwrap();
    // Walk the box at a stride and always cover the type byte, the frame
    // boundaries, and the final tag byte.
    let mut positions: Vec<usize> = (0..sealed.len()).step_by(7).collect();
    positions.extend([0, 1, 5, sealed.len() - 1]);
    for i in positions {
        let mut mutated = sealed.clone();
        mutated[i] ^= 0x01;
        assert!(open(&mutated, &private).is_err(), "mutation at byte {i} was accepted");
    }
}

#[test]
fn unknown_type_bytes_are_rejected() {
    let (private, public) = generate_key();
    let mut sealed = seal(b"typed", &public).unwrap();
    sealed[0] = 0x63;
    assert!(open(&sealed, &private).is_err());
}

#[test]
fn short_boxes_are_rejected() {
    let (private, _) = generate_key();
    assert!(open(&[], &private).is_err());
    assert!(open(&[0x01, 0, 0, 0], &private).is_err());
}

// SIGNATURES
// ================================================================================================

#[test]
fn detached_signatures_roundtrip() {
    let (private, public) = generate_key();
    let signature = sign(b"attested", &private, &public).unwrap();
    assert!(signature.len() <= SIG_SIZE);
    assert!(verify(b"attested", &signature, &public));
    assert!(!verify(b"altered", &signature, &public));
}

#[test]
fn signatures_bind_the_signer() {
    let (private, public) = generate_key();
    let (_, other_public) = generate_key();
    let signature = sign(b"attested", &private, &public).unwrap();
    assert!(!verify(b"attested", &signature, &other_public));
}

#[test]
fn truncated_signatures_are_rejected() {
    let (private, public) = generate_key();
    let signature = sign(b"attested", &private, &public).unwrap();
    assert!(!verify(b"attested", &signature[..signature.len() - 1], &public));
    assert!(!verify(b"attested", &[], &public));
}

// SIGNED BOXES
// ================================================================================================

#[test]
fn signed_boxes_roundtrip_and_bind_the_signer() {
    let (signer_private, signer_public) = generate_key();
    let (peer_private, peer_public) = generate_key();
    let (_, stranger_public) = generate_key();

    for message in TEST_MESSAGES {
        let sealed = sign_and_seal(
            message.as_bytes(),
            &signer_private,
            &signer_public,
            &peer_public,
        )
        .unwrap();
        assert_eq!(sealed[0], 0x02);
        assert!(box_is_signed(&sealed));
        // The signature encoding is variable length; the box exceeds the
        // accounted overhead only by the two inner frame prefixes.
        assert!(sealed.len() >= message.len() + SIGNED_OVERHEAD);
        assert!(sealed.len() <= message.len() + SIGNED_OVERHEAD + 8);

        let opened = open_and_verify(&sealed, &peer_private, &signer_public).unwrap();
        assert_eq!(opened, message.as_bytes());

        assert!(open_and_verify(&sealed, &peer_private, &stranger_public).is_err());
    }
}

#[test]
fn box_variants_do_not_cross_open() {
    let (signer_private, signer_public) = generate_key();
    let (peer_private, peer_public) = generate_key();

    let unsigned = seal(b"plain", &peer_public).unwrap();
    let signed =
        sign_and_seal(b"signed", &signer_private, &signer_public, &peer_public).unwrap();

    assert!(open(&signed, &peer_private).is_err());
    assert!(open_and_verify(&unsigned, &peer_private, &signer_public).is_err());
    assert!(open_shared(&unsigned, &peer_private, &peer_public).is_err());
    assert!(
        open_shared_and_verify(&signed, &peer_private, &peer_public, &signer_public).is_err()
    );
}

// KEY SIGNING
// ================================================================================================

#[test]
fn key_attestations_verify_and_bind_both_keys() {
    let (signer_private, signer_public) = generate_key();
    let (_, peer_public) = generate_key();
    let (_, stranger_public) = generate_key();

    let attestation = sign_key(&signer_private, &signer_public, &peer_public).unwrap();
    assert!(verify_signed_key(&peer_public, &signer_public, &attestation));
    assert!(!verify_signed_key(&peer_public, &stranger_public, &attestation));
    assert!(!verify_signed_key(&stranger_public, &signer_public, &attestation));

    let mut bent_peer = peer_public.clone();
    bent_peer[40] ^= 0x01;
    assert!(!verify_signed_key(&bent_peer, &signer_public, &attestation));
}

// SHARED BOXES
// ================================================================================================

#[test]
fn shared_boxes_open_for_every_recipient() {
    let recipients = keypairs(4);
    let publics: Vec<&[u8]> = recipients.iter().map(|(_, public)| public.as_slice()).collect();
    let (stranger_private, stranger_public) = generate_key();

    for message in TEST_MESSAGES {
        let sealed = seal_shared(message.as_bytes(), &publics).unwrap();
        assert_eq!(sealed[0], 0x0b);
        assert!(!box_is_signed(&sealed));

        for (private, public) in &recipients {
            let opened = open_shared(&sealed, private, public).unwrap();
            assert_eq!(opened, message.as_bytes());
        }
        assert!(open_shared(&sealed, &stranger_private, &stranger_public).is_err());
    }
}

#[test]
fn corrupted_wrap_fails_its_recipient_only() {
    let recipients = keypairs(2);
    let publics: Vec<&[u8]> = recipients.iter().map(|(_, public)| public.as_slice()).collect();
    let mut sealed = seal_shared(b"one bad wrap", &publics).unwrap();

    // Offset of the first recipient's wrap inside the envelope: type byte,
    // framed ephemeral key, peer-list frame header, list tag, framed u32,
    // framed first public key, and the wrap's own frame header.
    let wrap0 = 1 + 4 + PUBLIC_KEY_SIZE + 4 + 1 + 8 + 4 + PUBLIC_KEY_SIZE + 4;
    sealed[wrap0 + 10] ^= 0x01;

    let (private, public) = &recipients[0];
    assert!(open_shared(&sealed, private, public).is_err());
    let (private, public) = &recipients[1];
    assert_eq!(open_shared(&sealed, private, public).unwrap(), b"one bad wrap");
}

#[test]
fn corrupted_payload_fails_every_recipient() {
    let recipients = keypairs(2);
    let publics: Vec<&[u8]> = recipients.iter().map(|(_, public)| public.as_slice()).collect();
    let mut sealed = seal_shared(b"shared payload", &publics).unwrap();
    let last = sealed.len() - 1;
    sealed[last] ^= 0x01;

    for (private, public) in &recipients {
        assert!(open_shared(&sealed, private, public).is_err());
    }
}

#[test]
fn empty_recipient_lists_are_rejected() {
    let peers: Vec<&[u8]> = Vec::new();
    assert!(seal_shared(b"to nobody", &peers).is_err());
}

#[test]
fn unsuitable_recipients_are_rejected() {
    let (_, public) = generate_key();
    let peers: Vec<&[u8]> = vec![&public, &public[..132]];
    assert!(seal_shared(b"short key in the list", &peers).is_err());
}

#[test]
fn duplicate_recipients_use_the_first_entry() {
    let (private, public) = generate_key();
    let peers: Vec<&[u8]> = vec![&public, &public];
    let sealed = seal_shared(b"listed twice", &peers).unwrap();
    assert_eq!(open_shared(&sealed, &private, &public).unwrap(), b"listed twice");
}

// SIGNED SHARED BOXES
// ================================================================================================

#[test]
fn signed_shared_boxes_roundtrip_and_bind_the_signer() {
    let (signer_private, signer_public) = generate_key();
    let (_, stranger_public) = generate_key();
    let recipients = keypairs(4);
    let publics: Vec<&[u8]> = recipients.iter().map(|(_, public)| public.as_slice()).collect();

    for message in TEST_MESSAGES {
        let sealed = sign_and_seal_shared(
            message.as_bytes(),
            &publics,
            &signer_private,
            &signer_public,
        )
        .unwrap();
        assert_eq!(sealed[0], 0x0c);
        assert!(box_is_signed(&sealed));

        for (private, public) in &recipients {
            let opened =
                open_shared_and_verify(&sealed, private, public, &signer_public).unwrap();
            assert_eq!(opened, message.as_bytes());

            assert!(
                open_shared_and_verify(&sealed, private, public, &stranger_public).is_err()
            );
        }

        let (stranger_private, stranger_pub) = generate_key();
        assert!(open_shared_and_verify(&sealed, &stranger_private, &stranger_pub, &signer_public)
            .is_err());
    }
}
