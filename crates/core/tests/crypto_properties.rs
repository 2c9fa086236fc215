//! Property-based tests for the message codec.
//!
//! Arbitrary payloads and identities must survive a round trip, and no
//! ciphertext a caller can hand in may panic the decoder.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use proptest::prelude::*;
use wxkit_core::crypto::codec::{self, pad, unpad};
use wxkit_core::crypto::{CryptoContext, MessageCrypt};

const KEY: &str = "jWmYm7qr5nMoAUwZRjGtBxmz3KA1tkAj3ykkR6q2B2C";
const TOKEN: &str = "QDG6eK";
const APP_ID: &str = "wx5823bf96d3bd56c7";

fn crypt(identity: &str) -> MessageCrypt {
    MessageCrypt::new(CryptoContext::new(TOKEN, KEY, identity).unwrap())
}

/// Trailing byte values `unpad` must treat as "no padding".
fn non_pad_byte() -> impl Strategy<Value = u8> {
    prop_oneof![Just(0u8), 33u8..=u8::MAX]
}

/// Raw ciphertext that is a whole number of AES blocks.
fn block_aligned_bytes() -> impl Strategy<Value = Vec<u8>> {
    (0usize..8).prop_flat_map(|blocks| prop::collection::vec(any::<u8>(), blocks * 16))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Any UTF-8 payload decrypts to itself under any identity.
    #[test]
    fn prop_round_trip_preserves_payload(payload in any::<String>(), identity in any::<String>()) {
        let crypt = crypt(&identity);
        let ciphertext = crypt.encrypt(&payload).unwrap();
        prop_assert_eq!(crypt.decrypt(&ciphertext).unwrap(), payload);
    }

    /// Data whose last byte is 0 or above 32 comes back untouched.
    #[test]
    fn prop_unpad_ignores_out_of_range_trailer(
        mut data in prop::collection::vec(any::<u8>(), 0..96),
        last in non_pad_byte(),
    ) {
        data.push(last);
        prop_assert_eq!(unpad(&data), data.as_slice());
    }

    /// Padding always lands on a 32-byte boundary and strips back off.
    #[test]
    fn prop_pad_then_unpad_is_identity(data in prop::collection::vec(any::<u8>(), 0..200)) {
        let padded = pad(&data);
        prop_assert_eq!(padded.len() % 32, 0);
        prop_assert!(padded.len() > data.len());
        prop_assert_eq!(unpad(&padded), data.as_slice());
    }

    /// Block-aligned garbage decodes or fails cleanly, never panics.
    #[test]
    fn prop_decrypt_block_aligned_garbage_never_panics(raw in block_aligned_bytes()) {
        let encoded = STANDARD.encode(&raw);
        let crypt = crypt(APP_ID);

        let plaintext = codec::decrypt(crypt.context(), &encoded).unwrap();
        prop_assert!(plaintext.len() <= raw.len());
        let _ = crypt.decrypt(&encoded);
    }

    /// Arbitrary text handed in as ciphertext is rejected without panicking.
    #[test]
    fn prop_decrypt_arbitrary_text_never_panics(text in any::<String>()) {
        let _ = crypt(APP_ID).decrypt(&text);
    }
}
