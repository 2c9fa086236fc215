//! Plaintext frame layout
//!
//! `[random(16)][payload length (u32, big-endian)][payload][identity]`
//!
//! The identity has no length field; it is whatever follows the payload.

use rand::rngs::OsRng;
use rand::RngCore;
use wxkit_domain::constants::{LENGTH_PREFIX_LEN, RANDOM_PREFIX_LEN};
use wxkit_domain::{Result, WxError};

const HEADER_LEN: usize = RANDOM_PREFIX_LEN + LENGTH_PREFIX_LEN;

/// A parsed frame whose identity has been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Decrypted message body.
    pub payload: String,
    /// Trailing app id, already matched against the context.
    pub identity: String,
}

/// Build a frame with a fresh random prefix.
///
/// # Errors
/// Returns `WxError::InvalidInput` if the payload does not fit a `u32`
/// length.
pub fn build_frame(payload: &[u8], identity: &str) -> Result<Vec<u8>> {
    let mut prefix = [0u8; RANDOM_PREFIX_LEN];
    OsRng.fill_bytes(&mut prefix);
    build_frame_with_prefix(prefix, payload, identity)
}

/// Build a frame with a caller-supplied prefix.
///
/// # Errors
/// Returns `WxError::InvalidInput` if the payload does not fit a `u32`
/// length.
pub fn build_frame_with_prefix(
    prefix: [u8; RANDOM_PREFIX_LEN],
    payload: &[u8],
    identity: &str,
) -> Result<Vec<u8>> {
    let length = u32::try_from(payload.len()).map_err(|_| {
        WxError::InvalidInput(format!("payload of {} bytes exceeds frame limit", payload.len()))
    })?;

    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len() + identity.len());
    frame.extend_from_slice(&prefix);
    frame.extend_from_slice(&length.to_be_bytes());
    frame.extend_from_slice(payload);
    frame.extend_from_slice(identity.as_bytes());
    Ok(frame)
}

/// Parse a decrypted frame and check its identity.
///
/// A declared length larger than the remaining buffer truncates the payload
/// and leaves an empty identity, which then fails the identity check.
///
/// # Errors
/// - `WxError::Decryption` if the buffer is shorter than the 20-byte header
///   or the payload is not UTF-8
/// - `WxError::IdentityMismatch` if the trailing identity differs from
///   `expected_identity`
pub fn parse_frame(bytes: &[u8], expected_identity: &str) -> Result<Frame> {
    if bytes.len() < HEADER_LEN {
        return Err(WxError::Decryption(format!(
            "frame of {} bytes is shorter than the {HEADER_LEN}-byte header",
            bytes.len()
        )));
    }

    let mut length_bytes = [0u8; LENGTH_PREFIX_LEN];
    length_bytes.copy_from_slice(&bytes[RANDOM_PREFIX_LEN..HEADER_LEN]);
    let declared = usize::try_from(u32::from_be_bytes(length_bytes)).unwrap_or(usize::MAX);

    let body = &bytes[HEADER_LEN..];
    let payload_end = declared.min(body.len());
    let (payload, identity) = body.split_at(payload_end);

    if identity != expected_identity.as_bytes() {
        return Err(WxError::IdentityMismatch {
            expected: expected_identity.to_string(),
            found: String::from_utf8_lossy(identity).into_owned(),
        });
    }

    let payload = String::from_utf8(payload.to_vec())
        .map_err(|e| WxError::Decryption(format!("payload is not valid UTF-8: {e}")))?;

    Ok(Frame { payload, identity: expected_identity.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_prefix_length_payload_identity() {
        let frame = build_frame_with_prefix([0xAA; 16], b"hello", "wx1").unwrap();
        assert_eq!(&frame[..16], &[0xAA; 16]);
        assert_eq!(&frame[16..20], &[0, 0, 0, 5]);
        assert_eq!(&frame[20..25], b"hello");
        assert_eq!(&frame[25..], b"wx1");
    }

    #[test]
    fn random_prefix_differs_between_frames() {
        let a = build_frame(b"x", "wx1").unwrap();
        let b = build_frame(b"x", "wx1").unwrap();
        assert_eq!(a.len(), b.len());
        assert_ne!(&a[..16], &b[..16]);
    }

    #[test]
    fn parse_returns_payload() {
        let frame = build_frame("我是中文abcd123".as_bytes(), "wxb11529c136998cb6").unwrap();
        let parsed = parse_frame(&frame, "wxb11529c136998cb6").unwrap();
        assert_eq!(parsed.payload, "我是中文abcd123");
        assert_eq!(parsed.identity, "wxb11529c136998cb6");
    }

    #[test]
    fn parse_rejects_foreign_identity() {
        let frame = build_frame(b"<xml/>", "wxA").unwrap();
        match parse_frame(&frame, "wxB").unwrap_err() {
            WxError::IdentityMismatch { expected, found } => {
                assert_eq!(expected, "wxB");
                assert_eq!(found, "wxA");
            }
            other => panic!("expected identity mismatch, got {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_short_buffer() {
        let err = parse_frame(&[0u8; 19], "wx1").unwrap_err();
        assert!(matches!(err, WxError::Decryption(_)));
    }

    #[test]
    fn overlong_length_leaves_empty_identity() {
        let mut frame = build_frame_with_prefix([0; 16], b"abc", "wx1").unwrap();
        frame[16..20].copy_from_slice(&1000u32.to_be_bytes());
        match parse_frame(&frame, "wx1").unwrap_err() {
            WxError::IdentityMismatch { found, .. } => assert!(found.is_empty()),
            other => panic!("expected identity mismatch, got {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_payload_is_decryption_error() {
        let frame = build_frame_with_prefix([0; 16], &[0xFF, 0xFE], "wx1").unwrap();
        assert!(matches!(parse_frame(&frame, "wx1"), Err(WxError::Decryption(_))));
    }
}
