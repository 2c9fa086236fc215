//! XML envelopes around the ciphertext
//!
//! Inbound callbacks are scanned with a pattern rather than parsed; only the
//! `<Encrypt>` CDATA section matters to the security layer.

use once_cell::sync::Lazy;
use regex::Regex;

static ENCRYPT_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<Encrypt><!\[CDATA\[(.*?)\]\]></Encrypt>")
        .expect("ENCRYPT_ELEMENT should compile - this is a bug")
});

/// Pull the ciphertext out of an inbound envelope.
///
/// Returns an empty string when there is no `<Encrypt>` CDATA element.
pub fn extract_ciphertext(envelope: &str) -> &str {
    ENCRYPT_ELEMENT
        .captures(envelope)
        .and_then(|captures| captures.get(1))
        .map_or("", |m| m.as_str())
}

/// Assemble the outbound reply envelope.
pub fn build_envelope(ciphertext: &str, signature: &str, timestamp: &str, nonce: &str) -> String {
    format!(
        "<xml>\n\
         <Encrypt><![CDATA[{ciphertext}]]></Encrypt>\n\
         <MsgSignature><![CDATA[{signature}]]></MsgSignature>\n\
         <TimeStamp>{timestamp}</TimeStamp>\n\
         <Nonce><![CDATA[{nonce}]]></Nonce>\n\
         </xml>"
    )
}
