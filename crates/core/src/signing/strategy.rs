//! Signing strategies
//!
//! Each variant matches exactly one external verifier. They are not
//! interchangeable: the canonical strings differ in ordering rules, trailing
//! terms, digest and hex case.
//!
//! | Strategy | Canonical form | Digest |
//! |----------|----------------|--------|
//! | `MessageVerification` | token + values, sorted as strings, concatenated | SHA-1, lower hex |
//! | `WebTicket` | lower-cased `name=value` sorted by name, `&`-joined | SHA-1, lower hex |
//! | `Midas` | sorted `name=value`, then `org_loc`, `method`, `secret` | HMAC-SHA256(secret), lower hex |
//! | `MidasSession` | as `Midas` with `access_token` merged, ending in `session_key` | HMAC-SHA256(session key), lower hex |
//! | `Payment` | sorted `name=value`, then `key` | MD5 or HMAC-SHA256(key), upper hex |

use std::fmt;

use wxkit_domain::{Result, SignAlgorithm, WxError};

use super::digest::{constant_time_eq, hmac_sha256_hex, md5_hex, sha1_hex};
use super::params::SignParams;

const SIGNATURE_FIELDS: &[&str] = &["sign", "signature"];
const MIDAS_EXCLUDED: &[&str] = &["sign", "signature", "sig", "mp_sig"];

/// A signing discipline bound to its secret material.
#[derive(Clone, PartialEq, Eq)]
pub enum SignStrategy {
    /// Callback envelope signature (`MsgSignature`) and URL verification.
    MessageVerification { token: String },
    /// Web SDK ticket signature. Carries no secret.
    WebTicket,
    /// Virtual-payment `sig`, keyed by the payment secret.
    Midas { uri: String, secret: String },
    /// Virtual-payment `mp_sig`, keyed by the user's session key.
    MidasSession { uri: String, access_token: String, session_key: String },
    /// Merchant payment `sign`.
    Payment { key: String, algorithm: SignAlgorithm },
}

impl SignStrategy {
    /// Names never included in the canonical string.
    pub const fn excluded_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Midas { .. } | Self::MidasSession { .. } => MIDAS_EXCLUDED,
            Self::MessageVerification { .. } | Self::WebTicket | Self::Payment { .. } => {
                SIGNATURE_FIELDS
            }
        }
    }

    /// The exact string that gets hashed.
    pub fn canonical_string(&self, params: &SignParams) -> String {
        let excluded = self.excluded_fields();
        match self {
            Self::MessageVerification { token } => {
                let mut values: Vec<&str> =
                    params.signable(excluded).map(|(_, value)| value).collect();
                values.push(token);
                values.sort_unstable();
                values.concat()
            }
            Self::WebTicket => {
                let mut pairs: Vec<(String, &str)> = params
                    .signable(excluded)
                    .map(|(name, value)| (name.to_lowercase(), value))
                    .collect();
                pairs.sort_by(|a, b| a.0.cmp(&b.0));
                pairs
                    .iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect::<Vec<_>>()
                    .join("&")
            }
            Self::Midas { uri, secret } => {
                let mut terms = name_sorted_terms(params, excluded);
                terms.push(format!("org_loc={uri}"));
                terms.push("method=POST".to_string());
                terms.push(format!("secret={secret}"));
                terms.join("&")
            }
            Self::MidasSession { uri, access_token, session_key } => {
                let mut merged = params.clone();
                merged.insert("access_token", access_token);
                let mut terms = name_sorted_terms(&merged, excluded);
                terms.push(format!("org_loc={uri}"));
                terms.push("method=POST".to_string());
                terms.push(format!("session_key={session_key}"));
                terms.join("&")
            }
            Self::Payment { key, .. } => {
                let mut terms = name_sorted_terms(params, excluded);
                terms.push(format!("key={key}"));
                terms.join("&")
            }
        }
    }

    /// Compute the signature over `params`.
    ///
    /// # Errors
    /// Returns `WxError::Internal` only if the HMAC primitive rejects its key.
    pub fn sign(&self, params: &SignParams) -> Result<String> {
        let canonical = self.canonical_string(params);
        match self {
            Self::MessageVerification { .. } | Self::WebTicket => Ok(sha1_hex(&canonical)),
            Self::Midas { secret, .. } => hmac_sha256_hex(secret, &canonical),
            Self::MidasSession { session_key, .. } => hmac_sha256_hex(session_key, &canonical),
            Self::Payment { key, algorithm } => match algorithm {
                SignAlgorithm::Md5 => Ok(md5_hex(&canonical).to_uppercase()),
                SignAlgorithm::HmacSha256 => Ok(hmac_sha256_hex(key, &canonical)?.to_uppercase()),
            },
        }
    }

    /// Recompute and compare against `supplied` in constant time.
    ///
    /// # Errors
    /// Returns `WxError::SignatureMismatch` when the signatures differ.
    pub fn verify(&self, params: &SignParams, supplied: &str) -> Result<()> {
        let expected = self.sign(params)?;
        if constant_time_eq(&expected, supplied) {
            Ok(())
        } else {
            Err(WxError::SignatureMismatch)
        }
    }
}

impl fmt::Debug for SignStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MessageVerification { .. } => {
                f.debug_struct("MessageVerification").field("token", &"[REDACTED]").finish()
            }
            Self::WebTicket => f.write_str("WebTicket"),
            Self::Midas { uri, .. } => f
                .debug_struct("Midas")
                .field("uri", uri)
                .field("secret", &"[REDACTED]")
                .finish(),
            Self::MidasSession { uri, .. } => f
                .debug_struct("MidasSession")
                .field("uri", uri)
                .field("access_token", &"[REDACTED]")
                .field("session_key", &"[REDACTED]")
                .finish(),
            Self::Payment { algorithm, .. } => f
                .debug_struct("Payment")
                .field("key", &"[REDACTED]")
                .field("algorithm", algorithm)
                .finish(),
        }
    }
}

/// `sha1(sort([token, timestamp, nonce, encrypt]).join(""))`
pub fn message_signature(token: &str, timestamp: &str, nonce: &str, encrypt: &str) -> String {
    let mut parts = [token, timestamp, nonce, encrypt];
    parts.sort_unstable();
    sha1_hex(&parts.concat())
}

fn name_sorted_terms(params: &SignParams, excluded: &[&str]) -> Vec<String> {
    params.signable(excluded).map(|(name, value)| format!("{name}={value}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment_doc_params() -> SignParams {
        SignParams::new()
            .with("appid", "wxd930ea5d5a258f4f")
            .with("mch_id", "10000100")
            .with("device_info", "1000")
            .with("body", "test")
            .with("nonce_str", "ibuaiVcKdpRxkhJA")
    }

    const PAY_KEY: &str = "192006250b4c09247ec02edce69f6a2d";

    #[test]
    fn payment_md5_matches_reference() {
        let strategy =
            SignStrategy::Payment { key: PAY_KEY.into(), algorithm: SignAlgorithm::Md5 };
        assert_eq!(
            strategy.canonical_string(&payment_doc_params()),
            "appid=wxd930ea5d5a258f4f&body=test&device_info=1000&mch_id=10000100\
             &nonce_str=ibuaiVcKdpRxkhJA&key=192006250b4c09247ec02edce69f6a2d"
        );
        assert_eq!(
            strategy.sign(&payment_doc_params()).unwrap(),
            "9A0A8659F005D6984697E2CA0A9CF3B7"
        );
    }

    #[test]
    fn payment_hmac_matches_reference() {
        let strategy =
            SignStrategy::Payment { key: PAY_KEY.into(), algorithm: SignAlgorithm::HmacSha256 };
        assert_eq!(
            strategy.sign(&payment_doc_params()).unwrap(),
            "6A9AE1657590FD6257D693A078E1C3E4BB6BA4DC30B23E0EE2496E54170DACD6"
        );
    }

    #[test]
    fn payment_ignores_sign_and_empty_fields() {
        let strategy =
            SignStrategy::Payment { key: PAY_KEY.into(), algorithm: SignAlgorithm::Md5 };
        let noisy = payment_doc_params()
            .with("sign", "WHATEVER")
            .with("attach", "")
            .with_optional("detail", None::<String>);
        assert_eq!(strategy.sign(&noisy).unwrap(), "9A0A8659F005D6984697E2CA0A9CF3B7");
        assert!(strategy.verify(&noisy, "9A0A8659F005D6984697E2CA0A9CF3B7").is_ok());
        assert_eq!(
            strategy.verify(&noisy, "9a0a8659f005d6984697e2ca0a9cf3b7"),
            Err(WxError::SignatureMismatch)
        );
    }

    #[test]
    fn payment_signs_every_field_except_sign() {
        let strategy =
            SignStrategy::Payment { key: PAY_KEY.into(), algorithm: SignAlgorithm::Md5 };
        assert_eq!(strategy.excluded_fields(), &["sign", "signature"]);

        let with_pay_sign = payment_doc_params().with("paySign", "X");
        assert!(strategy.canonical_string(&with_pay_sign).contains("&paySign=X&key="));
        assert_ne!(
            strategy.sign(&with_pay_sign).unwrap(),
            strategy.sign(&payment_doc_params()).unwrap()
        );
    }

    #[test]
    fn web_ticket_matches_reference() {
        let params = SignParams::new()
            .with(
                "jsapi_ticket",
                "sM4AOVdWfPE4DxkXGEs8VMCPGGVi4C3VM0P37wVUCFvkVAy_90u5h9nbSlYy3-Sl-HhTdfl2fzFy1AOcHKP7qg",
            )
            .with("noncestr", "Wm3WZYTPz0wzccnW")
            .with("timestamp", 1_414_587_457)
            .with("url", "http://mp.weixin.qq.com?params=value");
        assert_eq!(
            SignStrategy::WebTicket.sign(&params).unwrap(),
            "0f9de62fce790f9a083d5c99e95740ceb90c27ed"
        );
    }

    #[test]
    fn web_ticket_lowercases_names_before_sorting() {
        let mixed = SignParams::new().with("Url", "u").with("NonceStr", "n").with("b", "x");
        assert_eq!(SignStrategy::WebTicket.canonical_string(&mixed), "b=x&noncestr=n&url=u");
    }

    fn midas_params() -> SignParams {
        SignParams::new()
            .with("appid", "wx1234567")
            .with("offer_id", "12345678")
            .with("openid", "odkx20ENSNa2w5y3g_qOkOvBNM1g")
            .with("pf", "android")
            .with("ts", 1_507_530_737)
            .with("zone_id", 1)
    }

    #[test]
    fn midas_sig_matches_reference() {
        let strategy = SignStrategy::Midas {
            uri: "/cgi-bin/midas/getbalance".into(),
            secret: "zNLgAGgqsEWJOg1nFVaO5r7fAlIQxr1u".into(),
        };
        assert_eq!(
            strategy.sign(&midas_params()).unwrap(),
            "1ad64e8dcb2ec1dc486b7fdf01f4a15159fc623dc3422470e51cf6870734726b"
        );

        let with_sig = midas_params().with("sig", "stale").with("mp_sig", "stale");
        assert_eq!(strategy.sign(&with_sig).unwrap(), strategy.sign(&midas_params()).unwrap());
    }

    #[test]
    fn midas_session_sig_matches_reference() {
        let strategy = SignStrategy::MidasSession {
            uri: "/cgi-bin/midas/getbalance".into(),
            access_token: "ACCESSTOKEN".into(),
            session_key: "9hAb/NEYUlkaMBEsmFgzig==".into(),
        };
        let canonical = strategy.canonical_string(&midas_params());
        assert!(canonical.starts_with("access_token=ACCESSTOKEN&appid=wx1234567"));
        assert!(canonical.ends_with("&method=POST&session_key=9hAb/NEYUlkaMBEsmFgzig=="));
        assert_eq!(
            strategy.sign(&midas_params()).unwrap(),
            "2aa8d0e8a2efbf13cf216810ca41752c154d5b75c2d7ad54fe9c441ec1a1cc4b"
        );
    }

    #[test]
    fn message_verification_sorts_values_not_names() {
        let strategy = SignStrategy::MessageVerification { token: "QDG6eK".into() };
        let a = SignParams::new()
            .with("timestamp", "1409659813")
            .with("nonce", "1372623149")
            .with("encrypt", "abc");
        let b = SignParams::new()
            .with("x", "abc")
            .with("y", "1409659813")
            .with("z", "1372623149");
        assert_eq!(strategy.sign(&a).unwrap(), strategy.sign(&b).unwrap());
        assert_eq!(
            strategy.sign(&a).unwrap(),
            message_signature("QDG6eK", "1409659813", "1372623149", "abc")
        );
    }

    #[test]
    fn message_signature_is_order_invariant_but_value_sensitive() {
        let base = message_signature("tok", "1", "2", "cipher");
        assert_eq!(base, message_signature("tok", "2", "1", "cipher"));
        assert_eq!(base, message_signature("cipher", "tok", "2", "1"));
        assert_ne!(base, message_signature("tok", "1", "2", "cipheR"));
        assert_ne!(base, message_signature("tok", "1", "3", "cipher"));
    }

    #[test]
    fn debug_hides_secrets() {
        let strategy = SignStrategy::Midas { uri: "/u".into(), secret: "top-secret".into() };
        let rendered = format!("{strategy:?}");
        assert!(rendered.contains("/u"));
        assert!(!rendered.contains("top-secret"));
    }
}
