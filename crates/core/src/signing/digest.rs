//! Hash helpers shared by the signing strategies

use hmac::{Hmac, Mac};
use md5::Md5;
use sha1::{Digest, Sha1};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use wxkit_domain::{Result, WxError};

type HmacSha256 = Hmac<Sha256>;

pub(crate) fn sha1_hex(data: &str) -> String {
    hex::encode(Sha1::digest(data.as_bytes()))
}

pub(crate) fn md5_hex(data: &str) -> String {
    hex::encode(Md5::digest(data.as_bytes()))
}

pub(crate) fn hmac_sha256_hex(key: &str, data: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| WxError::Internal(format!("HMAC key rejected: {e}")))?;
    mac.update(data.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Compare two signatures without short-circuiting on the first difference.
pub(crate) fn constant_time_eq(expected: &str, supplied: &str) -> bool {
    expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}
