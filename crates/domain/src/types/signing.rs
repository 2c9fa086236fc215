//! Signing algorithm selectors and signed parameter bundles

use serde::{Deserialize, Serialize};

use crate::impl_wire_name_conversions;

/// Digest used by the merchant payment signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignAlgorithm {
    /// Upper case hex MD5. The platform default.
    #[default]
    #[serde(rename = "MD5")]
    Md5,
    /// Upper case hex HMAC-SHA256 keyed with the merchant key.
    #[serde(rename = "HMAC-SHA256")]
    HmacSha256,
}

impl_wire_name_conversions!(SignAlgorithm {
    Md5 => "MD5",
    HmacSha256 => "HMAC-SHA256",
});

/// Configuration handed to the browser-side web SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSdkConfig {
    /// App the page belongs to.
    pub app_id: String,
    /// Seconds since the Unix epoch, as signed.
    pub timestamp: u64,
    /// Nonce included in the signature.
    pub nonce_str: String,
    /// SHA-1 over the ticket, nonce, timestamp and page URL.
    pub signature: String,
    /// SDK APIs the page intends to call.
    #[serde(default)]
    pub js_api_list: Vec<String>,
    /// Ask the SDK to report every call result.
    #[serde(default)]
    pub debug: bool,
}

/// Parameters for launching a JSAPI payment from a web page or mini program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayParams {
    /// App that placed the order.
    pub app_id: String,
    /// Seconds since the Unix epoch, as a string.
    pub time_stamp: String,
    /// Nonce included in the signature.
    pub nonce_str: String,
    /// `prepay_id=...` from the unified order.
    pub package: String,
    /// Algorithm used for `pay_sign`.
    pub sign_type: SignAlgorithm,
    /// Signature over every other field.
    pub pay_sign: String,
}

/// Parameters for launching an APP payment through the mobile SDK.
///
/// Field names are the SDK's own lowercase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppPayParams {
    /// App that placed the order.
    pub appid: String,
    /// Merchant number.
    pub partnerid: String,
    /// Prepay id from the unified order.
    pub prepayid: String,
    /// Always `Sign=WXPay`.
    pub package: String,
    /// Nonce included in the signature.
    pub noncestr: String,
    /// Seconds since the Unix epoch, as a string.
    pub timestamp: String,
    /// Signature over every other field.
    pub sign: String,
}
