//! Merchant payment signing
//!
//! Builds the signed parameter bundles a merchant hands to clients (JSAPI
//! and APP launch parameters, native QR URLs) and checks the `sign` of inbound payment
//! notifications.

use std::fmt;

use wxkit_domain::constants::NATIVE_PAY_URL_PREFIX;
use wxkit_domain::{
    AppConfig, AppPayParams, PayConfig, PayParams, Result, SignAlgorithm, WxError,
};

use super::params::SignParams;
use super::strategy::SignStrategy;

const APP_PACKAGE: &str = "Sign=WXPay";

/// Merchant identity plus the key and digest used for `sign`.
#[derive(Clone)]
pub struct MerchantSigner {
    app_id: String,
    mch_id: String,
    key: String,
    algorithm: SignAlgorithm,
}

impl MerchantSigner {
    /// Bind merchant credentials; `algorithm` signs every bundle that carries
    /// its own sign type.
    pub fn new(
        app_id: impl Into<String>,
        mch_id: impl Into<String>,
        key: impl Into<String>,
        algorithm: SignAlgorithm,
    ) -> Self {
        Self { app_id: app_id.into(), mch_id: mch_id.into(), key: key.into(), algorithm }
    }

    /// Signer for the configured app and merchant.
    pub fn from_config(app: &AppConfig, pay: &PayConfig) -> Self {
        Self::new(&app.app_id, &pay.mch_id, &pay.mch_key, pay.sign_type)
    }

    /// App id placed in every bundle.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Merchant id (`mch_id`, `partnerid`).
    pub fn mch_id(&self) -> &str {
        &self.mch_id
    }

    /// Configured digest for typed bundles.
    pub fn algorithm(&self) -> SignAlgorithm {
        self.algorithm
    }

    fn strategy(&self, algorithm: SignAlgorithm) -> SignStrategy {
        SignStrategy::Payment { key: self.key.clone(), algorithm }
    }

    /// Sign an arbitrary parameter set with the merchant key.
    ///
    /// # Errors
    /// Returns `WxError::Internal` only if the HMAC primitive rejects the key.
    pub fn sign(&self, params: &SignParams) -> Result<String> {
        self.strategy(self.algorithm).sign(params)
    }

    /// JSAPI launch parameters for a prepay order.
    ///
    /// # Errors
    /// Returns `WxError::Internal` only if the HMAC primitive rejects the key.
    pub fn pay_params(&self, prepay_id: &str, timestamp: u64, nonce: &str) -> Result<PayParams> {
        let package = format!("prepay_id={prepay_id}");
        let params = SignParams::new()
            .with("appId", &self.app_id)
            .with("timeStamp", timestamp)
            .with("nonceStr", nonce)
            .with("package", &package)
            .with("signType", self.algorithm);
        let pay_sign = self.sign(&params)?;

        Ok(PayParams {
            app_id: self.app_id.clone(),
            time_stamp: timestamp.to_string(),
            nonce_str: nonce.to_string(),
            package,
            sign_type: self.algorithm,
            pay_sign,
        })
    }

    /// APP launch parameters for a prepay order.
    ///
    /// The bundle carries no sign type, so the client SDK verifies it with
    /// the algorithm the order was placed with.
    ///
    /// # Errors
    /// Returns `WxError::Internal` only if the HMAC primitive rejects the key.
    pub fn app_params(&self, prepay_id: &str, timestamp: u64, nonce: &str) -> Result<AppPayParams> {
        let params = SignParams::new()
            .with("appid", &self.app_id)
            .with("partnerid", &self.mch_id)
            .with("prepayid", prepay_id)
            .with("package", APP_PACKAGE)
            .with("noncestr", nonce)
            .with("timestamp", timestamp);
        let sign = self.sign(&params)?;

        Ok(AppPayParams {
            appid: self.app_id.clone(),
            partnerid: self.mch_id.clone(),
            prepayid: prepay_id.to_string(),
            package: APP_PACKAGE.to_string(),
            noncestr: nonce.to_string(),
            timestamp: timestamp.to_string(),
            sign,
        })
    }

    /// `weixin://wxpay/bizpayurl?...` for a native (QR code) payment.
    ///
    /// Always MD5: the URL has no `sign_type`, and the platform verifies
    /// untyped signatures as MD5.
    ///
    /// # Errors
    /// Infallible in practice. The signature goes through the shared
    /// fallible signing path.
    pub fn native_pay_url(&self, product_id: &str, timestamp: u64, nonce: &str) -> Result<String> {
        let mut params = SignParams::new()
            .with("appid", &self.app_id)
            .with("mch_id", &self.mch_id)
            .with("time_stamp", timestamp)
            .with("nonce_str", nonce)
            .with("product_id", product_id);
        let sign = self.strategy(SignAlgorithm::Md5).sign(&params)?;
        params.insert("sign", sign);

        let query = params
            .signable(&[])
            .map(|(name, value)| {
                format!("{}={}", urlencoding::encode(name), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");
        Ok(format!("{NATIVE_PAY_URL_PREFIX}{query}"))
    }

    /// Check the `sign` field of an inbound payment notification.
    ///
    /// The notification's own `sign_type` wins over the configured algorithm.
    /// It must be exactly `MD5` or `HMAC-SHA256`.
    ///
    /// # Errors
    /// - `WxError::SignatureMismatch` if `sign` is missing or wrong
    /// - `WxError::InvalidInput` if `sign_type` names an unknown algorithm
    pub fn verify_notification(&self, fields: &SignParams) -> Result<()> {
        let supplied = fields.get("sign").ok_or(WxError::SignatureMismatch)?;
        let algorithm = match fields.get("sign_type") {
            Some(name) => name.parse::<SignAlgorithm>()?,
            None => self.algorithm,
        };
        self.strategy(algorithm).verify(fields, supplied)
    }
}

impl fmt::Debug for MerchantSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantSigner")
            .field("app_id", &self.app_id)
            .field("mch_id", &self.mch_id)
            .field("key", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}
