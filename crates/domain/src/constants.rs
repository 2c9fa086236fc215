//! Protocol constants
//!
//! Values fixed by the platform's message security protocol and credential
//! endpoints. Changing any of these breaks interoperability.

// Message crypto
/// Base64 key length as issued, without the trailing `=`.
pub const ENCODING_AES_KEY_LEN: usize = 43;
/// Decoded AES-256 key length.
pub const AES_KEY_LEN: usize = 32;
/// IV length. The IV is the first 16 key bytes.
pub const IV_LEN: usize = 16;
/// Custom padding block. Twice the AES block size.
pub const PAD_BLOCK_SIZE: usize = 32;
/// Random bytes opening every frame.
pub const RANDOM_PREFIX_LEN: usize = 16;
/// Big-endian payload length following the random prefix.
pub const LENGTH_PREFIX_LEN: usize = 4;

// Credential lifecycle
/// Validity assumed when the issuer omits one.
pub const DEFAULT_CREDENTIAL_TTL_SECONDS: u64 = 7200;
/// Credentials are treated as expired this long before their window ends.
pub const CREDENTIAL_SAFETY_MARGIN_MS: u64 = 5000;

// Persisted credential layout
/// Acquisition time in milliseconds.
pub const PERSISTED_TIME_FIELD: &str = "_time";
/// Validity window in seconds.
pub const PERSISTED_TTL_FIELD: &str = "expire_in";
/// TTL field name in issuer responses.
pub const ISSUER_TTL_FIELD: &str = "expires_in";

// Nonces
/// Nonce length for signatures.
pub const DEFAULT_NONCE_LEN: usize = 16;
/// Nonce length for encrypted replies.
pub const REPLY_NONCE_LEN: usize = 10;

// Endpoints and client defaults
/// Platform API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.weixin.qq.com";
/// Per-request HTTP timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 40;
/// Credential directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = ".wxkit";
/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Scheme and path of QR-code payment links.
pub const NATIVE_PAY_URL_PREFIX: &str = "weixin://wxpay/bizpayurl?";
