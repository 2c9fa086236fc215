//! Message encryption
//!
//! - [`context`]: key material and identity for one integration
//! - [`codec`]: 32-byte block padding and AES-256-CBC
//! - [`frame`]: plaintext framing with random prefix and identity trailer
//! - [`envelope`]: inbound ciphertext extraction and reply assembly
//! - [`msg_crypt`]: the verify-then-decrypt facade

pub mod codec;
pub mod context;
pub mod envelope;
pub mod frame;
pub mod msg_crypt;

pub use context::CryptoContext;
pub use envelope::{build_envelope, extract_ciphertext};
pub use frame::Frame;
pub use msg_crypt::MessageCrypt;
