//! Padding and AES-256-CBC transform
//!
//! The protocol pads to a 32-byte boundary (twice the AES block size) with a
//! PKCS#7-shaped scheme, then runs AES-256-CBC with cipher-level padding
//! disabled. Ciphertext length is therefore always a multiple of 32.

use aes::cipher::block_padding::NoPadding;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use wxkit_domain::constants::PAD_BLOCK_SIZE;
use wxkit_domain::{Result, WxError};

use super::context::CryptoContext;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const AES_BLOCK_SIZE: usize = 16;

/// Append `P = 32 - len % 32` bytes of value `P`.
///
/// Input that is already block-aligned gains a full block of `32`s.
pub fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = PAD_BLOCK_SIZE - data.len() % PAD_BLOCK_SIZE;
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    // pad_len is in 1..=32
    padded.resize(data.len() + pad_len, pad_len as u8);
    padded
}

/// Strip trailing padding.
///
/// Reads the last byte `P`. When `1 <= P <= 32` up to `P` bytes are removed;
/// any other value strips nothing. Never fails: the frame identity check is
/// what rejects garbage.
pub fn unpad(data: &[u8]) -> &[u8] {
    let Some(&last) = data.last() else {
        return data;
    };
    let pad_len = usize::from(last);
    if (1..=PAD_BLOCK_SIZE).contains(&pad_len) {
        &data[..data.len().saturating_sub(pad_len)]
    } else {
        data
    }
}

/// Pad and encrypt a frame, returning base64 ciphertext.
///
/// # Errors
/// Returns `WxError::Internal` if the cipher cannot be initialised from the
/// context key material.
pub fn encrypt(ctx: &CryptoContext, frame: &[u8]) -> Result<String> {
    let padded = pad(frame);
    let cipher = Aes256CbcEnc::new_from_slices(ctx.key(), ctx.iv())
        .map_err(|e| WxError::Internal(format!("cipher initialisation failed: {e}")))?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<NoPadding>(&padded);
    Ok(BASE64.encode(ciphertext))
}

/// Decrypt base64 ciphertext and strip padding, returning frame bytes.
///
/// # Errors
/// Returns `WxError::Decryption` for invalid base64 or ciphertext that is not
/// a whole number of AES blocks.
pub fn decrypt(ctx: &CryptoContext, ciphertext: &str) -> Result<Vec<u8>> {
    let raw = BASE64
        .decode(ciphertext.trim())
        .map_err(|e| WxError::Decryption(format!("invalid base64 ciphertext: {e}")))?;

    if raw.len() % AES_BLOCK_SIZE != 0 {
        return Err(WxError::Decryption(format!(
            "ciphertext length {} is not a multiple of the AES block size",
            raw.len()
        )));
    }

    let cipher = Aes256CbcDec::new_from_slices(ctx.key(), ctx.iv())
        .map_err(|e| WxError::Internal(format!("cipher initialisation failed: {e}")))?;
    let plaintext = cipher
        .decrypt_padded_vec_mut::<NoPadding>(&raw)
        .map_err(|e| WxError::Decryption(format!("block decryption failed: {e}")))?;

    Ok(unpad(&plaintext).to_vec())
}
