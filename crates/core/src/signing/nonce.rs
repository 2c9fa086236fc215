//! Random nonce strings

use rand::Rng;
use wxkit_domain::constants::DEFAULT_NONCE_LEN;

const DIGITS: &str = "0123456789";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const FALLBACK: &str = "013456789abcdef";

/// Character classes a nonce may draw from, combined as bit flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NonceCharset(u8);

impl NonceCharset {
    /// ASCII digits `0-9`.
    pub const DIGITS: Self = Self(1);
    /// Lower case ASCII letters.
    pub const LOWERCASE: Self = Self(2);
    /// Upper case ASCII letters.
    pub const UPPERCASE: Self = Self(4);
    /// Upper and lower case letters.
    pub const LETTERS: Self = Self(6);
    /// Digits and both letter cases, used for payment nonces.
    pub const ALPHANUMERIC: Self = Self(7);

    /// Charset from raw flags. Unknown bits are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 7)
    }

    /// Raw flag bits.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Classes present in either set.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// True when every class in `other` is also in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    fn alphabet(self) -> String {
        if self.0 == 0 {
            return FALLBACK.to_string();
        }
        let mut alphabet = String::with_capacity(62);
        if self.contains(Self::DIGITS) {
            alphabet.push_str(DIGITS);
        }
        if self.contains(Self::LOWERCASE) {
            alphabet.push_str(LOWERCASE);
        }
        if self.contains(Self::UPPERCASE) {
            alphabet.push_str(UPPERCASE);
        }
        alphabet
    }
}

impl Default for NonceCharset {
    fn default() -> Self {
        Self::LETTERS
    }
}

/// Draw `len` characters uniformly from `charset`.
pub fn nonce(len: usize, charset: NonceCharset) -> String {
    let alphabet = charset.alphabet().into_bytes();
    let mut rng = rand::thread_rng();
    (0..len).map(|_| char::from(alphabet[rng.gen_range(0..alphabet.len())])).collect()
}

/// Sixteen letters.
pub fn default_nonce() -> String {
    nonce(DEFAULT_NONCE_LEN, NonceCharset::default())
}
