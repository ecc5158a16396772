//! The `<hex(iv)>:<base64(ciphertext)>` envelope string and the key-free
//! sniffer that recognises it.

use std::{fmt, str::FromStr};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::cipher::CipherError;

/// Byte length of an AES-CBC initialisation vector (16 bytes = 128 bits).
pub const IV_LEN: usize = 16;

/// Length of the hex-encoded IV that prefixes every envelope.
const IV_HEX_LEN: usize = IV_LEN * 2;

/// Separator between the IV and ciphertext parts.
const SEPARATOR: char = ':';

/// A parsed envelope: the IV and the raw (padded) ciphertext.
///
/// The string representation is `<hex(iv)>:<base64(ciphertext)>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Raw IV bytes.
    pub iv: [u8; IV_LEN],
    /// Raw AES-256-CBC ciphertext, PKCS#7 padded.
    pub ciphertext: Vec<u8>,
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            hex::encode(self.iv),
            SEPARATOR,
            STANDARD.encode(&self.ciphertext)
        )
    }
}

impl FromStr for Envelope {
    type Err = CipherError;

    /// Parse an envelope string.
    ///
    /// Only the first colon is structural; everything after it is handed to
    /// the base64 decoder as-is.
    ///
    /// # Errors
    ///
    /// - [`CipherError::InvalidFormat`] if there is no colon.
    /// - [`CipherError::InvalidIv`] if the IV part is not hex or not [`IV_LEN`] bytes.
    /// - [`CipherError::InvalidBase64`] if the ciphertext part is not valid base64.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (iv_hex, ciphertext_b64) = s
            .split_once(SEPARATOR)
            .ok_or(CipherError::InvalidFormat)?;

        let iv_bytes = hex::decode(iv_hex).map_err(|_| CipherError::InvalidIv)?;
        let iv: [u8; IV_LEN] = iv_bytes
            .as_slice()
            .try_into()
            .map_err(|_| CipherError::InvalidIv)?;

        let ciphertext = STANDARD
            .decode(ciphertext_b64)
            .map_err(|_| CipherError::InvalidBase64)?;

        Ok(Self { iv, ciphertext })
    }
}

/// Decide whether `value` looks like an envelope, without a key and without
/// attempting decryption.
///
/// Returns `true` only when the value contains exactly one colon and the part
/// before it is exactly 32 hex digits (either case). The part after the colon
/// is not inspected.
///
/// This is a syntactic check. A plaintext such as
/// `"0123456789abcdef0123456789abcdef:note"` is reported as encrypted; the
/// decrypt path then fails on it and returns it unchanged.
pub fn is_encrypted(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    let mut parts = value.split(SEPARATOR);
    let (Some(iv_hex), Some(_), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    iv_hex.len() == IV_HEX_LEN && iv_hex.bytes().all(|b| b.is_ascii_hexdigit())
}
