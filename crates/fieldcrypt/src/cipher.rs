//! AES-256-CBC encryption and decryption of individual string fields.
//!
//! [`FieldCipher`] is built once from a [`CipherConfig`] and shared for the
//! life of the process. It holds no mutable state; every call draws its own
//! IV from the OS CSPRNG and builds its own block-mode context, so concurrent
//! calls are independent.
//!
//! CBC carries no authentication tag. A tampered envelope is only detected
//! when the padding or UTF-8 check fails, and some tampering goes unnoticed.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;
use tracing::{error, warn};

use crate::config::{CipherConfig, KEY_LEN};
use crate::envelope::{is_encrypted, Envelope, IV_LEN};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Errors produced by the cipher layer.
///
/// The fail-open entry points ([`FieldCipher::encrypt`],
/// [`FieldCipher::decrypt`]) log these and return their input instead.
#[derive(Debug, Error)]
pub enum CipherError {
    /// No key was configured.
    #[error("encryption key is not configured")]
    MissingKey,

    /// The key is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid encryption key length: expected {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The value has no `:` separator.
    #[error("invalid envelope format")]
    InvalidFormat,

    /// The IV part is not hex or does not decode to [`IV_LEN`] bytes.
    #[error("invalid envelope IV: expected {IV_LEN} hex-encoded bytes")]
    InvalidIv,

    /// The ciphertext part is not valid base64.
    #[error("invalid envelope ciphertext encoding")]
    InvalidBase64,

    /// CBC decryption produced invalid PKCS#7 padding (wrong key or corrupt data).
    #[error("ciphertext padding check failed")]
    Padding,

    /// The decrypted bytes are not valid UTF-8.
    #[error("decrypted value is not valid UTF-8")]
    InvalidUtf8,
}

/// Fixed-size key buffer, zeroed on drop.
struct KeyBytes([u8; KEY_LEN]);

impl Drop for KeyBytes {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

/// The envelope codec.
///
/// Construct with [`FieldCipher::new`]. An invalid key does not fail
/// construction; the cipher is then *degraded* and every fail-open call
/// returns its input unchanged.
pub struct FieldCipher {
    key: Result<KeyBytes, KeyFault>,
}

/// Why a configured key cannot be used. Kept so each degraded call can log it.
#[derive(Debug, Clone, Copy)]
enum KeyFault {
    Missing,
    WrongLength(usize),
}

impl KeyFault {
    fn to_error(self) -> CipherError {
        match self {
            KeyFault::Missing => CipherError::MissingKey,
            KeyFault::WrongLength(n) => CipherError::InvalidKeyLength(n),
        }
    }
}

impl FieldCipher {
    /// Build a cipher from `config`.
    ///
    /// Logs an error once if the key is missing or the wrong length; the
    /// returned cipher is then degraded.
    pub fn new(config: &CipherConfig) -> Self {
        let bytes = config.key_bytes();
        let key = match bytes.len() {
            0 => Err(KeyFault::Missing),
            KEY_LEN => {
                let mut buf = [0u8; KEY_LEN];
                buf.copy_from_slice(bytes);
                Ok(KeyBytes(buf))
            }
            n => Err(KeyFault::WrongLength(n)),
        };
        if let Err(fault) = &key {
            error!(
                error = %fault.to_error(),
                "field encryption disabled; sensitive fields will be stored and returned as plaintext"
            );
        }
        Self { key }
    }

    /// Returns `true` if a usable key is configured.
    pub fn is_ready(&self) -> bool {
        self.key.is_ok()
    }

    fn key(&self) -> Result<&[u8; KEY_LEN], CipherError> {
        self.key
            .as_ref()
            .map(|k| &k.0)
            .map_err(|fault| fault.to_error())
    }

    /// Encrypt `plaintext` into an [`Envelope`] under a fresh random IV.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MissingKey`] or [`CipherError::InvalidKeyLength`]
    /// if the cipher is degraded.
    pub fn try_encrypt(&self, plaintext: &str) -> Result<Envelope, CipherError> {
        let key = self.key()?;

        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let ciphertext = Aes256CbcEnc::new(&(*key).into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        Ok(Envelope { iv, ciphertext })
    }

    /// Parse and decrypt an envelope string.
    ///
    /// # Errors
    ///
    /// Returns the key errors if degraded, the [`Envelope`] parse errors if
    /// `envelope` is malformed, [`CipherError::Padding`] if decryption fails
    /// and [`CipherError::InvalidUtf8`] if the result is not UTF-8.
    pub fn try_decrypt(&self, envelope: &str) -> Result<String, CipherError> {
        let key = self.key()?;
        let parsed: Envelope = envelope.parse()?;

        let plaintext = Aes256CbcDec::new(&(*key).into(), &parsed.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&parsed.ciphertext)
            .map_err(|_| CipherError::Padding)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::InvalidUtf8)
    }

    /// Encrypt `plaintext` into an envelope string, failing open.
    ///
    /// An empty input is returned as-is. If the cipher is degraded a warning
    /// is logged and `plaintext` is returned unchanged.
    pub fn encrypt(&self, plaintext: &str) -> String {
        if plaintext.is_empty() {
            return String::new();
        }
        match self.try_encrypt(plaintext) {
            Ok(envelope) => envelope.to_string(),
            Err(e) => {
                warn!(error = %e, "field encryption skipped; value left as plaintext");
                plaintext.to_owned()
            }
        }
    }

    /// Decrypt an envelope string, failing open.
    ///
    /// An empty input is returned as-is. On a degraded key or any decoding
    /// or decryption failure a warning is logged and `envelope` is returned
    /// unchanged.
    pub fn decrypt(&self, envelope: &str) -> String {
        if envelope.is_empty() {
            return String::new();
        }
        match self.try_decrypt(envelope) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                warn!(error = %e, "field decryption failed; returning stored value unchanged");
                envelope.to_owned()
            }
        }
    }

    /// [`encrypt`](Self::encrypt) for an optional value; `None` stays `None`.
    pub fn encrypt_opt(&self, plaintext: Option<&str>) -> Option<String> {
        plaintext.map(|p| self.encrypt(p))
    }

    /// [`decrypt`](Self::decrypt) for an optional value; `None` stays `None`.
    pub fn decrypt_opt(&self, envelope: Option<&str>) -> Option<String> {
        envelope.map(|e| self.decrypt(e))
    }

    /// Decrypt `value` only if it looks like an envelope.
    ///
    /// Values that were never encrypted (legacy rows) pass through untouched,
    /// which makes repeated application safe.
    pub fn safe_decrypt(&self, value: &str) -> String {
        if is_encrypted(value) {
            self.decrypt(value)
        } else {
            value.to_owned()
        }
    }
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher")
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}
