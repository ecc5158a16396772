//! [`CipherConfig`]: the process-wide field encryption key.

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Key material handed to [`FieldCipher::new`](crate::FieldCipher::new).
///
/// The secret is kept as raw bytes exactly as configured. Only a value of
/// exactly [`KEY_LEN`] bytes is usable; anything else puts the cipher into
/// degraded (pass-through) mode rather than failing construction.
///
/// The buffer is overwritten with zeroes on drop.
#[derive(Clone)]
pub struct CipherConfig {
    key: Vec<u8>,
}

impl CipherConfig {
    /// Wrap raw key bytes.
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    /// Build a config from a configured secret string.
    ///
    /// The secret's UTF-8 bytes are the key, so a 32-character ASCII secret
    /// yields a valid 256-bit key. An absent secret yields an empty (invalid)
    /// key.
    pub fn from_secret(secret: Option<&str>) -> Self {
        Self::new(secret.unwrap_or_default().as_bytes())
    }

    /// Returns `true` if the key is exactly [`KEY_LEN`] bytes.
    pub fn is_valid(&self) -> bool {
        self.key.len() == KEY_LEN
    }

    /// Length of the configured key in bytes.
    pub fn key_len(&self) -> usize {
        self.key.len()
    }

    pub(crate) fn key_bytes(&self) -> &[u8] {
        &self.key
    }
}

impl Drop for CipherConfig {
    fn drop(&mut self) {
        self.key.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherConfig")
            .field("key", &"[REDACTED]")
            .field("key_len", &self.key.len())
            .finish()
    }
}
