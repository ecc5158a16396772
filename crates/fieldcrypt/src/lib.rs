//! Field-level encryption for sensitive medical record fields.
//!
//! Selected string fields of a record (diagnosis text, clinical notes,
//! prescription notes) are replaced with self-describing envelope strings
//! before they are written to storage and restored after they are read.
//!
//! # Envelope format
//!
//! ```text
//! <hex(iv)>:<base64(aes-256-cbc(plaintext))>
//! ```
//!
//! The IV is 16 random bytes drawn per call, so encrypting the same value
//! twice never yields the same envelope.
//!
//! # Failure policy
//!
//! Every public operation fails open: a missing or malformed key, or an
//! envelope that cannot be decoded, logs a warning and returns the input
//! unchanged. A misconfigured key therefore never blocks a clinical write or
//! read path. The strict [`FieldCipher::try_encrypt`] and
//! [`FieldCipher::try_decrypt`] are available for callers that need to see
//! the error.
//!
//! # Module invariants
//!
//! - **No storage or network dependencies.** Callers hand in values and get
//!   values back.
//! - **No key material in logs.** Neither plaintext, ciphertext, nor key bytes
//!   appear in any log field.

pub mod cipher;
pub mod config;
pub mod envelope;
pub mod policy;
pub mod projector;

pub use cipher::{CipherError, FieldCipher};
pub use config::{CipherConfig, KEY_LEN};
pub use envelope::{is_encrypted, Envelope, IV_LEN};
pub use policy::{RecordKind, UnknownRecordKind};
pub use projector::{decrypt_object, encrypt_object, seal_object};
