//! Apply the cipher to an allow-listed subset of a record's fields.
//!
//! Records are JSON objects. Each function clones the record and rewrites only
//! the listed top-level fields that hold strings; every other key and value is
//! carried over as-is. A record that is not an object is returned as an
//! unchanged clone.

use serde_json::Value;

use crate::cipher::FieldCipher;
use crate::envelope::is_encrypted;

/// Encrypt the listed string fields of `record`.
///
/// Listed fields that are absent or not strings are left alone. Values are
/// encrypted unconditionally, so a field that already holds an envelope is
/// wrapped a second time; use [`seal_object`] when the record may already be
/// partly encrypted.
pub fn encrypt_object<S: AsRef<str>>(cipher: &FieldCipher, record: &Value, fields: &[S]) -> Value {
    project(record, fields, |s| Some(cipher.encrypt(s)))
}

/// Decrypt the listed fields of `record` that hold envelope-shaped strings.
///
/// Plaintext, absent and non-string fields are left alone.
pub fn decrypt_object<S: AsRef<str>>(cipher: &FieldCipher, record: &Value, fields: &[S]) -> Value {
    project(record, fields, |s| {
        is_encrypted(s).then(|| cipher.safe_decrypt(s))
    })
}

/// Encrypt the listed string fields of `record` that are not yet encrypted.
///
/// Used to sweep stored rows holding a mix of legacy plaintext and envelopes:
/// running it again over its own output changes nothing.
pub fn seal_object<S: AsRef<str>>(cipher: &FieldCipher, record: &Value, fields: &[S]) -> Value {
    project(record, fields, |s| {
        (!is_encrypted(s)).then(|| cipher.encrypt(s))
    })
}

/// Clone `record` and replace each listed string field for which `f` returns
/// `Some`.
fn project<S, F>(record: &Value, fields: &[S], f: F) -> Value
where
    S: AsRef<str>,
    F: Fn(&str) -> Option<String>,
{
    let mut out = record.clone();
    let Value::Object(map) = &mut out else {
        return out;
    };
    for name in fields {
        if let Some(Value::String(s)) = map.get_mut(name.as_ref()) {
            if let Some(replaced) = f(s) {
                *s = replaced;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CipherConfig;
    use serde_json::json;

    fn cipher() -> FieldCipher {
        FieldCipher::new(&CipherConfig::from_secret(Some(
            "0123456789abcdef0123456789abcdef",
        )))
    }

    fn keys(v: &Value) -> Vec<String> {
        v.as_object().unwrap().keys().cloned().collect()
    }

    #[test]
    fn only_listed_fields_change() {
        let c = cipher();
        let record = json!({"a": "secret", "b": "keep", "c": 5});
        let before = record.clone();

        let out = encrypt_object(&c, &record, &["a"]);

        assert_eq!(record, before);
        assert_eq!(keys(&out), keys(&record));
        assert!(is_encrypted(out["a"].as_str().unwrap()));
        assert_eq!(out["b"], "keep");
        assert_eq!(out["c"], 5);
    }

    #[test]
    fn missing_field_is_noop() {
        let c = cipher();
        let record = json!({"name": "Bob"});
        let out = encrypt_object(&c, &record, &["ssn"]);
        assert_eq!(out, record);
    }

    #[test]
    fn non_string_fields_untouched() {
        let c = cipher();
        let record = json!({
            "notes": null,
            "heart_rate": 72,
            "flags": ["a"],
            "vitals": {"notes": "nested"},
            "active": true,
        });
        let fields = ["notes", "heart_rate", "flags", "vitals", "active"];
        assert_eq!(encrypt_object(&c, &record, &fields), record);
        assert_eq!(decrypt_object(&c, &record, &fields), record);
    }

    #[test]
    fn empty_string_stays_empty() {
        let c = cipher();
        let record = json!({"notes": ""});
        assert_eq!(encrypt_object(&c, &record, &["notes"]), record);
    }

    #[test]
    fn non_object_record_returned_unchanged() {
        let c = cipher();
        for record in [json!("text"), json!([1, 2]), json!(null)] {
            assert_eq!(encrypt_object(&c, &record, &["notes"]), record);
        }
    }

    #[test]
    fn already_encrypted_field_is_wrapped_again() {
        let c = cipher();
        let once = encrypt_object(&c, &json!({"notes": "BP normal"}), &["notes"]);
        let twice = encrypt_object(&c, &once, &["notes"]);

        let inner = c.decrypt(twice["notes"].as_str().unwrap());
        assert_eq!(inner, once["notes"].as_str().unwrap());
    }

    #[test]
    fn decrypt_leaves_plaintext_fields() {
        let c = cipher();
        let record = json!({"notes": "legacy plaintext note", "title": "x"});
        assert_eq!(decrypt_object(&c, &record, &["notes", "title"]), record);
    }

    #[test]
    fn decrypt_restores_mixed_record() {
        let c = cipher();
        let record = json!({
            "notes": c.encrypt("BP normal"),
            "diagnosis_description": "legacy text",
            "id": 7,
        });
        let out = decrypt_object(&c, &record, &["notes", "diagnosis_description"]);
        assert_eq!(
            out,
            json!({"notes": "BP normal", "diagnosis_description": "legacy text", "id": 7})
        );
    }

    #[test]
    fn duplicate_field_names_encrypt_twice() {
        let c = cipher();
        let out = encrypt_object(&c, &json!({"notes": "x"}), &["notes", "notes"]);
        let once = c.decrypt(out["notes"].as_str().unwrap());
        assert!(is_encrypted(&once));
        assert_eq!(c.decrypt(&once), "x");
    }

    #[test]
    fn seal_skips_encrypted_fields() {
        let c = cipher();
        let existing = c.encrypt("already sealed");
        let record = json!({"notes": existing.clone(), "summary": "legacy"});

        let out = seal_object(&c, &record, &["notes", "summary"]);

        assert_eq!(out["notes"], existing);
        assert!(is_encrypted(out["summary"].as_str().unwrap()));
        assert_eq!(seal_object(&c, &out, &["notes", "summary"]), out);
    }

    #[test]
    fn owned_field_lists_accepted() {
        let c = cipher();
        let fields = vec!["notes".to_string()];
        let out = encrypt_object(&c, &json!({"notes": "x"}), &fields);
        assert!(is_encrypted(out["notes"].as_str().unwrap()));
    }
}
