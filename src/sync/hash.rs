//! Content hashing for change detection.
//!
//! SHA256 over serialized JSON gives a stable fingerprint of a snapshot, so
//! an unchanged refresh does not rewrite the cache.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Compute a SHA256 hash of a serializable value.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized to JSON.
pub fn content_hash<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(sha256_hex(json.as_bytes()))
}

/// Order-independent fingerprint of a record's `(field, value)` pairs.
///
/// Used as the identity of records that carry no id, url, timestamp or name.
#[must_use]
pub fn row_fingerprint<'a, 'b, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'b str)>,
{
    let mut parts: Vec<String> = pairs
        .into_iter()
        .map(|(field, value)| format!("{field}:{value}"))
        .collect();
    parts.sort();
    sha256_hex(parts.join("\n").as_bytes())
}

/// Check if content changed against a stored hash.
///
/// Returns `true` when there is no stored hash or it differs.
#[must_use]
pub fn has_changed(current_hash: &str, stored_hash: Option<&str>) -> bool {
    stored_hash.is_none_or(|h| h != current_hash)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Snapshot {
        names: Vec<&'static str>,
    }

    #[test]
    fn test_content_hash_tracks_content() {
        let a = content_hash(&Snapshot { names: vec!["Ana", "Bia"] }).unwrap();
        let b = content_hash(&Snapshot { names: vec!["Ana", "Bia"] }).unwrap();
        let c = content_hash(&Snapshot { names: vec!["Bia", "Ana"] }).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, c);
    }

    #[test]
    fn test_row_fingerprint_ignores_field_order() {
        let one = row_fingerprint([("nome", "-"), ("regiao", "Sul")]);
        let two = row_fingerprint([("regiao", "Sul"), ("nome", "-")]);
        let other = row_fingerprint([("regiao", "Norte"), ("nome", "-")]);

        assert_eq!(one, two);
        assert_ne!(one, other);
    }

    #[test]
    fn test_has_changed() {
        assert!(has_changed("abc123", None));
        assert!(has_changed("abc123", Some("xyz789")));
        assert!(!has_changed("abc123", Some("abc123")));
    }
}
