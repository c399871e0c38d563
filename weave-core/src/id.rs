//! Typed ID wrappers and the content-addressed id generator.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Typed ID wrappers prevent mixing up content ids and chunk batch ids.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Create a typed id from anything that converts to `String`.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

typed_id!(ContentId, "Stable id for a Message or a Chunk batch.");

/// Generate a stable 8-hex-character id from the current wall clock time
/// and a random draw, mirroring `gen_index(created_at + random)` in the
/// source this model is based on.
pub fn gen_content_id() -> ContentId {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let random: u32 = rand::random();
    gen_content_id_from(millis, random)
}

/// Deterministic core of [`gen_content_id`], split out so tests can supply
/// fixed inputs instead of depending on wall-clock time and randomness.
pub fn gen_content_id_from(millis: u128, random: u32) -> ContentId {
    let mut hasher = Sha256::new();
    hasher.update(millis.to_string().as_bytes());
    hasher.update(random.to_string().as_bytes());
    let digest = hasher.finalize();
    let hex = digest.iter().map(|b| format!("{b:02x}")).collect::<String>();
    ContentId::new(hex[..8].to_string())
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_id_is_eight_hex_chars() {
        let id = gen_content_id_from(1_700_000_000_000, 42);
        assert_eq!(id.as_str().len(), 8);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn content_id_is_deterministic_for_same_inputs() {
        let a = gen_content_id_from(1, 2);
        let b = gen_content_id_from(1, 2);
        assert_eq!(a, b);
    }

    #[test]
    fn content_id_differs_across_inputs() {
        let a = gen_content_id_from(1, 2);
        let b = gen_content_id_from(1, 3);
        assert_ne!(a, b);
    }
}
