//! Wall-clock helpers.
//!
//! The protocol carries every timestamp as a string-encoded epoch
//! millisecond value, so that is the only form produced here.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as epoch milliseconds, string encoded.
pub fn epoch_millis() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
        .to_string()
}

/// Deserialize a timestamp that may arrive as a JSON string (current form)
/// or as a bare integer (legacy clients). Always lands as a string.
pub mod timestamp_compat {
    use serde::de::{self, Visitor};
    use serde::Deserializer;
    use std::fmt;

    struct TimestampVisitor;

    impl Visitor<'_> for TimestampVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an epoch-millisecond timestamp as string or integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    /// serde `deserialize_with` entry point.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        d.deserialize_any(TimestampVisitor)
    }
}
