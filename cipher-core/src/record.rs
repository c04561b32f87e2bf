// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath
//
// Credential record model and the master secret wrapper.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const DEFAULT_HASH_NAME: &str = "MD5";
pub const DEFAULT_OUTPUT_LENGTH: usize = 16;

/// Shape of the derived output. Stored numerically (0/1/2); any larger
/// index wraps modulo 3 so legacy files with out-of-range values still
/// load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum OutputKind {
    /// Mixed-case hex, suitable for most account passwords.
    #[default]
    Email,
    /// Decimal digits only (PIN codes).
    Digit,
    /// Mixed-case hex stamped with characters from a caller charset.
    Custom,
}

impl From<u32> for OutputKind {
    fn from(value: u32) -> Self {
        match value % 3 {
            0 => Self::Email,
            1 => Self::Digit,
            _ => Self::Custom,
        }
    }
}

impl From<OutputKind> for u32 {
    fn from(kind: OutputKind) -> Self {
        match kind {
            OutputKind::Email => 0,
            OutputKind::Digit => 1,
            OutputKind::Custom => 2,
        }
    }
}

/// One derivation entry. Field names bind to the historical JSON keys,
/// so exported files stay interchangeable with older databases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Site or account identifier; doubles as the HMAC key.
    #[serde(rename = "text")]
    pub identifier: String,
    /// Registry name of the digest; unknown names resolve to MD5.
    #[serde(rename = "hash", default = "default_hash_name")]
    pub hash_name: String,
    /// Requested output length, clamped to twice the digest size.
    #[serde(rename = "size", default = "default_output_length")]
    pub output_length: usize,
    #[serde(rename = "type", default)]
    pub output_kind: OutputKind,
    /// Extra characters stamped into the output for `Custom` records.
    #[serde(rename = "misc", default, skip_serializing_if = "String::is_empty")]
    pub custom_charset: String,
    #[serde(rename = "hint", default, skip_serializing_if = "String::is_empty")]
    pub hint: String,
    /// Unix timestamp of the last modification.
    #[serde(rename = "time", default)]
    pub updated_at: i64,
}

fn default_hash_name() -> String {
    DEFAULT_HASH_NAME.to_string()
}

fn default_output_length() -> usize {
    DEFAULT_OUTPUT_LENGTH
}

impl Default for CredentialRecord {
    fn default() -> Self {
        Self {
            identifier: String::new(),
            hash_name: default_hash_name(),
            output_length: DEFAULT_OUTPUT_LENGTH,
            output_kind: OutputKind::Email,
            custom_charset: String::new(),
            hint: String::new(),
            updated_at: 0,
        }
    }
}

impl CredentialRecord {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            updated_at: Utc::now().timestamp(),
            ..Self::default()
        }
    }

    /// Refresh the modification stamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().timestamp();
    }
}

/// Master secret material, wiped on drop and redacted in debug output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret {
    bytes: Vec<u8>,
}

impl MasterSecret {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<&str> for MasterSecret {
    fn from(value: &str) -> Self {
        Self {
            bytes: value.as_bytes().to_vec(),
        }
    }
}

impl From<Vec<u8>> for MasterSecret {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl std::fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterSecret(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_defaults() {
        let record = CredentialRecord::new("example.com");
        assert_eq!(record.identifier, "example.com");
        assert_eq!(record.hash_name, "MD5");
        assert_eq!(record.output_length, 16);
        assert_eq!(record.output_kind, OutputKind::Email);
        assert!(record.custom_charset.is_empty());
        assert!(record.updated_at > 0);
    }

    #[test]
    fn test_output_kind_wraps_modulo_three() {
        assert_eq!(OutputKind::from(0u32), OutputKind::Email);
        assert_eq!(OutputKind::from(1u32), OutputKind::Digit);
        assert_eq!(OutputKind::from(2u32), OutputKind::Custom);
        assert_eq!(OutputKind::from(4u32), OutputKind::Digit);
        assert_eq!(OutputKind::from(300u32), OutputKind::Email);
    }

    #[test]
    fn test_record_json_keys() {
        let mut record = CredentialRecord::new("example.com");
        record.output_kind = OutputKind::Digit;
        record.output_length = 6;
        record.updated_at = 1700000000;
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["text"], "example.com");
        assert_eq!(json["hash"], "MD5");
        assert_eq!(json["size"], 6);
        assert_eq!(json["type"], 1);
        assert_eq!(json["time"], 1700000000);
        // empty optionals are omitted
        assert!(json.get("misc").is_none());
        assert!(json.get("hint").is_none());
    }

    #[test]
    fn test_record_json_defaults_on_import() {
        let record: CredentialRecord =
            serde_json::from_str(r#"{"text":"example.com"}"#).unwrap();
        assert_eq!(record.hash_name, "MD5");
        assert_eq!(record.output_length, 16);
        assert_eq!(record.output_kind, OutputKind::Email);
        assert_eq!(record.updated_at, 0);
    }

    #[test]
    fn test_master_secret_redacted_debug() {
        let secret = MasterSecret::from("hunter2");
        assert_eq!(format!("{secret:?}"), "MasterSecret(<redacted>)");
        assert_eq!(secret.as_bytes(), b"hunter2");
    }
}
