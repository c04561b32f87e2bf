// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath
//
// JSON import/export of credential records, array-of-objects layout.

use crate::error::{CipherError, CipherResult};
use crate::record::{CredentialRecord, OutputKind};

/// Serialize records to a JSON array. Records without an identifier are
/// dropped, and a custom charset is only emitted for `Custom` records.
pub fn export_records(records: &[CredentialRecord]) -> CipherResult<String> {
    let exportable: Vec<CredentialRecord> = records
        .iter()
        .filter(|r| !r.identifier.is_empty())
        .cloned()
        .map(|mut r| {
            if r.output_kind != OutputKind::Custom {
                r.custom_charset.clear();
            }
            r
        })
        .collect();
    serde_json::to_string(&exportable).map_err(|e| CipherError::Serialization(e.to_string()))
}

/// Parse a JSON array of records. Entries missing `text`, `size` or
/// `type`, `Custom` entries without `misc`, and entries that fail to
/// decode are skipped rather than failing the whole import.
pub fn import_records(text: &str) -> CipherResult<Vec<CredentialRecord>> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(text).map_err(|e| CipherError::Serialization(e.to_string()))?;

    let mut records = Vec::with_capacity(values.len());
    for value in values {
        if value.get("text").is_none() || value.get("size").is_none() || value.get("type").is_none()
        {
            continue;
        }
        let record: CredentialRecord = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(_) => continue,
        };
        if record.identifier.is_empty() {
            continue;
        }
        if record.output_kind == OutputKind::Custom && record.custom_charset.is_empty() {
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CredentialRecord {
        CredentialRecord {
            identifier: "example.com".to_string(),
            hash_name: "sha256".to_string(),
            output_length: 20,
            output_kind: OutputKind::Digit,
            hint: "work".to_string(),
            updated_at: 1700000000,
            ..CredentialRecord::default()
        }
    }

    #[test]
    fn test_export_import_round_trip() {
        let records = vec![sample(), CredentialRecord::new("other.org")];
        let json = export_records(&records).unwrap();
        let loaded = import_records(&json).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_import_skips_incomplete_entries() {
        let json = r#"[
            {"size": 16, "type": 0},
            {"text": "no-size.example", "type": 0},
            {"text": "no-type.example", "size": 16},
            {"text": "custom-no-misc.example", "size": 16, "type": 2},
            {"text": "ok.example", "size": 16, "type": 0}
        ]"#;
        let loaded = import_records(json).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].identifier, "ok.example");
    }

    #[test]
    fn test_import_rejects_malformed_document() {
        assert!(matches!(
            import_records("{not json"),
            Err(CipherError::Serialization(_))
        ));
        // top level must be an array
        assert!(import_records(r#"{"text":"x"}"#).is_err());
    }

    #[test]
    fn test_export_drops_charset_for_non_custom() {
        let mut record = sample();
        record.custom_charset = "@#".to_string();
        let json = export_records(&[record]).unwrap();
        assert!(!json.contains("misc"));
    }

    #[test]
    fn test_export_skips_unnamed_records() {
        let json = export_records(&[CredentialRecord::default()]).unwrap();
        assert_eq!(json, "[]");
    }
}
