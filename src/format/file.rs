// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Manual export/import of a single document, independent of the catalog.
//!
//! The file shape is the persisted document payload, pretty-printed.

use chrono::{DateTime, NaiveDate, Utc};

use super::payload::{parse_payload, DocumentPayload, PayloadError};
use crate::model::Snapshot;

pub fn export_json(snapshot: &Snapshot, now: DateTime<Utc>) -> Result<String, serde_json::Error> {
    let mut out = DocumentPayload::encode(snapshot, now).to_json_pretty()?;
    out.push('\n');
    Ok(out)
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("imported document has no nodes")]
    Empty,
}

/// Reads an exported (or legacy flat) document. Unlike storage loads this reports problems to
/// the caller instead of falling back.
pub fn import_json(raw: &str) -> Result<Snapshot, ImportError> {
    let (snapshot, _) = parse_payload(raw)?;
    if snapshot.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(snapshot)
}

pub fn default_export_filename(date: NaiveDate) -> String {
    format!("mindmap_{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::{default_export_filename, export_json, import_json, ImportError};
    use crate::model::{Point, Snapshot};

    #[test]
    fn export_then_import_restores_document() {
        let snapshot = Snapshot::fresh(Point::new(10.0, 10.0));
        let raw = export_json(&snapshot, Utc::now()).expect("export");
        assert!(raw.ends_with('\n'));
        assert!(raw.contains("\"version\": \"2.0\""));

        let imported = import_json(&raw).expect("import");
        assert_eq!(imported, snapshot);
    }

    #[test]
    fn import_reports_errors() {
        assert!(matches!(import_json("nope"), Err(ImportError::Payload(_))));
        assert!(matches!(
            import_json(r#"{"version":"2.0","tree":[]}"#),
            Err(ImportError::Empty)
        ));
    }

    #[test]
    fn export_filename_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).expect("date");
        assert_eq!(default_export_filename(date), "mindmap_2026-03-07.json");
    }
}
