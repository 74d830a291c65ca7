//! Read the case store's JSON file directly.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::CaseSummary;

use super::{cases_from_document, CaseSource};

/// The case store's `cases.json`, read in full on every call.
///
/// The store replaces the file atomically on save, so a plain read always
/// sees a complete document.
#[derive(Debug, Clone)]
pub struct JsonCaseStore {
    path: PathBuf,
}

impl JsonCaseStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CaseSource for JsonCaseStore {
    fn describe(&self) -> String {
        self.path().display().to_string()
    }

    fn list_cases(&self) -> Result<Vec<CaseSummary>> {
        let path = self.path();
        if !path.exists() {
            tracing::info!(path = %path.display(), "No case file yet; board is empty");
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(path)?;
        let document: serde_json::Value = serde_json::from_str(&content)?;

        Ok(cases_from_document(document, &self.describe()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonCaseStore::new(dir.path().join("cases.json"));
        assert!(store.list_cases().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cases.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonCaseStore::new(&path).list_cases().unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
    }

    #[test]
    fn test_reads_store_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cases.json");
        std::fs::write(
            &path,
            r#"{
  "schema_version": 1,
  "saved_at": "2024-06-10T14:03:00",
  "cases": [
    {"id": "a", "client_name": "Ada", "next_due": "2024-06-12"},
    {"id": "b", "client_name": "Bo", "archived": true}
  ]
}"#,
        )
        .unwrap();

        let cases = JsonCaseStore::new(&path).list_cases().unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].client_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_badly_typed_due_dates_stay_on_board() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cases.json");
        std::fs::write(
            &path,
            r#"{
  "schema_version": 1,
  "cases": [
    {"id": "ok", "next_due": "2024-06-12"},
    {"id": "number", "next_due": 20240612},
    {"id": "object", "next_due": {"y": 2024}},
    {"id": "tbd", "deadlines": "tbd"}
  ]
}"#,
        )
        .unwrap();

        let store = JsonCaseStore::new(&path);
        assert_eq!(store.path(), path.as_path());

        let cases = store.list_cases().unwrap();
        assert_eq!(cases.len(), 4);

        let today = chrono::NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let summary = crate::BoardSummary::from_groups(&crate::group_and_sort(&cases, today));
        assert_eq!(summary.total_count, 4);
        assert_eq!(summary.week_count, 1);
    }
}
