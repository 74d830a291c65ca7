//! Case sources
//!
//! The board never writes case data. It asks a [`CaseSource`] for the
//! current non-archived case list on every poll, either by reading the case
//! store's JSON file directly or by calling the store's read-only TV feed.
//!
//! Both carry the same document shape, `{ "cases": [ ... ] }`, and both are
//! decoded leniently: a record that cannot be understood is skipped with a
//! warning instead of failing the whole list.

mod http;
mod json;

pub use http::{HttpCaseSource, TV_FEED_PATH};
pub use json::JsonCaseStore;

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::Result;
use crate::types::{Attention, CaseSummary};
use crate::urgency::parse_due_date;

/// Read-only access to the current case list.
pub trait CaseSource {
    /// Human-readable description for logs and the status line.
    fn describe(&self) -> String;

    /// Fetch every non-archived case.
    fn list_cases(&self) -> Result<Vec<CaseSummary>>;
}

/// Pick the case source for this run.
///
/// An explicit store path wins, then an explicit URL, then the configured
/// URL, then the configured (or `CASES_JSON`) file path.
pub fn open(
    store_path: Option<PathBuf>,
    url: Option<&str>,
    config: &Config,
) -> Result<Box<dyn CaseSource>> {
    if let Some(path) = store_path {
        return Ok(Box::new(JsonCaseStore::new(path)));
    }

    match url.or(config.store.url.as_deref()) {
        Some(url) => Ok(Box::new(HttpCaseSource::new(
            url,
            config.board.feed_timeout(),
        )?)),
        None => Ok(Box::new(JsonCaseStore::new(config.store.resolved_path()))),
    }
}

/// One case as stored or served by the case store.
///
/// Every field is read as a raw JSON value first so that one badly typed
/// field degrades to its default instead of losing the whole case.
#[derive(Debug, Deserialize)]
struct CaseRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    next_due: Option<Value>,
    #[serde(default)]
    attention: Attention,
    #[serde(default)]
    client_name: Option<Value>,
    #[serde(default)]
    case_name: Option<Value>,
    #[serde(default)]
    case_type: Option<Value>,
    #[serde(default)]
    case_number: Option<Value>,
    #[serde(default)]
    stage: Option<Value>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    paralegal: Option<Value>,
    #[serde(default)]
    county: Option<Value>,
    #[serde(default)]
    current_focus: Option<Value>,
    #[serde(default)]
    top_priority: Option<Value>,
    #[serde(default)]
    archived: Option<Value>,
    #[serde(default)]
    deadlines: Option<Value>,
    #[serde(default)]
    focus_log: Option<Value>,
    #[serde(default)]
    colleague_tasks: Option<Value>,
    /// Precomputed by the TV feed
    #[serde(default)]
    unreviewed_colleague_task_count: Option<Value>,
}

impl CaseRecord {
    fn is_archived(&self) -> bool {
        lenient_flag(self.archived.as_ref())
    }

    /// Apply the derived-field rules the case store uses before serving a
    /// record, then drop everything the board does not need.
    ///
    /// Returns `None` only when the record has no usable id.
    fn into_summary(self) -> Option<CaseSummary> {
        let id = lenient_text(self.id).filter(|id| !id.trim().is_empty())?;

        let next_due = match lenient_list(self.deadlines) {
            Some(deadlines) => {
                earliest_open_deadline(&deadlines).map(|d| d.format("%Y-%m-%d").to_string())
            }
            None => match self.next_due {
                Some(Value::String(raw)) => Some(raw),
                _ => None,
            },
        };

        let current_focus = lenient_list(self.focus_log)
            .and_then(|log| log.last().and_then(|entry| entry.get("text").cloned()))
            .and_then(|text| lenient_text(Some(text)))
            .or_else(|| lenient_text(self.current_focus));

        let unreviewed_task_count = match lenient_list(self.colleague_tasks) {
            Some(tasks) => tasks
                .iter()
                .filter(|t| t.is_object() && !lenient_flag(t.get("reviewed")))
                .count(),
            None => self
                .unreviewed_colleague_task_count
                .as_ref()
                .and_then(Value::as_u64)
                .map_or(0, |n| usize::try_from(n).unwrap_or(usize::MAX)),
        };

        Some(CaseSummary {
            id,
            next_due,
            attention: self.attention,
            client_name: lenient_text(self.client_name),
            case_name: lenient_text(self.case_name),
            case_type: lenient_text(self.case_type),
            case_number: lenient_text(self.case_number),
            stage: lenient_text(self.stage),
            status: lenient_text(self.status),
            paralegal: lenient_text(self.paralegal),
            county: lenient_text(self.county),
            current_focus,
            top_priority: lenient_flag(self.top_priority.as_ref()),
            unreviewed_task_count,
        })
    }
}

/// Earliest due date among unresolved deadlines that have one.
fn earliest_open_deadline(deadlines: &[Value]) -> Option<NaiveDate> {
    deadlines
        .iter()
        .filter(|d| !lenient_flag(d.get("resolved")))
        .filter_map(|d| d.get("due_date").and_then(Value::as_str))
        .filter_map(parse_due_date)
        .min()
}

/// Text field; numbers and bools are rendered as text, anything else is absent.
fn lenient_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Boolean field; accepts real bools, non-zero numbers and "true"/"yes"/"1".
fn lenient_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => {
            matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1")
        }
        _ => false,
    }
}

/// List field; a present value that is not an array counts as an empty list.
fn lenient_list(value: Option<Value>) -> Option<Vec<Value>> {
    value.map(|v| match v {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

/// Pull the non-archived cases out of a `{ "cases": [...] }` document.
pub(crate) fn cases_from_document(document: Value, origin: &str) -> Vec<CaseSummary> {
    let records = match document {
        Value::Object(mut map) => match map.remove("cases") {
            Some(Value::Array(records)) => records,
            Some(_) => {
                tracing::warn!(origin, "\"cases\" is not an array; treating as empty");
                return Vec::new();
            }
            None => Vec::new(),
        },
        _ => {
            tracing::warn!(origin, "case document is not an object; treating as empty");
            return Vec::new();
        }
    };

    let total = records.len();
    let mut skipped = 0usize;
    let mut archived = 0usize;
    let mut cases = Vec::with_capacity(total);

    for (index, value) in records.into_iter().enumerate() {
        match serde_json::from_value::<CaseRecord>(value) {
            Ok(record) if record.is_archived() => archived += 1,
            Ok(record) => match record.into_summary() {
                Some(case) => cases.push(case),
                None => {
                    skipped += 1;
                    tracing::warn!(origin, index, "Skipping case record without an id");
                }
            },
            Err(e) => {
                skipped += 1;
                tracing::warn!(origin, index, error = %e, "Skipping unreadable case record");
            }
        }
    }

    tracing::debug!(
        origin,
        total,
        loaded = cases.len(),
        archived,
        skipped,
        "Decoded case document"
    );

    cases
}
