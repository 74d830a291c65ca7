//! Integration tests for caseboard-core
//!
//! These tests read case documents through the real sources and push them
//! through grouping, paging and the board reducer.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use caseboard_core::source::{CaseSource, HttpCaseSource, JsonCaseStore};
use caseboard_core::{
    flatten, group_and_sort, paginate, reduce, Attention, BoardEvent, BoardState, BoardSummary,
    Bucket, Error,
};
use chrono::{NaiveDate, Utc};
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

/// A store file shaped like the one the case store writes.
const STORE_FILE: &str = r#"{
  "schema_version": 1,
  "saved_at": "2024-06-10T13:45:12.000001",
  "cases": [
    {
      "id": "c-later",
      "client_name": "Harper Lane",
      "case_name": "Lane v. Apex Freight",
      "case_type": "Auto",
      "stage": "Discovery",
      "status": "Active",
      "attention": "",
      "paralegal": "NC",
      "case_number": "24-CV-0112",
      "deadlines": [{"due_date": "2024-06-25", "description": "Expert designation", "resolved": false}],
      "focus_log": [],
      "colleague_tasks": []
    },
    {
      "id": "c-overdue",
      "client_name": "Diego Ortiz",
      "case_name": "Ortiz v. Northside Clinic",
      "case_type": "Med Mal",
      "attention": "needs_attention",
      "deadlines": [
        {"due_date": "2024-06-07", "description": "Answer due", "resolved": false},
        {"due_date": "2024-06-30", "description": "Mediation", "resolved": false}
      ],
      "focus_log": [{"at": "2024-06-08T09:00:00", "author": "WB", "text": "Chase records"}],
      "colleague_tasks": [{"id": "t1", "at": "2024-06-08T09:00:00", "author": "TG", "task": "Call", "reviewed": false}]
    },
    {
      "id": "c-archived",
      "client_name": "Old Matter",
      "archived": true,
      "deadlines": [{"due_date": "2024-06-10", "description": "x", "resolved": false}]
    },
    {
      "id": "c-today",
      "client_name": "Priya Shah",
      "case_name": "Shah v. City",
      "attention": "waiting",
      "top_priority": true,
      "deadlines": [{"due_date": "2024-06-10", "description": "Hearing", "resolved": false}]
    },
    {
      "id": "c-nodue",
      "client_name": "Sam Reed",
      "case_name": "Reed Estate",
      "deadlines": []
    },
    {
      "id": "c-week",
      "client_name": "June Park",
      "next_due": "2024-06-12"
    },
    "garbage entry"
  ]
}"#;

fn write_store(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("cases.json");
    std::fs::write(&path, STORE_FILE).unwrap();
    path
}

// ============================================
// File Source -> Board
// ============================================

#[test]
fn test_store_file_to_groups() {
    caseboard_core::logging::init_test();

    let dir = TempDir::new().unwrap();
    let store = JsonCaseStore::new(write_store(&dir));
    let cases = store.list_cases().expect("store should load");

    assert_eq!(cases.len(), 5, "archived and garbage records are dropped");

    let groups = group_and_sort(&cases, today());
    let layout: Vec<(Bucket, Vec<&str>)> = groups
        .iter()
        .map(|g| (g.bucket, g.cases.iter().map(|c| c.case.id.as_str()).collect()))
        .collect();

    assert_eq!(
        layout,
        vec![
            (Bucket::Overdue, vec!["c-overdue"]),
            (Bucket::Today, vec!["c-today"]),
            (Bucket::Week, vec!["c-week"]),
            (Bucket::Later, vec!["c-later"]),
            (Bucket::NoDue, vec!["c-nodue"]),
        ]
    );

    let overdue = &groups[0].cases[0];
    assert_eq!(overdue.urgency.label, "3 days overdue");
    assert_eq!(overdue.case.attention, Attention::NeedsAttention);
    assert_eq!(overdue.case.current_focus.as_deref(), Some("Chase records"));
    assert_eq!(overdue.case.unreviewed_task_count, 1);

    assert_eq!(
        BoardSummary::from_groups(&groups),
        BoardSummary {
            overdue_count: 1,
            today_count: 1,
            week_count: 1,
            total_count: 5,
        }
    );
}

#[test]
fn test_flat_sequence_pages_cleanly() {
    let dir = TempDir::new().unwrap();
    let cases = JsonCaseStore::new(write_store(&dir)).list_cases().unwrap();
    let flat = flatten(&group_and_sort(&cases, today()));

    let pages = paginate(&flat, 2);
    assert_eq!(pages.iter().map(|p| p.len()).collect::<Vec<_>>(), vec![2, 2, 1]);
    assert_eq!(pages.concat(), flat);
}

#[test]
fn test_board_survives_refresh_cycle() {
    let dir = TempDir::new().unwrap();
    let path = write_store(&dir);
    let store = JsonCaseStore::new(&path);

    let mut state = BoardState::new(today(), 2);
    state = reduce(
        state,
        BoardEvent::Loaded {
            cases: store.list_cases().unwrap(),
            today: today(),
            at: Utc::now(),
        },
    );
    state = reduce(state, BoardEvent::AdvancePage);
    state = reduce(state, BoardEvent::AdvancePage);
    assert_eq!(state.page_index(), 2);

    // The store rewrites the file with fewer cases
    std::fs::write(
        &path,
        r#"{"schema_version": 1, "cases": [{"id": "only", "next_due": "2024-06-11"}]}"#,
    )
    .unwrap();
    state = reduce(
        state,
        BoardEvent::Loaded {
            cases: store.list_cases().unwrap(),
            today: today(),
            at: Utc::now(),
        },
    );
    assert_eq!(state.page_index(), 0);
    assert_eq!(state.current_page().len(), 1);
    assert_eq!(state.current_page()[0].urgency.label, "Due tomorrow");

    // A broken write keeps the previous snapshot on screen
    std::fs::write(&path, "{ truncated").unwrap();
    let err = store.list_cases().unwrap_err();
    assert!(matches!(err, Error::Json(_)));
    state = reduce(state, BoardEvent::LoadFailed(err.to_string()));
    assert_eq!(state.flat().len(), 1);
    assert!(state.last_error().unwrap().starts_with("JSON error"));
}

// ============================================
// HTTP Feed Source
// ============================================

/// Serve exactly one canned HTTP response on a local port.
fn serve_once(status_line: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    format!("http://{addr}")
}

#[test]
fn test_http_feed_source() {
    let body = serde_json::json!({
        "generated_at": "2024-06-10T14:00:00",
        "cases": [
            {"id": "a", "client_name": "Ada", "next_due": "2024-06-14", "unreviewed_colleague_task_count": 2,
             "has_unreviewed_colleague_tasks": true},
            {"id": "b", "client_name": "Bo", "next_due": null, "attention": "wait"}
        ]
    })
    .to_string();
    let base = serve_once("HTTP/1.1 200 OK", body);

    let source = HttpCaseSource::new(&base, Duration::from_secs(5)).unwrap();
    let cases = source.list_cases().expect("feed should load");

    assert_eq!(cases.len(), 2);
    assert_eq!(cases[0].unreviewed_task_count, 2);
    assert_eq!(cases[1].attention, Attention::Waiting);

    let groups = group_and_sort(&cases, today());
    assert_eq!(groups[0].bucket, Bucket::Next);
    assert_eq!(groups[1].bucket, Bucket::NoDue);
}

#[test]
fn test_http_feed_error_status() {
    let base = serve_once("HTTP/1.1 500 Internal Server Error", "{\"detail\":\"boom\"}".to_string());

    let source = HttpCaseSource::new(&base, Duration::from_secs(5)).unwrap();
    let err = source.list_cases().unwrap_err();

    match err {
        Error::Feed(message) => assert!(message.contains("500"), "unexpected: {message}"),
        other => panic!("expected feed error, got {other:?}"),
    }
}
