//! Core domain types for caseboard
//!
//! The case store owns case records; this crate only ever reads them. A
//! [`CaseSummary`] is the board's view of one record: the fields needed to
//! classify it and the free-text fields carried through for display.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Case store** | The external JSON-file-backed service that owns case records |
//! | **Bucket** | One of six urgency categories a case falls into based on its due date |
//! | **Pill** | The short due-date status text shown next to a case |
//! | **Dwell time** | How long one page of the board stays on screen |

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================
// Attention
// ============================================

/// Manual attention flag set by staff on a case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Attention {
    /// Someone needs to act on this case
    NeedsAttention,
    /// Blocked on a third party
    Waiting,
    /// No flag
    #[default]
    None,
}

impl Attention {
    /// Wire value used by the case store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Attention::NeedsAttention => "needs_attention",
            Attention::Waiting => "waiting",
            Attention::None => "",
        }
    }

    /// Human-readable label, empty for [`Attention::None`].
    pub fn display_name(&self) -> &'static str {
        match self {
            Attention::NeedsAttention => "Needs Attention",
            Attention::Waiting => "Waiting",
            Attention::None => "",
        }
    }

    /// Parse a stored value, accepting the variants staff have typed over
    /// time. Anything unrecognized means no flag.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "needs_attention" | "needs-attention" | "needs" | "need" => Attention::NeedsAttention,
            "waiting" | "wait" => Attention::Waiting,
            _ => Attention::None,
        }
    }
}

impl Serialize for Attention {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Attention {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Non-string values mean no flag
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(raw) => Ok(Attention::parse_lenient(&raw)),
            _ => Ok(Attention::None),
        }
    }
}

// ============================================
// Case Summary
// ============================================

/// One non-archived case as the board sees it.
///
/// Every display field is optional; use [`crate::format::display_or_dash`]
/// when rendering rather than checking each one inline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseSummary {
    /// Opaque identifier assigned by the case store
    pub id: String,
    /// Earliest unresolved deadline, as stored (ISO-8601 date, possibly
    /// with a time part). Parsed leniently at classification time.
    #[serde(default)]
    pub next_due: Option<String>,
    /// Attention flag
    #[serde(default)]
    pub attention: Attention,

    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub case_name: Option<String>,
    #[serde(default)]
    pub case_type: Option<String>,
    #[serde(default)]
    pub case_number: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub paralegal: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub current_focus: Option<String>,

    /// Manually flagged as top priority
    #[serde(default)]
    pub top_priority: bool,
    /// Colleague tasks on this case nobody has reviewed yet
    #[serde(default)]
    pub unreviewed_task_count: usize,
}

impl CaseSummary {
    /// Create a summary with only an id; mostly useful in tests and fixtures.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder-style setter for the due date.
    pub fn with_next_due(mut self, next_due: impl Into<String>) -> Self {
        self.next_due = Some(next_due.into());
        self
    }

    /// Builder-style setter for the client name.
    pub fn with_client(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = Some(client_name.into());
        self
    }

    /// Whether there are colleague tasks waiting for review.
    pub fn has_unreviewed_tasks(&self) -> bool {
        self.unreviewed_task_count > 0
    }
}
