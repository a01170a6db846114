//! Pipeline Timeline
//!
//! Append-only audit trail keyed by subject id: candidate intake,
//! scheduling, interview start, feedback, terminal outcome, plus panelist
//! availability changes (keyed by the panelist id). This replaces the
//! legacy local "interview session" objects; the candidate record plus
//! this timeline is the canonical history.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqlResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ============================================================
// EVENT TYPES
// ============================================================

/// Types of events recorded on the pipeline timeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineEventType {
    CandidateCreated,
    BulkImported,
    RoundScheduled,
    InterviewStarted,
    FeedbackSubmitted,
    CandidateHired,
    CandidateRejected,
    PanelistStatusChanged,
}

impl PipelineEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineEventType::CandidateCreated => "candidate_created",
            PipelineEventType::BulkImported => "bulk_imported",
            PipelineEventType::RoundScheduled => "round_scheduled",
            PipelineEventType::InterviewStarted => "interview_started",
            PipelineEventType::FeedbackSubmitted => "feedback_submitted",
            PipelineEventType::CandidateHired => "candidate_hired",
            PipelineEventType::CandidateRejected => "candidate_rejected",
            PipelineEventType::PanelistStatusChanged => "panelist_status_changed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "candidate_created" => Some(PipelineEventType::CandidateCreated),
            "bulk_imported" => Some(PipelineEventType::BulkImported),
            "round_scheduled" => Some(PipelineEventType::RoundScheduled),
            "interview_started" => Some(PipelineEventType::InterviewStarted),
            "feedback_submitted" => Some(PipelineEventType::FeedbackSubmitted),
            "candidate_hired" => Some(PipelineEventType::CandidateHired),
            "candidate_rejected" => Some(PipelineEventType::CandidateRejected),
            "panelist_status_changed" => Some(PipelineEventType::PanelistStatusChanged),
            _ => None,
        }
    }
}

// ============================================================
// PIPELINE EVENT
// ============================================================

/// A single event on a candidate's timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    pub id: String,
    pub subject_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: PipelineEventType,
    pub description: String,
    /// Optional structured metadata (JSON)
    pub metadata: Option<serde_json::Value>,
}

impl PipelineEvent {
    pub fn new(subject_id: &str, event_type: PipelineEventType, description: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            subject_id: subject_id.to_string(),
            timestamp: Utc::now(),
            event_type,
            description: description.to_string(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// The full ordered timeline for one candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineTimeline {
    pub subject_id: String,
    pub events: Vec<PipelineEvent>,
}

// ============================================================
// TIMELINE STORE (SQLite-backed)
// ============================================================

/// SQLite-backed persistent timeline store
pub struct TimelineStore {
    conn: Arc<Mutex<Connection>>,
}

impl TimelineStore {
    /// Create a new timeline store with SQLite backend
    pub fn new(db_path: Option<PathBuf>) -> SqlResult<Self> {
        let path = db_path.unwrap_or_else(|| PathBuf::from("ats_timeline.db"));
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory store (tests and prototype mode)
    pub fn in_memory() -> SqlResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_schema(conn: &Connection) -> SqlResult<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS pipeline_events (
                id TEXT PRIMARY KEY,
                subject_id TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                event_type TEXT NOT NULL,
                description TEXT NOT NULL,
                metadata TEXT
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_events_subject
             ON pipeline_events(subject_id)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_events_timestamp
             ON pipeline_events(timestamp)",
            [],
        )?;
        Ok(())
    }

    /// Record a new event
    pub fn record_event(&self, event: &PipelineEvent) -> SqlResult<()> {
        let conn = self.conn.lock().unwrap();
        let metadata_json = event.metadata.as_ref().map(|m| m.to_string());

        conn.execute(
            "INSERT INTO pipeline_events (id, subject_id, timestamp, event_type, description, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                event.id,
                event.subject_id,
                event.timestamp.to_rfc3339(),
                event.event_type.as_str(),
                event.description,
                metadata_json,
            ],
        )?;

        Ok(())
    }

    /// Get the full timeline for a candidate, oldest first
    pub fn get_timeline(&self, subject_id: &str) -> SqlResult<PipelineTimeline> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, subject_id, timestamp, event_type, description, metadata
             FROM pipeline_events
             WHERE subject_id = ?1
             ORDER BY timestamp ASC",
        )?;

        let events = stmt.query_map([subject_id], |row| {
            let event_type_str: String = row.get(3)?;
            let metadata_str: Option<String> = row.get(5)?;
            let timestamp_str: String = row.get(2)?;

            Ok(PipelineEvent {
                id: row.get(0)?,
                subject_id: row.get(1)?,
                timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
                event_type: PipelineEventType::from_str(&event_type_str)
                    .unwrap_or(PipelineEventType::CandidateCreated),
                description: row.get(4)?,
                metadata: metadata_str.and_then(|s| serde_json::from_str(&s).ok()),
            })
        })?;

        let events: Vec<PipelineEvent> = events.filter_map(|e| e.ok()).collect();

        Ok(PipelineTimeline {
            subject_id: subject_id.to_string(),
            events,
        })
    }

    /// Count of recorded events (all candidates)
    pub fn event_count(&self) -> SqlResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM pipeline_events", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

// ============================================================
// HELPER FUNCTIONS
// ============================================================

/// Record a candidate intake event
pub fn record_candidate_created(
    store: &TimelineStore,
    subject_id: &str,
    name: &str,
) -> SqlResult<()> {
    let event = PipelineEvent::new(
        subject_id,
        PipelineEventType::CandidateCreated,
        &format!("Candidate created: {}", name),
    );
    store.record_event(&event)
}

/// Record a bulk-import intake event
pub fn record_bulk_imported(store: &TimelineStore, subject_id: &str, source: &str) -> SqlResult<()> {
    let event = PipelineEvent::new(
        subject_id,
        PipelineEventType::BulkImported,
        &format!("Imported via bulk upload (source: {})", source),
    );
    store.record_event(&event)
}

/// Record a round-scheduled event
pub fn record_round_scheduled(
    store: &TimelineStore,
    subject_id: &str,
    round: &str,
    panelist_name: &str,
) -> SqlResult<()> {
    let event = PipelineEvent::new(
        subject_id,
        PipelineEventType::RoundScheduled,
        &format!("Round {} scheduled with {}", round, panelist_name),
    );
    store.record_event(&event)
}

/// Record an interview-started event
pub fn record_interview_started(store: &TimelineStore, subject_id: &str, round: &str) -> SqlResult<()> {
    let event = PipelineEvent::new(
        subject_id,
        PipelineEventType::InterviewStarted,
        &format!("Round {} interview started", round),
    );
    store.record_event(&event)
}

/// Record a feedback-submitted event
pub fn record_feedback_submitted(
    store: &TimelineStore,
    subject_id: &str,
    round: &str,
    decision: &str,
) -> SqlResult<()> {
    let event = PipelineEvent::new(
        subject_id,
        PipelineEventType::FeedbackSubmitted,
        &format!("Round {} feedback submitted: {}", round, decision),
    );
    store.record_event(&event)
}

/// Record a terminal transition event
pub fn record_terminal(
    store: &TimelineStore,
    subject_id: &str,
    hired: bool,
) -> SqlResult<()> {
    let event = if hired {
        PipelineEvent::new(
            subject_id,
            PipelineEventType::CandidateHired,
            "Candidate cleared the final round and was hired",
        )
    } else {
        PipelineEvent::new(
            subject_id,
            PipelineEventType::CandidateRejected,
            "Candidate was rejected",
        )
    };
    store.record_event(&event)
}

/// Record a panelist availability change (keyed by the panelist id)
pub fn record_panelist_status_changed(
    store: &TimelineStore,
    panelist_id: &str,
    from: &str,
    to: &str,
) -> SqlResult<()> {
    let event = PipelineEvent::new(
        panelist_id,
        PipelineEventType::PanelistStatusChanged,
        &format!("Panelist status changed: {} -> {}", from, to),
    );
    store.record_event(&event)
}
