//! Outbound Notifications
//!
//! Fire-and-forget notification messages emitted when a candidate is
//! assigned and when feedback lands, mirroring the one-way `candidateAssigned`
//! / `feedbackSubmitted` message stream the dashboard listens on. Delivery
//! is best-effort: each message is logged and kept in a bounded recent
//! buffer; there is no inbound handling and no retry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Message kinds on the notification stream (camelCase on the wire)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    CandidateAssigned,
    FeedbackSubmitted,
}

/// One outbound message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub candidate_id: String,
    pub candidate_name: String,
    pub detail: String,
    pub sent_at: DateTime<Utc>,
}

/// In-process notifier with a bounded recent-message buffer
pub struct Notifier {
    recent: Mutex<VecDeque<Notification>>,
    capacity: usize,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        Self {
            recent: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Emit a message. Never fails; oldest messages are dropped once the
    /// buffer is full.
    pub fn send(&self, kind: NotificationKind, candidate_id: &str, candidate_name: &str, detail: &str) {
        let notification = Notification {
            kind,
            candidate_id: candidate_id.to_string(),
            candidate_name: candidate_name.to_string(),
            detail: detail.to_string(),
            sent_at: Utc::now(),
        };
        log::info!(
            "notification {:?}: {} ({})",
            kind,
            candidate_name,
            detail
        );

        let mut recent = self.recent.lock().unwrap();
        if recent.len() == self.capacity {
            recent.pop_front();
        }
        recent.push_back(notification);
    }

    /// Recent messages, oldest first
    pub fn recent(&self) -> Vec<Notification> {
        self.recent.lock().unwrap().iter().cloned().collect()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(100)
    }
}
