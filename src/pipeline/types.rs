//! Pipeline Types
//!
//! Canonical data structures for the interview pipeline. Every status,
//! round, role, and decision is an enumerated type with a single wire form;
//! free-form string variants from older schemas ("R1", "manager",
//! "skill_set") are accepted as parse-time aliases only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

// ============================================================
// INTERVIEW ROUNDS
// ============================================================

/// Sequential interview rounds. R3 is the final/decision round.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Round {
    R1,
    R2,
    R3,
}

impl Round {
    pub fn as_str(&self) -> &'static str {
        match self {
            Round::R1 => "r1",
            Round::R2 => "r2",
            Round::R3 => "r3",
        }
    }

    /// Case-insensitive parse ("R1" and "r1" are the same round).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "r1" | "round1" | "round_1" => Some(Round::R1),
            "r2" | "round2" | "round_2" => Some(Round::R2),
            "r3" | "round3" | "round_3" => Some(Round::R3),
            _ => None,
        }
    }

    /// The round that follows this one, if any.
    pub fn next(&self) -> Option<Round> {
        match self {
            Round::R1 => Some(Round::R2),
            Round::R2 => Some(Round::R3),
            Round::R3 => None,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Round::R3)
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================
// CANDIDATE STATUS
// ============================================================

/// Pipeline state of a candidate.
///
/// `Selected` and `Completed` are legacy terminal statuses kept for imported
/// data; the canonical final-round success status is `Hired`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateStatus {
    Unassigned,
    Assigned,
    R1Scheduled,
    R1InProgress,
    R1Completed,
    R2Scheduled,
    R2InProgress,
    R2Completed,
    R3Scheduled,
    R3InProgress,
    R3Completed,
    Selected,
    Rejected,
    Completed,
    Hired,
}

impl CandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Unassigned => "unassigned",
            CandidateStatus::Assigned => "assigned",
            CandidateStatus::R1Scheduled => "r1-scheduled",
            CandidateStatus::R1InProgress => "r1-in-progress",
            CandidateStatus::R1Completed => "r1-completed",
            CandidateStatus::R2Scheduled => "r2-scheduled",
            CandidateStatus::R2InProgress => "r2-in-progress",
            CandidateStatus::R2Completed => "r2-completed",
            CandidateStatus::R3Scheduled => "r3-scheduled",
            CandidateStatus::R3InProgress => "r3-in-progress",
            CandidateStatus::R3Completed => "r3-completed",
            CandidateStatus::Selected => "selected",
            CandidateStatus::Rejected => "rejected",
            CandidateStatus::Completed => "completed",
            CandidateStatus::Hired => "hired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "unassigned" => Some(CandidateStatus::Unassigned),
            "assigned" => Some(CandidateStatus::Assigned),
            "r1-scheduled" => Some(CandidateStatus::R1Scheduled),
            "r1-in-progress" => Some(CandidateStatus::R1InProgress),
            "r1-completed" => Some(CandidateStatus::R1Completed),
            "r2-scheduled" => Some(CandidateStatus::R2Scheduled),
            "r2-in-progress" => Some(CandidateStatus::R2InProgress),
            "r2-completed" => Some(CandidateStatus::R2Completed),
            "r3-scheduled" => Some(CandidateStatus::R3Scheduled),
            "r3-in-progress" => Some(CandidateStatus::R3InProgress),
            "r3-completed" => Some(CandidateStatus::R3Completed),
            "selected" => Some(CandidateStatus::Selected),
            "rejected" => Some(CandidateStatus::Rejected),
            "completed" => Some(CandidateStatus::Completed),
            "hired" => Some(CandidateStatus::Hired),
            _ => None,
        }
    }

    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CandidateStatus::Selected
                | CandidateStatus::Rejected
                | CandidateStatus::Completed
                | CandidateStatus::Hired
        )
    }

    /// The round this status belongs to, if it is a round-specific status.
    pub fn round(&self) -> Option<Round> {
        match self {
            CandidateStatus::R1Scheduled
            | CandidateStatus::R1InProgress
            | CandidateStatus::R1Completed => Some(Round::R1),
            CandidateStatus::R2Scheduled
            | CandidateStatus::R2InProgress
            | CandidateStatus::R2Completed => Some(Round::R2),
            CandidateStatus::R3Scheduled
            | CandidateStatus::R3InProgress
            | CandidateStatus::R3Completed => Some(Round::R3),
            _ => None,
        }
    }

    /// The "rN-scheduled" status for a round.
    pub fn scheduled_for(round: Round) -> Self {
        match round {
            Round::R1 => CandidateStatus::R1Scheduled,
            Round::R2 => CandidateStatus::R2Scheduled,
            Round::R3 => CandidateStatus::R3Scheduled,
        }
    }

    /// The "rN-in-progress" status for a round.
    pub fn in_progress_for(round: Round) -> Self {
        match round {
            Round::R1 => CandidateStatus::R1InProgress,
            Round::R2 => CandidateStatus::R2InProgress,
            Round::R3 => CandidateStatus::R3InProgress,
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================
// USER ROLES
// ============================================================

/// Role of a user in the ATS.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Hr,
    Recruiter,
    Admin,
    PanelMember,
    TpmTem,
    Manager,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Hr => "hr",
            UserRole::Recruiter => "recruiter",
            UserRole::Admin => "admin",
            UserRole::PanelMember => "panel_member",
            UserRole::TpmTem => "tpm_tem",
            UserRole::Manager => "manager",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hr" => Some(UserRole::Hr),
            "recruiter" => Some(UserRole::Recruiter),
            "admin" => Some(UserRole::Admin),
            "panel_member" | "panel-member" | "panelist" => Some(UserRole::PanelMember),
            "tpm_tem" | "tpm-tem" | "tpm" | "tem" => Some(UserRole::TpmTem),
            "manager" => Some(UserRole::Manager),
            _ => None,
        }
    }

    /// Roles authorized to conduct the final (r3) round.
    pub fn is_final_round_role(&self) -> bool {
        matches!(self, UserRole::TpmTem | UserRole::Manager)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================
// PANELIST AVAILABILITY
// ============================================================

/// Mutually exclusive availability of a panelist; one authoritative value
/// per panelist at any time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PanelistStatus {
    Free,
    InInterview,
    Break,
    Unavailable,
    #[serde(rename = "interview-assigned")]
    InterviewAssigned,
}

impl PanelistStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelistStatus::Free => "free",
            PanelistStatus::InInterview => "in_interview",
            PanelistStatus::Break => "break",
            PanelistStatus::Unavailable => "unavailable",
            PanelistStatus::InterviewAssigned => "interview-assigned",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "free" => Some(PanelistStatus::Free),
            "in_interview" | "in-interview" => Some(PanelistStatus::InInterview),
            "break" => Some(PanelistStatus::Break),
            "unavailable" => Some(PanelistStatus::Unavailable),
            "interview-assigned" | "interview_assigned" => Some(PanelistStatus::InterviewAssigned),
            _ => None,
        }
    }
}

impl fmt::Display for PanelistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================
// FEEDBACK DECISION
// ============================================================

/// Outcome of a completed round.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackDecision {
    Selected,
    Rejected,
}

impl FeedbackDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackDecision::Selected => "selected",
            FeedbackDecision::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "selected" | "select" | "pass" => Some(FeedbackDecision::Selected),
            "rejected" | "reject" | "fail" => Some(FeedbackDecision::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for FeedbackDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================
// INTERVIEW TYPE
// ============================================================

/// How the interview is conducted for a vacancy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    #[default]
    WalkIn,
    Virtual,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::WalkIn => "walk_in",
            InterviewType::Virtual => "virtual",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "walk_in" | "walk-in" | "walkin" => Some(InterviewType::WalkIn),
            "virtual" | "remote" | "online" => Some(InterviewType::Virtual),
            _ => None,
        }
    }
}

// ============================================================
// FEEDBACK RECORD
// ============================================================

/// One feedback record per (candidate, round). Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub round: Round,
    pub panelist_id: String,
    pub panelist_name: String,
    /// Numeric rating per competency (1..=5)
    pub ratings: HashMap<String, u8>,
    pub notes: String,
    pub decision: FeedbackDecision,
    pub submitted_at: DateTime<Utc>,
}

impl FeedbackRecord {
    pub fn new(round: Round, panelist_id: &str, panelist_name: &str, decision: FeedbackDecision) -> Self {
        Self {
            round,
            panelist_id: panelist_id.to_string(),
            panelist_name: panelist_name.to_string(),
            ratings: HashMap::new(),
            notes: String::new(),
            decision,
            submitted_at: Utc::now(),
        }
    }
}

// ============================================================
// CANDIDATE
// ============================================================

/// An applicant tracked through the hiring pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub skills: Vec<String>,
    pub years_experience: Option<u32>,
    /// Where the candidate came from ("LinkedIn", "referral", ...)
    pub source: String,
    pub vacancy_id: Option<String>,
    pub interview_type: InterviewType,
    pub status: CandidateStatus,
    pub current_round: Round,
    pub assigned_panelist_id: Option<String>,
    pub assigned_panelist: Option<String>,
    /// Append-only, one record per completed round
    pub feedback: Vec<FeedbackRecord>,
    pub created_at: DateTime<Utc>,
}

impl Candidate {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: String::new(),
            skills: Vec::new(),
            years_experience: None,
            source: "unknown".to_string(),
            vacancy_id: None,
            interview_type: InterviewType::default(),
            status: CandidateStatus::Unassigned,
            current_round: Round::R1,
            assigned_panelist_id: None,
            assigned_panelist: None,
            feedback: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

// ============================================================
// PANELIST
// ============================================================

/// A user who conducts interviews and submits feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Panelist {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub skills: Vec<String>,
    pub current_status: PanelistStatus,
    /// The single candidate this panelist is currently assigned to, if any
    pub assigned_candidate_id: Option<String>,
}

impl Panelist {
    pub fn new(name: &str, email: &str, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            skills: Vec::new(),
            current_status: PanelistStatus::Free,
            assigned_candidate_id: None,
        }
    }

    pub fn with_skills(mut self, skills: Vec<String>) -> Self {
        self.skills = skills;
        self
    }
}

// ============================================================
// VACANCY
// ============================================================

/// An open job requisition that candidates apply against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vacancy {
    pub id: String,
    pub title: String,
    pub department: String,
    pub location: String,
    pub interview_type: InterviewType,
    pub open: bool,
    pub created_at: DateTime<Utc>,
}

impl Vacancy {
    pub fn new(title: &str, department: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            department: department.to_string(),
            location: String::new(),
            interview_type: InterviewType::default(),
            open: true,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_parse_is_case_insensitive() {
        assert_eq!(Round::parse("R1"), Some(Round::R1));
        assert_eq!(Round::parse("r1"), Some(Round::R1));
        assert_eq!(Round::parse(" R3 "), Some(Round::R3));
        assert_eq!(Round::parse("r4"), None);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            CandidateStatus::Unassigned,
            CandidateStatus::R1Scheduled,
            CandidateStatus::R2InProgress,
            CandidateStatus::R3Completed,
            CandidateStatus::Hired,
        ] {
            assert_eq!(CandidateStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(CandidateStatus::parse("r1_scheduled"), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(CandidateStatus::Rejected.is_terminal());
        assert!(CandidateStatus::Hired.is_terminal());
        assert!(CandidateStatus::Selected.is_terminal());
        assert!(!CandidateStatus::R3Completed.is_terminal());
        assert!(!CandidateStatus::Unassigned.is_terminal());
    }

    #[test]
    fn test_role_aliases() {
        assert_eq!(UserRole::parse("TPM_TEM"), Some(UserRole::TpmTem));
        assert_eq!(UserRole::parse("manager"), Some(UserRole::Manager));
        assert_eq!(UserRole::parse("panel_member"), Some(UserRole::PanelMember));
        assert_eq!(UserRole::parse("wizard"), None);
        assert!(UserRole::TpmTem.is_final_round_role());
        assert!(UserRole::Manager.is_final_round_role());
        assert!(!UserRole::PanelMember.is_final_round_role());
    }

    #[test]
    fn test_panelist_status_wire_forms() {
        // "interview-assigned" is the one kebab-case outlier in the vocabulary
        let json = serde_json::to_string(&PanelistStatus::InterviewAssigned).unwrap();
        assert_eq!(json, "\"interview-assigned\"");
        let json = serde_json::to_string(&PanelistStatus::InInterview).unwrap();
        assert_eq!(json, "\"in_interview\"");
    }

    #[test]
    fn test_status_serde_kebab_case() {
        let json = serde_json::to_string(&CandidateStatus::R1Scheduled).unwrap();
        assert_eq!(json, "\"r1-scheduled\"");
        let parsed: CandidateStatus = serde_json::from_str("\"r2-in-progress\"").unwrap();
        assert_eq!(parsed, CandidateStatus::R2InProgress);
    }
}
