//! Pipeline State Machine
//!
//! The single authority for candidate status transitions. Every scheduling,
//! start, and feedback path goes through these functions; an out-of-order
//! request (e.g. r3 feedback for a candidate still in r1) is an explicit
//! error, never a silent status overwrite.
//!
//! Rule table for feedback-driven transitions:
//!
//! | round | decision | next status  | next round |
//! |-------|----------|--------------|------------|
//! | r1    | selected | r2-scheduled | r2         |
//! | r1    | rejected | rejected     | terminal   |
//! | r2    | selected | r3-scheduled | r3         |
//! | r2    | rejected | rejected     | terminal   |
//! | r3    | selected | hired        | terminal   |
//! | r3    | rejected | rejected     | terminal   |

use super::types::{CandidateStatus, FeedbackDecision, PanelistStatus, Round, UserRole};
use serde::Serialize;
use thiserror::Error;

// ============================================================
// ERRORS
// ============================================================

/// Everything that can go wrong when mutating pipeline state.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PipelineError {
    #[error("illegal transition: {decision} feedback for round {round} while candidate is {status}")]
    IllegalTransition {
        status: CandidateStatus,
        round: Round,
        decision: FeedbackDecision,
    },

    #[error("candidate is already in terminal status {0}")]
    AlreadyTerminal(CandidateStatus),

    #[error("cannot schedule round {round} from status {status}")]
    NotSchedulable {
        status: CandidateStatus,
        round: Round,
    },

    #[error("cannot start an interview from status {0}")]
    NotStartable(CandidateStatus),

    #[error("panelist {id} is not available (status {status})")]
    PanelistUnavailable { id: String, status: PanelistStatus },

    #[error("role {role} is not eligible to conduct round {round}")]
    RoleNotEligible { role: UserRole, round: Round },
}

// ============================================================
// FEEDBACK TRANSITION
// ============================================================

/// Result of applying a feedback decision.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Transition {
    pub next_status: CandidateStatus,
    /// `None` once the candidate reaches a terminal status
    pub next_round: Option<Round>,
    /// The assigned panelist is released on every round completion
    pub panelist_after: PanelistStatus,
    /// Whether the candidate's panelist assignment is cleared
    pub clears_assignment: bool,
}

/// Compute the transition for a submitted feedback decision.
///
/// Legal only when the candidate's status is the scheduled or in-progress
/// status of `round`. A `rejected` decision at any round is terminal.
pub fn advance_on_feedback(
    status: CandidateStatus,
    round: Round,
    decision: FeedbackDecision,
) -> Result<Transition, PipelineError> {
    if status.is_terminal() {
        return Err(PipelineError::AlreadyTerminal(status));
    }

    let legal = status == CandidateStatus::scheduled_for(round)
        || status == CandidateStatus::in_progress_for(round);
    if !legal {
        return Err(PipelineError::IllegalTransition {
            status,
            round,
            decision,
        });
    }

    let transition = match decision {
        FeedbackDecision::Rejected => Transition {
            next_status: CandidateStatus::Rejected,
            next_round: None,
            panelist_after: PanelistStatus::Free,
            clears_assignment: true,
        },
        FeedbackDecision::Selected => match round.next() {
            Some(next_round) => Transition {
                next_status: CandidateStatus::scheduled_for(next_round),
                next_round: Some(next_round),
                panelist_after: PanelistStatus::Free,
                clears_assignment: true,
            },
            None => Transition {
                next_status: CandidateStatus::Hired,
                next_round: None,
                panelist_after: PanelistStatus::Free,
                clears_assignment: true,
            },
        },
    };

    Ok(transition)
}

// ============================================================
// SCHEDULING / START
// ============================================================

/// Status a candidate moves to when a panelist is assigned for `round`.
///
/// R1 can be scheduled from intake (`unassigned`/`assigned`); later rounds
/// only from the `rN-scheduled` status the feedback transition produced
/// (which permits panelist re-assignment within the same round).
pub fn schedule_target(
    status: CandidateStatus,
    round: Round,
) -> Result<CandidateStatus, PipelineError> {
    if status.is_terminal() {
        return Err(PipelineError::AlreadyTerminal(status));
    }

    let legal = match round {
        Round::R1 => matches!(
            status,
            CandidateStatus::Unassigned | CandidateStatus::Assigned | CandidateStatus::R1Scheduled
        ),
        Round::R2 => status == CandidateStatus::R2Scheduled,
        Round::R3 => status == CandidateStatus::R3Scheduled,
    };
    if !legal {
        return Err(PipelineError::NotSchedulable { status, round });
    }

    Ok(CandidateStatus::scheduled_for(round))
}

/// Status a candidate moves to when the scheduled interview starts.
pub fn start_target(status: CandidateStatus) -> Result<CandidateStatus, PipelineError> {
    match status {
        CandidateStatus::R1Scheduled => Ok(CandidateStatus::R1InProgress),
        CandidateStatus::R2Scheduled => Ok(CandidateStatus::R2InProgress),
        CandidateStatus::R3Scheduled => Ok(CandidateStatus::R3InProgress),
        other => Err(PipelineError::NotStartable(other)),
    }
}

/// Verify a panelist can take an assignment for `round`.
///
/// A panelist conducts at most one interview at a time, so anything other
/// than `free` is a refusal.
pub fn check_assignable(
    panelist_id: &str,
    role: UserRole,
    status: PanelistStatus,
    round: Round,
) -> Result<(), PipelineError> {
    if status != PanelistStatus::Free {
        return Err(PipelineError::PanelistUnavailable {
            id: panelist_id.to_string(),
            status,
        });
    }
    let role_ok = if round.is_final() {
        role.is_final_round_role()
    } else {
        role == UserRole::PanelMember
    };
    if !role_ok {
        return Err(PipelineError::RoleNotEligible { role, round });
    }
    Ok(())
}
