//! Panel Roster
//!
//! Eligibility filtering for scheduling: which panelists can take a given
//! round right now. Rounds r1/r2 need a free `panel_member`; the final round
//! needs a free `tpm_tem` (or legacy `manager`). Selection itself stays
//! manual; the only refinement offered is a free-text search over
//! name/email/skills.

use super::types::{Panelist, PanelistStatus, Round, UserRole};

/// Whether a panelist can be offered for `round` right now.
pub fn is_eligible(panelist: &Panelist, round: Round) -> bool {
    if panelist.current_status != PanelistStatus::Free {
        return false;
    }
    if round.is_final() {
        panelist.role.is_final_round_role()
    } else {
        panelist.role == UserRole::PanelMember
    }
}

/// Case-insensitive substring match over name, email, and skills.
fn matches_query(panelist: &Panelist, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    panelist.name.to_lowercase().contains(&q)
        || panelist.email.to_lowercase().contains(&q)
        || panelist.skills.iter().any(|s| s.to_lowercase().contains(&q))
}

/// Panelists eligible for `round`, optionally narrowed by a search query.
pub fn eligible_panelists<'a>(
    panelists: &'a [Panelist],
    round: Round,
    query: Option<&str>,
) -> Vec<&'a Panelist> {
    panelists
        .iter()
        .filter(|p| is_eligible(p, round))
        .filter(|p| query.map_or(true, |q| matches_query(p, q)))
        .collect()
}
