//! Pipeline Module - Core of the ATS
//!
//! Everything that decides how a candidate moves through the hiring
//! pipeline lives here, behind one authority instead of scattered dialog
//! logic:
//! - Types: canonical status/round/role/decision vocabulary
//! - Machine: feedback-driven status transitions and panelist coupling
//! - Roster: panelist eligibility per round
//! - Import: bulk candidate intake from CSV
//! - Timeline: persistent per-candidate audit trail
//! - Notify: fire-and-forget outbound messages

pub mod import;
pub mod machine;
pub mod notify;
pub mod roster;
pub mod timeline;
pub mod types;

pub use import::*;
pub use machine::*;
pub use notify::*;
pub use roster::*;
pub use timeline::*;
pub use types::*;
