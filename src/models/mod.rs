//! Data model for the Q-sort service.
//!
//! # Core Concepts
//!
//! ## Source Data (read-only)
//!
//! - [`Card`]: One project to be ranked, derived from a row of the Cards sheet.
//!   Cards are scoped by team and version and are re-read on every query.
//! - [`VersionInfo`]: A version offered to a team. Only versions with at least
//!   five cards for that team are ever listed.
//!
//! ## Submissions (append-only)
//!
//! - [`Submission`]: A participant's final arrangement, as produced by a
//!   [`crate::session::SortSession`] and posted to `/submit`.
//! - [`SubmissionRecord`]: One persisted row per placed card, carrying the
//!   per-user, per-version submission number.

mod card;
mod submission;

pub use card::*;
pub use submission::*;
