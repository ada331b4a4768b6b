//! Q-sort survey service.
//!
//! Participants pick a team and a version, then rank that version's cards by
//! placing them into a pyramid of slots. This crate provides the HTTP backend
//! (spreadsheet-backed queries and an append-only submission store) and the
//! sorting logic a front end drives: [`layout`] builds the pyramid and
//! [`session::SortSession`] tracks placement until submission.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod layout;
pub mod models;
pub mod query;
pub mod render;
pub mod session;
pub mod source;
pub mod store;
