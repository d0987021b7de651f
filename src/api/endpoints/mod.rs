//! API endpoint handlers.
//!
//! Handlers bind the scoring engine and the evaluation store to JSON
//! request/response bodies. The HTML pages are served from here as well.

pub mod evaluations;
pub mod health;
pub mod pages;
pub mod prediction;
