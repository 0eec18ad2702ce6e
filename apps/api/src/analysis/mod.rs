//! Deterministic text analysis: term matching, job/resume gap analysis and
//! change-level fabrication checks. No I/O outside the HTTP handlers.

pub mod change_check;
pub mod gap;
pub mod handlers;
pub mod lexicon;
pub mod text_signals;
