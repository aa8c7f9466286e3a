//! Contact enrichment routing and normalization service.
//!
//! Emails and domains are answered by a direct lookup provider; free-text
//! lead descriptions are turned into a structured intent, fanned out to every
//! configured source, and merged into one de-duplicated contact list.

pub mod api;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod extraction;
pub mod history;
pub mod models;
pub mod providers;
pub mod webhooks;

pub use error::{AppError, Result};
