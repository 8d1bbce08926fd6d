//! Mood-aware movie and show recommendations.
//!
//! The [`services::Recommender`] pipeline pre-filters a catalog against the
//! session's hard constraints, scores every candidate, ranks and diversifies
//! by series/franchise, and stamps the picks. The [`api`] module exposes it
//! over HTTP with an in-memory catalog and feedback log.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
