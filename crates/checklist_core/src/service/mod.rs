//! Checklist use-case services.
//!
//! # Responsibility
//! - Orchestrate tree mutations and store writes into user-level actions.
//! - Keep callers decoupled from storage details.

pub mod checklist_service;
