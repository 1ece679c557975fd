//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate normalization, persistence and overlay merge.
//! - Keep CLI/transport layers decoupled from storage details.

pub mod study_plan_service;
