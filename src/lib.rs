// ABOUTME: Library entry point for the M.A.R.C.H. phase classification engine
// ABOUTME: Weekly aggregation, phase scoring with guardrails, and orchestration over a pluggable store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 March Health Intelligence

#![deny(unsafe_code)]

//! # M.A.R.C.H. Phase Engine
//!
//! The phase-classification subsystem of a health-coaching platform: given a
//! client's weekly physiological, digestive, training, and cycle signals, it
//! decides which of five mutually exclusive health phases best describes the
//! client's current state, with a bounded confidence score and a human-readable
//! rationale.
//!
//! ## Architecture
//!
//! Three layers, leaves first:
//!
//! - **Aggregation** ([`intelligence::aggregation`]): raw per-day samples into
//!   one weekly summary, plus trailing baseline statistics.
//! - **Scoring engine** ([`intelligence::phase_engine`]): pure computation from
//!   (aggregate, baseline, previous phase) to a phase assessment, driven by a
//!   static [`config::MarchConfig`].
//! - **Orchestration** ([`services::MarchService`]): coordinates the store and
//!   the two layers above, and serves the read paths (current phase, history,
//!   transition recommendations, weekly status).
//!
//! Data flows raw samples → weekly aggregate → (aggregate + baseline +
//! previous phase) → assessment → persisted record.
//!
//! ## Example
//!
//! ```rust,no_run
//! use march_phase_engine::config::MarchConfig;
//! use march_phase_engine::services::MarchService;
//! use march_phase_engine::storage::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> march_phase_engine::errors::AppResult<()> {
//!     let service = MarchService::new(InMemoryStore::new(), MarchConfig::default());
//!     let assessment = service.get_current_phase("client-1").await?;
//!     println!("{} ({:.0}%)", assessment.decided_phase, assessment.confidence * 100.0);
//!     Ok(())
//! }
//! ```

/// M.A.R.C.H. scoring configuration: thresholds, weights, confidence parameters
pub mod config;

/// Unified error handling with standard error codes
pub mod errors;

/// Weekly aggregation, phase scoring, and guidance lookup
pub mod intelligence;

/// Structured logging setup
pub mod logging;

/// Core data models for samples, aggregates, and assessments
pub mod models;

/// Domain service layer for weekly assessment orchestration
pub mod services;

/// Storage abstraction and the in-memory backend
pub mod storage;
