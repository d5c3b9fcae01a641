// ABOUTME: Intelligence module for weekly aggregation and M.A.R.C.H. phase scoring
// ABOUTME: Pure, stateless computation layers consumed by the orchestration service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 March Health Intelligence

//! Phase intelligence: aggregation, scoring, and guidance
//!
//! All computation in this module is synchronous and side-effect-free; results
//! for different clients or different weeks never interact, so these types may
//! be invoked from any number of concurrent call sites without locking.

/// Weekly sample aggregation and trailing baseline statistics
pub mod aggregation;

/// Static per-phase guidance lookup
pub mod guidance;

/// The M.A.R.C.H. phase scoring engine
pub mod phase_engine;

pub use aggregation::WeeklyAggregator;
pub use guidance::{phase_guidance, PhaseGuidance};
pub use phase_engine::PhaseScoringEngine;
