// ABOUTME: Domain service layer coordinating aggregation, scoring, and persistence
// ABOUTME: Protocol-agnostic orchestration reusable from any entry point
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 March Health Intelligence

//! Domain service layer
//!
//! Orchestration logic sits here, protocol-agnostic and reusable from any entry
//! point (REST handlers, schedulers, CLIs). The service coordinates the store,
//! the aggregation layer, and the scoring engine.

/// M.A.R.C.H. weekly assessment orchestration
pub mod march;

pub use march::{DataQuality, MarchService, WeeklyStatus};
