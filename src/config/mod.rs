// ABOUTME: Configuration management for the phase engine
// ABOUTME: Static thresholds, weights, and confidence parameters supplied at construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 March Health Intelligence

//! Configuration for the M.A.R.C.H. phase engine
//!
//! All thresholds and weights are static configuration; nothing here is learned
//! or mutated during scoring.

/// M.A.R.C.H. scoring configuration: thresholds, weights, confidence parameters
pub mod march;

pub use march::{
    ConfidenceConfig, CycleThresholds, GiThresholds, GuardrailConfig, MarchConfig, PhaseWeights,
    SignalThresholds, TrainingThresholds,
};
