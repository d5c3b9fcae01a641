// ABOUTME: Storage abstraction for raw samples, weekly aggregates, and assessments
// ABOUTME: Async trait contract with upsert-by-key writes; backends plug in behind it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 March Health Intelligence

//! Storage abstraction layer
//!
//! The persistence engine is an external collaborator; the core depends only on
//! this trait. Writes are upserts by natural key — (client, week) for
//! aggregates, the derived assessment id for assessments — so recomputing a
//! week is idempotent against history (last write wins).

use crate::errors::AppResult;
use crate::models::{
    BiometricsSample, BodyMetrics, CheckInSample, MarchPhaseAssessment, TrainingLog,
    WeeklyAggregate,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// In-memory storage backend
pub mod memory;

pub use memory::InMemoryStore;

/// Inclusive timestamp range `[start, end]`
pub type TimeRange = (DateTime<Utc>, DateTime<Utc>);

/// Store contract the orchestration layer depends on
///
/// All read methods accept an optional inclusive time range; `None` means the
/// client's full history. Failures surface as
/// [`crate::errors::ErrorCode::StorageError`] — retry policy belongs to the
/// caller.
#[async_trait]
pub trait MarchStore: Send + Sync {
    /// Fetch biometrics samples for a client, optionally bounded
    async fn get_biometrics(
        &self,
        client_id: &str,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<BiometricsSample>>;

    /// Fetch check-in samples for a client, optionally bounded
    async fn get_check_ins(
        &self,
        client_id: &str,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<CheckInSample>>;

    /// Fetch training logs for a client, optionally bounded
    async fn get_training_logs(
        &self,
        client_id: &str,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<TrainingLog>>;

    /// Fetch body-metrics readings for a client, optionally bounded
    async fn get_body_metrics(
        &self,
        client_id: &str,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<BodyMetrics>>;

    /// Upsert one weekly aggregate, keyed by (client, week-start)
    async fn upsert_weekly_aggregate(&self, aggregate: &WeeklyAggregate) -> AppResult<()>;

    /// Upsert one phase assessment, keyed by its derived identifier
    async fn upsert_assessment(&self, assessment: &MarchPhaseAssessment) -> AppResult<()>;

    /// The N most recent assessments for a client, greatest week-start first
    async fn get_recent_assessments(
        &self,
        client_id: &str,
        limit: usize,
    ) -> AppResult<Vec<MarchPhaseAssessment>>;

    /// The assessment with the greatest week-start for a client, if any
    async fn get_latest_assessment(
        &self,
        client_id: &str,
    ) -> AppResult<Option<MarchPhaseAssessment>>;
}
