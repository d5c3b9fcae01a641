// ABOUTME: In-memory store backend over DashMap for tests and demos
// ABOUTME: Upsert-by-key semantics matching the MarchStore contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 March Health Intelligence

//! In-memory [`MarchStore`] backend
//!
//! Keeps raw samples per client and keyed records for aggregates and
//! assessments. Concurrent-safe through `DashMap`; suitable for tests, demos,
//! and single-process deployments.

use crate::errors::AppResult;
use crate::models::{
    BiometricsSample, BodyMetrics, CheckInSample, MarchPhaseAssessment, TrainingLog,
    WeeklyAggregate,
};
use crate::storage::{MarchStore, TimeRange};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// In-memory store backend
#[derive(Default)]
pub struct InMemoryStore {
    biometrics: DashMap<String, Vec<BiometricsSample>>,
    check_ins: DashMap<String, Vec<CheckInSample>>,
    training_logs: DashMap<String, Vec<TrainingLog>>,
    body_metrics: DashMap<String, Vec<BodyMetrics>>,
    /// Keyed by `{client_id}_{week_start}`
    aggregates: DashMap<String, WeeklyAggregate>,
    /// Keyed by the derived assessment id
    assessments: DashMap<String, MarchPhaseAssessment>,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one biometrics sample
    pub fn add_biometrics(&self, sample: BiometricsSample) {
        self.biometrics
            .entry(sample.client_id.clone())
            .or_default()
            .push(sample);
    }

    /// Seed one check-in sample
    pub fn add_check_in(&self, sample: CheckInSample) {
        self.check_ins
            .entry(sample.client_id.clone())
            .or_default()
            .push(sample);
    }

    /// Seed one training log
    pub fn add_training_log(&self, log: TrainingLog) {
        self.training_logs
            .entry(log.client_id.clone())
            .or_default()
            .push(log);
    }

    /// Seed one body-metrics reading
    pub fn add_body_metrics(&self, metrics: BodyMetrics) {
        self.body_metrics
            .entry(metrics.client_id.clone())
            .or_default()
            .push(metrics);
    }

    /// Number of stored assessments across all clients
    #[must_use]
    pub fn assessment_count(&self) -> usize {
        self.assessments.len()
    }

    /// Stored weekly aggregate for one (client, week), if any
    #[must_use]
    pub fn get_aggregate(
        &self,
        client_id: &str,
        week_start: chrono::NaiveDate,
    ) -> Option<WeeklyAggregate> {
        self.aggregates
            .get(&format!("{client_id}_{week_start}"))
            .map(|entry| entry.clone())
    }

    fn filter_range<T: Clone>(
        items: Option<dashmap::mapref::one::Ref<'_, String, Vec<T>>>,
        range: Option<TimeRange>,
        timestamp_of: impl Fn(&T) -> DateTime<Utc>,
    ) -> Vec<T> {
        let Some(items) = items else {
            return Vec::new();
        };
        items
            .iter()
            .filter(|item| {
                range.map_or(true, |(start, end)| {
                    let ts = timestamp_of(item);
                    ts >= start && ts <= end
                })
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MarchStore for InMemoryStore {
    async fn get_biometrics(
        &self,
        client_id: &str,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<BiometricsSample>> {
        Ok(Self::filter_range(
            self.biometrics.get(client_id),
            range,
            |s| s.timestamp,
        ))
    }

    async fn get_check_ins(
        &self,
        client_id: &str,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<CheckInSample>> {
        Ok(Self::filter_range(
            self.check_ins.get(client_id),
            range,
            |s| s.timestamp,
        ))
    }

    async fn get_training_logs(
        &self,
        client_id: &str,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<TrainingLog>> {
        Ok(Self::filter_range(
            self.training_logs.get(client_id),
            range,
            |s| s.timestamp,
        ))
    }

    async fn get_body_metrics(
        &self,
        client_id: &str,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<BodyMetrics>> {
        Ok(Self::filter_range(
            self.body_metrics.get(client_id),
            range,
            |s| s.timestamp,
        ))
    }

    async fn upsert_weekly_aggregate(&self, aggregate: &WeeklyAggregate) -> AppResult<()> {
        let key = format!("{}_{}", aggregate.client_id, aggregate.week_start);
        self.aggregates.insert(key, aggregate.clone());
        Ok(())
    }

    async fn upsert_assessment(&self, assessment: &MarchPhaseAssessment) -> AppResult<()> {
        self.assessments
            .insert(assessment.id.clone(), assessment.clone());
        Ok(())
    }

    async fn get_recent_assessments(
        &self,
        client_id: &str,
        limit: usize,
    ) -> AppResult<Vec<MarchPhaseAssessment>> {
        let mut records: Vec<MarchPhaseAssessment> = self
            .assessments
            .iter()
            .filter(|entry| entry.client_id == client_id)
            .map(|entry| entry.clone())
            .collect();
        records.sort_by(|a, b| b.week_start.cmp(&a.week_start));
        records.truncate(limit);
        Ok(records)
    }

    async fn get_latest_assessment(
        &self,
        client_id: &str,
    ) -> AppResult<Option<MarchPhaseAssessment>> {
        Ok(self
            .get_recent_assessments(client_id, 1)
            .await?
            .into_iter()
            .next())
    }
}
