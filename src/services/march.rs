// ABOUTME: Orchestration service for weekly M.A.R.C.H. phase assessment
// ABOUTME: Fetches samples, aggregates, scores, persists, and serves read paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 March Health Intelligence

//! M.A.R.C.H. orchestration service
//!
//! Coordinates the aggregation layer, the scoring engine, and the external
//! store: computes and persists weekly assessments, and serves the read paths
//! (current phase, history, transition recommendations, weekly status).
//!
//! Store access is the only suspension point and the only failure source; a
//! computation either completes and persists, or surfaces a storage error for
//! the caller to retry. Writes are upserts by natural key, so recomputing a
//! week never duplicates history.

use crate::config::MarchConfig;
use crate::errors::AppResult;
use crate::intelligence::aggregation::WeeklyAggregator;
use crate::intelligence::guidance::phase_guidance;
use crate::intelligence::phase_engine::PhaseScoringEngine;
use crate::models::{MarchPhase, MarchPhaseAssessment};
use crate::storage::MarchStore;
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default number of history entries returned by [`MarchService::get_phase_history`]
const DEFAULT_HISTORY_LIMIT: usize = 12;

/// How many recent assessments to scan when seeding the previous phase
const PREVIOUS_PHASE_LOOKBACK: usize = 52;

/// Another phase must exceed the current one by more than this to suggest a transition
const TRANSITION_MARGIN: f64 = 10.0;

/// Neighboring-phase score above which canned phase-specific advice is emitted
const NEIGHBOR_ADVICE_THRESHOLD: f64 = 60.0;

/// Combined weekly sample count for "high" data quality
const HIGH_QUALITY_SAMPLES: usize = 10;

/// Combined weekly sample count for "medium" data quality
const MEDIUM_QUALITY_SAMPLES: usize = 5;

/// Data quality tier for the current week's raw samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    /// At least 10 combined raw samples this week
    High,
    /// At least 5 combined raw samples this week
    Medium,
    /// Fewer than 5 combined raw samples this week
    Low,
}

/// Weekly status summary for one client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyStatus {
    /// Whether any raw samples exist for the current week
    pub has_data: bool,
    /// When the most recent assessment was computed, if any
    pub last_computed: Option<DateTime<Utc>>,
    /// The upcoming Sunday 23:00 local time
    pub next_computation: DateTime<Local>,
    /// Data quality tier for the current week
    pub data_quality: DataQuality,
}

/// Orchestration service for weekly phase assessment
pub struct MarchService<S: MarchStore> {
    store: S,
    engine: PhaseScoringEngine,
}

impl<S: MarchStore> MarchService<S> {
    /// Construct a service over a store with the given scoring configuration
    #[must_use]
    pub fn new(store: S, config: MarchConfig) -> Self {
        Self {
            store,
            engine: PhaseScoringEngine::new(config),
        }
    }

    /// Compute, persist, and return the assessment for one (client, week)
    ///
    /// Reads the four raw-sample collections for the week, aggregates them,
    /// persists the aggregate, computes the trailing baseline from the client's
    /// full history, seeds the previous phase from the latest assessment
    /// strictly before this week, scores, and persists the result.
    ///
    /// # Errors
    /// Returns a storage error when any store read or write fails; no retry is
    /// attempted internally.
    pub async fn compute_weekly_assessment(
        &self,
        client_id: &str,
        week_start: NaiveDate,
    ) -> AppResult<MarchPhaseAssessment> {
        let (start, end) = WeeklyAggregator::week_window(week_start);
        let range = Some((start, end));

        let biometrics = self.store.get_biometrics(client_id, range).await?;
        let check_ins = self.store.get_check_ins(client_id, range).await?;
        let training_logs = self.store.get_training_logs(client_id, range).await?;
        let body_metrics = self.store.get_body_metrics(client_id, range).await?;
        debug!(
            client_id,
            week_start = %week_start,
            biometrics = biometrics.len(),
            check_ins = check_ins.len(),
            training_logs = training_logs.len(),
            body_metrics = body_metrics.len(),
            "fetched raw samples for weekly assessment"
        );

        let aggregate = WeeklyAggregator::aggregate_weekly(
            client_id,
            week_start,
            &biometrics,
            &check_ins,
            &training_logs,
            &body_metrics,
        );
        self.store.upsert_weekly_aggregate(&aggregate).await?;

        let all_biometrics = self.store.get_biometrics(client_id, None).await?;
        let all_training = self.store.get_training_logs(client_id, None).await?;
        let baseline =
            WeeklyAggregator::compute_baseline_stats(end, &all_biometrics, &all_training);

        let previous_phase = self
            .store
            .get_recent_assessments(client_id, PREVIOUS_PHASE_LOOKBACK)
            .await?
            .into_iter()
            .find(|a| a.week_start < week_start)
            .map(|a| a.decided_phase);

        let assessment = self
            .engine
            .compute_phase_assessment(&aggregate, &baseline, previous_phase);
        self.store.upsert_assessment(&assessment).await?;

        info!(
            client_id,
            week_start = %week_start,
            phase = %assessment.decided_phase,
            confidence = assessment.confidence,
            "computed weekly phase assessment"
        );
        Ok(assessment)
    }

    /// The most recent stored assessment, computing one on demand when none exists
    ///
    /// "Current" is the assessment with the greatest week-start; with no
    /// history, the current ISO week (Monday start) is computed and persisted.
    ///
    /// # Errors
    /// Returns a storage error when any store read or write fails.
    pub async fn get_current_phase(&self, client_id: &str) -> AppResult<MarchPhaseAssessment> {
        if let Some(latest) = self.store.get_latest_assessment(client_id).await? {
            return Ok(latest);
        }
        self.compute_weekly_assessment(client_id, current_week_start())
            .await
    }

    /// Assessment history, most recent week first
    ///
    /// # Errors
    /// Returns a storage error when the store read fails.
    pub async fn get_phase_history(
        &self,
        client_id: &str,
        limit: Option<usize>,
    ) -> AppResult<Vec<MarchPhaseAssessment>> {
        self.store
            .get_recent_assessments(client_id, limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
            .await
    }

    /// Transition recommendations for a client in `current_phase`
    ///
    /// Any other phase scoring more than [`TRANSITION_MARGIN`] above the
    /// current one yields a transition suggestion worded from the static phase
    /// guidance, plus phase-specific advice keyed off neighboring scores.
    #[must_use]
    pub fn get_phase_transition_recommendations(
        &self,
        current_phase: MarchPhase,
        assessment: &MarchPhaseAssessment,
    ) -> Vec<String> {
        let scores = &assessment.phase_scores;
        let current_score = scores.get(current_phase);
        let mut recommendations = Vec::new();

        for (phase, score) in scores.iter() {
            if phase != current_phase && score > current_score + TRANSITION_MARGIN {
                let guidance = phase_guidance(phase);
                recommendations.push(format!(
                    "Consider transitioning to {phase}: {}",
                    guidance.focus
                ));
            }
        }

        match current_phase {
            MarchPhase::Mitochondria => {
                if scores.get(MarchPhase::AbsorptionDetox) > NEIGHBOR_ADVICE_THRESHOLD {
                    recommendations.push(
                        "Digestive signals are elevated - address gut health alongside the energy work"
                            .to_owned(),
                    );
                }
            }
            MarchPhase::AbsorptionDetox => {
                if scores.get(MarchPhase::Mitochondria) > NEIGHBOR_ADVICE_THRESHOLD {
                    recommendations.push(
                        "Energy signals remain suppressed - protect sleep while the gut work continues"
                            .to_owned(),
                    );
                }
            }
            MarchPhase::Resilience => {
                if scores.get(MarchPhase::HypertrophyHealthspan) > NEIGHBOR_ADVICE_THRESHOLD {
                    recommendations.push(
                        "Training readiness is building - plan a return to progressive loading"
                            .to_owned(),
                    );
                }
            }
            MarchPhase::Cyclical => {
                if scores.get(MarchPhase::Resilience) > NEIGHBOR_ADVICE_THRESHOLD {
                    recommendations.push(
                        "Stress load is compounding cycle symptoms - add daily downshift work"
                            .to_owned(),
                    );
                }
            }
            MarchPhase::HypertrophyHealthspan => {
                if scores.get(MarchPhase::Resilience) > NEIGHBOR_ADVICE_THRESHOLD {
                    recommendations.push(
                        "Recovery signals are slipping - watch stress before progressing volume"
                            .to_owned(),
                    );
                }
            }
        }

        recommendations
    }

    /// Weekly status: data presence, quality tier, and scheduling
    ///
    /// # Errors
    /// Returns a storage error when any store read fails.
    pub async fn get_weekly_status(&self, client_id: &str) -> AppResult<WeeklyStatus> {
        let week_start = current_week_start();
        let range = Some(WeeklyAggregator::week_window(week_start));

        let sample_count = self.store.get_biometrics(client_id, range).await?.len()
            + self.store.get_check_ins(client_id, range).await?.len()
            + self.store.get_training_logs(client_id, range).await?.len()
            + self.store.get_body_metrics(client_id, range).await?.len();

        let last_computed = self
            .store
            .get_latest_assessment(client_id)
            .await?
            .map(|a| a.created_at);

        let data_quality = if sample_count >= HIGH_QUALITY_SAMPLES {
            DataQuality::High
        } else if sample_count >= MEDIUM_QUALITY_SAMPLES {
            DataQuality::Medium
        } else {
            DataQuality::Low
        };

        Ok(WeeklyStatus {
            has_data: sample_count > 0,
            last_computed,
            next_computation: next_computation_time(Local::now()),
            data_quality,
        })
    }
}

/// Monday of the current ISO week (UTC calendar)
#[must_use]
pub fn current_week_start() -> NaiveDate {
    let today = Utc::now().date_naive();
    today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
}

/// The upcoming Sunday 23:00 local time, relative to `now`
#[doc(hidden)]
#[must_use]
pub fn next_computation_time(now: DateTime<Local>) -> DateTime<Local> {
    let run_time = NaiveTime::from_hms_opt(23, 0, 0).unwrap_or(NaiveTime::MIN);
    let today = now.date_naive();
    let days_ahead = i64::from(6 - today.weekday().num_days_from_monday()).rem_euclid(7);
    let mut run_date = today + Duration::days(days_ahead);
    if days_ahead == 0 && now.time() >= run_time {
        run_date += Duration::days(7);
    }
    Local
        .from_local_datetime(&run_date.and_time(run_time))
        .earliest()
        .unwrap_or(now)
}
