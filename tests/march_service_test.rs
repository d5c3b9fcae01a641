// ABOUTME: Integration tests for the weekly assessment orchestration service
// ABOUTME: Covers persistence, idempotent recomputation, history, status, and storage errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 March Health Intelligence

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use march_phase_engine::config::MarchConfig;
use march_phase_engine::errors::{AppError, AppResult, ErrorCode};
use march_phase_engine::models::{
    BiometricsSample, BodyMetrics, CheckInSample, DigestionReport, MarchPhase,
    MarchPhaseAssessment, PhaseScores, TrainingLog, WeeklyAggregate,
};
use march_phase_engine::services::{DataQuality, MarchService};
use march_phase_engine::storage::{InMemoryStore, MarchStore, TimeRange};

const CLIENT: &str = "client-1";

fn week() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date")
}

fn at(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(hour, 0, 0).expect("valid time"))
}

fn bio(client_id: &str, timestamp: DateTime<Utc>, hrv: f64, sleep: f64) -> BiometricsSample {
    BiometricsSample {
        client_id: client_id.to_owned(),
        timestamp,
        hrv_ms: Some(hrv),
        resting_hr_bpm: None,
        sleep_hours: Some(sleep),
        sleep_efficiency: None,
        steps: None,
    }
}

fn check_in(client_id: &str, timestamp: DateTime<Utc>, energy: f64) -> CheckInSample {
    CheckInSample {
        client_id: client_id.to_owned(),
        timestamp,
        energy: Some(energy),
        stress: None,
        soreness: None,
        digestion: DigestionReport::default(),
        cycle: None,
    }
}

fn assessment(client_id: &str, week_start: NaiveDate, phase: MarchPhase) -> MarchPhaseAssessment {
    let mut scores = PhaseScores::default();
    scores.set(phase, 80.0);
    MarchPhaseAssessment {
        id: MarchPhaseAssessment::derive_id(client_id, week_start),
        client_id: client_id.to_owned(),
        week_start,
        decided_phase: phase,
        confidence: 0.8,
        phase_scores: scores,
        rationale: vec![],
        created_at: Utc::now(),
    }
}

/// Seed a scoreable week: low HRV, poor sleep, low energy
fn seed_suppressed_week(store: &InMemoryStore, client_id: &str, week_start: NaiveDate) {
    for day in 0..3 {
        let date = week_start + Duration::days(day);
        store.add_biometrics(bio(client_id, at(date, 7), 38.0, 5.0));
        store.add_check_in(check_in(client_id, at(date, 20), 2.0));
    }
}

#[tokio::test]
async fn test_compute_persists_aggregate_and_assessment() {
    let store = InMemoryStore::new();
    seed_suppressed_week(&store, CLIENT, week());
    let service = MarchService::new(store, MarchConfig::default());

    let assessment = service
        .compute_weekly_assessment(CLIENT, week())
        .await
        .expect("computes");

    assert_eq!(assessment.id, "march_client-1_2025-03-10");
    assert_eq!(assessment.decided_phase, MarchPhase::Mitochondria);
    assert_eq!(assessment.week_start, week());

    let latest = service.get_current_phase(CLIENT).await.expect("reads back");
    assert_eq!(latest.id, assessment.id);
}

#[tokio::test]
async fn test_recomputing_a_week_never_duplicates_history() {
    let store = InMemoryStore::new();
    seed_suppressed_week(&store, CLIENT, week());
    let service = MarchService::new(store, MarchConfig::default());

    service
        .compute_weekly_assessment(CLIENT, week())
        .await
        .expect("first run");
    service
        .compute_weekly_assessment(CLIENT, week())
        .await
        .expect("second run");

    let history = service
        .get_phase_history(CLIENT, None)
        .await
        .expect("history");
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_get_current_phase_computes_on_demand_when_store_empty() {
    let service = MarchService::new(InMemoryStore::new(), MarchConfig::default());

    let assessment = service.get_current_phase(CLIENT).await.expect("computes");

    // No samples and no history: low-data fallback to the default phase
    assert_eq!(assessment.decided_phase, MarchPhase::Mitochondria);
    assert!((assessment.confidence - 0.3).abs() < f64::EPSILON);
    assert_eq!(assessment.week_start.weekday(), Weekday::Mon);

    let history = service
        .get_phase_history(CLIENT, None)
        .await
        .expect("history");
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_history_is_most_recent_first_and_limited() {
    let store = InMemoryStore::new();
    for (weeks_back, phase) in [
        (2, MarchPhase::Resilience),
        (1, MarchPhase::AbsorptionDetox),
        (0, MarchPhase::Mitochondria),
    ] {
        let week_start = week() - Duration::weeks(weeks_back);
        store
            .upsert_assessment(&assessment(CLIENT, week_start, phase))
            .await
            .expect("seeds");
    }
    let service = MarchService::new(store, MarchConfig::default());

    let history = service
        .get_phase_history(CLIENT, Some(2))
        .await
        .expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].week_start, week());
    assert_eq!(history[0].decided_phase, MarchPhase::Mitochondria);
    assert_eq!(history[1].week_start, week() - Duration::weeks(1));
}

#[tokio::test]
async fn test_low_data_week_inherits_phase_from_prior_assessment() {
    let store = InMemoryStore::new();
    let prior_week = week() - Duration::weeks(1);
    store
        .upsert_assessment(&assessment(CLIENT, prior_week, MarchPhase::Resilience))
        .await
        .expect("seeds");
    // One HRV-only sample: below the sufficiency threshold
    store.add_biometrics(BiometricsSample {
        sleep_hours: None,
        ..bio(CLIENT, at(week(), 7), 55.0, 0.0)
    });
    let service = MarchService::new(store, MarchConfig::default());

    let current = service
        .compute_weekly_assessment(CLIENT, week())
        .await
        .expect("computes");
    assert_eq!(current.decided_phase, MarchPhase::Resilience);
    assert!((current.confidence - 0.3).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_transition_recommendations_flag_dominant_other_phase() {
    let service = MarchService::new(InMemoryStore::new(), MarchConfig::default());
    let mut record = assessment(CLIENT, week(), MarchPhase::Mitochondria);
    record.phase_scores.set(MarchPhase::Mitochondria, 30.0);
    record.phase_scores.set(MarchPhase::AbsorptionDetox, 70.0);

    let recommendations =
        service.get_phase_transition_recommendations(MarchPhase::Mitochondria, &record);

    assert!(recommendations
        .iter()
        .any(|r| r.starts_with("Consider transitioning to ABSORPTION_DETOX")));
    assert!(recommendations
        .iter()
        .any(|r| r.contains("gut health")));
}

#[tokio::test]
async fn test_transition_recommendations_empty_when_current_phase_dominates() {
    let service = MarchService::new(InMemoryStore::new(), MarchConfig::default());
    let mut record = assessment(CLIENT, week(), MarchPhase::Mitochondria);
    record.phase_scores.set(MarchPhase::Mitochondria, 80.0);

    let recommendations =
        service.get_phase_transition_recommendations(MarchPhase::Mitochondria, &record);
    assert!(recommendations.is_empty());
}

#[tokio::test]
async fn test_weekly_status_quality_tiers() {
    let store = InMemoryStore::new();
    let now = Utc::now();
    for i in 0..10 {
        store.add_biometrics(BiometricsSample {
            timestamp: now - chrono::Duration::minutes(i),
            ..bio("rich-client", now, 50.0, 7.5)
        });
    }
    for i in 0..5 {
        store.add_check_in(CheckInSample {
            timestamp: now - chrono::Duration::minutes(i),
            ..check_in("medium-client", now, 3.0)
        });
    }
    let service = MarchService::new(store, MarchConfig::default());

    let rich = service
        .get_weekly_status("rich-client")
        .await
        .expect("status");
    assert!(rich.has_data);
    assert_eq!(rich.data_quality, DataQuality::High);
    assert_eq!(rich.next_computation.weekday(), Weekday::Sun);

    let medium = service
        .get_weekly_status("medium-client")
        .await
        .expect("status");
    assert_eq!(medium.data_quality, DataQuality::Medium);

    let empty = service
        .get_weekly_status("absent-client")
        .await
        .expect("status");
    assert!(!empty.has_data);
    assert_eq!(empty.data_quality, DataQuality::Low);
    assert_eq!(empty.last_computed, None);
}

/// Store whose every method fails, for error-propagation coverage
struct FailingStore;

#[async_trait]
impl MarchStore for FailingStore {
    async fn get_biometrics(
        &self,
        _client_id: &str,
        _range: Option<TimeRange>,
    ) -> AppResult<Vec<BiometricsSample>> {
        Err(AppError::storage("biometrics read failed"))
    }

    async fn get_check_ins(
        &self,
        _client_id: &str,
        _range: Option<TimeRange>,
    ) -> AppResult<Vec<CheckInSample>> {
        Err(AppError::storage("check-in read failed"))
    }

    async fn get_training_logs(
        &self,
        _client_id: &str,
        _range: Option<TimeRange>,
    ) -> AppResult<Vec<TrainingLog>> {
        Err(AppError::storage("training read failed"))
    }

    async fn get_body_metrics(
        &self,
        _client_id: &str,
        _range: Option<TimeRange>,
    ) -> AppResult<Vec<BodyMetrics>> {
        Err(AppError::storage("body read failed"))
    }

    async fn upsert_weekly_aggregate(&self, _aggregate: &WeeklyAggregate) -> AppResult<()> {
        Err(AppError::storage("aggregate write failed"))
    }

    async fn upsert_assessment(&self, _assessment: &MarchPhaseAssessment) -> AppResult<()> {
        Err(AppError::storage("assessment write failed"))
    }

    async fn get_recent_assessments(
        &self,
        _client_id: &str,
        _limit: usize,
    ) -> AppResult<Vec<MarchPhaseAssessment>> {
        Err(AppError::storage("assessment read failed"))
    }

    async fn get_latest_assessment(
        &self,
        _client_id: &str,
    ) -> AppResult<Option<MarchPhaseAssessment>> {
        Err(AppError::storage("assessment read failed"))
    }
}

#[tokio::test]
async fn test_storage_failures_surface_as_storage_errors() {
    let service = MarchService::new(FailingStore, MarchConfig::default());

    let error = service
        .compute_weekly_assessment(CLIENT, week())
        .await
        .expect_err("store is down");
    assert_eq!(error.code, ErrorCode::StorageError);

    let error = service.get_weekly_status(CLIENT).await.expect_err("store is down");
    assert_eq!(error.code, ErrorCode::StorageError);
}
