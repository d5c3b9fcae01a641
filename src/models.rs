// ABOUTME: Core data models for weekly health signals and phase assessments
// ABOUTME: Raw daily samples, derived weekly aggregates, baselines, and the M.A.R.C.H. phase enum
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 March Health Intelligence

//! # Data Models
//!
//! Core data structures for the phase engine. Raw per-day samples arrive from
//! wearables and client check-ins; the aggregation layer derives one
//! [`WeeklyAggregate`] per (client, week) plus trailing [`BaselineStats`]; the
//! scoring engine produces an immutable [`MarchPhaseAssessment`].
//!
//! ## Design Principles
//!
//! - **Absent is not zero**: every signal that may go unmeasured is an
//!   `Option<f64>`. A missing sample never contributes a zero to a weekly mean.
//! - **Closed phase set**: [`MarchPhase`] is a five-variant enum so "exactly one
//!   of five" is checkable at compile time.
//! - **Serializable**: all models serialize to the JSON shapes consumed by
//!   reporting collaborators.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Per-day wearable-derived biometrics for one client
///
/// All numeric fields are optional; a field is absent when the device did not
/// measure it that day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiometricsSample {
    /// Client identifier
    pub client_id: String,
    /// Sample timestamp
    pub timestamp: DateTime<Utc>,
    /// Heart-rate variability, RMSSD (milliseconds)
    pub hrv_ms: Option<f64>,
    /// Resting heart rate (bpm)
    pub resting_hr_bpm: Option<f64>,
    /// Sleep duration (hours)
    pub sleep_hours: Option<f64>,
    /// Sleep efficiency (time asleep / time in bed, 0-1)
    pub sleep_efficiency: Option<f64>,
    /// Step count
    pub steps: Option<f64>,
}

/// Per-day subjective check-in report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInSample {
    /// Client identifier
    pub client_id: String,
    /// Report timestamp
    pub timestamp: DateTime<Utc>,
    /// Energy score (1-5)
    pub energy: Option<f64>,
    /// Stress score (1-5)
    pub stress: Option<f64>,
    /// Muscle soreness score (1-5)
    pub soreness: Option<f64>,
    /// Digestive signals
    pub digestion: DigestionReport,
    /// Cycle signals, when tracked
    pub cycle: Option<CycleReport>,
}

/// Digestive sub-record of a check-in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigestionReport {
    /// Bloating severity (0-4)
    pub bloating: Option<f64>,
    /// Bristol stool-form scale (1-7)
    pub stool_form: Option<f64>,
    /// Bowel movements per day
    pub bowel_frequency: Option<f64>,
    /// Nausea reported
    pub nausea: Option<bool>,
    /// Count of foods that triggered a reaction
    pub food_reactivity_count: Option<f64>,
}

/// Cycle sub-record of a check-in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CycleReport {
    /// Day number within the cycle
    pub cycle_day: Option<u32>,
    /// PMS severity (0-4)
    pub pms_severity: Option<f64>,
    /// Whether this day is a menstrual day
    pub menstrual_day: bool,
}

/// Training session classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    /// Resistance training session
    Strength,
    /// Cardiovascular session
    Cardio,
    /// Any other session type (mobility, sport, mixed)
    Other,
}

/// One logged training session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingLog {
    /// Client identifier
    pub client_id: String,
    /// Session timestamp
    pub timestamp: DateTime<Utc>,
    /// Session classification
    pub session_type: SessionType,
    /// Total volume load (weight x reps summed across sets)
    pub volume_load: Option<f64>,
    /// Rate of perceived exertion (1-10)
    pub rpe: Option<f64>,
    /// Session duration (minutes)
    pub duration_minutes: Option<f64>,
}

/// Per-day body composition readings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyMetrics {
    /// Client identifier
    pub client_id: String,
    /// Reading timestamp
    pub timestamp: DateTime<Utc>,
    /// Body weight (kg)
    pub weight_kg: Option<f64>,
    /// Body fat percentage
    pub body_fat_percent: Option<f64>,
    /// Waist circumference (cm)
    pub waist_cm: Option<f64>,
}

/// Weekly digestion summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigestionSummary {
    /// Mean bloating severity among reporting days
    pub bloating_avg: Option<f64>,
    /// Mean stool-form value among reporting days
    pub stool_form_avg: Option<f64>,
    /// Mean bowel frequency among reporting days
    pub bowel_frequency_avg: Option<f64>,
    /// Mean food-reactivity count among reporting days
    pub food_reactivity_avg: Option<f64>,
    /// Number of days nausea was reported
    pub nausea_days: u32,
}

/// Weekly cycle summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CycleSummary {
    /// Most frequent cycle-day value among reporting samples
    pub modal_cycle_day: Option<u32>,
    /// Mean PMS severity among reporting samples
    pub pms_severity_avg: Option<f64>,
    /// Count of samples flagged as menstrual days
    pub menstrual_days: u32,
}

/// Weekly training summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Number of strength sessions in the week
    pub strength_sessions: u32,
    /// Number of cardio sessions in the week
    pub cardio_sessions: u32,
    /// Summed volume load across all sessions (absent loads contribute 0)
    pub total_volume_load: f64,
    /// Mean RPE among sessions that report one
    pub rpe_avg: Option<f64>,
}

/// Weekly body summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BodySummary {
    /// Last recorded weight minus first recorded weight in the week
    ///
    /// Absent when fewer than two readings were taken.
    pub weight_delta_kg: Option<f64>,
    /// OLS slope of strength-session volume load over session index, as a
    /// percentage of the mean volume load
    ///
    /// Absent when fewer than two strength sessions recorded a volume load.
    pub strength_trend_percent: Option<f64>,
}

/// Derived weekly summary, one per (client, week-start)
///
/// Immutable once produced by the aggregation layer. Each numeric field is the
/// arithmetic mean of only the samples present that week; zero samples yield
/// `None`, never a zero fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyAggregate {
    /// Client identifier
    pub client_id: String,
    /// Monday of the week this aggregate covers
    pub week_start: NaiveDate,
    /// Mean HRV (ms)
    pub hrv_avg: Option<f64>,
    /// Mean resting heart rate (bpm)
    pub rhr_avg: Option<f64>,
    /// Mean sleep duration (hours)
    pub sleep_avg: Option<f64>,
    /// Mean sleep efficiency (0-1)
    pub sleep_efficiency_avg: Option<f64>,
    /// Mean step count
    pub steps_avg: Option<f64>,
    /// Mean energy score
    pub energy_avg: Option<f64>,
    /// Mean stress score
    pub stress_avg: Option<f64>,
    /// Mean soreness score
    pub soreness_avg: Option<f64>,
    /// Digestion averages
    pub digestion: DigestionSummary,
    /// Cycle summary
    pub cycle: CycleSummary,
    /// Training summary
    pub training: TrainingSummary,
    /// Body composition summary
    pub body: BodySummary,
}

/// Trailing baseline statistics, recomputed from roughly six weeks of history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineStats {
    /// Median HRV over the trailing window (ms)
    pub hrv_median: f64,
    /// Mean resting heart rate over the trailing window (bpm)
    pub rhr_avg: f64,
    /// Mean strength-session volume load over the trailing window
    pub volume_load_avg: f64,
    /// Strength baseline, mirrors the volume-load baseline
    pub strength_baseline: f64,
}

impl Default for BaselineStats {
    fn default() -> Self {
        Self {
            hrv_median: 50.0,
            rhr_avg: 65.0,
            volume_load_avg: 0.0,
            strength_baseline: 0.0,
        }
    }
}

/// The five mutually exclusive M.A.R.C.H. health phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarchPhase {
    /// Energy foundation: mitochondrial/recovery deficit
    Mitochondria,
    /// Digestive health: absorption and detoxification
    AbsorptionDetox,
    /// Stress and recovery resilience
    Resilience,
    /// Hormonal/cycle-driven state
    Cyclical,
    /// Strength-building readiness and longevity work
    HypertrophyHealthspan,
}

impl MarchPhase {
    /// All phases, in the canonical decision/tiebreak order
    pub const ALL: [Self; 5] = [
        Self::Mitochondria,
        Self::AbsorptionDetox,
        Self::Resilience,
        Self::Cyclical,
        Self::HypertrophyHealthspan,
    ];

    /// Wire-format name for this phase
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mitochondria => "MITOCHONDRIA",
            Self::AbsorptionDetox => "ABSORPTION_DETOX",
            Self::Resilience => "RESILIENCE",
            Self::Cyclical => "CYCLICAL",
            Self::HypertrophyHealthspan => "HYPERTROPHY_HEALTHSPAN",
        }
    }
}

impl std::fmt::Display for MarchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score per phase, each value clamped to [0, 100]
///
/// Serializes to the five-key JSON object consumed by reporting collaborators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseScores {
    /// Mitochondria score
    #[serde(rename = "MITOCHONDRIA")]
    pub mitochondria: f64,
    /// Absorption/detox score
    #[serde(rename = "ABSORPTION_DETOX")]
    pub absorption_detox: f64,
    /// Resilience score
    #[serde(rename = "RESILIENCE")]
    pub resilience: f64,
    /// Cyclical score
    #[serde(rename = "CYCLICAL")]
    pub cyclical: f64,
    /// Hypertrophy/healthspan score
    #[serde(rename = "HYPERTROPHY_HEALTHSPAN")]
    pub hypertrophy_healthspan: f64,
}

impl PhaseScores {
    /// Score for one phase
    #[must_use]
    pub const fn get(&self, phase: MarchPhase) -> f64 {
        match phase {
            MarchPhase::Mitochondria => self.mitochondria,
            MarchPhase::AbsorptionDetox => self.absorption_detox,
            MarchPhase::Resilience => self.resilience,
            MarchPhase::Cyclical => self.cyclical,
            MarchPhase::HypertrophyHealthspan => self.hypertrophy_healthspan,
        }
    }

    /// Set a phase score, clamped to [0, 100]
    pub fn set(&mut self, phase: MarchPhase, score: f64) {
        let clamped = score.clamp(0.0, 100.0);
        match phase {
            MarchPhase::Mitochondria => self.mitochondria = clamped,
            MarchPhase::AbsorptionDetox => self.absorption_detox = clamped,
            MarchPhase::Resilience => self.resilience = clamped,
            MarchPhase::Cyclical => self.cyclical = clamped,
            MarchPhase::HypertrophyHealthspan => self.hypertrophy_healthspan = clamped,
        }
    }

    /// Iterate (phase, score) pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (MarchPhase, f64)> + '_ {
        MarchPhase::ALL.iter().map(move |&p| (p, self.get(p)))
    }

    /// Sum of all five scores
    #[must_use]
    pub fn total(&self) -> f64 {
        self.iter().map(|(_, s)| s).sum()
    }
}

/// Output of the scoring engine, one per (client, week)
///
/// Never mutated after creation; recomputation produces a new record sharing
/// the same derived identifier, which the store upserts by key.
///
/// Serializes to the camelCase shape consumed by reporting collaborators, with
/// the week start as a plain calendar date under `weekStartISO`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarchPhaseAssessment {
    /// Deterministic identifier: `march_{client_id}_{week_start}`
    pub id: String,
    /// Client identifier
    pub client_id: String,
    /// Monday of the assessed week
    #[serde(rename = "weekStartISO")]
    pub week_start: NaiveDate,
    /// The decided phase
    pub decided_phase: MarchPhase,
    /// Confidence fraction, bounded by the configured min/max
    pub confidence: f64,
    /// Adjusted score per phase
    pub phase_scores: PhaseScores,
    /// Ordered human-readable explanations for the decision
    pub rationale: Vec<String>,
    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
}

impl MarchPhaseAssessment {
    /// Derive the deterministic assessment identifier for a (client, week) pair
    #[must_use]
    pub fn derive_id(client_id: &str, week_start: NaiveDate) -> String {
        format!("march_{client_id}_{week_start}")
    }
}
