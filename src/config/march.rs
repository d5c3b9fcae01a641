// ABOUTME: M.A.R.C.H. scoring configuration with per-signal thresholds and per-factor weights
// ABOUTME: Configures signal cutoffs, GI/cycle/training thresholds, guardrails, and confidence bounds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 March Health Intelligence

//! M.A.R.C.H. Phase Scoring Configuration
//!
//! Provides configuration for the phase scoring engine: per-signal thresholds
//! (absolute cutoffs and baseline-relative ratios), per-factor scoring weights,
//! guardrail override constants, and confidence parameters. Supplied once at
//! engine construction and never mutated during scoring.

use serde::{Deserialize, Serialize};

/// M.A.R.C.H. phase scoring configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarchConfig {
    /// Physiological signal thresholds
    pub signal: SignalThresholds,
    /// Digestive (GI) signal thresholds
    pub gi: GiThresholds,
    /// Cycle signal thresholds
    pub cycle: CycleThresholds,
    /// Training signal thresholds
    pub training: TrainingThresholds,
    /// Per-factor scoring weights for each phase
    pub weights: PhaseWeights,
    /// Guardrail override constants
    pub guardrails: GuardrailConfig,
    /// Confidence calculation parameters
    pub confidence: ConfidenceConfig,
}

/// Physiological signal thresholds
///
/// Absolute cutoffs plus ratios applied against the trailing baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalThresholds {
    /// HRV below this absolute value is low (ms)
    pub low_hrv_ms: f64,
    /// HRV below this fraction of the baseline median is low
    pub hrv_baseline_ratio: f64,
    /// HRV below this fraction of the baseline median counts as a downward trend
    pub hrv_downtrend_ratio: f64,
    /// RHR above this absolute value is high (bpm)
    pub high_rhr_bpm: f64,
    /// RHR above this multiple of the baseline average is high
    pub rhr_baseline_ratio: f64,
    /// Sleep below this duration is poor (hours)
    pub poor_sleep_hours: f64,
    /// Sleep at or above this duration counts toward a base-stable week (hours)
    pub stable_sleep_hours: f64,
    /// Energy at or below this score is low (1-5 scale)
    pub low_energy: f64,
    /// Energy at or above this score counts toward a base-stable week
    pub stable_energy: f64,
    /// Steps below this daily average are low
    pub low_steps: f64,
    /// Stress above this score is high (1-5 scale)
    pub high_stress: f64,
    /// Stress at or below this score counts toward a base-stable week
    pub stable_stress: f64,
    /// RPE at or above this average is high (1-10 scale)
    pub high_rpe: f64,
}

/// Digestive signal thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiThresholds {
    /// Bloating average at or above this is high
    pub high_bloating: f64,
    /// Lower bound of the normal stool-form range (Bristol scale)
    pub stool_form_min: f64,
    /// Upper bound of the normal stool-form range (Bristol scale)
    pub stool_form_max: f64,
    /// Stool form outside this wider range marks the week GI-severe (lower bound)
    pub severe_stool_form_min: f64,
    /// Stool form outside this wider range marks the week GI-severe (upper bound)
    pub severe_stool_form_max: f64,
    /// Lower bound of the normal bowel-frequency range (per day)
    pub bowel_frequency_min: f64,
    /// Upper bound of the normal bowel-frequency range (per day)
    pub bowel_frequency_max: f64,
    /// Food-reactivity average at or above this is high
    pub high_food_reactivity: f64,
    /// Bloating average at or above this marks the week GI-severe
    pub severe_bloating: f64,
    /// Food-reactivity average at or above this marks the week GI-severe
    pub severe_food_reactivity: f64,
}

/// Cycle signal thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleThresholds {
    /// PMS severity at or above this is elevated
    pub pms_elevated: f64,
    /// PMS severity at or above this is severe
    pub pms_severe: f64,
}

/// Training signal thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingThresholds {
    /// Minimum strength sessions per week for a training-readiness signal
    pub min_strength_sessions: u32,
    /// Weekly volume must exceed baseline by more than this fraction to count as growth
    pub volume_growth_fraction: f64,
    /// Strength trend must exceed this percentage to count as positive
    pub strength_trend_percent: f64,
}

/// Per-factor scoring weights for each phase
///
/// Each factor adds its weight to the phase's raw score when its condition
/// holds; raw scores are clamped to [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseWeights {
    /// Mitochondria: low HRV weight
    pub mito_low_hrv: f64,
    /// Mitochondria: high RHR weight
    pub mito_high_rhr: f64,
    /// Mitochondria: poor sleep weight
    pub mito_poor_sleep: f64,
    /// Mitochondria: low energy weight
    pub mito_low_energy: f64,
    /// Mitochondria: low step count weight
    pub mito_low_steps: f64,
    /// Absorption/detox: high bloating weight
    pub gi_high_bloating: f64,
    /// Absorption/detox: out-of-range stool form weight
    pub gi_stool_form: f64,
    /// Absorption/detox: out-of-range bowel frequency weight (partial)
    pub gi_bowel_frequency: f64,
    /// Absorption/detox: high food reactivity weight (partial)
    pub gi_food_reactivity: f64,
    /// Absorption/detox: low energy weight (partial)
    pub gi_low_energy: f64,
    /// Resilience: downward HRV trend weight
    pub res_hrv_downtrend: f64,
    /// Resilience: high stress weight
    pub res_high_stress: f64,
    /// Resilience: sub-threshold sleep weight (when GI not severe)
    pub res_poor_sleep: f64,
    /// Resilience: high RPE with low recovery signals weight
    pub res_high_rpe_low_recovery: f64,
    /// Cyclical: menstrual days present weight
    pub cyc_menstrual_days: f64,
    /// Cyclical: severe PMS weight
    pub cyc_pms_severe: f64,
    /// Cyclical: elevated PMS during an otherwise stable week weight
    pub cyc_pms_elevated_stable: f64,
    /// Hypertrophy: sufficient strength sessions weight
    pub hyp_strength_sessions: f64,
    /// Hypertrophy: volume growth over baseline weight
    pub hyp_volume_growth: f64,
    /// Hypertrophy: positive strength trend weight
    pub hyp_strength_trend: f64,
}

/// Guardrail override constants
///
/// Applied in a fixed order after raw scoring: GI override, then HRV/RHR
/// override, then hypertrophy boost. Later steps read values already adjusted
/// by earlier ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailConfig {
    /// HRV below this is very low (ms); absent HRV defaults to 100 here
    pub very_low_hrv_ms: f64,
    /// RHR above this is very high (bpm); absent RHR defaults to 60 here
    pub very_high_rhr_bpm: f64,
    /// Mitochondria score floor applied when HRV is very low or RHR very high
    pub mitochondria_floor: f64,
    /// Absorption/detox floor applied by the GI override
    pub gi_override_floor: f64,
    /// GI override triggers only while absorption/detox scores below this
    pub gi_override_below: f64,
    /// GI override triggers only while some other phase exceeds this
    pub gi_competitor_above: f64,
    /// Hypertrophy boost applies when within this many points of the leader
    pub hypertrophy_proximity: f64,
    /// Points added by the hypertrophy boost
    pub hypertrophy_boost: f64,
}

/// Confidence calculation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    /// Lower bound on reported confidence
    pub min_confidence: f64,
    /// Upper bound on reported confidence
    pub max_confidence: f64,
    /// Minimum gap between the top two scores for above-minimum confidence
    pub min_separation: f64,
    /// Minimum count of present weekly signals before scoring is trusted
    pub low_data_threshold: usize,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            low_hrv_ms: 40.0,
            hrv_baseline_ratio: 0.85,
            hrv_downtrend_ratio: 0.90,
            high_rhr_bpm: 75.0,
            rhr_baseline_ratio: 1.08,
            poor_sleep_hours: 6.0,
            stable_sleep_hours: 7.0,
            low_energy: 2.0,
            stable_energy: 3.0,
            low_steps: 6000.0,
            high_stress: 3.5,
            stable_stress: 3.0,
            high_rpe: 8.0,
        }
    }
}

impl Default for GiThresholds {
    fn default() -> Self {
        Self {
            high_bloating: 2.0,
            stool_form_min: 3.0,
            stool_form_max: 5.0,
            severe_stool_form_min: 2.0,
            severe_stool_form_max: 6.0,
            bowel_frequency_min: 1.0,
            bowel_frequency_max: 3.0,
            high_food_reactivity: 1.0,
            severe_bloating: 2.5,
            severe_food_reactivity: 1.5,
        }
    }
}

impl Default for CycleThresholds {
    fn default() -> Self {
        Self {
            pms_elevated: 2.0,
            pms_severe: 3.0,
        }
    }
}

impl Default for TrainingThresholds {
    fn default() -> Self {
        Self {
            min_strength_sessions: 3,
            volume_growth_fraction: 0.05,
            strength_trend_percent: 1.0,
        }
    }
}

impl Default for PhaseWeights {
    fn default() -> Self {
        Self {
            mito_low_hrv: 30.0,
            mito_high_rhr: 25.0,
            mito_poor_sleep: 20.0,
            mito_low_energy: 15.0,
            mito_low_steps: 10.0,
            // Bloating and stool form dominate so a week with both out of
            // range reaches the GI-override floor on raw score alone
            gi_high_bloating: 35.0,
            gi_stool_form: 35.0,
            gi_bowel_frequency: 10.0,
            gi_food_reactivity: 10.0,
            gi_low_energy: 10.0,
            res_hrv_downtrend: 30.0,
            res_high_stress: 30.0,
            res_poor_sleep: 20.0,
            res_high_rpe_low_recovery: 20.0,
            cyc_menstrual_days: 50.0,
            cyc_pms_severe: 35.0,
            cyc_pms_elevated_stable: 20.0,
            hyp_strength_sessions: 40.0,
            hyp_volume_growth: 35.0,
            hyp_strength_trend: 25.0,
        }
    }
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            very_low_hrv_ms: 35.0,
            very_high_rhr_bpm: 85.0,
            mitochondria_floor: 80.0,
            gi_override_floor: 70.0,
            gi_override_below: 40.0,
            gi_competitor_above: 65.0,
            hypertrophy_proximity: 5.0,
            hypertrophy_boost: 5.0,
        }
    }
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.3,
            max_confidence: 0.95,
            min_separation: 10.0,
            low_data_threshold: 3,
        }
    }
}
