// ABOUTME: M.A.R.C.H. phase scoring engine with weighted multi-factor scores and guardrails
// ABOUTME: Pure computation from weekly aggregate + baseline to a phase assessment with rationale
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 March Health Intelligence

//! Phase Scoring Engine
//!
//! Given one weekly aggregate, one baseline, and an optional previous phase,
//! produces a [`MarchPhaseAssessment`]: a score per phase, the decided phase,
//! a bounded confidence, and a human-readable rationale.
//!
//! The engine is a pure function over its inputs. It is constructed once with a
//! [`MarchConfig`] and maintains no other state; identical inputs always yield
//! identical scores (only `created_at` varies with call context). Every numeric
//! comparison treats an absent signal with an explicit default, so no input
//! combination can fault.
//!
//! Guardrail overrides run in a fixed order after raw scoring: the GI override,
//! then the HRV/RHR override, then the hypertrophy boost. Later overrides read
//! values already adjusted by earlier ones, so the order must be preserved.

use crate::config::MarchConfig;
use crate::intelligence::aggregation::WeeklyAggregator;
use crate::models::{
    BaselineStats, MarchPhase, MarchPhaseAssessment, PhaseScores, WeeklyAggregate,
};
use chrono::Utc;

/// Absent HRV defaults to this inside the very-low-HRV guardrail only (ms)
const GUARDRAIL_ABSENT_HRV: f64 = 100.0;

/// Absent RHR defaults to this inside the very-high-RHR guardrail only (bpm)
const GUARDRAIL_ABSENT_RHR: f64 = 60.0;

/// Stateless scoring engine holding the static configuration
pub struct PhaseScoringEngine {
    config: MarchConfig,
}

impl PhaseScoringEngine {
    /// Construct an engine with the given configuration
    #[must_use]
    pub fn new(config: MarchConfig) -> Self {
        Self { config }
    }

    /// The configuration this engine scores with
    #[must_use]
    pub const fn config(&self) -> &MarchConfig {
        &self.config
    }

    /// Compute a full phase assessment for one week
    ///
    /// Total function: no combination of present/absent inputs faults. A week
    /// with insufficient data yields a valid minimum-confidence assessment that
    /// carries the previous phase (or Mitochondria when none is supplied).
    #[must_use]
    pub fn compute_phase_assessment(
        &self,
        aggregate: &WeeklyAggregate,
        baseline: &BaselineStats,
        previous_phase: Option<MarchPhase>,
    ) -> MarchPhaseAssessment {
        let mut scores = PhaseScores::default();
        scores.set(
            MarchPhase::Mitochondria,
            self.score_mitochondria(aggregate, baseline),
        );
        scores.set(
            MarchPhase::AbsorptionDetox,
            self.score_absorption_detox(aggregate),
        );
        scores.set(
            MarchPhase::Resilience,
            self.score_resilience(aggregate, baseline),
        );
        scores.set(MarchPhase::Cyclical, self.score_cyclical(aggregate));
        scores.set(
            MarchPhase::HypertrophyHealthspan,
            self.score_hypertrophy_healthspan(aggregate, baseline),
        );

        let confidence_cfg = &self.config.confidence;

        // Low-data short-circuit: carry the previous phase at minimum
        // confidence and skip guardrails and separation-based confidence
        if !WeeklyAggregator::has_sufficient_data(aggregate, confidence_cfg.low_data_threshold) {
            let decided_phase = previous_phase.unwrap_or(MarchPhase::Mitochondria);
            let present = WeeklyAggregator::present_signal_count(aggregate);
            return MarchPhaseAssessment {
                id: MarchPhaseAssessment::derive_id(&aggregate.client_id, aggregate.week_start),
                client_id: aggregate.client_id.clone(),
                week_start: aggregate.week_start,
                decided_phase,
                confidence: confidence_cfg.min_confidence,
                phase_scores: scores,
                rationale: vec![format!(
                    "Insufficient weekly data ({present} of 7 signals present); defaulting to {decided_phase}"
                )],
                created_at: Utc::now(),
            };
        }

        self.apply_guardrails(&mut scores, aggregate, baseline);

        let (decided_phase, gap) = Self::decide(&scores);
        let confidence = if gap >= confidence_cfg.min_separation {
            let sum = scores.total();
            if sum > 0.0 {
                (scores.get(decided_phase) / sum)
                    .min(confidence_cfg.max_confidence)
                    .max(confidence_cfg.min_confidence)
            } else {
                confidence_cfg.min_confidence
            }
        } else {
            confidence_cfg.min_confidence
        };

        MarchPhaseAssessment {
            id: MarchPhaseAssessment::derive_id(&aggregate.client_id, aggregate.week_start),
            client_id: aggregate.client_id.clone(),
            week_start: aggregate.week_start,
            decided_phase,
            confidence,
            phase_scores: scores,
            rationale: self.build_rationale(aggregate, baseline),
            created_at: Utc::now(),
        }
    }

    /// Mitochondria (energy foundation) raw score
    #[doc(hidden)]
    #[must_use]
    pub fn score_mitochondria(&self, agg: &WeeklyAggregate, baseline: &BaselineStats) -> f64 {
        let w = &self.config.weights;
        let t = &self.config.signal;
        let mut score = 0.0;

        if self.hrv_is_low(agg, baseline) {
            score += w.mito_low_hrv;
        }
        if self.rhr_is_high(agg, baseline) {
            score += w.mito_high_rhr;
        }
        if agg.sleep_avg.is_some_and(|s| s < t.poor_sleep_hours) {
            score += w.mito_poor_sleep;
        }
        if agg.energy_avg.is_some_and(|e| e <= t.low_energy) {
            score += w.mito_low_energy;
        }
        if agg.steps_avg.is_some_and(|s| s < t.low_steps) {
            score += w.mito_low_steps;
        }
        score.clamp(0.0, 100.0)
    }

    /// Absorption/detox (digestive health) raw score
    #[doc(hidden)]
    #[must_use]
    pub fn score_absorption_detox(&self, agg: &WeeklyAggregate) -> f64 {
        let w = &self.config.weights;
        let gi = &self.config.gi;
        let d = &agg.digestion;
        let mut score = 0.0;

        if d.bloating_avg.is_some_and(|b| b >= gi.high_bloating) {
            score += w.gi_high_bloating;
        }
        if d.stool_form_avg
            .is_some_and(|s| s < gi.stool_form_min || s > gi.stool_form_max)
        {
            score += w.gi_stool_form;
        }
        if d.bowel_frequency_avg
            .is_some_and(|f| f < gi.bowel_frequency_min || f > gi.bowel_frequency_max)
        {
            score += w.gi_bowel_frequency;
        }
        if d.food_reactivity_avg
            .is_some_and(|r| r >= gi.high_food_reactivity)
        {
            score += w.gi_food_reactivity;
        }
        if agg
            .energy_avg
            .is_some_and(|e| e <= self.config.signal.low_energy)
        {
            score += w.gi_low_energy;
        }
        score.clamp(0.0, 100.0)
    }

    /// Resilience (stress/recovery) raw score
    #[doc(hidden)]
    #[must_use]
    pub fn score_resilience(&self, agg: &WeeklyAggregate, baseline: &BaselineStats) -> f64 {
        let w = &self.config.weights;
        let t = &self.config.signal;
        let mut score = 0.0;

        let hrv_downtrend = agg
            .hrv_avg
            .is_some_and(|h| h < baseline.hrv_median * t.hrv_downtrend_ratio);
        if hrv_downtrend {
            score += w.res_hrv_downtrend;
        }
        if agg.stress_avg.is_some_and(|s| s >= t.high_stress) {
            score += w.res_high_stress;
        }
        let poor_sleep = agg.sleep_avg.is_some_and(|s| s < t.poor_sleep_hours);
        if poor_sleep && !self.is_gi_severe(agg) {
            score += w.res_poor_sleep;
        }
        let low_recovery = hrv_downtrend
            || poor_sleep
            || agg.energy_avg.is_some_and(|e| e <= t.low_energy);
        if agg.training.rpe_avg.is_some_and(|r| r >= t.high_rpe) && low_recovery {
            score += w.res_high_rpe_low_recovery;
        }
        score.clamp(0.0, 100.0)
    }

    /// Cyclical (hormonal) raw score, scored independently of the other four
    #[doc(hidden)]
    #[must_use]
    pub fn score_cyclical(&self, agg: &WeeklyAggregate) -> f64 {
        let w = &self.config.weights;
        let c = &self.config.cycle;
        let mut score = 0.0;

        if agg.cycle.menstrual_days > 0 {
            score += w.cyc_menstrual_days;
        }
        if let Some(pms) = agg.cycle.pms_severity_avg {
            if pms >= c.pms_severe {
                score += w.cyc_pms_severe;
            } else if pms >= c.pms_elevated && self.is_base_stable(agg) {
                score += w.cyc_pms_elevated_stable;
            }
        }
        score.clamp(0.0, 100.0)
    }

    /// Hypertrophy/healthspan (strength-building readiness) raw score
    ///
    /// Accrues only when the week is base-stable.
    #[doc(hidden)]
    #[must_use]
    pub fn score_hypertrophy_healthspan(
        &self,
        agg: &WeeklyAggregate,
        baseline: &BaselineStats,
    ) -> f64 {
        if !self.is_base_stable(agg) {
            return 0.0;
        }
        let w = &self.config.weights;
        let t = &self.config.training;
        let mut score = 0.0;

        if agg.training.strength_sessions >= t.min_strength_sessions {
            score += w.hyp_strength_sessions;
        }
        let growth_floor = baseline.volume_load_avg * (1.0 + t.volume_growth_fraction);
        if agg.training.total_volume_load > growth_floor && agg.training.total_volume_load > 0.0 {
            score += w.hyp_volume_growth;
        }
        if agg
            .body
            .strength_trend_percent
            .is_some_and(|p| p > t.strength_trend_percent)
        {
            score += w.hyp_strength_trend;
        }
        score.clamp(0.0, 100.0)
    }

    /// Guardrail adjustments, in a fixed order that must be preserved:
    /// GI override, then HRV/RHR override, then hypertrophy boost
    fn apply_guardrails(
        &self,
        scores: &mut PhaseScores,
        agg: &WeeklyAggregate,
        baseline: &BaselineStats,
    ) {
        let g = &self.config.guardrails;

        // (a) Severe GI weeks must surface even when the weighted sum is
        // diluted by a dominant competing phase
        if self.is_gi_severe(agg) {
            let absorption = scores.get(MarchPhase::AbsorptionDetox);
            let competitor = MarchPhase::ALL
                .iter()
                .filter(|&&p| p != MarchPhase::AbsorptionDetox)
                .any(|&p| scores.get(p) > g.gi_competitor_above);
            if absorption < g.gi_override_below && competitor {
                scores.set(
                    MarchPhase::AbsorptionDetox,
                    absorption.max(g.gi_override_floor),
                );
            }
        }

        // (b) Critically suppressed HRV or elevated RHR forces the energy
        // foundation to the front regardless of other signals
        let hrv = agg.hrv_avg.unwrap_or(GUARDRAIL_ABSENT_HRV);
        let rhr = agg.rhr_avg.unwrap_or(GUARDRAIL_ABSENT_RHR);
        if hrv < g.very_low_hrv_ms || rhr > g.very_high_rhr_bpm {
            let mito = scores.get(MarchPhase::Mitochondria);
            scores.set(MarchPhase::Mitochondria, mito.max(g.mitochondria_floor));
        }

        // (c) A stable, well-training week nudges hypertrophy ahead when it is
        // already within reach of the leader
        if self.is_base_stable(agg) && self.has_strong_training_signals(agg) {
            let hyp = scores.get(MarchPhase::HypertrophyHealthspan);
            let max_other = MarchPhase::ALL
                .iter()
                .filter(|&&p| p != MarchPhase::HypertrophyHealthspan)
                .map(|&p| scores.get(p))
                .fold(0.0_f64, f64::max);
            if max_other - hyp <= g.hypertrophy_proximity {
                scores.set(
                    MarchPhase::HypertrophyHealthspan,
                    hyp + g.hypertrophy_boost,
                );
            }
        }
    }

    /// Pick the highest-scoring phase and the gap to the runner-up
    ///
    /// Ties resolve in [`MarchPhase::ALL`] order.
    fn decide(scores: &PhaseScores) -> (MarchPhase, f64) {
        let mut decided = MarchPhase::Mitochondria;
        let mut top = f64::MIN;
        for (phase, score) in scores.iter() {
            if score > top {
                decided = phase;
                top = score;
            }
        }
        let runner_up = scores
            .iter()
            .filter(|(p, _)| *p != decided)
            .map(|(_, s)| s)
            .fold(0.0_f64, f64::max);
        (decided, top - runner_up)
    }

    /// Whether the week looks physiologically stable enough to build on
    ///
    /// Sleep and stress must be present and within range; absent energy
    /// defaults to 0 and fails the test.
    #[doc(hidden)]
    #[must_use]
    pub fn is_base_stable(&self, agg: &WeeklyAggregate) -> bool {
        let t = &self.config.signal;
        agg.sleep_avg.is_some_and(|s| s >= t.stable_sleep_hours)
            && agg.stress_avg.is_some_and(|s| s <= t.stable_stress)
            && !self.is_gi_severe(agg)
            && agg.energy_avg.unwrap_or(0.0) >= t.stable_energy
    }

    /// Whether the week's digestive signals are severe
    #[doc(hidden)]
    #[must_use]
    pub fn is_gi_severe(&self, agg: &WeeklyAggregate) -> bool {
        let gi = &self.config.gi;
        let d = &agg.digestion;
        d.bloating_avg.unwrap_or(0.0) >= gi.severe_bloating
            || d.stool_form_avg
                .is_some_and(|s| s < gi.severe_stool_form_min || s > gi.severe_stool_form_max)
            || d.food_reactivity_avg.unwrap_or(0.0) >= gi.severe_food_reactivity
    }

    /// Enough strength sessions, nonzero summed volume, positive trend
    fn has_strong_training_signals(&self, agg: &WeeklyAggregate) -> bool {
        agg.training.strength_sessions >= self.config.training.min_strength_sessions
            && agg.training.total_volume_load > 0.0
            && agg.body.strength_trend_percent.unwrap_or(0.0) > 0.0
    }

    /// Ordered explanatory sentences, one per condition that held
    fn build_rationale(&self, agg: &WeeklyAggregate, baseline: &BaselineStats) -> Vec<String> {
        let t = &self.config.signal;
        let gi = &self.config.gi;
        let c = &self.config.cycle;
        let mut rationale = Vec::new();

        if let Some(hrv) = agg.hrv_avg {
            if self.hrv_is_low(agg, baseline) {
                rationale.push(format!(
                    "HRV {hrv:.0}ms vs baseline {:.0}ms - below recovery range",
                    baseline.hrv_median
                ));
            }
        }
        if let Some(rhr) = agg.rhr_avg {
            if self.rhr_is_high(agg, baseline) {
                let limit = if rhr > t.high_rhr_bpm {
                    t.high_rhr_bpm
                } else {
                    baseline.rhr_avg * t.rhr_baseline_ratio
                };
                rationale.push(format!(
                    "Resting HR {rhr:.0}bpm exceeds {limit:.0}bpm threshold"
                ));
            }
        }
        if let Some(sleep) = agg.sleep_avg {
            if sleep < t.poor_sleep_hours {
                rationale.push(format!(
                    "Sleep {sleep:.1}h < {:.0}h target",
                    t.poor_sleep_hours
                ));
            }
        }
        if let Some(bloating) = agg.digestion.bloating_avg {
            if bloating >= gi.high_bloating {
                rationale.push(format!(
                    "Bloating average {bloating:.1} at or above {:.1}",
                    gi.high_bloating
                ));
            }
        }
        if let Some(stool) = agg.digestion.stool_form_avg {
            if stool < gi.stool_form_min || stool > gi.stool_form_max {
                rationale.push(format!(
                    "Stool form average {stool:.1} outside {:.0}-{:.0} range",
                    gi.stool_form_min, gi.stool_form_max
                ));
            }
        }
        if let Some(stress) = agg.stress_avg {
            if stress >= t.high_stress {
                rationale.push(format!(
                    "Stress average {stress:.1} at or above {:.1}",
                    t.high_stress
                ));
            }
        }
        if agg.training.strength_sessions >= self.config.training.min_strength_sessions {
            rationale.push(format!(
                "{} strength sessions logged (target {})",
                agg.training.strength_sessions, self.config.training.min_strength_sessions
            ));
        }
        if agg.cycle.menstrual_days > 0 {
            rationale.push(format!(
                "{} menstrual day(s) reported this week",
                agg.cycle.menstrual_days
            ));
        }
        if let Some(pms) = agg.cycle.pms_severity_avg {
            if pms >= c.pms_elevated {
                rationale.push(format!(
                    "PMS severity {pms:.1} at or above {:.1}",
                    c.pms_elevated
                ));
            }
        }
        rationale
    }

    fn hrv_is_low(&self, agg: &WeeklyAggregate, baseline: &BaselineStats) -> bool {
        let t = &self.config.signal;
        agg.hrv_avg
            .is_some_and(|h| h < t.low_hrv_ms || h < baseline.hrv_median * t.hrv_baseline_ratio)
    }

    fn rhr_is_high(&self, agg: &WeeklyAggregate, baseline: &BaselineStats) -> bool {
        let t = &self.config.signal;
        agg.rhr_avg
            .is_some_and(|r| r > t.high_rhr_bpm || r > baseline.rhr_avg * t.rhr_baseline_ratio)
    }
}
