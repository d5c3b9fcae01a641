// ABOUTME: Weekly aggregation of raw daily samples into per-client summary records
// ABOUTME: Computes present-only means, cycle/training/body summaries, and trailing baselines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 March Health Intelligence

//! Weekly Aggregation Module
//!
//! Converts raw per-day samples (biometrics, check-ins, training logs, body
//! metrics) into one [`WeeklyAggregate`] per (client, week-start), and computes
//! trailing [`BaselineStats`] from several weeks of history.
//!
//! Every derived mean covers only the samples present that week: a signal with
//! zero contributing samples is `None`, never a zero fill. All functions here
//! are total; empty input lists simply produce an aggregate with all derived
//! fields absent.

use crate::models::{
    BaselineStats, BiometricsSample, BodyMetrics, BodySummary, CheckInSample, CycleSummary,
    DigestionSummary, SessionType, TrainingLog, TrainingSummary, WeeklyAggregate,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::HashMap;

/// Trailing window for baseline statistics, roughly six weeks
const BASELINE_WINDOW_DAYS: i64 = 42;

/// Default HRV baseline when the trailing window holds no HRV values (ms)
const DEFAULT_HRV_MEDIAN: f64 = 50.0;

/// Default RHR baseline when the trailing window holds no RHR values (bpm)
const DEFAULT_RHR_AVG: f64 = 65.0;

/// Stateless weekly aggregator
pub struct WeeklyAggregator;

impl WeeklyAggregator {
    /// Inclusive week window: `[week_start 00:00:00, week_start+6d 23:59:59.999]`
    #[must_use]
    pub fn week_window(week_start: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc.from_utc_datetime(&week_start.and_time(NaiveTime::MIN));
        let end_time = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        let end = Utc.from_utc_datetime(&(week_start + Duration::days(6)).and_time(end_time));
        (start, end)
    }

    /// Aggregate one client's raw samples into a weekly summary
    ///
    /// Filters each input list to timestamps inside the inclusive week window,
    /// then computes arithmetic means over the samples that actually reported
    /// each signal. Total function: never panics, never errors.
    #[must_use]
    pub fn aggregate_weekly(
        client_id: &str,
        week_start: NaiveDate,
        biometrics: &[BiometricsSample],
        check_ins: &[CheckInSample],
        training_logs: &[TrainingLog],
        body_metrics: &[BodyMetrics],
    ) -> WeeklyAggregate {
        let (start, end) = Self::week_window(week_start);
        let in_week = |ts: DateTime<Utc>| ts >= start && ts <= end;

        let bio: Vec<&BiometricsSample> =
            biometrics.iter().filter(|s| in_week(s.timestamp)).collect();
        let checks: Vec<&CheckInSample> =
            check_ins.iter().filter(|s| in_week(s.timestamp)).collect();
        let mut sessions: Vec<&TrainingLog> = training_logs
            .iter()
            .filter(|s| in_week(s.timestamp))
            .collect();
        sessions.sort_by_key(|s| s.timestamp);
        let mut body: Vec<&BodyMetrics> = body_metrics
            .iter()
            .filter(|s| in_week(s.timestamp))
            .collect();
        body.sort_by_key(|s| s.timestamp);

        WeeklyAggregate {
            client_id: client_id.to_owned(),
            week_start,
            hrv_avg: mean(bio.iter().filter_map(|s| s.hrv_ms)),
            rhr_avg: mean(bio.iter().filter_map(|s| s.resting_hr_bpm)),
            sleep_avg: mean(bio.iter().filter_map(|s| s.sleep_hours)),
            sleep_efficiency_avg: mean(bio.iter().filter_map(|s| s.sleep_efficiency)),
            steps_avg: mean(bio.iter().filter_map(|s| s.steps)),
            energy_avg: mean(checks.iter().filter_map(|s| s.energy)),
            stress_avg: mean(checks.iter().filter_map(|s| s.stress)),
            soreness_avg: mean(checks.iter().filter_map(|s| s.soreness)),
            digestion: Self::summarize_digestion(&checks),
            cycle: Self::summarize_cycle(&checks),
            training: Self::summarize_training(&sessions),
            body: Self::summarize_body(&body, &sessions),
        }
    }

    fn summarize_digestion(checks: &[&CheckInSample]) -> DigestionSummary {
        DigestionSummary {
            bloating_avg: mean(checks.iter().filter_map(|s| s.digestion.bloating)),
            stool_form_avg: mean(checks.iter().filter_map(|s| s.digestion.stool_form)),
            bowel_frequency_avg: mean(checks.iter().filter_map(|s| s.digestion.bowel_frequency)),
            food_reactivity_avg: mean(
                checks
                    .iter()
                    .filter_map(|s| s.digestion.food_reactivity_count),
            ),
            nausea_days: checks
                .iter()
                .filter(|s| s.digestion.nausea == Some(true))
                .count() as u32,
        }
    }

    fn summarize_cycle(checks: &[&CheckInSample]) -> CycleSummary {
        let reports: Vec<_> = checks.iter().filter_map(|s| s.cycle.as_ref()).collect();

        // Modal cycle day; ties resolve to the smaller day so the result is
        // deterministic regardless of sample order
        let mut counts: HashMap<u32, u32> = HashMap::new();
        for day in reports.iter().filter_map(|c| c.cycle_day) {
            *counts.entry(day).or_insert(0) += 1;
        }
        let modal_cycle_day = counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(&day, _)| day);

        CycleSummary {
            modal_cycle_day,
            pms_severity_avg: mean(reports.iter().filter_map(|c| c.pms_severity)),
            menstrual_days: reports.iter().filter(|c| c.menstrual_day).count() as u32,
        }
    }

    fn summarize_training(sessions: &[&TrainingLog]) -> TrainingSummary {
        TrainingSummary {
            strength_sessions: sessions
                .iter()
                .filter(|s| s.session_type == SessionType::Strength)
                .count() as u32,
            cardio_sessions: sessions
                .iter()
                .filter(|s| s.session_type == SessionType::Cardio)
                .count() as u32,
            total_volume_load: sessions.iter().filter_map(|s| s.volume_load).sum(),
            rpe_avg: mean(sessions.iter().filter_map(|s| s.rpe)),
        }
    }

    fn summarize_body(body: &[&BodyMetrics], sessions: &[&TrainingLog]) -> BodySummary {
        let weights: Vec<f64> = body.iter().filter_map(|b| b.weight_kg).collect();
        let weight_delta_kg = if weights.len() >= 2 {
            weights.last().and_then(|last| weights.first().map(|first| last - first))
        } else {
            None
        };

        // Strength trend: OLS slope of volume load over strength-session
        // index, normalized as a percentage of the mean volume load
        let volumes: Vec<f64> = sessions
            .iter()
            .filter(|s| s.session_type == SessionType::Strength)
            .filter_map(|s| s.volume_load)
            .collect();
        let strength_trend_percent = ols_trend_percent(&volumes);

        BodySummary {
            weight_delta_kg,
            strength_trend_percent,
        }
    }

    /// Compute trailing baseline statistics from a client's full history
    ///
    /// Restricts to the trailing [`BASELINE_WINDOW_DAYS`] before `now`. Falls
    /// back to documented population defaults when the window holds no values.
    #[must_use]
    pub fn compute_baseline_stats(
        now: DateTime<Utc>,
        biometrics: &[BiometricsSample],
        training_logs: &[TrainingLog],
    ) -> BaselineStats {
        let window_start = now - Duration::days(BASELINE_WINDOW_DAYS);
        let in_window = |ts: DateTime<Utc>| ts > window_start && ts <= now;

        let hrv_values: Vec<f64> = biometrics
            .iter()
            .filter(|s| in_window(s.timestamp))
            .filter_map(|s| s.hrv_ms)
            .collect();
        let rhr_values: Vec<f64> = biometrics
            .iter()
            .filter(|s| in_window(s.timestamp))
            .filter_map(|s| s.resting_hr_bpm)
            .collect();
        let volume_values: Vec<f64> = training_logs
            .iter()
            .filter(|s| in_window(s.timestamp) && s.session_type == SessionType::Strength)
            .filter_map(|s| s.volume_load)
            .collect();

        let volume_load_avg = mean(volume_values.iter().copied()).unwrap_or(0.0);

        BaselineStats {
            hrv_median: median(&hrv_values).unwrap_or(DEFAULT_HRV_MEDIAN),
            rhr_avg: mean(rhr_values.iter().copied()).unwrap_or(DEFAULT_RHR_AVG),
            volume_load_avg,
            strength_baseline: volume_load_avg,
        }
    }

    /// Whether the weekly aggregate carries enough signal to score reliably
    ///
    /// Counts the present signals among HRV, RHR, sleep, energy, stress,
    /// GI bloating, and strength-session count (> 0). The same threshold drives
    /// the scoring engine's low-data short-circuit, so the two call sites stay
    /// consistent through shared configuration.
    #[must_use]
    pub fn has_sufficient_data(aggregate: &WeeklyAggregate, low_data_threshold: usize) -> bool {
        Self::present_signal_count(aggregate) >= low_data_threshold
    }

    /// Count of the seven tracked weekly signals that are present
    #[must_use]
    pub fn present_signal_count(aggregate: &WeeklyAggregate) -> usize {
        [
            aggregate.hrv_avg.is_some(),
            aggregate.rhr_avg.is_some(),
            aggregate.sleep_avg.is_some(),
            aggregate.energy_avg.is_some(),
            aggregate.stress_avg.is_some(),
            aggregate.digestion.bloating_avg.is_some(),
            aggregate.training.strength_sessions > 0,
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

/// Arithmetic mean over present values; `None` when no value contributed
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        None
    } else {
        Some(collected.iter().sum::<f64>() / collected.len() as f64)
    }
}

/// Median of a slice; `None` when empty
fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// OLS slope of `values` over their index, as a percentage of the mean value
///
/// `None` when fewer than two values contributed or the mean is zero.
fn ols_trend_percent(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;
    if y_mean.abs() < f64::EPSILON {
        return None;
    }
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }
    if denominator.abs() < f64::EPSILON {
        return None;
    }
    Some(numerator / denominator / y_mean * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_even_count() {
        assert_eq!(median(&[10.0, 20.0, 30.0, 40.0]), Some(25.0));
    }

    #[test]
    fn test_median_odd_count_unsorted() {
        assert_eq!(median(&[30.0, 10.0, 20.0]), Some(20.0));
    }

    #[test]
    fn test_median_empty() {
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_mean_skips_nothing_present() {
        assert_eq!(mean(std::iter::empty()), None);
    }

    #[test]
    fn test_ols_trend_rising_volume() {
        // 100 -> 110 -> 120: slope 10 per session, mean 110 => ~9.09%/session
        let trend = ols_trend_percent(&[100.0, 110.0, 120.0]).expect("trend present");
        assert!((trend - 10.0 / 110.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_ols_trend_needs_two_points() {
        assert_eq!(ols_trend_percent(&[100.0]), None);
    }
}
