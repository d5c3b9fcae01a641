// ABOUTME: Unit tests for weekly aggregation and baseline statistics
// ABOUTME: Covers window boundaries, present-only means, cycle/training/body summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 March Health Intelligence

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use march_phase_engine::intelligence::WeeklyAggregator;
use march_phase_engine::models::{
    BiometricsSample, BodyMetrics, CheckInSample, CycleReport, DigestionReport, SessionType,
    TrainingLog,
};

const CLIENT: &str = "client-1";

/// Monday used as the week under test
fn week() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date")
}

fn at(date: NaiveDate, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(hour, minute, second).expect("valid time"))
}

fn bio(timestamp: DateTime<Utc>) -> BiometricsSample {
    BiometricsSample {
        client_id: CLIENT.to_owned(),
        timestamp,
        hrv_ms: None,
        resting_hr_bpm: None,
        sleep_hours: None,
        sleep_efficiency: None,
        steps: None,
    }
}

fn check_in(timestamp: DateTime<Utc>) -> CheckInSample {
    CheckInSample {
        client_id: CLIENT.to_owned(),
        timestamp,
        energy: None,
        stress: None,
        soreness: None,
        digestion: DigestionReport::default(),
        cycle: None,
    }
}

fn strength(timestamp: DateTime<Utc>, volume_load: Option<f64>) -> TrainingLog {
    TrainingLog {
        client_id: CLIENT.to_owned(),
        timestamp,
        session_type: SessionType::Strength,
        volume_load,
        rpe: None,
        duration_minutes: Some(60.0),
    }
}

#[test]
fn test_window_excludes_one_second_before_week_start() {
    let before = Utc.from_utc_datetime(
        &(week() - Duration::days(1))
            .and_hms_opt(23, 59, 59)
            .expect("valid time"),
    );
    let inside = at(week(), 0, 0, 0);
    let samples = vec![
        BiometricsSample {
            hrv_ms: Some(30.0),
            ..bio(before)
        },
        BiometricsSample {
            hrv_ms: Some(50.0),
            ..bio(inside)
        },
    ];
    let agg = WeeklyAggregator::aggregate_weekly(CLIENT, week(), &samples, &[], &[], &[]);
    // Only the in-window sample contributes
    assert_eq!(agg.hrv_avg, Some(50.0));
}

#[test]
fn test_window_includes_last_millisecond_and_excludes_next_second() {
    let last_day = week() + Duration::days(6);
    let last_moment = Utc.from_utc_datetime(
        &last_day
            .and_hms_milli_opt(23, 59, 59, 999)
            .expect("valid time"),
    );
    let one_second_after = Utc.from_utc_datetime(
        &(week() + Duration::days(7))
            .and_hms_opt(0, 0, 0)
            .expect("valid time"),
    );
    let samples = vec![
        BiometricsSample {
            hrv_ms: Some(40.0),
            ..bio(last_moment)
        },
        BiometricsSample {
            hrv_ms: Some(90.0),
            ..bio(one_second_after)
        },
    ];
    let agg = WeeklyAggregator::aggregate_weekly(CLIENT, week(), &samples, &[], &[], &[]);
    assert_eq!(agg.hrv_avg, Some(40.0));
}

#[test]
fn test_means_cover_only_present_samples_never_zero_filled() {
    let samples = vec![
        BiometricsSample {
            sleep_hours: Some(8.0),
            hrv_ms: Some(60.0),
            ..bio(at(week(), 7, 0, 0))
        },
        BiometricsSample {
            sleep_hours: Some(6.0),
            hrv_ms: None,
            ..bio(at(week() + Duration::days(1), 7, 0, 0))
        },
    ];
    let agg = WeeklyAggregator::aggregate_weekly(CLIENT, week(), &samples, &[], &[], &[]);
    assert_eq!(agg.sleep_avg, Some(7.0));
    // The absent HRV on day two must not drag the mean toward zero
    assert_eq!(agg.hrv_avg, Some(60.0));
    assert_eq!(agg.steps_avg, None);
}

#[test]
fn test_empty_inputs_produce_fully_absent_aggregate() {
    let agg = WeeklyAggregator::aggregate_weekly(CLIENT, week(), &[], &[], &[], &[]);
    assert_eq!(agg.hrv_avg, None);
    assert_eq!(agg.energy_avg, None);
    assert_eq!(agg.digestion.bloating_avg, None);
    assert_eq!(agg.cycle.modal_cycle_day, None);
    assert_eq!(agg.training.strength_sessions, 0);
    assert!(agg.training.total_volume_load.abs() < f64::EPSILON);
    assert_eq!(agg.body.weight_delta_kg, None);
}

#[test]
fn test_cycle_summary_modal_day_and_menstrual_count() {
    let mut checks = Vec::new();
    for (day_offset, cycle_day, menstrual) in [
        (0, Some(2), true),
        (1, Some(3), true),
        (2, Some(3), false),
        (3, None, false),
    ] {
        let mut sample = check_in(at(week() + Duration::days(day_offset), 8, 0, 0));
        sample.cycle = Some(CycleReport {
            cycle_day,
            pms_severity: Some(2.0),
            menstrual_day: menstrual,
        });
        checks.push(sample);
    }
    let agg = WeeklyAggregator::aggregate_weekly(CLIENT, week(), &[], &checks, &[], &[]);
    assert_eq!(agg.cycle.modal_cycle_day, Some(3));
    assert_eq!(agg.cycle.menstrual_days, 2);
    assert_eq!(agg.cycle.pms_severity_avg, Some(2.0));
}

#[test]
fn test_cycle_modal_day_tie_resolves_to_smaller_day() {
    let mut checks = Vec::new();
    for (day_offset, cycle_day) in [(0, 14), (1, 3), (2, 14), (3, 3)] {
        let mut sample = check_in(at(week() + Duration::days(day_offset), 8, 0, 0));
        sample.cycle = Some(CycleReport {
            cycle_day: Some(cycle_day),
            pms_severity: None,
            menstrual_day: false,
        });
        checks.push(sample);
    }
    let agg = WeeklyAggregator::aggregate_weekly(CLIENT, week(), &[], &checks, &[], &[]);
    assert_eq!(agg.cycle.modal_cycle_day, Some(3));
}

#[test]
fn test_training_summary_counts_volume_and_rpe() {
    let logs = vec![
        TrainingLog {
            rpe: Some(8.0),
            ..strength(at(week(), 17, 0, 0), Some(5000.0))
        },
        // Absent volume load contributes zero to the sum
        strength(at(week() + Duration::days(2), 17, 0, 0), None),
        TrainingLog {
            session_type: SessionType::Cardio,
            rpe: Some(6.0),
            ..strength(at(week() + Duration::days(4), 17, 0, 0), Some(0.0))
        },
    ];
    let agg = WeeklyAggregator::aggregate_weekly(CLIENT, week(), &[], &[], &logs, &[]);
    assert_eq!(agg.training.strength_sessions, 2);
    assert_eq!(agg.training.cardio_sessions, 1);
    assert!((agg.training.total_volume_load - 5000.0).abs() < f64::EPSILON);
    assert_eq!(agg.training.rpe_avg, Some(7.0));
}

#[test]
fn test_weight_delta_requires_two_readings() {
    let one = vec![BodyMetrics {
        client_id: CLIENT.to_owned(),
        timestamp: at(week(), 7, 0, 0),
        weight_kg: Some(70.0),
        body_fat_percent: None,
        waist_cm: None,
    }];
    let agg = WeeklyAggregator::aggregate_weekly(CLIENT, week(), &[], &[], &[], &one);
    assert_eq!(agg.body.weight_delta_kg, None);

    let mut two = one;
    two.push(BodyMetrics {
        client_id: CLIENT.to_owned(),
        timestamp: at(week() + Duration::days(5), 7, 0, 0),
        weight_kg: Some(69.2),
        body_fat_percent: None,
        waist_cm: None,
    });
    let agg = WeeklyAggregator::aggregate_weekly(CLIENT, week(), &[], &[], &[], &two);
    let delta = agg.body.weight_delta_kg.expect("two readings present");
    assert!((delta - (-0.8)).abs() < 1e-9);
}

#[test]
fn test_strength_trend_requires_two_loaded_sessions() {
    let single = vec![strength(at(week(), 17, 0, 0), Some(4000.0))];
    let agg = WeeklyAggregator::aggregate_weekly(CLIENT, week(), &[], &[], &single, &[]);
    assert_eq!(agg.body.strength_trend_percent, None);

    let rising = vec![
        strength(at(week(), 17, 0, 0), Some(4000.0)),
        strength(at(week() + Duration::days(2), 17, 0, 0), Some(4200.0)),
        strength(at(week() + Duration::days(4), 17, 0, 0), Some(4400.0)),
    ];
    let agg = WeeklyAggregator::aggregate_weekly(CLIENT, week(), &[], &[], &rising, &[]);
    let trend = agg.body.strength_trend_percent.expect("trend present");
    // Slope 200 per session over mean 4200 => ~4.76% per session
    assert!((trend - 200.0 / 4200.0 * 100.0).abs() < 1e-9);
}

#[test]
fn test_baseline_hrv_median_even_count() {
    let now = at(week(), 12, 0, 0);
    let samples: Vec<BiometricsSample> = [10.0, 20.0, 30.0, 40.0]
        .iter()
        .enumerate()
        .map(|(i, &hrv)| BiometricsSample {
            hrv_ms: Some(hrv),
            ..bio(now - Duration::days(i as i64 + 1))
        })
        .collect();
    let baseline = WeeklyAggregator::compute_baseline_stats(now, &samples, &[]);
    assert!((baseline.hrv_median - 25.0).abs() < f64::EPSILON);
}

#[test]
fn test_baseline_defaults_when_window_empty() {
    let now = at(week(), 12, 0, 0);
    // Samples older than the 42-day window must not contribute
    let stale = vec![BiometricsSample {
        hrv_ms: Some(90.0),
        resting_hr_bpm: Some(40.0),
        ..bio(now - Duration::days(60))
    }];
    let baseline = WeeklyAggregator::compute_baseline_stats(now, &stale, &[]);
    assert!((baseline.hrv_median - 50.0).abs() < f64::EPSILON);
    assert!((baseline.rhr_avg - 65.0).abs() < f64::EPSILON);
    assert!(baseline.volume_load_avg.abs() < f64::EPSILON);
}

#[test]
fn test_baseline_volume_uses_strength_sessions_only() {
    let now = at(week(), 12, 0, 0);
    let logs = vec![
        strength(now - Duration::days(3), Some(4000.0)),
        strength(now - Duration::days(10), Some(6000.0)),
        TrainingLog {
            session_type: SessionType::Cardio,
            ..strength(now - Duration::days(5), Some(100_000.0))
        },
    ];
    let baseline = WeeklyAggregator::compute_baseline_stats(now, &[], &logs);
    assert!((baseline.volume_load_avg - 5000.0).abs() < f64::EPSILON);
    assert!((baseline.strength_baseline - 5000.0).abs() < f64::EPSILON);
}

#[test]
fn test_sufficiency_threshold_at_three_signals() {
    let samples = vec![BiometricsSample {
        hrv_ms: Some(50.0),
        resting_hr_bpm: Some(60.0),
        sleep_hours: Some(7.5),
        ..bio(at(week(), 7, 0, 0))
    }];
    let agg = WeeklyAggregator::aggregate_weekly(CLIENT, week(), &samples, &[], &[], &[]);
    assert_eq!(WeeklyAggregator::present_signal_count(&agg), 3);
    assert!(WeeklyAggregator::has_sufficient_data(&agg, 3));

    let thin = vec![BiometricsSample {
        hrv_ms: Some(50.0),
        resting_hr_bpm: Some(60.0),
        ..bio(at(week(), 7, 0, 0))
    }];
    let agg = WeeklyAggregator::aggregate_weekly(CLIENT, week(), &thin, &[], &[], &[]);
    assert!(!WeeklyAggregator::has_sufficient_data(&agg, 3));
}
