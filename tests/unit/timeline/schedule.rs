use super::*;

#[test]
fn zero_frames_is_invalid() {
    let err = DurationScheduler::default().schedule(0).unwrap_err();
    assert!(matches!(err, ReelError::InvalidInput(_)));
}

#[test]
fn single_frame_gets_only_the_hold() {
    let plan = DurationScheduler::default().schedule(1).unwrap();
    assert_eq!(plan.as_slice(), &[3000]);
}

#[test]
fn plan_length_matches_frame_count_and_all_positive() {
    let sched = DurationScheduler::default();
    for k in 1..=400 {
        let plan = sched.schedule(k).unwrap();
        assert_eq!(plan.len(), k);
        assert!(plan.as_slice().iter().all(|d| *d >= 20));
        assert_eq!(plan.hold_ms(), 3000);
    }
}

#[test]
fn budget_grows_only_past_threshold() {
    let sched = DurationScheduler::default();
    assert_eq!(sched.base_budget_ms(2), 5000);
    assert_eq!(sched.base_budget_ms(100), 5000);
    assert_eq!(sched.base_budget_ms(101), 5030);
    assert_eq!(sched.base_budget_ms(300), 11_000);
}

#[test]
fn hundred_and_one_frames_play_in_eight_seconds() {
    let plan = DurationScheduler::default().schedule(101).unwrap();
    assert_eq!(plan.as_slice()[0], 50);
    assert_eq!(plan.total_ms(), 100 * 50 + 3000);
}

#[test]
fn hold_is_independent_of_budget() {
    let timing = TimingConfig {
        hold_ms: 1234,
        ..TimingConfig::default()
    };
    let sched = DurationScheduler::new(timing).unwrap();
    for k in [2, 50, 101, 500] {
        let plan = sched.schedule(k).unwrap();
        assert_eq!(plan.hold_ms(), 1234);
        assert_ne!(plan.as_slice()[0], 1234);
    }
}

#[test]
fn floor_applies_when_budget_is_spread_thin() {
    let timing = TimingConfig {
        base_budget_ms: 100,
        growth_per_frame_ms: 0,
        ..TimingConfig::default()
    };
    let plan = DurationScheduler::new(timing).unwrap().schedule(50).unwrap();
    assert_eq!(plan.as_slice()[0], 20);
}

#[test]
fn invalid_timing_is_rejected() {
    let timing = TimingConfig {
        floor_ms: 0,
        ..TimingConfig::default()
    };
    assert!(DurationScheduler::new(timing).is_err());
}
