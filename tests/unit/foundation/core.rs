use super::*;

fn series(values: &[f64]) -> SeriesModel {
    SeriesModel::new(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| SeriesPoint::new(format!("d{i}"), *v))
            .collect(),
    )
    .unwrap()
}

#[test]
fn series_rejects_empty_and_non_finite() {
    assert!(matches!(
        SeriesModel::new(vec![]),
        Err(ReelError::InvalidInput(_))
    ));
    assert!(matches!(
        SeriesModel::new(vec![SeriesPoint::new("a", f64::NAN)]),
        Err(ReelError::InvalidInput(_))
    ));
}

#[test]
fn series_from_columns_checks_lengths() {
    let err = SeriesModel::from_columns(vec!["a".into()], vec![1.0, 2.0]).unwrap_err();
    assert!(err.to_string().contains("1 labels, 2 values"));

    let s = SeriesModel::from_columns(vec!["a".into(), "b".into()], vec![1.0, 2.0]).unwrap();
    assert_eq!(s.len(), 2);
    assert_eq!(s.point(FrameIndex(1)).unwrap().label, "b");
}

#[test]
fn value_range_spans_all_points() {
    let s = series(&[3.0, -1.0, 7.5, 2.0]);
    let r = s.value_range();
    assert_eq!(r.min, -1.0);
    assert_eq!(r.max, 7.5);
    assert_eq!(r.span(), 8.5);
}

#[test]
fn tail_keeps_newest_points() {
    let s = series(&[1.0, 2.0, 3.0, 4.0]).tail(2).unwrap();
    assert_eq!(s.values().collect::<Vec<_>>(), vec![3.0, 4.0]);
    assert_eq!(series(&[1.0]).tail(10).unwrap().len(), 1);
    assert!(series(&[1.0]).tail(0).is_err());
}

#[test]
fn frame_set_enforces_order_and_final_index() {
    let ok = FrameSet::new(vec![FrameIndex(0), FrameIndex(2), FrameIndex(4)], 5).unwrap();
    assert_eq!(ok.last(), FrameIndex(4));

    assert!(FrameSet::new(vec![], 5).is_err());
    assert!(FrameSet::new(vec![FrameIndex(0), FrameIndex(3)], 5).is_err());
    assert!(FrameSet::new(vec![FrameIndex(2), FrameIndex(2), FrameIndex(4)], 5).is_err());
}

#[test]
fn duration_plan_rejects_entries_below_floor() {
    assert!(DurationPlan::new(vec![], 20).is_err());
    assert!(DurationPlan::new(vec![50, 19, 3000], 20).is_err());
    assert!(DurationPlan::new(vec![0], 0).is_err());

    let plan = DurationPlan::new(vec![50, 50, 3000], 20).unwrap();
    assert_eq!(plan.total_ms(), 3100);
    assert_eq!(plan.hold_ms(), 3000);
}

#[test]
fn value_range_rejects_inverted_bounds() {
    assert!(ValueRange::new(2.0, 1.0).is_err());
    assert!(ValueRange::new(1.0, f64::INFINITY).is_err());
    assert!(ValueRange::new(1.0, 1.0).is_ok());
}
