use super::*;

fn indices(set: &FrameSet) -> Vec<usize> {
    set.iter().map(|f| f.0).collect()
}

#[test]
fn empty_series_is_invalid() {
    let err = FrameSampler::default().sample(0).unwrap_err();
    assert!(matches!(err, ReelError::InvalidInput(_)));
}

#[test]
fn single_point_yields_single_frame() {
    let set = FrameSampler::default().sample(1).unwrap();
    assert_eq!(indices(&set), vec![0]);
}

#[test]
fn short_series_keeps_every_point() {
    let set = FrameSampler::default().sample(7).unwrap();
    assert_eq!(indices(&set), vec![0, 1, 2, 3, 4, 5, 6]);
}

#[test]
fn year_of_daily_points_is_bounded_and_ends_on_last_point() {
    let set = FrameSampler::default().sample(365).unwrap();
    assert!(set.len() <= 101, "got {} frames", set.len());
    assert_eq!(set.last(), FrameIndex(364));
    assert_eq!(set.as_slice()[0], FrameIndex(0));
}

#[test]
fn every_length_is_strictly_increasing_and_ends_on_last_point() {
    let sampler = FrameSampler::new(100).unwrap();
    for n in (1..=600).chain([1_999, 2_000, 2_001, 20_000]) {
        let set = sampler.sample(n).unwrap();
        let v = indices(&set);
        assert_eq!(*v.last().unwrap(), n - 1, "n={n}");
        assert!(v.windows(2).all(|w| w[0] < w[1]), "n={n}");
        assert!(v.len() <= 101, "n={n} frames={}", v.len());
    }
}

#[test]
fn custom_target_changes_density() {
    let set = FrameSampler::new(10).unwrap().sample(1000).unwrap();
    assert_eq!(
        indices(&set),
        vec![0, 100, 200, 300, 400, 500, 600, 700, 800, 900, 999]
    );
    assert!(FrameSampler::new(0).is_err());
}
