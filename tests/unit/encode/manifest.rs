use super::*;

fn plan(durations: &[u64]) -> DurationPlan {
    DurationPlan::new(durations.to_vec(), 1).unwrap()
}

fn assets(n: usize) -> Vec<PathBuf> {
    (0..n)
        .map(|i| PathBuf::from(format!("/tmp/run/frame_{i:04}.png")))
        .collect()
}

#[test]
fn mismatched_lengths_are_invalid() {
    let b = ManifestBuilder::new();
    for (frames, durations) in [(0usize, vec![50u64]), (1, vec![50, 3000]), (3, vec![50, 3000])] {
        let err = b.build(assets(frames), &plan(&durations)).unwrap_err();
        assert!(matches!(err, ReelError::InvalidInput(_)), "{frames} vs {durations:?}");
    }
}

#[test]
fn entries_preserve_order_and_duration() {
    let m = ManifestBuilder::new()
        .build(assets(3), &plan(&[50, 50, 3000]))
        .unwrap();
    assert_eq!(m.len(), 3);
    assert_eq!(m.entries()[2].asset, PathBuf::from("/tmp/run/frame_0002.png"));
    assert_eq!(m.entries()[2].duration_ms, 3000);
    assert_eq!(m.entries()[0].duration_secs(), 0.05);
    assert_eq!(m.total_ms(), 3100);
}

#[test]
fn concat_script_matches_demuxer_format() {
    let m = ManifestBuilder::new()
        .build(assets(2), &plan(&[46, 3000]))
        .unwrap();
    assert_eq!(
        m.to_concat_script(),
        "file '/tmp/run/frame_0000.png'\n\
         duration 0.046000\n\
         file '/tmp/run/frame_0001.png'\n\
         duration 3.000000\n\
         file '/tmp/run/frame_0001.png'\n"
    );
}

#[test]
fn seconds_are_formatted_exactly() {
    assert_eq!(format_secs(1), "0.001000");
    assert_eq!(format_secs(20), "0.020000");
    assert_eq!(format_secs(1234), "1.234000");
    assert_eq!(format_secs(120_000), "120.000000");
}

#[test]
fn paths_are_escaped_for_single_quotes() {
    assert_eq!(
        escape_concat_path(Path::new(r"C:\tmp\frame.png")),
        "C:/tmp/frame.png"
    );
    assert_eq!(
        escape_concat_path(Path::new("/tmp/it's/frame.png")),
        r"/tmp/it'\''s/frame.png"
    );
}

#[test]
fn write_to_persists_script() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concat_list.txt");
    let m = ManifestBuilder::new().build(assets(1), &plan(&[3000])).unwrap();
    m.write_to(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), m.to_concat_script());
}
