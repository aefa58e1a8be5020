use super::*;

fn write(dir: &std::path::Path, name: &str, body: &str) {
    std::fs::write(dir.join(name), body).unwrap();
}

#[test]
fn reads_newest_points_for_symbol() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "BTC.json",
        r#"[{"label":"d1","value":1.0},{"label":"d2","value":2.0},{"label":"d3","value":3.0}]"#,
    );
    let src = JsonFileSource::new(dir.path());
    let s = src.fetch(&SeriesRequest::new("btc", 2)).unwrap();
    assert_eq!(s.len(), 2);
    assert_eq!(s.points()[0].label, "d2");

    let all = src.fetch(&SeriesRequest::new("BTC", 365)).unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn missing_malformed_and_empty_files_are_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "BAD.json", "{ not json");
    write(dir.path(), "EMPTY.json", "[]");
    let src = JsonFileSource::new(dir.path());
    for sym in ["NOPE", "BAD", "EMPTY"] {
        let err = src.fetch(&SeriesRequest::new(sym, 10)).unwrap_err();
        assert!(matches!(err, ReelError::DataUnavailable(_)), "{sym}: {err}");
    }
}

#[test]
fn zero_lookback_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let err = JsonFileSource::new(dir.path())
        .fetch(&SeriesRequest::new("BTC", 0))
        .unwrap_err();
    assert!(matches!(err, ReelError::InvalidInput(_)));
}
