use super::*;
use crate::foundation::core::SeriesPoint;

struct NoSource;
impl SeriesSource for NoSource {
    fn fetch(&self, request: &SeriesRequest) -> ReelResult<SeriesModel> {
        Err(ReelError::invalid_input(format!("no data for {}", request.symbol)))
    }
}

struct NoRender;
impl FrameRenderer for NoRender {
    fn render_frame(&self, _req: &FrameRequest<'_>, _out_path: &Path) -> ReelResult<()> {
        Err(ReelError::render("not used"))
    }
}

struct NoEncode;
impl Encoder for NoEncode {
    fn encode(&self, _job: &EncodeJob) -> ReelResult<()> {
        Err(ReelError::encoding_failed("exit status: 1", "not used"))
    }
}

fn pipeline() -> Pipeline {
    Pipeline::new(
        AppConfig::default(),
        Box::new(NoSource),
        Box::new(NoRender),
        Box::new(NoEncode),
    )
    .unwrap()
}

fn ramp(n: usize) -> SeriesModel {
    SeriesModel::new(
        (0..n)
            .map(|i| SeriesPoint::new(format!("d{i}"), i as f64))
            .collect(),
    )
    .unwrap()
}

#[test]
fn plan_for_a_year_of_daily_points() {
    let plan = pipeline().plan_series(&ramp(365)).unwrap();
    assert_eq!(plan.frames.len(), 101);
    assert_eq!(plan.frames.last().0, 364);
    assert_eq!(plan.durations.len(), 101);
    assert_eq!(plan.total_ms, 8000);
    assert_eq!(plan.frequencies_hz.len(), 101);
    assert_eq!(plan.frequencies_hz[0], 220.0);
    assert_eq!(plan.frequencies_hz[100], 880.0);
}

#[test]
fn plan_serializes_to_json() {
    let plan = pipeline().plan_series(&ramp(3)).unwrap();
    let v = serde_json::to_value(&plan).unwrap();
    assert_eq!(v["total_ms"], 8000);
    assert_eq!(v["frequencies_hz"].as_array().unwrap().len(), 3);
}

#[test]
fn fetch_errors_are_reported_as_unavailable() {
    let out = pipeline().run(&SeriesRequest::new("BTC", 365));
    assert_eq!(out.final_state(), PipelineState::Failed);
    let failure = out.failure().unwrap();
    assert_eq!(failure.kind, ErrorKind::DataUnavailable);
    assert_eq!(failure.stage, PipelineState::Idle);
    assert!(out.artifact().is_none());
}

#[test]
fn renderer_failure_stops_while_synthesizing() {
    let out = pipeline().run_series("BTC", &ramp(5));
    let failure = out.failure().unwrap();
    assert_eq!(failure.kind, ErrorKind::Internal);
    assert_eq!(failure.stage, PipelineState::Synthesizing);
}

#[test]
fn blank_symbol_is_invalid() {
    let out = pipeline().run_series("  ", &ramp(5));
    let failure = out.failure().unwrap();
    assert_eq!(failure.kind, ErrorKind::InvalidInput);
    assert_eq!(failure.stage, PipelineState::Idle);
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = AppConfig::default();
    cfg.render.width = 999;
    assert!(
        Pipeline::new(cfg, Box::new(NoSource), Box::new(NoRender), Box::new(NoEncode)).is_err()
    );
}

#[test]
fn file_stem_replaces_unsafe_characters() {
    assert_eq!(file_stem("BTC"), "BTC");
    assert_eq!(file_stem(" a/b c "), "a_b_c");
}

#[test]
fn state_names() {
    assert_eq!(PipelineState::ManifestReady.to_string(), "manifest-ready");
    assert_eq!(PipelineState::Failed.to_string(), "failed");
}

fn pipeline_writing_to(dir: &Path) -> Pipeline {
    let mut cfg = AppConfig::default();
    cfg.output.dir = dir.to_path_buf();
    Pipeline::new(cfg, Box::new(NoSource), Box::new(NoRender), Box::new(NoEncode)).unwrap()
}

#[test]
fn publish_gives_every_run_its_own_file() {
    let scratch = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let p = pipeline_writing_to(out.path());

    let mut published = Vec::new();
    for n in 0..3 {
        let encoded = scratch.path().join(format!("out{n}.mp4"));
        std::fs::write(&encoded, format!("video-{n}")).unwrap();
        published.push(p.publish("BTC", &encoded).unwrap());
    }

    for (n, path) in published.iter().enumerate() {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("BTC_") && name.ends_with(".mp4"), "{name}");
        assert_eq!(std::fs::read_to_string(path).unwrap(), format!("video-{n}"));
    }
    assert_ne!(published[0], published[1]);
    assert_ne!(published[1], published[2]);
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 3);
}

#[test]
fn failed_publish_leaves_no_partial_file() {
    let scratch = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let p = pipeline_writing_to(out.path());

    // A directory can be neither renamed over the reserved file nor copied into it.
    let not_a_video = scratch.path().join("out.mp4");
    std::fs::create_dir(&not_a_video).unwrap();

    assert!(p.publish("BTC", &not_a_video).is_err());
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}
