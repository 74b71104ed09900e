use lpr_stream::detection_runners::PlateDetector;
use lpr_stream::region_extractor::RegionExtractor;

use doubles::*;

#[test]
fn plate_survives_ten_frames_without_detections() {
    let mut outputs = vec![plate_at(32., 32., 20., 10., 0.9)];
    outputs.extend(std::iter::repeat_with(no_plate).take(10));
    let mut stream = lpr_stream::init_stream(&config(), ScriptedScorer::new(outputs), ScriptedOcr::reading(&["ABC123"])).unwrap();
    let mut sink = CollectSink::default();

    let summary = stream.run(&mut VecSource::frames(11), &mut sink);

    assert_eq!(summary.frames, 11);
    assert_eq!(sink.plates(), vec!["ABC123"; 11]);
    for (_, _, report) in &sink.reports[1..] {
        assert!(report.detections.is_empty());
        assert!(report.crop.is_none());
        assert!(report.reading.is_empty());
    }
    assert_eq!(stream.reader().engine().crops.len(), 1);
    assert_eq!(stream.plate().frame_index(), Some(0));
}

#[test]
fn nothing_detected_leaves_plate_empty() {
    let mut stream = lpr_stream::init_stream(&config(), ScriptedScorer::new(vec![]), ScriptedOcr::reading(&["UNUSED"])).unwrap();
    let mut sink = CollectSink::default();

    let summary = stream.run(&mut VecSource::frames(5), &mut sink);

    assert!(summary.plate.is_empty());
    assert_eq!(summary.plate.frame_index(), None);
    assert!(stream.reader().engine().crops.is_empty());
    assert!(summary.last_metrics.fps >= 0.);
}

#[test]
fn candidates_below_score_threshold_are_dropped() {
    let scorer = ScriptedScorer::new(vec![plate_at(32., 32., 20., 10., 0.05)]);
    let mut detector = PlateDetector::new(scorer, &config());
    let frame = image::RgbImage::new(SIDE, SIDE);

    let inference = detector.infer(&frame).unwrap();

    assert!(inference.detections.is_empty());
    assert_eq!(inference.ratio, 1.);
    assert!(RegionExtractor::default().extract(&inference.detections, &frame).is_none());
}

#[test]
fn raised_threshold_turns_detection_into_no_detection() {
    let config = config().with_score_thr(0.95);
    let mut stream = lpr_stream::init_stream(
        &config,
        ScriptedScorer::new(vec![plate_at(32., 32., 20., 10., 0.9)]),
        ScriptedOcr::reading(&["AB1"]),
    )
    .unwrap();
    let mut sink = CollectSink::default();

    stream.run(&mut VecSource::frames(1), &mut sink);

    assert!(sink.reports[0].2.detections.is_empty());
    assert!(stream.plate().is_empty());
}
