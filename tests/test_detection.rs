use std::time::Duration;
use image::{Rgb, RgbImage};
use lpr_stream::error::SourceError;
use lpr_stream::frame_io::{ImageDirSink, ImageDirSource, SkipAheadSource};
use lpr_stream::recognition::TextFragment;
use lpr_stream::stream_runner::StreamState;

use doubles::*;

#[test]
fn non_empty_reading_replaces_plate_and_empty_keeps_it() {
    let scorer = ScriptedScorer::new(vec![
        plate_at(32., 32., 20., 10., 0.9),
        plate_at(32., 32., 20., 10., 0.9),
        plate_at(32., 32., 20., 10., 0.9),
    ]);
    let ocr = ScriptedOcr::reading(&["abc 123", "", "xy-9"]);
    let mut stream = lpr_stream::init_stream(&config(), scorer, ocr).unwrap();
    let mut sink = CollectSink::default();

    let summary = stream.run(&mut VecSource::frames(3), &mut sink);

    assert_eq!(summary.frames, 3);
    assert_eq!(sink.plates(), vec!["ABC123", "ABC123", "XY9"]);
    assert_eq!(sink.reports[1].2.reading, "");
    assert_eq!(stream.plate().plate(), "XY9");
    assert_eq!(stream.plate().frame_index(), Some(2));
    assert_eq!(summary.plate, *stream.plate());
}

#[test]
fn crop_is_padded_top_detection() {
    // x 22..42, y 27..37 padded by 3 px
    let scorer = ScriptedScorer::new(vec![plate_at(32., 32., 20., 10., 0.9)]);
    let mut stream = lpr_stream::init_stream(&config(), scorer, ScriptedOcr::reading(&["A1"])).unwrap();
    let mut sink = CollectSink::default();

    stream.run(&mut VecSource::frames(1), &mut sink);

    let crop = sink.reports[0].2.crop.as_ref().unwrap();
    assert_eq!((crop.x, crop.y, crop.width(), crop.height()), (19, 24, 26, 16));
    assert_eq!(stream.reader().engine().crops, vec![(26, 16)]);
}

#[test]
fn recognition_failure_keeps_plate() {
    let scorer = ScriptedScorer::new(vec![plate_at(32., 32., 20., 10., 0.9); 2]);
    let ocr = ScriptedOcr::with_results(vec![
        Ok(vec![TextFragment::new("ab", 0.9), TextFragment::new("12", 0.8)]),
        Err(anyhow::anyhow!("engine timed out")),
    ]);
    let mut stream = lpr_stream::init_stream(&config(), scorer, ocr).unwrap();
    let mut sink = CollectSink::default();

    stream.run(&mut VecSource::frames(2), &mut sink);

    assert_eq!(sink.plates(), vec!["AB12", "AB12"]);
    assert_eq!(stream.plate().frame_index(), Some(0));
}

#[test]
fn out_of_bounds_detection_yields_no_crop() {
    let scorer = ScriptedScorer::new(vec![plate_at(-50., -50., 20., 10., 0.9), plate_at(200., 30., 40., 10., 0.8)]);
    let mut stream = lpr_stream::init_stream(&config(), scorer, ScriptedOcr::reading(&["NEVER"])).unwrap();
    let mut sink = CollectSink::default();

    let summary = stream.run(&mut VecSource::frames(2), &mut sink);

    assert_eq!(summary.frames, 2);
    for (_, _, report) in &sink.reports {
        assert_eq!(report.detections.len(), 1);
        assert!(report.crop.is_none());
    }
    assert!(stream.reader().engine().crops.is_empty());
    assert!(stream.plate().is_empty());
}

#[test]
fn frame_sized_detection_crops_the_whole_frame() {
    let scorer = ScriptedScorer::new(vec![plate_at(32., 32., 64., 64., 0.9)]);
    let mut stream = lpr_stream::init_stream(&config(), scorer, ScriptedOcr::reading(&["FULL"])).unwrap();
    let mut sink = CollectSink::default();

    stream.run(&mut VecSource::frames(1), &mut sink);

    assert_eq!(stream.reader().engine().crops, vec![(64, 64)]);
    assert_eq!(stream.plate().plate(), "FULL");
}

#[test]
fn model_output_errors_do_not_stop_the_stream() {
    let scorer = ScriptedScorer::new(vec![
        plate_at(32., 32., 20., 10., 0.9),
        None,
        bad_shape(),
        plate_at(32., 32., 20., 10., 0.9),
    ]);
    let mut stream = lpr_stream::init_stream(&config(), scorer, ScriptedOcr::reading(&["AB1", "CD2"])).unwrap();
    let mut sink = CollectSink::default();

    let summary = stream.run(&mut VecSource::frames(4), &mut sink);

    assert_eq!(summary.frames, 4);
    assert_eq!(sink.plates(), vec!["AB1", "AB1", "AB1", "CD2"]);
    assert!(sink.reports[1].2.detections.is_empty());
    assert!(sink.reports[2].2.detections.is_empty());
}

#[test]
fn invalid_frame_is_skipped() {
    let mut source = VecSource::from_items(vec![
        Ok(RgbImage::from_pixel(SIDE, SIDE, Rgb([0, 0, 0]))),
        Ok(RgbImage::new(0, 0)),
        Ok(RgbImage::from_pixel(SIDE, SIDE, Rgb([2, 0, 0]))),
    ]);
    // the empty frame never reaches the scorer
    let scorer = ScriptedScorer::new(vec![plate_at(32., 32., 20., 10., 0.9), plate_at(32., 32., 20., 10., 0.9)]);
    let mut stream = lpr_stream::init_stream(&config(), scorer, ScriptedOcr::reading(&["AB1", "CD2"])).unwrap();
    let mut sink = CollectSink::default();

    let summary = stream.run(&mut source, &mut sink);

    assert_eq!(summary.frames, 3);
    assert_eq!(sink.plates(), vec!["AB1", "AB1", "CD2"]);
    assert!(sink.reports[1].2.crop.is_none());
}

#[test]
fn max_frames_bounds_the_run() {
    let mut stream = lpr_stream::init_stream(&config().with_max_frames(3), ScriptedScorer::new(vec![]), ScriptedOcr::default()).unwrap();
    let mut source = VecSource::frames(10);
    let mut sink = CollectSink::default();

    let summary = stream.run(&mut source, &mut sink);

    assert_eq!(summary.frames, 3);
    assert_eq!(source.frames.len(), 7);
    assert!(!summary.stopped_by_sink);
}

#[test]
fn sink_can_stop_the_stream() {
    let mut stream = lpr_stream::init_stream(&config(), ScriptedScorer::new(vec![]), ScriptedOcr::default()).unwrap();
    let mut sink = CollectSink {
        stop_after: Some(2),
        ..Default::default()
    };

    let summary = stream.run(&mut VecSource::frames(5), &mut sink);

    assert_eq!(summary.frames, 2);
    assert!(summary.stopped_by_sink);
    assert_eq!(stream.state(), StreamState::Idle);
}

#[test]
fn sink_errors_are_not_fatal() {
    let mut stream = lpr_stream::init_stream(&config(), ScriptedScorer::new(vec![]), ScriptedOcr::default()).unwrap();
    let mut sink = CollectSink {
        fail: true,
        ..Default::default()
    };

    assert_eq!(stream.run(&mut VecSource::frames(4), &mut sink).frames, 4);
}

#[test]
fn frame_time_includes_the_sink() {
    let mut stream = lpr_stream::init_stream(&config(), ScriptedScorer::new(vec![]), ScriptedOcr::default()).unwrap();
    let mut sink = CollectSink {
        delay: Duration::from_millis(25),
        ..Default::default()
    };

    let summary = stream.run(&mut VecSource::frames(3), &mut sink);

    assert!(summary.avg_latency >= Duration::from_millis(25));
    assert!(summary.last_metrics.fps > 0. && summary.last_metrics.fps <= 40.);
    assert_eq!(stream.last_metrics(), summary.last_metrics);

    // each report carries the previous frame's timing
    assert_eq!(sink.reports[0].2.metrics.fps, 0.);
    for (_, _, report) in &sink.reports[1..] {
        assert!(report.metrics.fps > 0. && report.metrics.fps <= 40.);
    }
}

#[test]
fn read_error_ends_the_run() {
    let mut source = VecSource::from_items(vec![
        Ok(RgbImage::new(SIDE, SIDE)),
        Err(SourceError::Read("stream dropped".to_string())),
        Ok(RgbImage::new(SIDE, SIDE)),
    ]);
    let mut stream = lpr_stream::init_stream(&config(), ScriptedScorer::new(vec![]), ScriptedOcr::default()).unwrap();
    let mut sink = CollectSink::default();

    assert_eq!(stream.run(&mut source, &mut sink).frames, 1);
}

#[test]
fn frame_indices_continue_across_runs() {
    let mut stream = lpr_stream::init_stream(&config(), ScriptedScorer::new(vec![]), ScriptedOcr::default()).unwrap();
    assert_eq!(stream.state(), StreamState::Idle);

    let mut sink = CollectSink::default();
    stream.run(&mut VecSource::frames(2), &mut sink);
    stream.run(&mut VecSource::frames(2), &mut sink);

    let indices: Vec<u64> = sink.reports.iter().map(|(i, _, _)| *i).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
}

#[test]
fn skip_ahead_source_delivers_frames_in_order() {
    let mut stream = lpr_stream::init_stream(&config(), ScriptedScorer::new(vec![]), ScriptedOcr::default()).unwrap();
    let mut source = SkipAheadSource::spawn(VecSource::frames(6), 32);
    let mut sink = CollectSink::default();

    let summary = stream.run(&mut source, &mut sink);

    assert_eq!(summary.frames, 6);
    let tags: Vec<u8> = sink.reports.iter().map(|(_, t, _)| *t).collect();
    assert_eq!(tags, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(source.dropped(), 0);
}

#[test]
fn image_directory_round_trip() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    for i in 0..3u8 {
        RgbImage::from_pixel(SIDE, SIDE, Rgb([i, 0, 0]))
            .save(input.path().join(format!("{}.png", i)))
            .unwrap();
    }

    let scorer = ScriptedScorer::new(vec![plate_at(32., 32., 20., 10., 0.9)]);
    let mut stream = lpr_stream::init_stream(&config(), scorer, ScriptedOcr::reading(&["QW 12"])).unwrap();
    let mut source = ImageDirSource::new(input.path()).unwrap();
    let mut sink = ImageDirSink::new(output.path(), true).unwrap();

    let summary = stream.run(&mut source, &mut sink);

    assert_eq!(summary.frames, 3);
    assert_eq!(summary.plate.plate(), "QW12");
    for i in 0..3 {
        assert!(sink.frame_path(i).is_file());
    }
    assert!(sink.crop_path(0).is_file());
    assert!(!sink.crop_path(1).exists());

    let annotated = image::open(sink.frame_path(0)).unwrap().to_rgb8();
    assert_eq!(annotated.get_pixel(22, 27), &Rgb([0, 255, 0]));
}
