use std::time::{Duration, Instant};
use crate::common::{DetectionSet, FrameMetrics, LprFrame, PlateState};
use crate::data::TimeCalc;
use crate::detection_runners::{PlateDetector, Scorer};
use crate::error::DetectError;
use crate::frame_io::{FrameReport, FrameSink, FrameSource, SinkControl};
use crate::recognition::{OcrEngine, PlateReader};
use crate::region_extractor::RegionExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Frames are being processed.
    Detecting,
    /// No source attached, or the last run has ended.
    Idle,
}

/// Outcome of [`PlateStream::run`].
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub frames: u64,
    pub plate: PlateState,
    /// Average end-to-end frame time over the run.
    pub avg_latency: Duration,
    pub last_metrics: FrameMetrics,
    /// The sink asked to stop before the source ran out.
    pub stopped_by_sink: bool,
}

/// The per-frame driver: detect, crop, read, and keep the displayed plate stable.
///
/// The stream is the single owner of the [`PlateState`]. A reading replaces the plate only
/// when it is non-empty, so frames without a detection or with an unreadable crop keep
/// showing the last plate.
#[derive(Debug)]
pub struct PlateStream<S, E> {
    detector: PlateDetector<S>,
    extractor: RegionExtractor,
    reader: PlateReader<E>,
    plate: PlateState,
    latency: TimeCalc,
    last_metrics: FrameMetrics,
    max_frames: Option<u64>,
    next_index: u64,
    state: StreamState,
}

impl<S: Scorer, E: OcrEngine> PlateStream<S, E> {
    pub fn new(detector: PlateDetector<S>, extractor: RegionExtractor, reader: PlateReader<E>) -> Self {
        Self {
            detector,
            extractor,
            reader,
            plate: PlateState::new(),
            latency: TimeCalc::default(),
            last_metrics: FrameMetrics::default(),
            max_frames: None,
            next_index: 0,
            state: StreamState::Idle,
        }
    }

    /// Stops each run after `max_frames` frames.
    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn plate(&self) -> &PlateState {
        &self.plate
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn reader(&self) -> &PlateReader<E> {
        &self.reader
    }

    /// Timing of the last frame completed by [`PlateStream::run`], emit included.
    pub fn last_metrics(&self) -> FrameMetrics {
        self.last_metrics
    }

    /// Runs one frame through the pipeline. Detector failures are logged and the frame
    /// carries on with no detections.
    ///
    /// The report's `metrics` are those of the previous frame, since this frame's
    /// end-to-end time is only known once the sink has handled it.
    pub fn process_frame(&mut self, frame: &LprFrame) -> FrameReport {
        let start = Instant::now();

        let (detections, inference_latency) = self.detect(frame, start);

        let crop = self.extractor.extract(&detections, frame);
        let reading = match &crop {
            Some(crop) => self.reader.recognize(crop),
            None => String::new(),
        };
        if self.plate.accept(reading.clone(), frame.index) {
            log::debug!("Frame {}: plate updated to {}", frame.index, reading);
        }

        FrameReport {
            detections,
            crop,
            reading,
            plate: self.plate.clone(),
            inference_latency,
            metrics: self.last_metrics,
        }
    }

    /// Closes the timing of one frame started at `start`.
    fn finish_frame(&mut self, frame: &LprFrame, report: &FrameReport, start: Instant) -> FrameMetrics {
        let frame_time = start.elapsed();
        self.latency.push(frame_time);
        self.last_metrics = FrameMetrics::new(report.inference_latency, frame_time);
        log::info!(
            "Frame {}: plate '{}' | E2E {:.2?} | {:.1} FPS",
            frame.index,
            report.plate.plate(),
            frame_time,
            self.last_metrics.fps
        );
        self.last_metrics
    }

    fn detect(&mut self, frame: &LprFrame, start: Instant) -> (DetectionSet, Duration) {
        match self.detector.infer(frame) {
            Ok(inference) => (inference.detections, inference.latency),
            Err(e @ DetectError::InvalidFrame { .. }) => {
                log::warn!("Frame {} skipped: {}", frame.index, e);
                (DetectionSet::new(), start.elapsed())
            }
            Err(e) => {
                log::error!("Frame {}: {}", frame.index, e);
                (DetectionSet::new(), start.elapsed())
            }
        }
    }

    /// Pulls frames until the source is exhausted, `max_frames` is reached, or the sink
    /// asks to stop. A failed read ends the run like an exhausted source.
    pub fn run<F, K>(&mut self, source: &mut F, sink: &mut K) -> RunSummary
    where
        F: FrameSource + ?Sized,
        K: FrameSink + ?Sized,
    {
        self.state = StreamState::Detecting;
        self.latency.clear();

        let mut summary = RunSummary::default();
        loop {
            if self.max_frames.is_some_and(|max| summary.frames >= max) {
                log::info!("Reached max_frames ({})", summary.frames);
                break;
            }

            let image = match source.next_frame() {
                Ok(Some(image)) => image,
                Ok(None) => {
                    log::info!("Frame source exhausted");
                    break;
                }
                Err(e) => {
                    log::error!("{}", e);
                    break;
                }
            };

            let frame = LprFrame::new(self.next_index, image);
            self.next_index += 1;

            let start = Instant::now();
            let report = self.process_frame(&frame);
            summary.frames += 1;

            let control = match sink.emit(&frame, &report) {
                Ok(control) => control,
                Err(e) => {
                    log::warn!("Sink failed on frame {}: {:#}", frame.index, e);
                    SinkControl::Continue
                }
            };
            summary.last_metrics = self.finish_frame(&frame, &report, start);

            if control == SinkControl::Stop {
                log::info!("Stop requested by sink after frame {}", frame.index);
                summary.stopped_by_sink = true;
                break;
            }
        }

        self.state = StreamState::Idle;
        summary.plate = self.plate.clone();
        summary.avg_latency = self.latency.avg();
        log::info!(
            "Processed {} frame(s), avg E2E {:.2?}, max {:.2?}, plate '{}'",
            summary.frames,
            summary.avg_latency,
            self.latency.max(),
            summary.plate.plate()
        );
        summary
    }
}
