//! Where frames come from and where processed frames go.

mod image_dir_sink;
mod image_dir_source;
mod log_sink;
mod skip_ahead;

pub use image_dir_sink::*;
pub use image_dir_source::*;
pub use log_sink::*;
pub use skip_ahead::*;

use std::time::Duration;
use image::RgbImage;
use crate::common::{DetectionSet, FrameMetrics, LprFrame, PlateState};
use crate::error::SourceError;
use crate::region_extractor::Crop;

/// Pull-based frame supplier. `Ok(None)` marks the end of the stream.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, SourceError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, SourceError> {
        (**self).next_frame()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkControl {
    Continue,
    /// Ask the loop to stop after this frame.
    Stop,
}

/// Everything the loop knows about one processed frame.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub detections: DetectionSet,
    pub crop: Option<Crop>,
    /// This frame's recognition, empty when nothing was read.
    pub reading: String,
    /// The displayed plate after this frame.
    pub plate: PlateState,
    /// Time spent in the detector on this frame.
    pub inference_latency: Duration,
    /// End-to-end timing of the previous frame, zero on the first one.
    pub metrics: FrameMetrics,
}

pub trait FrameSink {
    fn emit(&mut self, frame: &LprFrame, report: &FrameReport) -> anyhow::Result<SinkControl>;
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn emit(&mut self, frame: &LprFrame, report: &FrameReport) -> anyhow::Result<SinkControl> {
        (**self).emit(frame, report)
    }
}
