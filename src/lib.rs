mod utils;
pub mod cli;
pub mod common;
pub mod data;
pub mod detection_runners;
pub mod error;
pub mod frame_io;
pub mod recognition;
pub mod region_extractor;
pub mod stream_runner;

use std::path::Path;
use crate::data::LprConfig;
use crate::detection_runners::{PlateDetector, Scorer};
use crate::error::SourceError;
use crate::frame_io::{FrameSink, FrameSource, ImageDirSink, ImageDirSource, LogSink, SkipAheadSource};
use crate::recognition::{OcrEngine, PlateReader};
use crate::region_extractor::RegionExtractor;
use crate::stream_runner::PlateStream;

pub use utils::{is_image_file, list_images, IMAGE_EXT};

/// Wires a scorer and an OCR engine into a ready-to-run stream.
pub fn init_stream<S: Scorer, E: OcrEngine>(config: &LprConfig, scorer: S, engine: E) -> anyhow::Result<PlateStream<S, E>> {
    config.validate()?;
    let detector = PlateDetector::new(scorer, config);
    let extractor = RegionExtractor::new(config.crop_offset);
    let reader = PlateReader::new(engine, &config.ocr_blocklist)?;
    Ok(PlateStream::new(detector, extractor, reader).with_max_frames(config.max_frames))
}

/// Loads the ONNX model and runs one warm-up frame through it.
#[cfg(feature = "ort-backend")]
pub fn init_detector(config: &LprConfig) -> anyhow::Result<PlateDetector<detection_runners::OrtScorer>> {
    let scorer = detection_runners::OrtScorer::new(Path::new(&config.model_path), &config.output_name)?;
    let mut detector = PlateDetector::new(scorer, config);

    let (width, height) = detector.input_size();
    let warmup = image::RgbImage::new(width, height);
    match detector.infer(&warmup) {
        Ok(inference) => log::info!("Warm-up inference took {:.2?}", inference.latency),
        Err(e) => log::warn!("Warm-up inference failed: {}", e),
    }
    Ok(detector)
}

/// Image file or directory source, captured on its own thread when the config sets a
/// queue capacity.
pub fn open_source(config: &LprConfig, input: &Path) -> Result<Box<dyn FrameSource + Send>, SourceError> {
    let source = ImageDirSource::new(input)?;
    Ok(match config.queue_capacity {
        Some(capacity) => {
            log::info!("Capturing on a separate thread, queue capacity {}", capacity);
            Box::new(SkipAheadSource::spawn(source, capacity))
        }
        None => Box::new(source),
    })
}

/// Annotated frames to `output_dir` when set, otherwise the log.
pub fn open_sink(config: &LprConfig) -> anyhow::Result<Box<dyn FrameSink>> {
    Ok(match &config.output_dir {
        Some(dir) => {
            let mut sink = ImageDirSink::new(dir, config.save_crops)?;
            if let Some(font) = &config.font_path {
                sink = sink.with_font(font)?;
            }
            Box::new(sink)
        }
        None => Box::new(LogSink::new()),
    })
}
