use std::time::{Duration, Instant};
use image::RgbImage;
use ndarray::{Array, Ix2, IxDyn};
use crate::common::DetectionSet;
use crate::data::{LprConfig, Letterboxed};
use crate::detection_runners::inference_process::InferenceProcess;
use crate::detection_runners::plate_detector::grid_decode;
use crate::detection_runners::plate_detector::image_ops::{self, LetterboxOptions};
use crate::detection_runners::plate_detector::nms::{self, NmsConfig};
use crate::detection_runners::Scorer;
use crate::error::DetectError;

/// Result of running the detector on one frame.
#[derive(Debug, Clone, Default)]
pub struct Inference {
    pub detections: DetectionSet,
    pub ratio: f32,
    pub latency: Duration,
}

/// Detector adapter: letterbox, scorer call, shape check, decode + NMS.
#[derive(Debug)]
pub struct PlateDetector<S> {
    scorer: S,
    letterbox: LetterboxOptions,
    num_classes: usize,
    decode_grid: bool,
    p6: bool,
    nms: NmsConfig,
}

impl<S: Scorer> PlateDetector<S> {
    pub fn new(scorer: S, config: &LprConfig) -> Self {
        log::info!(
            "Plate detector: input {}x{}, {} classes, score_thr {}, nms_thr {}, agnostic {}",
            config.input_width,
            config.input_height,
            config.num_classes,
            config.score_thr,
            config.nms_thr,
            config.class_agnostic
        );
        Self {
            scorer,
            letterbox: LetterboxOptions {
                target_w: config.input_width,
                target_h: config.input_height,
                pad_value: config.pad_value,
                normalize: config.normalize_input,
                bgr: config.bgr_input,
            },
            num_classes: config.num_classes,
            decode_grid: config.decode_grid,
            p6: config.p6,
            nms: NmsConfig {
                score_thr: config.score_thr,
                nms_thr: config.nms_thr,
                class_agnostic: config.class_agnostic,
            },
        }
    }

    /// Detects plates in `frame`. Boxes are in original frame pixels, unclamped.
    pub fn infer(&mut self, frame: &RgbImage) -> Result<Inference, DetectError> {
        let start = Instant::now();
        let (detections, ratio) = self.run(frame)?;
        Ok(Inference {
            detections,
            ratio,
            latency: start.elapsed(),
        })
    }

    pub fn input_size(&self) -> (u32, u32) {
        (self.letterbox.target_w, self.letterbox.target_h)
    }

    fn row_len(&self) -> usize {
        5 + self.num_classes
    }

    /// Accepts `(N, 5 + C)` or `(1, N, 5 + C)`.
    fn check_shape(&self, raw: Array<f32, IxDyn>) -> Result<Array<f32, Ix2>, DetectError> {
        let shape = raw.shape().to_vec();
        let raw = match shape.as_slice() {
            [1, _, _] => raw.index_axis_move(ndarray::Axis(0), 0),
            [_, _] => raw,
            _ => {
                return Err(DetectError::ModelOutput(format!(
                    "expected (N, {}) predictions, got {:?}",
                    self.row_len(),
                    shape
                )))
            }
        };
        let preds = raw
            .into_dimensionality::<Ix2>()
            .map_err(|e| DetectError::ModelOutput(e.to_string()))?;
        if preds.ncols() != self.row_len() {
            return Err(DetectError::ModelOutput(format!(
                "expected (N, {}) predictions, got {:?}",
                self.row_len(),
                shape
            )));
        }
        Ok(preds)
    }
}

impl<S: Scorer> InferenceProcess for PlateDetector<S> {
    type Input = RgbImage;
    type Prepared = Letterboxed;
    type Raw = Option<Array<f32, IxDyn>>;
    type Output = (DetectionSet, f32);

    fn preprocess(&self, x: &RgbImage) -> Result<Letterboxed, DetectError> {
        image_ops::preprocess(x, &self.letterbox)
    }

    fn inference(&mut self, xs: &Letterboxed) -> Result<Self::Raw, DetectError> {
        self.scorer.score(&xs.tensor).map_err(DetectError::Scorer)
    }

    fn postprocess(&self, ys: Self::Raw, xs: &Letterboxed) -> Result<Self::Output, DetectError> {
        let raw = ys.ok_or_else(|| DetectError::ModelOutput("scorer returned no output".to_string()))?;
        let mut preds = self.check_shape(raw)?;

        if self.decode_grid {
            grid_decode::decode_grid(
                preds.view_mut(),
                self.letterbox.target_w,
                self.letterbox.target_h,
                self.p6,
            )?;
        }

        let detections = nms::decode_predictions(preds.view(), xs.ratio, &self.nms).unwrap_or_default();
        Ok((detections, xs.ratio))
    }
}
