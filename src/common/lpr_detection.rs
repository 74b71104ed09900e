use serde::{Deserialize, Serialize};
use crate::common::LprBox;
use crate::detection_runners::plate_detector::nms::Nms;

/// Ordered detections for one frame, highest score first.
pub type DetectionSet = Vec<LprDetection>;

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LprDetection {
    pub class_id: usize,
    pub bbox: LprBox,
    pub score: f32,
}

impl Nms for LprDetection {
    /// Computes the intersection over union (IoU) between this bounding box and another.
    fn iou(&self, other: &Self) -> f32 {
        self.bbox.iou(&other.bbox)
    }

    /// Returns the confidence score of the bounding box.
    fn confidence(&self) -> f32 {
        self.score
    }
}

impl LprDetection {
    pub fn new(class_id: usize, bbox: LprBox, score: f32) -> Self {
        Self {
            class_id,
            bbox,
            score,
        }
    }

    /// Sets the bounding box's coordinates using `(x0, y0, x1, y1)`.
    pub fn with_x0y0_x1y1(mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        self.bbox = LprBox::new(x0, y0, x1, y1);
        self
    }

    /// Sets the confidence score of the detection.
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Sets the class ID of the detection.
    pub fn with_class_id(mut self, class_id: usize) -> Self {
        self.class_id = class_id;
        self
    }
}
