//! Decoding of raw detector rows and multiclass non-max suppression.

use std::collections::BTreeMap;
use ndarray::ArrayView2;
use crate::common::{DetectionSet, LprBox, LprDetection};

pub trait Nms {
    fn iou(&self, other: &Self) -> f32;
    fn confidence(&self) -> f32;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NmsConfig {
    pub score_thr: f32,
    pub nms_thr: f32,
    pub class_agnostic: bool,
}

impl Default for NmsConfig {
    fn default() -> Self {
        Self {
            score_thr: 0.1,
            nms_thr: 0.45,
            class_agnostic: true,
        }
    }
}

/// Greedy NMS in place. The sort is stable, so equal scores keep their input order,
/// and kept boxes stay in descending score order.
pub fn nms<T: Nms>(boxes: &mut Vec<T>, iou_threshold: f32) {
    boxes.sort_by(|b1, b2| b2.confidence().total_cmp(&b1.confidence()));
    let mut current_index = 0;
    for index in 0..boxes.len() {
        let mut drop = false;
        for prev_index in 0..current_index {
            let iou = boxes[prev_index].iou(&boxes[index]);
            if iou > iou_threshold {
                drop = true;
                break;
            }
        }
        if !drop {
            boxes.swap(current_index, index);
            current_index += 1;
        }
    }
    boxes.truncate(current_index);
}

/// Turns `(N, 5 + C)` rows of `(cx, cy, w, h, objectness, class scores..)` in
/// letterboxed input pixels into a DetectionSet in original frame pixels.
///
/// Returns `None` when no (box, class) pair reaches `score_thr`.
pub fn decode_predictions(
    preds: ArrayView2<'_, f32>,
    ratio: f32,
    cfg: &NmsConfig,
) -> Option<DetectionSet> {
    let candidates = threshold_candidates(preds, ratio, cfg);
    if candidates.is_empty() {
        return None;
    }
    Some(multiclass_nms(candidates, cfg.nms_thr, cfg.class_agnostic))
}

/// Steps 1-3 of decoding: corner form, ratio rescale and score thresholding.
///
/// Agnostic mode keeps only the best class of each anchor (first one on ties); the
/// class-aware mode yields one candidate per (anchor, class) pair above threshold.
pub fn threshold_candidates(
    preds: ArrayView2<'_, f32>,
    ratio: f32,
    cfg: &NmsConfig,
) -> Vec<LprDetection> {
    let mut candidates = Vec::new();
    for row in preds.rows() {
        if row.len() < 6 {
            continue;
        }
        let bbox = LprBox::from_cxcywh(row[0], row[1], row[2], row[3]).unscaled(ratio);
        let objectness = row[4];
        let class_scores = row.slice(ndarray::s![5..]);

        if cfg.class_agnostic {
            let mut best = (0usize, f32::NEG_INFINITY);
            for (class_id, &s) in class_scores.iter().enumerate() {
                if s > best.1 {
                    best = (class_id, s);
                }
            }
            let score = objectness * best.1;
            if score >= cfg.score_thr {
                candidates.push(LprDetection::new(best.0, bbox, score));
            }
        } else {
            for (class_id, &s) in class_scores.iter().enumerate() {
                let score = objectness * s;
                if score >= cfg.score_thr {
                    candidates.push(LprDetection::new(class_id, bbox, score));
                }
            }
        }
    }
    candidates
}

/// Step 4: agnostic or per-class NMS, then one sort so index 0 is the top scoring
/// detection across classes. Equal scores keep their candidate order, whatever the class.
pub fn multiclass_nms(mut candidates: Vec<LprDetection>, nms_thr: f32, class_agnostic: bool) -> DetectionSet {
    if class_agnostic {
        nms(&mut candidates, nms_thr);
        return candidates;
    }

    let mut by_class: BTreeMap<usize, Vec<Ranked>> = BTreeMap::new();
    for (position, det) in candidates.into_iter().enumerate() {
        by_class.entry(det.class_id).or_default().push(Ranked { position, det });
    }

    let mut kept = Vec::new();
    for (_, mut dets) in by_class {
        nms(&mut dets, nms_thr);
        kept.extend(dets);
    }
    kept.sort_by(|a, b| {
        b.det
            .score
            .total_cmp(&a.det.score)
            .then(a.position.cmp(&b.position))
    });
    kept.into_iter().map(|r| r.det).collect()
}

/// A candidate tagged with its index in the thresholded candidate list.
struct Ranked {
    position: usize,
    det: LprDetection,
}

impl Nms for Ranked {
    fn iou(&self, other: &Self) -> f32 {
        self.det.iou(&other.det)
    }

    fn confidence(&self) -> f32 {
        self.det.score
    }
}
