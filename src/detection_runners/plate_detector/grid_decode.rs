//! YOLOX head decoding for models exported without `decode_in_inference`.
//!
//! Such models emit per-anchor offsets relative to their grid cell instead of input
//! pixels. Anchors are laid out stride level by stride level, row-major inside a level.

use ndarray::ArrayViewMut2;
use crate::error::DetectError;

pub const STRIDES: [u32; 3] = [8, 16, 32];
pub const STRIDES_P6: [u32; 4] = [8, 16, 32, 64];

pub fn strides(p6: bool) -> &'static [u32] {
    if p6 {
        &STRIDES_P6
    } else {
        &STRIDES
    }
}

/// Number of anchors a model with the given input shape produces.
pub fn anchor_count(input_w: u32, input_h: u32, p6: bool) -> usize {
    strides(p6)
        .iter()
        .map(|s| ((input_h / s) * (input_w / s)) as usize)
        .sum()
}

/// Rewrites `(x, y, w, h)` in place:
/// `xy = (xy + grid) * stride`, `wh = exp(wh) * stride`.
pub fn decode_grid(
    mut preds: ArrayViewMut2<'_, f32>,
    input_w: u32,
    input_h: u32,
    p6: bool,
) -> Result<(), DetectError> {
    let expected = anchor_count(input_w, input_h, p6);
    if preds.nrows() != expected {
        return Err(DetectError::ModelOutput(format!(
            "grid decode expects {} anchors for {}x{}, got {}",
            expected,
            input_w,
            input_h,
            preds.nrows()
        )));
    }
    if preds.ncols() < 4 {
        return Err(DetectError::ModelOutput(format!(
            "prediction rows too short: {}",
            preds.ncols()
        )));
    }

    let mut rows = preds.rows_mut().into_iter();
    for &stride in strides(p6) {
        let (hsize, wsize) = (input_h / stride, input_w / stride);
        let s = stride as f32;
        for gy in 0..hsize {
            for gx in 0..wsize {
                let Some(mut row) = rows.next() else {
                    return Ok(());
                };
                row[0] = (row[0] + gx as f32) * s;
                row[1] = (row[1] + gy as f32) * s;
                row[2] = row[2].exp() * s;
                row[3] = row[3].exp() * s;
            }
        }
    }
    Ok(())
}
