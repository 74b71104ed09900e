use serde::{Deserialize, Serialize};

/// Axis aligned box in corner form `(x0, y0, x1, y1)`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LprBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl LprBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Builds a corner-form box from the center form `(cx, cy, w, h)` used by the
    /// detector's raw output.
    ///
    /// # Arguments
    ///
    /// * `cx` - The x-coordinate of the horizontal center.
    /// * `cy` - The y-coordinate of the vertical center.
    /// * `w` - The width of the bounding box.
    /// * `h` - The height of the bounding box.
    pub fn from_cxcywh(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x0: cx - w / 2.,
            y0: cy - h / 2.,
            x1: cx + w / 2.,
            y1: cy + h / 2.,
        }
    }

    /// Returns the width of the bounding box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Returns the height of the bounding box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f32 {
        self.width().max(0.) * self.height().max(0.)
    }

    /// Computes the intersection area between this bounding box and another.
    pub fn intersect(&self, other: &LprBox) -> f32 {
        let left = self.x0.max(other.x0);
        let right = self.x1.min(other.x1);
        let top = self.y0.max(other.y0);
        let bottom = self.y1.min(other.y1);
        (right - left).max(0.) * (bottom - top).max(0.)
    }

    /// Computes the union area between this bounding box and another.
    pub fn union(&self, other: &LprBox) -> f32 {
        self.area() + other.area() - self.intersect(other)
    }

    /// Computes the intersection over union (IoU) between this bounding box and another.
    pub fn iou(&self, other: &LprBox) -> f32 {
        let union = self.union(other);
        if union <= 0. {
            return 0.;
        }
        self.intersect(other) / union
    }

    /// Divides every coordinate by `ratio`, mapping a box from the letterboxed input
    /// back into original frame pixels.
    pub fn unscaled(&self, ratio: f32) -> Self {
        Self {
            x0: self.x0 / ratio,
            y0: self.y0 / ratio,
            x1: self.x1 / ratio,
            y1: self.y1 / ratio,
        }
    }

    pub fn as_x0y0_x1y1(&self) -> (f32, f32, f32, f32) {
        (self.x0, self.y0, self.x1, self.y1)
    }
}
