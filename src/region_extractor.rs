use image::RgbImage;
use crate::common::LprDetection;

/// A padded plate region cut out of the original frame.
#[derive(Debug, Clone)]
pub struct Crop {
    /// Left edge in frame pixels.
    pub x: u32,
    /// Top edge in frame pixels.
    pub y: u32,
    pub image: RgbImage,
}

impl Crop {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RegionExtractor {
    offset: u32,
}

impl Default for RegionExtractor {
    fn default() -> Self {
        Self { offset: 3 }
    }
}

impl RegionExtractor {
    pub fn new(offset: u32) -> Self {
        Self { offset }
    }

    /// Crops the top-scoring detection (index 0). `None` when there is no detection or
    /// the padded box has no area left inside the frame.
    pub fn extract(&self, detections: &[LprDetection], frame: &RgbImage) -> Option<Crop> {
        let top = detections.first()?;
        let (x, y, w, h) = self.crop_rect(top, frame.width(), frame.height())?;
        Some(Crop {
            x,
            y,
            image: image::imageops::crop_imm(frame, x, y, w, h).to_image(),
        })
    }

    /// `(x, y, width, height)` of the padded box clamped to the frame. Coordinates are
    /// truncated to whole pixels before padding.
    pub fn crop_rect(&self, detection: &LprDetection, frame_w: u32, frame_h: u32) -> Option<(u32, u32, u32, u32)> {
        let offset = self.offset as i64;
        let (x0, y0, x1, y1) = detection.bbox.as_x0y0_x1y1();

        let clamp_x = |v: i64| v.clamp(0, frame_w as i64) as u32;
        let clamp_y = |v: i64| v.clamp(0, frame_h as i64) as u32;

        let left = clamp_x(x0 as i64 - offset);
        let top = clamp_y(y0 as i64 - offset);
        let right = clamp_x(x1 as i64 + offset);
        let bottom = clamp_y(y1 as i64 + offset);

        if right <= left || bottom <= top {
            return None;
        }
        Some((left, top, right - left, bottom - top))
    }
}
