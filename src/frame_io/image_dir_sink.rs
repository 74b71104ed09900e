use std::fmt;
use std::path::{Path, PathBuf};
use ab_glyph::{FontVec, PxScale};
use anyhow::Context;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use crate::common::{LprDetection, LprFrame};
use crate::frame_io::{FrameReport, FrameSink, SinkControl};

const LABEL_HEIGHT: f32 = 20.;
const LABEL_COLOUR: Rgb<u8> = Rgb([255, 255, 255]);

/// Saves every frame with its boxes drawn as `frame_<index>.png`, plus
/// `crop_<index>.png` for recognized regions when crops are enabled.
///
/// With a font loaded the FPS and the current plate are written in the top-left corner.
pub struct ImageDirSink {
    dir: PathBuf,
    save_crops: bool,
    font: Option<FontVec>,
}

impl fmt::Debug for ImageDirSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageDirSink")
            .field("dir", &self.dir)
            .field("save_crops", &self.save_crops)
            .field("font", &self.font.is_some())
            .finish()
    }
}

pub(crate) fn class_colour(class: usize, is_top: bool) -> Rgb<u8> {
    match (class, is_top) {
        (_, true) => Rgb([0, 255, 0]),  // green (cropped plate)
        (0, false) => Rgb([255, 0, 0]), // red (other plates)
        _ => Rgb([0, 0, 255]),          // blue (everything else)
    }
}

impl ImageDirSink {
    pub fn new(dir: &Path, save_crops: bool) -> anyhow::Result<Self> {
        std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        log::info!("Saving annotated frames to {}", dir.display());
        Ok(Self {
            dir: dir.to_path_buf(),
            save_crops,
            font: None,
        })
    }

    pub fn with_font(mut self, path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("failed to read font {}", path.display()))?;
        let font = FontVec::try_from_vec(bytes).with_context(|| format!("invalid font {}", path.display()))?;
        self.font = Some(font);
        Ok(self)
    }

    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", index))
    }

    pub fn crop_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("crop_{:06}.png", index))
    }
}

/// Draws hollow boxes. Boxes are clipped to the image; boxes fully outside are skipped.
pub fn annotate(image: &mut RgbImage, detections: &[LprDetection]) {
    let (w, h) = (image.width() as f32, image.height() as f32);
    for (i, det) in detections.iter().enumerate() {
        let (x0, y0, x1, y1) = det.bbox.as_x0y0_x1y1();
        let (x0, y0) = (x0.clamp(0., w), y0.clamp(0., h));
        let (x1, y1) = (x1.clamp(0., w), y1.clamp(0., h));
        if x1 - x0 < 1. || y1 - y0 < 1. {
            continue;
        }
        let rect = Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0) as u32, (y1 - y0) as u32);
        draw_hollow_rect_mut(image, rect, class_colour(det.class_id, i == 0));
    }
}

/// Writes the FPS and plate lines, like the live display overlay.
pub fn label(image: &mut RgbImage, font: &FontVec, fps: f32, plate: &str) {
    let scale = PxScale {
        x: LABEL_HEIGHT,
        y: LABEL_HEIGHT,
    };
    let step = LABEL_HEIGHT as i32 + 6;
    draw_text_mut(image, LABEL_COLOUR, 10, 10, scale, font, &format!("FPS: {:.1}", fps));
    if !plate.is_empty() {
        draw_text_mut(image, LABEL_COLOUR, 10, 10 + step, scale, font, plate);
    }
}

impl FrameSink for ImageDirSink {
    fn emit(&mut self, frame: &LprFrame, report: &FrameReport) -> anyhow::Result<SinkControl> {
        let mut image = frame.image.clone();
        annotate(&mut image, &report.detections);
        if let Some(font) = &self.font {
            label(&mut image, font, report.metrics.fps, report.plate.plate());
        }

        let path = self.frame_path(frame.index);
        image.save(&path).with_context(|| format!("failed to save {}", path.display()))?;

        if self.save_crops && !report.reading.is_empty() {
            if let Some(crop) = &report.crop {
                let path = self.crop_path(frame.index);
                crop.image.save(&path).with_context(|| format!("failed to save {}", path.display()))?;
            }
        }
        log::debug!("Saved frame {} (plate '{}')", frame.index, report.plate.plate());
        Ok(SinkControl::Continue)
    }
}
