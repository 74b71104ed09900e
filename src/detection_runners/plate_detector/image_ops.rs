//! Functions to preprocess frames for the detector.

use fast_image_resize::{
    images::{CroppedImageMut, Image as FirImage},
    pixels::PixelType,
    FilterType, ResizeAlg, ResizeOptions, Resizer,
};
use image::RgbImage;
use rayon::prelude::*;
use crate::detection_runners::plate_detector::input_wrapper::X;
use crate::error::DetectError;

/// A frame resized into the detector's input shape.
#[derive(Debug, Clone)]
pub struct Letterboxed {
    /// NCHW tensor of shape `(1, 3, target_h, target_w)`.
    pub tensor: X,
    /// `min(target_h / frame_h, target_w / frame_w)`
    pub ratio: f32,
    pub frame_width: u32,
    pub frame_height: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct LetterboxOptions {
    pub target_w: u32,
    pub target_h: u32,
    pub pad_value: u8,
    pub normalize: bool,
    pub bgr: bool,
}

/// Main preprocessing entry point.
pub fn preprocess(frame: &RgbImage, options: &LetterboxOptions) -> Result<Letterboxed, DetectError> {
    let (frame_width, frame_height) = frame.dimensions();
    if frame_width == 0 || frame_height == 0 {
        return Err(DetectError::InvalidFrame {
            width: frame_width,
            height: frame_height,
        });
    }

    let ratio = letterbox_ratio(frame_width, frame_height, options.target_w, options.target_h);
    let padded = letterbox_image(frame, ratio, options)
        .map_err(|e| DetectError::Preprocess(e.to_string()))?;
    let tensor = nchw_flat(&padded, options.normalize, options.bgr);
    let tensor = X::from_shape_vec(
        &[1, 3, options.target_h as usize, options.target_w as usize],
        tensor,
    )
    .map_err(|e| DetectError::Preprocess(e.to_string()))?;

    Ok(Letterboxed {
        tensor,
        ratio,
        frame_width,
        frame_height,
    })
}

pub fn letterbox_ratio(frame_w: u32, frame_h: u32, target_w: u32, target_h: u32) -> f32 {
    (target_h as f32 / frame_h as f32).min(target_w as f32 / frame_w as f32)
}

/// Size of the resized frame inside the padded canvas. Truncated like an integer cast
/// and never smaller than one pixel.
pub fn resized_dims(frame_w: u32, frame_h: u32, ratio: f32, target_w: u32, target_h: u32) -> (u32, u32) {
    let w = ((frame_w as f32 * ratio) as u32).clamp(1, target_w);
    let h = ((frame_h as f32 * ratio) as u32).clamp(1, target_h);
    (w, h)
}

fn to_fir_image<'a>(image: &RgbImage) -> anyhow::Result<FirImage<'a>> {
    let (width, height) = image.dimensions();
    Ok(FirImage::from_vec_u8(width, height, image.as_raw().clone(), PixelType::U8x3)?)
}

/// Resizes into the top-left corner and fills the bottom/right remainder with
/// `pad_value`.
fn letterbox_image<'a>(
    img: &RgbImage,
    ratio: f32,
    options: &LetterboxOptions,
) -> anyhow::Result<FirImage<'a>> {
    let (target_w, target_h) = (options.target_w, options.target_h);
    let (new_w, new_h) = resized_dims(img.width(), img.height(), ratio, target_w, target_h);

    let mut padded = FirImage::from_vec_u8(
        target_w,
        target_h,
        vec![options.pad_value; (target_w * target_h * 3) as usize],
        PixelType::U8x3,
    )?;

    let src = to_fir_image(img)?;
    let resize_options =
        ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
    let mut resizer = Resizer::new();
    let mut cropped = CroppedImageMut::new(&mut padded, 0, 0, new_w, new_h)?;
    resizer.resize(&src, &mut cropped, &resize_options)?;

    Ok(padded)
}

/// Interleaved HWC bytes into planar CHW floats, one plane per rayon task.
fn nchw_flat(img: &FirImage, normalize: bool, bgr: bool) -> Vec<f32> {
    let buf = img.buffer();
    let hw = (img.width() * img.height()) as usize;
    let scale = if normalize { 1.0 / 255.0 } else { 1.0 };

    let mut out = vec![0.0f32; hw * 3];
    out.par_chunks_mut(hw).enumerate().for_each(|(c, plane)| {
        let src_c = if bgr { 2 - c } else { c };
        for (i, v) in plane.iter_mut().enumerate() {
            *v = buf[3 * i + src_c] as f32 * scale;
        }
    });
    out
}
