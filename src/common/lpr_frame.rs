use image::RgbImage;

/// A decoded video frame plus the index the stream assigned to it.
#[derive(Debug, Clone, Default)]
pub struct LprFrame {
    pub index: u64,
    pub image: RgbImage,
}

impl std::ops::Deref for LprFrame {
    type Target = RgbImage;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}

impl LprFrame {
    pub fn new(index: u64, image: RgbImage) -> Self {
        Self { index, image }
    }

    /// Frames with a zero dimension cannot be letterboxed.
    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }
}
