use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use image::RgbImage;
use crate::error::SourceError;
use crate::frame_io::FrameSource;
use crate::utils;

/// Reads a single image, or every image below a directory in path order.
#[derive(Debug, Clone)]
pub struct ImageDirSource {
    pending: VecDeque<PathBuf>,
}

impl ImageDirSource {
    pub fn new(path: &Path) -> Result<Self, SourceError> {
        let paths = if path.is_dir() {
            utils::list_images(path).map_err(|e| SourceError::Init {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            return Err(SourceError::Init {
                path: path.to_path_buf(),
                reason: "no such file or directory".to_string(),
            });
        };

        log::info!("Found {} image(s) in {}", paths.len(), path.display());
        Ok(Self {
            pending: paths.into(),
        })
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, SourceError> {
        let Some(path) = self.pending.pop_front() else {
            return Ok(None);
        };
        log::debug!("Reading {}", path.display());
        let image = image::open(&path).map_err(|e| SourceError::Read(format!("{}: {}", path.display(), e)))?;
        Ok(Some(image.to_rgb8()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn yields_images_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(4, 2, Rgb([2, 0, 0])).save(dir.path().join("b.png")).unwrap();
        RgbImage::from_pixel(4, 2, Rgb([1, 0, 0])).save(dir.path().join("a.png")).unwrap();

        let mut source = ImageDirSource::new(dir.path()).unwrap();
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.next_frame().unwrap().unwrap().get_pixel(0, 0), &Rgb([1, 0, 0]));
        assert_eq!(source.next_frame().unwrap().unwrap().get_pixel(0, 0), &Rgb([2, 0, 0]));
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn missing_path_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageDirSource::new(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, SourceError::Init { .. }));
    }

    #[test]
    fn undecodable_image_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.png"), b"not a png").unwrap();
        let mut source = ImageDirSource::new(dir.path()).unwrap();
        assert!(matches!(source.next_frame(), Err(SourceError::Read(_))));
    }
}
