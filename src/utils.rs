use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use std::{fs, io};

pub const IMAGE_EXT: [&str; 5] = ["jpg", "jpeg", "webp", "bmp", "png"];

/// Logs the time since the previous step and returns the new running total.
pub(crate) fn trace(l_type: &str, l_step: &str, start: Instant, previous: Duration) -> Duration {
    let now = start.elapsed();
    log::trace!("{} | Total={:.2?} | {}={:.2?}", l_type, now, l_step, now - previous);
    now
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXT.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Every image below `dir`, recursively, sorted by path.
pub fn list_images(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if is_image_file(&path) {
                images.push(path);
            }
        }
    }
    images.sort();
    Ok(images)
}
