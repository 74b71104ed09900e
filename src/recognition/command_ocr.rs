use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};
use anyhow::{bail, Context};
use image::RgbImage;
use crate::recognition::{OcrEngine, TextFragment};

static CROP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Runs an external OCR program once per crop.
///
/// The program gets `--image <png> --blocklist <chars>` after its configured arguments
/// and must print a JSON list of fragments on stdout.
#[derive(Debug, Clone)]
pub struct CommandOcr {
    program: String,
    args: Vec<String>,
}

impl CommandOcr {
    pub fn new(command: &[String]) -> anyhow::Result<Self> {
        let Some((program, args)) = command.split_first() else {
            bail!("OCR command is empty");
        };
        if program.trim().is_empty() {
            bail!("OCR program name is empty");
        }
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    fn crop_path() -> PathBuf {
        let n = CROP_COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("lpr_crop_{}_{}.png", std::process::id(), n))
    }

    fn run(&self, image_path: &Path, blocklist: &str) -> anyhow::Result<Vec<TextFragment>> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg("--image")
            .arg(image_path)
            .arg("--blocklist")
            .arg(blocklist)
            .output()
            .with_context(|| format!("failed to run OCR program `{}`", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("OCR program exited with {}: {}", output.status, stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Ok(vec![]);
        }
        serde_json::from_str(stdout.trim()).context("OCR program printed invalid JSON")
    }
}

impl OcrEngine for CommandOcr {
    fn read_text(&mut self, region: &RgbImage, blocklist: &str) -> anyhow::Result<Vec<TextFragment>> {
        let path = Self::crop_path();
        region
            .save(&path)
            .with_context(|| format!("failed to write crop to {}", path.display()))?;

        let result = self.run(&path, blocklist);
        if let Err(e) = std::fs::remove_file(&path) {
            log::debug!("Could not remove {}: {}", path.display(), e);
        }
        result
    }
}
