//! Options for building the plate stream.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;

pub const CONFIG_DIR_NAME: &str = "lpr_stream";
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LprConfig {
    pub model_path: String,
    /// Name of the scorer output tensor holding the `(N, 5 + C)` predictions.
    pub output_name: String,
    pub input_width: u32,
    pub input_height: u32,
    pub num_classes: usize,

    // postprocessing
    pub score_thr: f32,
    pub nms_thr: f32,
    pub class_agnostic: bool,
    /// Decode raw YOLOX grid offsets into input pixels before NMS.
    pub decode_grid: bool,
    /// Adds the stride 64 level to the grid decode.
    pub p6: bool,

    // preprocessing
    pub pad_value: u8,
    /// Scale pixels to 0..1. YOLOX models expect raw 0..255 values.
    pub normalize_input: bool,
    /// Feed channels in BGR order, as models trained on OpenCV frames expect.
    pub bgr_input: bool,

    // crop + recognition
    pub crop_offset: u32,
    pub ocr_blocklist: String,
    /// External OCR program and its leading arguments.
    pub ocr_command: Vec<String>,

    // stream
    pub max_frames: Option<u64>,
    /// Capture on a separate thread with a skip-ahead queue of this size.
    pub queue_capacity: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub save_crops: bool,
    /// TrueType font for the plate and FPS labels on saved frames. Boxes only when unset.
    pub font_path: Option<PathBuf>,
}

impl Default for LprConfig {
    fn default() -> Self {
        Self {
            model_path: String::new(),
            output_name: "output".to_string(),
            input_width: 640,
            input_height: 640,
            num_classes: 1,

            score_thr: 0.1,
            nms_thr: 0.45,
            class_agnostic: true,
            decode_grid: false,
            p6: false,

            pad_value: 114,
            normalize_input: false,
            bgr_input: true,

            crop_offset: 3,
            ocr_blocklist: "-".to_string(),
            ocr_command: vec![],

            max_frames: None,
            queue_capacity: None,
            output_dir: None,
            save_crops: false,
            font_path: None,
        }
    }
}

#[allow(dead_code)]
impl LprConfig {
    pub fn new() -> Self {
        Default::default()
    }

    /// Reads a JSON config. Missing fields fall back to their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, or the per-user config file when no path is given. A missing
    /// per-user file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_json_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                log::info!("Loading config from {}", path.display());
                Self::from_json_file(&path)
            }
            _ => {
                log::info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `<config dir>/lpr_stream/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_width == 0 || self.input_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "input shape must be non-zero, got {}x{}",
                self.input_width, self.input_height
            )));
        }
        if self.num_classes == 0 {
            return Err(ConfigError::Invalid("num_classes must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.score_thr) {
            return Err(ConfigError::Invalid(format!("score_thr out of range: {}", self.score_thr)));
        }
        if !(0.0..=1.0).contains(&self.nms_thr) {
            return Err(ConfigError::Invalid(format!("nms_thr out of range: {}", self.nms_thr)));
        }
        if self.queue_capacity == Some(0) {
            return Err(ConfigError::Invalid("queue_capacity must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn with_model(mut self, model_path: &str) -> Self {
        self.model_path = model_path.to_string();
        self
    }

    pub fn with_output_name(mut self, name: &str) -> Self {
        self.output_name = name.to_string();
        self
    }

    pub fn with_input_size(mut self, width: u32, height: u32) -> Self {
        self.input_width = width;
        self.input_height = height;
        self
    }

    pub fn with_nc(mut self, nc: usize) -> Self {
        self.num_classes = nc;
        self
    }

    pub fn with_score_thr(mut self, x: f32) -> Self {
        self.score_thr = x;
        self
    }

    pub fn with_nms_thr(mut self, x: f32) -> Self {
        self.nms_thr = x;
        self
    }

    pub fn with_class_agnostic(mut self, x: bool) -> Self {
        self.class_agnostic = x;
        self
    }

    pub fn with_decode_grid(mut self, x: bool) -> Self {
        self.decode_grid = x;
        self
    }

    pub fn with_p6(mut self, x: bool) -> Self {
        self.p6 = x;
        self
    }

    pub fn with_pad_value(mut self, x: u8) -> Self {
        self.pad_value = x;
        self
    }

    pub fn with_normalize_input(mut self, x: bool) -> Self {
        self.normalize_input = x;
        self
    }

    pub fn with_bgr_input(mut self, x: bool) -> Self {
        self.bgr_input = x;
        self
    }

    pub fn with_crop_offset(mut self, x: u32) -> Self {
        self.crop_offset = x;
        self
    }

    pub fn with_ocr_blocklist(mut self, x: &str) -> Self {
        self.ocr_blocklist = x.to_string();
        self
    }

    pub fn with_ocr_command(mut self, command: &[&str]) -> Self {
        self.ocr_command = command.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_max_frames(mut self, n: u64) -> Self {
        self.max_frames = Some(n);
        self
    }

    pub fn with_queue_capacity(mut self, n: usize) -> Self {
        self.queue_capacity = Some(n);
        self
    }

    pub fn with_output_dir(mut self, dir: &Path) -> Self {
        self.output_dir = Some(dir.to_path_buf());
        self
    }

    pub fn with_save_crops(mut self, x: bool) -> Self {
        self.save_crops = x;
        self
    }

    pub fn with_font_path(mut self, path: &Path) -> Self {
        self.font_path = Some(path.to_path_buf());
        self
    }
}
