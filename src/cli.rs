//! Command line arguments for the `lpr_stream` binary.

use std::path::PathBuf;
use clap::Parser;
use crate::data::LprConfig;
use crate::error::ConfigError;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(author, version, about = "Real-time license plate detection and recognition")]
pub struct CliArgs {
    /// JSON config file. Defaults to the per-user config when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Image file or directory of frames.
    #[arg(long)]
    pub input: PathBuf,

    /// Directory for annotated frames.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Stop after this many frames.
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// ONNX model path.
    #[arg(long)]
    pub model: Option<String>,

    /// Score threshold.
    #[arg(long)]
    pub conf: Option<f32>,

    /// NMS IoU threshold.
    #[arg(long)]
    pub nms: Option<f32>,

    /// Square model input size.
    #[arg(long)]
    pub tsize: Option<u32>,

    /// TrueType font for labels on saved frames.
    #[arg(long)]
    pub font: Option<PathBuf>,
}

impl CliArgs {
    /// Applies the flags given on the command line over `config`, then validates it.
    pub fn apply(&self, mut config: LprConfig) -> Result<LprConfig, ConfigError> {
        if let Some(model) = &self.model {
            config = config.with_model(model);
        }
        if let Some(dir) = &self.output {
            config = config.with_output_dir(dir);
        }
        if let Some(n) = self.max_frames {
            config = config.with_max_frames(n);
        }
        if let Some(conf) = self.conf {
            config = config.with_score_thr(conf);
        }
        if let Some(nms) = self.nms {
            config = config.with_nms_thr(nms);
        }
        if let Some(size) = self.tsize {
            config = config.with_input_size(size, size);
        }
        if let Some(font) = &self.font {
            config = config.with_font_path(font);
        }
        config.validate()?;
        Ok(config)
    }
}
