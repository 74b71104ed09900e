//! lpr_stream - read license plates from a stream of frames.
//!
//! Frames come from an image file or directory. Each processed frame logs the current
//! plate reading; `--output` saves annotated frames instead of only logging.

use anyhow::{bail, Context, Result};
use clap::Parser;

use lpr_stream::cli::CliArgs;
use lpr_stream::data::LprConfig;
use lpr_stream::recognition::{CommandOcr, PlateReader};
use lpr_stream::region_extractor::RegionExtractor;
use lpr_stream::stream_runner::PlateStream;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CliArgs::parse();

    let config = args.apply(LprConfig::load(args.config.as_deref())?)?;
    if config.model_path.is_empty() {
        bail!("no model configured, set model_path or pass --model");
    }

    let ocr = CommandOcr::new(&config.ocr_command).context("ocr_command must name the OCR program")?;
    let reader = PlateReader::new(ocr, &config.ocr_blocklist)?;
    let detector = lpr_stream::init_detector(&config)?;

    let mut source = lpr_stream::open_source(&config, &args.input)?;
    let mut sink = lpr_stream::open_sink(&config)?;

    let mut stream = PlateStream::new(detector, RegionExtractor::new(config.crop_offset), reader)
        .with_max_frames(config.max_frames);
    let summary = stream.run(&mut source, &mut sink);

    println!("frames: {}", summary.frames);
    println!("plate: {}", summary.plate.plate());
    println!("avg latency: {:.2?}", summary.avg_latency);
    Ok(())
}
