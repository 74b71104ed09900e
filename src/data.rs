mod config_lpr;
mod time_calc;

pub use config_lpr::*;
pub use time_calc::TimeCalc;

pub use crate::detection_runners::plate_detector::image_ops::Letterboxed;
pub use crate::detection_runners::plate_detector::input_wrapper::X;
