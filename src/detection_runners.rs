pub mod inference_process;
pub mod plate_detector;
mod scorer;
#[cfg(feature = "ort-backend")]
mod ort_scorer;

pub use plate_detector::*;
pub use scorer::*;
#[cfg(feature = "ort-backend")]
pub use ort_scorer::*;
