mod plate_inference;
pub mod grid_decode;
pub mod image_ops;
pub mod input_wrapper;
pub mod nms;

pub use plate_inference::*;
