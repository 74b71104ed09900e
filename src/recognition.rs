mod command_ocr;
mod ocr_engine;
mod plate_reader;

pub use command_ocr::*;
pub use ocr_engine::*;
pub use plate_reader::*;
