mod frame_metrics;
mod lpr_box;
mod lpr_detection;
mod lpr_frame;
mod plate_state;

pub use frame_metrics::*;
pub use lpr_box::*;
pub use lpr_detection::*;
pub use lpr_frame::*;
pub use plate_state::*;
