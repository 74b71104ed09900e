use crate::common::LprFrame;
use crate::frame_io::{FrameReport, FrameSink, SinkControl};

/// Headless display: reports plate changes through the log.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    shown: String,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The plate string last reported.
    pub fn shown(&self) -> &str {
        &self.shown
    }
}

impl FrameSink for LogSink {
    fn emit(&mut self, frame: &LprFrame, report: &FrameReport) -> anyhow::Result<SinkControl> {
        for det in &report.detections {
            log::debug!(
                "Frame {}: class {} score {:.3} box {:?}",
                frame.index,
                det.class_id,
                det.score,
                det.bbox.as_x0y0_x1y1()
            );
        }
        if report.plate.plate() != self.shown {
            self.shown = report.plate.plate().to_string();
            log::info!("Plate: {}", self.shown);
        }
        Ok(SinkControl::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PlateState;
    use image::RgbImage;

    fn report(plate: &str) -> FrameReport {
        let mut state = PlateState::new();
        state.accept(plate.to_string(), 0);
        FrameReport {
            plate: state,
            ..Default::default()
        }
    }

    #[test]
    fn tracks_the_last_shown_plate() {
        let mut sink = LogSink::new();
        let frame = LprFrame::new(0, RgbImage::new(2, 2));
        assert_eq!(sink.shown(), "");

        assert_eq!(sink.emit(&frame, &report("AB12")).unwrap(), SinkControl::Continue);
        assert_eq!(sink.shown(), "AB12");
        sink.emit(&frame, &report("")).unwrap();
        assert_eq!(sink.shown(), "");
    }
}
