use std::time::Duration;

/// Timing for a single frame, recomputed every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameMetrics {
    /// Time spent in the detector adapter (preprocess, scorer, postprocess).
    pub inference_latency: Duration,
    /// Frames per second derived from the end-to-end time of this frame, emit included.
    pub fps: f32,
}

impl FrameMetrics {
    pub fn new(inference_latency: Duration, frame_time: Duration) -> Self {
        let secs = frame_time.as_secs_f32();
        let fps = if secs > 0. { 1. / secs } else { 0. };
        Self {
            inference_latency,
            fps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_is_inverse_of_frame_time() {
        let m = FrameMetrics::new(Duration::from_millis(10), Duration::from_millis(40));
        assert!((m.fps - 25.).abs() < 1e-3);
    }

    #[test]
    fn zero_frame_time_reports_zero_fps() {
        let m = FrameMetrics::new(Duration::ZERO, Duration::ZERO);
        assert_eq!(m.fps, 0.);
    }
}
