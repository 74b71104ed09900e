/// The plate reading currently shown for the stream.
///
/// Owned by the stream loop. The only way to change it is [`PlateState::accept`], which
/// ignores empty readings so a stale plate keeps being shown through frames where
/// detection or recognition comes up empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlateState {
    plate: String,
    frame_index: Option<u64>,
}

impl PlateState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    /// Index of the frame that produced the current plate, `None` until the first read.
    pub fn frame_index(&self) -> Option<u64> {
        self.frame_index
    }

    pub fn is_empty(&self) -> bool {
        self.plate.is_empty()
    }

    /// Overwrites the reading when `reading` is non-empty. Returns whether it changed.
    pub(crate) fn accept(&mut self, reading: String, frame_index: u64) -> bool {
        if reading.is_empty() {
            return false;
        }
        self.plate = reading;
        self.frame_index = Some(frame_index);
        true
    }
}
