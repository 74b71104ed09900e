use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use image::RgbImage;
use crate::error::SourceError;
use crate::frame_io::FrameSource;

type Item = Result<RgbImage, SourceError>;

/// Captures frames on a producer thread into a bounded queue.
///
/// When the queue is full the oldest queued frame is dropped, so the consumer always
/// works on recent frames. Delivery order is arrival order.
#[derive(Debug)]
pub struct SkipAheadSource {
    rx: Receiver<Item>,
    stop: Arc<AtomicBool>,
    dropped: Arc<AtomicU64>,
    producer: Option<JoinHandle<()>>,
}

impl SkipAheadSource {
    pub fn spawn<S>(mut source: S, capacity: usize) -> Self
    where
        S: FrameSource + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
        let stop = Arc::new(AtomicBool::new(false));
        let dropped = Arc::new(AtomicU64::new(0));

        let producer = {
            let oldest = rx.clone();
            let stop = stop.clone();
            let dropped = dropped.clone();
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    let item = match source.next_frame() {
                        Ok(Some(frame)) => Ok(frame),
                        Ok(None) => break,
                        Err(e) => Err(e),
                    };
                    let is_err = item.is_err();
                    push_dropping_oldest(&tx, &oldest, item, &dropped);
                    if is_err {
                        break;
                    }
                }
                log::debug!("Capture thread finished");
            })
        };

        Self {
            rx,
            stop,
            dropped,
            producer: Some(producer),
        }
    }

    /// Frames discarded because the consumer fell behind.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Whether the producer has stopped capturing.
    pub fn is_finished(&self) -> bool {
        self.producer.as_ref().map_or(true, |p| p.is_finished())
    }
}

fn push_dropping_oldest(tx: &Sender<Item>, oldest: &Receiver<Item>, mut item: Item, dropped: &AtomicU64) {
    loop {
        match tx.try_send(item) {
            Ok(()) => return,
            Err(TrySendError::Full(back)) => {
                if oldest.try_recv().is_ok() {
                    let n = dropped.fetch_add(1, Ordering::Relaxed) + 1;
                    log::trace!("Queue full, dropped oldest frame ({} so far)", n);
                }
                item = back;
            }
            Err(TrySendError::Disconnected(_)) => return,
        }
    }
}

impl FrameSource for SkipAheadSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, SourceError> {
        match self.rx.recv() {
            Ok(Ok(frame)) => Ok(Some(frame)),
            Ok(Err(e)) => Err(e),
            // producer gone and queue drained
            Err(_) => Ok(None),
        }
    }
}

impl Drop for SkipAheadSource {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(producer) = self.producer.take() {
            if producer.join().is_err() {
                log::warn!("Capture thread panicked");
            }
        }
    }
}
