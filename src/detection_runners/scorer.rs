use ndarray::{Array, IxDyn};
use crate::data::X;

/// The opaque detection model.
///
/// Receives the letterboxed NCHW input and returns raw predictions of shape
/// `(N, 5 + C)`, optionally with a leading batch axis of size one. `Ok(None)` means the
/// model produced no output tensor.
pub trait Scorer {
    fn score(&mut self, input: &X) -> anyhow::Result<Option<Array<f32, IxDyn>>>;
}

impl<S: Scorer + ?Sized> Scorer for Box<S> {
    fn score(&mut self, input: &X) -> anyhow::Result<Option<Array<f32, IxDyn>>> {
        (**self).score(input)
    }
}
