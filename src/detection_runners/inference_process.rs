use std::time::Instant;
use crate::error::DetectError;
use crate::utils;

pub trait InferenceProcess {
    type Input: ?Sized;
    type Prepared;
    type Raw;
    type Output;

    /// Pre-process the input data.
    fn preprocess(&self, x: &Self::Input) -> Result<Self::Prepared, DetectError>;

    /// Executes the model on the preprocessed data.
    fn inference(&mut self, xs: &Self::Prepared) -> Result<Self::Raw, DetectError>;

    /// Post-process the model's output.
    fn postprocess(&self, ys: Self::Raw, xs: &Self::Prepared) -> Result<Self::Output, DetectError>;

    /// Executes the full pipeline, tracing the time spent in each step.
    fn run(&mut self, x: &Self::Input) -> Result<Self::Output, DetectError> {
        let detect_time = Instant::now();
        let mut elapsed = detect_time.elapsed();

        let xs = self.preprocess(x)?;
        elapsed = utils::trace("TIME", "Preprocessing input", detect_time, elapsed);

        let ys = self.inference(&xs)?;
        elapsed = utils::trace("TIME", "Detection run", detect_time, elapsed);

        let ys = self.postprocess(ys, &xs)?;
        utils::trace("TIME", "Postprocessing", detect_time, elapsed);

        Ok(ys)
    }
}
