use std::path::Path;
use anyhow::Context;
use ndarray::{Array, IxDyn};
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Value,
};
use crate::data::X;
use crate::detection_runners::Scorer;

/// ONNX Runtime session serving as the detector scorer (CPU execution provider).
#[derive(Debug)]
pub struct OrtScorer {
    session: Session,
    output_name: String,
}

impl OrtScorer {
    pub fn new(model_path: &Path, output_name: &str) -> anyhow::Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path)
            .with_context(|| format!("failed to load model {}", model_path.display()))?;

        log::info!("Loaded ORT session from {}", model_path.display());
        Ok(Self {
            session,
            output_name: output_name.to_string(),
        })
    }
}

impl Scorer for OrtScorer {
    fn score(&mut self, input: &X) -> anyhow::Result<Option<Array<f32, IxDyn>>> {
        let input_tensor = Value::from_array(input.0.clone())?;
        let outputs = self.session.run(ort::inputs![input_tensor])?;

        let Some(output_value) = outputs.get(self.output_name.as_str()) else {
            log::warn!("Model produced no `{}` output", self.output_name);
            return Ok(None);
        };
        let (shape, data) = output_value.try_extract_tensor::<f32>()?;
        let shape_usize: Vec<usize> = shape.as_ref().iter().map(|&x| x as usize).collect();

        Ok(Some(Array::from_shape_vec(IxDyn(&shape_usize), data.to_vec())?))
    }
}
