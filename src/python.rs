//! Python bindings, built with the `python` feature.

use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::features::FeatureVector;
use crate::pipeline::{Pipeline, TrainedPipeline};

fn to_py_err(err: PipelineError) -> PyErr {
    match err {
        PipelineError::Io { .. } => PyIOError::new_err(err.to_string()),
        PipelineError::Training(_) => PyRuntimeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

#[pyclass(name = "IrisPipeline")]
struct PyIrisPipeline {
    pipeline: Pipeline,
    trained: Option<TrainedPipeline>,
}

impl PyIrisPipeline {
    fn trained(&self) -> PyResult<&TrainedPipeline> {
        self.trained
            .as_ref()
            .ok_or_else(|| PyRuntimeError::new_err("Call fit() before predicting."))
    }
}

#[pymethods]
impl PyIrisPipeline {
    #[new]
    #[pyo3(signature = (config_path = None))]
    fn new(config_path: Option<String>) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => PipelineConfig::load(path).map_err(to_py_err)?,
            None => PipelineConfig::default(),
        };
        Ok(PyIrisPipeline {
            pipeline: Pipeline::new(config).map_err(to_py_err)?,
            trained: None,
        })
    }

    /// Trains on the file at `path`, replacing any earlier model.
    fn fit(&mut self, path: String) -> PyResult<()> {
        self.trained = Some(self.pipeline.train_from_path(path).map_err(to_py_err)?);
        Ok(())
    }

    fn predict_single(&self, features: Vec<f32>) -> PyResult<String> {
        let trained = self.trained()?;
        let vector = FeatureVector::try_from_slice(&features).map_err(to_py_err)?;
        Ok(trained.predict(&vector).map_err(to_py_err)?.label)
    }

    fn predict(&self, batch: Vec<Vec<f32>>) -> PyResult<Vec<String>> {
        let trained = self.trained()?;
        let vectors = batch
            .iter()
            .map(|features| FeatureVector::try_from_slice(features))
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_py_err)?;
        let predictions = trained.predict_batch(&vectors).map_err(to_py_err)?;
        Ok(predictions.into_iter().map(|p| p.label).collect())
    }

    #[getter]
    fn labels(&self) -> PyResult<Vec<String>> {
        Ok(self.trained()?.label_map().labels().to_vec())
    }
}

/// The name of this function must match the `lib.name` in `Cargo.toml`.
#[pymodule]
fn iris_pipeline(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyIrisPipeline>()?;
    Ok(())
}
