use std::path::PathBuf;

use iris_pipeline::data::load_records;
use iris_pipeline::{FeatureVector, LabelOrder, Pipeline, PipelineConfig, Schema, evaluate};

fn dataset_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/iris-data.txt")
}

#[test]
fn test_bundled_dataset_loads_every_line() {
    let text = std::fs::read_to_string(dataset_path()).unwrap();
    let non_empty = text.lines().filter(|l| !l.trim().is_empty()).count();
    let records = load_records(dataset_path(), Schema::iris(), ',').unwrap();
    assert_eq!(records.len(), non_empty);
    assert_eq!(records.len(), 150);
}

#[test]
fn test_tutorial_prediction_is_a_known_species() {
    let trained = Pipeline::new(PipelineConfig::default())
        .unwrap()
        .train_from_path(dataset_path())
        .unwrap();
    let prediction = trained
        .predict(&FeatureVector::new(3.3, 1.6, 0.2, 5.1).unwrap())
        .unwrap();
    assert!(
        ["Iris-setosa", "Iris-versicolor", "Iris-virginica"].contains(&prediction.label.as_str()),
        "{prediction:?}"
    );
}

#[test]
fn test_bundled_dataset_is_fitted_well() {
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let records = pipeline.load(dataset_path()).unwrap();
    let trained = pipeline.train(&records).unwrap();
    let metrics = evaluate(&trained, &records).unwrap();
    assert!(metrics.accuracy_micro >= 0.85, "{metrics:?}");

    let setosa = trained.predict(&FeatureVector::new(5.0, 3.5, 1.4, 0.25).unwrap()).unwrap();
    assert_eq!(setosa.label, "Iris-setosa");
    let virginica = trained.predict(&FeatureVector::new(7.2, 3.1, 6.2, 2.3).unwrap()).unwrap();
    assert_eq!(virginica.label, "Iris-virginica");
}

#[test]
fn test_repeated_runs_agree_on_held_out_input() {
    let config = PipelineConfig {
        label_order: LabelOrder::Sorted,
        ..PipelineConfig::default()
    };
    let held_out = FeatureVector::new(6.1, 2.8, 4.6, 1.4).unwrap();
    let first = Pipeline::new(config.clone()).unwrap().train_from_path(dataset_path()).unwrap();
    let second = Pipeline::new(config).unwrap().train_from_path(dataset_path()).unwrap();
    assert_eq!(first.predict(&held_out).unwrap(), second.predict(&held_out).unwrap());
}
