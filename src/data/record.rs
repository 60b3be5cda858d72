/// One parsed Iris example. Measurements are in centimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct IrisRecord {
    pub sepal_length: f32,
    pub sepal_width: f32,
    pub petal_length: f32,
    pub petal_width: f32,
    pub label: String,
}

impl IrisRecord {
    pub fn new(
        sepal_length: f32,
        sepal_width: f32,
        petal_length: f32,
        petal_width: f32,
        label: impl Into<String>,
    ) -> Self {
        IrisRecord {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
            label: label.into(),
        }
    }
}
