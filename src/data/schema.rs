//! Explicit column layout of a delimited dataset.

use std::collections::HashSet;

use crate::error::{PipelineError, Result};

/// Number of numeric features in an Iris record.
pub const FEATURE_COUNT: usize = 4;

/// Type of the values stored in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Float,
    Text,
}

/// One column of the schema: what it is called, what it holds and where it
/// sits in a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub source_index: usize,
}

impl ColumnSpec {
    pub const fn new(name: &'static str, kind: ColumnKind, source_index: usize) -> Self {
        ColumnSpec { name, kind, source_index }
    }
}

/// Ordered list of columns. Float columns, in the order they are listed, become
/// the features of a record; the single text column is its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
    feature_indices: [usize; FEATURE_COUNT],
    label_index: usize,
}

impl Schema {
    /// Builds a schema, checking that source indices are unique and that there
    /// are exactly four float columns and one text column.
    pub fn new(columns: Vec<ColumnSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.source_index) {
                return Err(PipelineError::Schema(format!(
                    "source index {} is used by more than one column",
                    column.source_index
                )));
            }
        }

        let floats: Vec<usize> = columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Float)
            .map(|c| c.source_index)
            .collect();
        let feature_indices: [usize; FEATURE_COUNT] = floats.as_slice().try_into().map_err(|_| {
            PipelineError::Schema(format!(
                "expected {FEATURE_COUNT} float columns, found {}",
                floats.len()
            ))
        })?;

        let texts: Vec<usize> = columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Text)
            .map(|c| c.source_index)
            .collect();
        let label_index = match texts.as_slice() {
            [index] => *index,
            other => {
                return Err(PipelineError::Schema(format!(
                    "expected exactly one text label column, found {}",
                    other.len()
                )));
            }
        };

        // Every field of a line must be claimed by a column.
        if let Some(max) = columns.iter().map(|c| c.source_index).max() {
            if max + 1 != columns.len() {
                return Err(PipelineError::Schema(format!(
                    "source indices must cover 0..{} without gaps",
                    columns.len()
                )));
            }
        }

        Ok(Schema {
            columns,
            feature_indices,
            label_index,
        })
    }

    /// The layout of the Iris text files: four measurements followed by the
    /// species name.
    pub fn iris() -> Self {
        Schema {
            columns: vec![
                ColumnSpec::new("SepalLength", ColumnKind::Float, 0),
                ColumnSpec::new("SepalWidth", ColumnKind::Float, 1),
                ColumnSpec::new("PetalLength", ColumnKind::Float, 2),
                ColumnSpec::new("PetalWidth", ColumnKind::Float, 3),
                ColumnSpec::new("Label", ColumnKind::Text, 4),
            ],
            feature_indices: [0, 1, 2, 3],
            label_index: 4,
        }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Number of fields expected on every line.
    pub fn field_count(&self) -> usize {
        self.columns.len()
    }

    /// Source indices of the feature columns, in feature order.
    pub fn feature_indices(&self) -> &[usize; FEATURE_COUNT] {
        &self.feature_indices
    }

    pub fn label_index(&self) -> usize {
        self.label_index
    }

    /// Name of the column read from `source_index`, used in parse errors.
    pub fn column_name(&self, source_index: usize) -> &'static str {
        self.columns
            .iter()
            .find(|c| c.source_index == source_index)
            .map_or("?", |c| c.name)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Schema::iris()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iris_schema_matches_validated_construction() {
        let built = Schema::new(Schema::iris().columns().to_vec()).unwrap();
        assert_eq!(built, Schema::iris());
        assert_eq!(built.field_count(), 5);
        assert_eq!(built.label_index(), 4);
    }

    #[test]
    fn test_schema_allows_reordered_columns() {
        let schema = Schema::new(vec![
            ColumnSpec::new("Label", ColumnKind::Text, 0),
            ColumnSpec::new("SepalLength", ColumnKind::Float, 1),
            ColumnSpec::new("SepalWidth", ColumnKind::Float, 2),
            ColumnSpec::new("PetalLength", ColumnKind::Float, 3),
            ColumnSpec::new("PetalWidth", ColumnKind::Float, 4),
        ])
        .unwrap();
        assert_eq!(schema.feature_indices(), &[1, 2, 3, 4]);
        assert_eq!(schema.label_index(), 0);
        assert_eq!(schema.column_name(2), "SepalWidth");
    }

    #[test]
    fn test_schema_rejects_duplicate_index() {
        let err = Schema::new(vec![
            ColumnSpec::new("A", ColumnKind::Float, 0),
            ColumnSpec::new("B", ColumnKind::Float, 0),
            ColumnSpec::new("C", ColumnKind::Float, 1),
            ColumnSpec::new("D", ColumnKind::Float, 2),
            ColumnSpec::new("Label", ColumnKind::Text, 3),
        ])
        .unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }

    #[test]
    fn test_schema_rejects_wrong_float_count() {
        let err = Schema::new(vec![
            ColumnSpec::new("A", ColumnKind::Float, 0),
            ColumnSpec::new("Label", ColumnKind::Text, 1),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("expected 4 float columns"));
    }

    #[test]
    fn test_schema_rejects_gaps() {
        let err = Schema::new(vec![
            ColumnSpec::new("A", ColumnKind::Float, 0),
            ColumnSpec::new("B", ColumnKind::Float, 1),
            ColumnSpec::new("C", ColumnKind::Float, 2),
            ColumnSpec::new("D", ColumnKind::Float, 3),
            ColumnSpec::new("Label", ColumnKind::Text, 7),
        ])
        .unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }
}
