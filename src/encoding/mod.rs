//! Label encoding stage.

pub mod label_map;

pub use label_map::{LabelMap, LabelOrder};

use crate::data::IrisRecord;

/// Encodes the labels of `records`, returning the map and one code per record.
pub fn encode_labels(records: &[IrisRecord], order: LabelOrder) -> (LabelMap, Vec<usize>) {
    LabelMap::fit(records.iter().map(|r| r.label.as_str()), order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_labels_is_parallel_to_records() {
        let records = vec![
            IrisRecord::new(5.1, 3.5, 1.4, 0.2, "Iris-setosa"),
            IrisRecord::new(7.0, 3.2, 4.7, 1.4, "Iris-versicolor"),
            IrisRecord::new(4.9, 3.0, 1.4, 0.2, "Iris-setosa"),
        ];
        let (map, codes) = encode_labels(&records, LabelOrder::FirstSeen);
        assert_eq!(codes.len(), records.len());
        for (record, code) in records.iter().zip(codes) {
            assert_eq!(map.decode(code).unwrap(), record.label);
        }
    }
}
