//! Bidirectional mapping between label strings and dense integer codes.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// How codes are assigned to distinct labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelOrder {
    /// Codes follow the order in which labels first appear.
    #[default]
    FirstSeen,
    /// Codes follow the lexicographic order of the labels.
    Sorted,
}

/// Read-only bijection between labels and codes `0..len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    labels: Vec<String>,
    codes: HashMap<String, usize>,
}

impl LabelMap {
    /// Builds the map from a label sequence and returns it with the code of
    /// every label in input order.
    pub fn fit<'a, I>(labels: I, order: LabelOrder) -> (Self, Vec<usize>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut distinct: Vec<String> = Vec::new();
        let mut codes: HashMap<String, usize> = HashMap::new();
        let mut encoded: Vec<usize> = Vec::new();

        for label in labels {
            let code = match codes.get(label) {
                Some(&code) => code,
                None => {
                    let code = distinct.len();
                    distinct.push(label.to_string());
                    codes.insert(label.to_string(), code);
                    code
                }
            };
            encoded.push(code);
        }

        if order == LabelOrder::Sorted {
            // remap[first_seen_code] = sorted_code
            let mut by_label: Vec<usize> = (0..distinct.len()).collect();
            by_label.sort_by(|&a, &b| distinct[a].cmp(&distinct[b]));
            let mut remap = vec![0; distinct.len()];
            for (sorted_code, &first_seen_code) in by_label.iter().enumerate() {
                remap[first_seen_code] = sorted_code;
            }
            for code in encoded.iter_mut() {
                *code = remap[*code];
            }
            distinct.sort();
            for (code, label) in distinct.iter().enumerate() {
                codes.insert(label.clone(), code);
            }
        }

        debug!("label map built with {} labels: {:?}", distinct.len(), distinct);
        (LabelMap { labels: distinct, codes }, encoded)
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.codes.get(label).copied()
    }

    /// Looks a code back up. Codes outside `0..len()` are an error.
    pub fn decode(&self, code: usize) -> Result<&str> {
        self.labels
            .get(code)
            .map(String::as_str)
            .ok_or(PipelineError::UnknownLabel {
                code,
                len: self.labels.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels indexed by code.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
