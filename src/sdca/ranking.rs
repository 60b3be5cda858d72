//! Keeps the K highest-scoring classes seen so far using a binary heap.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use ordered_float::OrderedFloat; // For using f64 in BinaryHeap

/// A class code paired with its score.
#[derive(Debug, Clone, Copy)]
pub struct ScoredClass {
    pub score: OrderedFloat<f64>,
    pub code: usize,
}

impl PartialEq for ScoredClass {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for ScoredClass {}

impl PartialOrd for ScoredClass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredClass {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher score ranks first; on ties the lower code wins.
        self.score
            .cmp(&other.score)
            .then_with(|| other.code.cmp(&self.code))
    }
}

/// Collects the K best classes. The heap holds `Reverse` entries so the
/// weakest kept class sits at the top and can be evicted.
#[derive(Debug)]
pub struct TopClasses {
    capacity: usize,
    heap: BinaryHeap<Reverse<ScoredClass>>,
}

impl TopClasses {
    pub fn new(capacity: usize) -> Self {
        TopClasses {
            capacity,
            heap: BinaryHeap::with_capacity(capacity + 1),
        }
    }

    pub fn add(&mut self, score: f64, code: usize) {
        if self.capacity == 0 {
            return;
        }
        let item = ScoredClass {
            score: OrderedFloat(score),
            code,
        };
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(item));
        } else if let Some(Reverse(weakest)) = self.heap.peek() {
            if item > *weakest {
                self.heap.pop();
                self.heap.push(Reverse(item));
            }
        }
    }

    /// Best class first.
    pub fn into_sorted(self) -> Vec<ScoredClass> {
        // Ascending order of Reverse(..) is descending order of the classes.
        self.heap.into_sorted_vec().into_iter().map(|Reverse(item)| item).collect()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Ranks `scores` (indexed by class code) and keeps the best `k`.
pub fn top_k(scores: &[f64], k: usize) -> Vec<ScoredClass> {
    let mut best = TopClasses::new(k);
    for (code, &score) in scores.iter().enumerate() {
        best.add(score, code);
    }
    best.into_sorted()
}

/// Code of the highest score, lowest code on ties. `None` for no scores.
pub fn argmax(scores: &[f64]) -> Option<usize> {
    top_k(scores, 1).first().map(|best| best.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_k_orders_descending() {
        let ranked = top_k(&[0.1, 0.7, 0.2], 3);
        let codes: Vec<usize> = ranked.iter().map(|c| c.code).collect();
        assert_eq!(codes, vec![1, 2, 0]);
        assert_eq!(ranked[0].score, OrderedFloat(0.7));
    }

    #[test]
    fn test_top_k_truncates() {
        let ranked = top_k(&[0.3, 0.1, 0.5, 0.05], 2);
        let codes: Vec<usize> = ranked.iter().map(|c| c.code).collect();
        assert_eq!(codes, vec![2, 0]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut best = TopClasses::new(0);
        best.add(1.0, 0);
        assert!(best.is_empty());
        assert!(top_k(&[1.0], 0).is_empty());
    }

    #[test]
    fn test_argmax_ties_pick_lowest_code() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some(1));
        assert_eq!(argmax(&[]), None);
    }
}
