use std::{cmp::Ordering, collections::BinaryHeap};

use ordered_float::NotNan;

use crate::{PlanError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry<K> {
    score: NotNan<f64>,
    key: K,
}

// Order by lowest score, then by lowest key
impl<K: Ord> PartialOrd for Entry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for Entry<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.key.cmp(&self.key))
    }
}

/// Min priority queue of `(score, key)` pairs.
///
/// Equal scores are popped in ascending key order.
#[derive(Debug, Clone)]
pub struct Frontier<K> {
    open: BinaryHeap<Entry<K>>,
}

impl<K: Ord> Default for Frontier<K> {
    fn default() -> Self {
        Self {
            open: BinaryHeap::new(),
        }
    }
}

impl<K: Ord> Frontier<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails if the score is NaN
    pub fn push(&mut self, score: f64, key: K) -> Result<()> {
        let score = NotNan::new(score).map_err(|_| {
            PlanError::InternalInconsistency("frontier score is not a number".into())
        })?;

        self.open.push(Entry { score, key });
        Ok(())
    }

    /// Removes the entry with the lowest score
    pub fn pop(&mut self) -> Option<(f64, K)> {
        self.open
            .pop()
            .map(|entry| (entry.score.into_inner(), entry.key))
    }

    pub fn peek(&self) -> Option<(f64, &K)> {
        self.open
            .peek()
            .map(|entry| (entry.score.into_inner(), &entry.key))
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn clear(&mut self) {
        self.open.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_lowest_score_first() {
        let mut frontier = Frontier::new();
        frontier.push(3.0, 'c').unwrap();
        frontier.push(1.0, 'a').unwrap();
        frontier.push(2.0, 'b').unwrap();

        assert_eq!(frontier.len(), 3);
        assert_eq!(frontier.peek(), Some((1.0, &'a')));

        let order: Vec<_> = std::iter::from_fn(|| frontier.pop()).collect();
        assert_eq!(order, vec![(1.0, 'a'), (2.0, 'b'), (3.0, 'c')]);
        assert!(frontier.is_empty());
    }

    #[test]
    fn ties_broken_by_key() {
        let mut frontier = Frontier::new();
        for key in [5, 2, 9, 1] {
            frontier.push(1.0, key).unwrap();
        }

        let keys: Vec<_> = std::iter::from_fn(|| frontier.pop().map(|v| v.1)).collect();
        assert_eq!(keys, vec![1, 2, 5, 9]);
    }

    #[test]
    fn nan_rejected() {
        let mut frontier = Frontier::new();
        assert!(frontier.push(f64::NAN, 0).is_err());
        assert!(frontier.is_empty());
    }
}
