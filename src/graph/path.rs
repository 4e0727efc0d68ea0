use std::ops::{Deref, DerefMut};

use crate::{heuristics::euclidean, Configuration};

/// Ordered sequence of configurations from start to goal, both inclusive.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Path<P> {
    points: Vec<P>,
}

impl<P> Path<P> {
    pub fn new(points: Vec<P>) -> Self {
        Self { points }
    }

    /// Get a reference to the path's points.
    pub fn points(&self) -> &[P] {
        self.points.as_ref()
    }

    pub fn push(&mut self, value: P) {
        self.points.push(value)
    }

    pub fn into_inner(self) -> Vec<P> {
        self.points
    }

    pub fn start(&self) -> Option<&P> {
        self.points.first()
    }

    pub fn goal(&self) -> Option<&P> {
        self.points.last()
    }
}

impl Path<Configuration> {
    /// Sum of the euclidean lengths of all segments
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| euclidean(&w[0], &w[1]))
            .sum()
    }
}

impl<P> FromIterator<P> for Path<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<P> IntoIterator for Path<P> {
    type Item = P;
    type IntoIter = std::vec::IntoIter<P>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<P> Deref for Path<P> {
    type Target = [P];

    fn deref(&self) -> &Self::Target {
        self.points.deref()
    }
}

impl<P> DerefMut for Path<P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.points.deref_mut()
    }
}
