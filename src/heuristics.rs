//! Distance functions used as search heuristics.

/// Straight line distance between two configurations.
pub fn euclidean<T: Copy + Into<f64>>(start: &[T], end: &[T]) -> f64 {
    start
        .iter()
        .zip(end)
        .map(|(&a, &b)| {
            let d = b.into() - a.into();
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Sum of the absolute per axis differences.
pub fn manhattan<T: Copy + Into<f64>>(start: &[T], end: &[T]) -> f64 {
    start
        .iter()
        .zip(end)
        .map(|(&a, &b)| (b.into() - a.into()).abs())
        .sum()
}

/// Heuristic selector for the grid planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    Euclidean,
    #[default]
    Manhattan,
}

impl Heuristic {
    /// `"euclidean"` selects [`Heuristic::Euclidean`], anything else falls back
    /// to [`Heuristic::Manhattan`].
    pub fn from_name(name: &str) -> Self {
        if name == "euclidean" {
            Self::Euclidean
        } else {
            Self::Manhattan
        }
    }

    pub fn evaluate<T: Copy + Into<f64>>(&self, pos: &[T], goal: &[T]) -> f64 {
        match self {
            Self::Euclidean => euclidean(goal, pos),
            Self::Manhattan => manhattan(goal, pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let a = [0i32, 0];
        let b = [3i32, 4];
        assert_eq!(euclidean(&a, &b), 5.0);
        assert_eq!(manhattan(&a, &b), 7.0);
        assert_eq!(manhattan(&[1.5f32, -1.0], &[0.5, 1.0]), 3.0);
    }

    #[test]
    fn unknown_names_fall_back_to_manhattan() {
        assert_eq!(Heuristic::from_name("euclidean"), Heuristic::Euclidean);
        assert_eq!(Heuristic::from_name("euclid"), Heuristic::Manhattan);
        assert_eq!(Heuristic::from_name(""), Heuristic::Manhattan);
    }
}
