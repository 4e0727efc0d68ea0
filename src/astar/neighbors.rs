use itertools::Itertools;

use crate::GridConfiguration;

/// Which grid moves are generated when a node is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Neighborhood {
    /// One unit along a single axis, `2 * dim` neighbors
    #[default]
    Axis,
    /// Axis moves plus one unit along each of two axes at once
    Diagonal,
}

impl Neighborhood {
    /// `"diagonal"` selects [`Neighborhood::Diagonal`], anything else
    /// [`Neighborhood::Axis`]
    pub fn from_name(name: &str) -> Self {
        if name == "diagonal" {
            Self::Diagonal
        } else {
            Self::Axis
        }
    }

    pub fn neighbors(&self, pos: &GridConfiguration) -> Vec<GridConfiguration> {
        let dim = pos.len();
        let axis = (0..dim).cartesian_product([-1, 1]).map(|(i, u)| {
            let mut next = pos.clone();
            next[i] += u;
            next
        });

        match self {
            Self::Axis => axis.collect_vec(),
            Self::Diagonal => {
                let diagonal = (0..dim)
                    .tuple_combinations()
                    .cartesian_product([(-1, -1), (-1, 1), (1, -1), (1, 1)])
                    .map(|((i, j), (u, v))| {
                        let mut next = pos.clone();
                        next[i] += u;
                        next[j] += v;
                        next
                    });

                axis.chain(diagonal).collect_vec()
            }
        }
    }

    /// Returns true if `b` is reachable from `a` in a single move
    pub fn is_move(&self, a: &GridConfiguration, b: &GridConfiguration) -> bool {
        if a.len() != b.len() {
            return false;
        }

        let mut changed = 0;
        for (x, y) in a.iter().zip(b) {
            match (x - y).abs() {
                0 => {}
                1 => changed += 1,
                _ => return false,
            }
        }

        match self {
            Self::Axis => changed == 1,
            Self::Diagonal => changed == 1 || changed == 2,
        }
    }
}
