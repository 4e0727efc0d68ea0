use crate::{Configuration, GridConfiguration};

/// Lower and upper bound of one dimension of the planning space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Limit {
    pub low: f32,
    pub high: f32,
}

impl Limit {
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// Returns true if `value` lies within the closed interval
    pub fn contains(&self, value: f32) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Answers collision queries against the environment.
///
/// Configurations passed in are expected to have as many dimensions as
/// [`CollisionChecker::environment_limits`] returns.
pub trait CollisionChecker {
    fn point_in_collision(&self, point: &[f32]) -> bool;

    /// Returns true if any point on the straight segment between `a` and `b`
    /// collides.
    fn line_in_collision(&self, a: &[f32], b: &[f32]) -> bool;

    /// Bounds of the planning space, one entry per dimension
    fn environment_limits(&self) -> &[Limit];

    fn dim(&self) -> usize {
        self.environment_limits().len()
    }

    /// Returns true if every coordinate of `point` lies within the limits.
    fn in_limits(&self, point: &[f32]) -> bool {
        let limits = self.environment_limits();
        point.len() == limits.len()
            && point
                .iter()
                .zip(limits)
                .all(|(&val, limit)| limit.contains(val))
    }
}

impl<C: CollisionChecker + ?Sized> CollisionChecker for &C {
    fn point_in_collision(&self, point: &[f32]) -> bool {
        (**self).point_in_collision(point)
    }

    fn line_in_collision(&self, a: &[f32], b: &[f32]) -> bool {
        (**self).line_in_collision(a, b)
    }

    fn environment_limits(&self) -> &[Limit] {
        (**self).environment_limits()
    }
}

/// Draws random collision free configurations.
pub trait FreeSampler {
    /// Returns None if no free configuration could be found
    fn sample_free<C: CollisionChecker + ?Sized>(&mut self, checker: &C) -> Option<Configuration>;

    /// Number of draws the sampler gives up after, used for error reporting
    fn max_attempts(&self) -> usize;
}

/// A configuration that can be handed to a [`CollisionChecker`].
pub trait Position: Clone {
    fn to_configuration(&self) -> Configuration;
}

impl Position for Configuration {
    fn to_configuration(&self) -> Configuration {
        self.clone()
    }
}

impl Position for GridConfiguration {
    fn to_configuration(&self) -> Configuration {
        self.iter().map(|&val| val as f32).collect()
    }
}
