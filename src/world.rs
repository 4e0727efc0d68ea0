use glam::Vec2;

use crate::{CollisionChecker, Limit, Shape};

/// A bounded 2d scene of polygon obstacles.
///
/// Configurations are interpreted as `[x, y]`; extra coordinates are ignored.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct World {
    limits: [Limit; 2],
    shapes: Vec<Shape>,
}

impl World {
    pub fn new(limits: [Limit; 2], shapes: Vec<Shape>) -> Self {
        Self { limits, shapes }
    }

    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape)
    }

    /// Get a reference to the world's shapes.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }
}

fn to_vec2(point: &[f32]) -> Vec2 {
    match point {
        [x, y, ..] => Vec2::new(*x, *y),
        [x] => Vec2::new(*x, 0.0),
        [] => Vec2::ZERO,
    }
}

impl CollisionChecker for World {
    fn point_in_collision(&self, point: &[f32]) -> bool {
        let p = to_vec2(point);
        self.shapes.iter().any(|shape| shape.contains(p))
    }

    fn line_in_collision(&self, a: &[f32], b: &[f32]) -> bool {
        let (p, q) = (to_vec2(a), to_vec2(b));
        self.shapes
            .iter()
            .any(|shape| shape.intersects_segment(p, q))
    }

    fn environment_limits(&self) -> &[Limit] {
        &self.limits
    }
}
