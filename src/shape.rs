use glam::Vec2;

use crate::util::{point_on_segment, segment_intersect};

/// Defines a closed 2d polygon obstacle
#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape {
    vertices: Vec<Vec2>,
}

impl Shape {
    pub fn new(vertices: &[Vec2]) -> Self {
        Self {
            vertices: vertices.to_vec(),
        }
    }

    pub fn rect(size: Vec2, origin: Vec2) -> Self {
        let half_size = size / 2.0;
        let vertices = vec![
            Vec2::new(-half_size.x, -half_size.y) + origin,
            Vec2::new(half_size.x, -half_size.y) + origin,
            Vec2::new(half_size.x, half_size.y) + origin,
            Vec2::new(-half_size.x, half_size.y) + origin,
        ];

        Self { vertices }
    }

    /// Get a reference to the shape's vertices.
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn faces(&self) -> Faces {
        Faces {
            vertices: &self.vertices,
            current: 0,
            len: self.vertices.len(),
        }
    }

    /// Returns true if `point` is inside the polygon or on its boundary
    pub fn contains(&self, point: Vec2) -> bool {
        let mut inside = false;
        for face in self.faces() {
            let (a, b) = face.vertices();
            if point_on_segment(point, (a, b)) {
                return true;
            }

            // Crossing number
            if (a.y > point.y) != (b.y > point.y) {
                let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if point.x < x {
                    inside = !inside;
                }
            }
        }

        inside
    }

    /// Returns true if the segment `p`..`q` touches the polygon
    pub fn intersects_segment(&self, p: Vec2, q: Vec2) -> bool {
        self.contains(p)
            || self.contains(q)
            || self
                .faces()
                .any(|face| segment_intersect((p, q), face.vertices()).is_some())
    }
}

/// An edge of a shape, from `vertices[0]` to `vertices[1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    vertices: [Vec2; 2],
}

impl Face {
    pub fn vertices(&self) -> (Vec2, Vec2) {
        (self.vertices[0], self.vertices[1])
    }

    /// Get the face's outward normal, assuming counter clockwise winding.
    pub fn normal(&self) -> Vec2 {
        let dir = (self.vertices[1] - self.vertices[0]).normalize();
        Vec2::new(dir.y, -dir.x)
    }
}

pub struct Faces<'a> {
    vertices: &'a [Vec2],
    current: usize,
    len: usize,
}

impl<'a> Iterator for Faces<'a> {
    type Item = Face;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == self.len {
            return None;
        }

        let a = self.current;
        let b = (self.current + 1) % self.len;

        self.current += 1;

        Some(Face {
            vertices: [self.vertices[a], self.vertices[b]],
        })
    }
}
