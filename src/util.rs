use std::ops::Deref;

use glam::Vec2;

use crate::EPSILON;

/// Intersects the segments `a` and `b`.
/// Collinear overlapping segments intersect at the first shared point along `a`.
pub(crate) fn segment_intersect(a: (Vec2, Vec2), b: (Vec2, Vec2)) -> Option<Intersect> {
    let dir = a.1 - a.0;
    let other = b.1 - b.0;
    let rel = b.0 - a.0;

    let denom = dir.perp_dot(other);
    if denom.abs() < EPSILON {
        return collinear_overlap(a, b);
    }

    let t = rel.perp_dot(other) / denom;
    let u = rel.perp_dot(dir) / denom;

    if (-EPSILON..=1.0 + EPSILON).contains(&t) && (-EPSILON..=1.0 + EPSILON).contains(&u) {
        Some(Intersect::new(a.0 + dir * t, t))
    } else {
        None
    }
}

fn collinear_overlap(a: (Vec2, Vec2), b: (Vec2, Vec2)) -> Option<Intersect> {
    let dir = a.1 - a.0;
    // Parallel but not on the same line
    if (b.0 - a.0).perp_dot(dir).abs() > EPSILON {
        return None;
    }

    let len = dir.length_squared();
    if len < EPSILON {
        // `a` is a single point
        return point_on_segment(a.0, b).then(|| Intersect::new(a.0, 0.0));
    }

    let t0 = (b.0 - a.0).dot(dir) / len;
    let t1 = (b.1 - a.0).dot(dir) / len;
    let (lo, hi) = if t0 < t1 { (t0, t1) } else { (t1, t0) };

    if hi < -EPSILON || lo > 1.0 + EPSILON {
        None
    } else {
        let t = lo.max(0.0);
        Some(Intersect::new(a.0 + dir * t, t))
    }
}

pub(crate) fn point_on_segment(p: Vec2, segment: (Vec2, Vec2)) -> bool {
    let dir = segment.1 - segment.0;
    let rel = p - segment.0;
    if rel.perp_dot(dir).abs() > EPSILON {
        return false;
    }

    let t = rel.dot(dir);
    t >= -EPSILON && t <= dir.length_squared() + EPSILON
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub(crate) struct Intersect {
    pub point: Vec2,
    pub distance: f32,
}

impl Intersect {
    pub fn new(point: Vec2, distance: f32) -> Self {
        Self { point, distance }
    }
}

impl Deref for Intersect {
    type Target = Vec2;

    fn deref(&self) -> &Self::Target {
        &self.point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segments() {
        let hit = segment_intersect(
            (Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0)),
            (Vec2::new(0.0, 2.0), Vec2::new(2.0, 0.0)),
        )
        .expect("Segments cross");

        assert!(hit.point.distance(Vec2::new(1.0, 1.0)) < 1e-5);
        assert!((hit.distance - 0.5).abs() < 1e-5);
    }

    #[test]
    fn disjoint_segments() {
        assert_eq!(
            segment_intersect(
                (Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)),
                (Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0)),
            ),
            None
        );
        assert_eq!(
            segment_intersect(
                (Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)),
                (Vec2::new(2.0, -1.0), Vec2::new(2.0, 1.0)),
            ),
            None
        );
    }

    #[test]
    fn collinear_segments() {
        let hit = segment_intersect(
            (Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0)),
            (Vec2::new(2.0, 0.0), Vec2::new(6.0, 0.0)),
        )
        .expect("Segments overlap");
        assert_eq!(*hit, Vec2::new(2.0, 0.0));

        assert!(point_on_segment(
            Vec2::new(1.0, 1.0),
            (Vec2::ZERO, Vec2::new(2.0, 2.0))
        ));
    }
}
