//! Overlap tests shared by the levels.
//!
//! Every level stores its actors as top-left `(x, y, w, h)` boxes or as
//! circle centres in arena coordinates (y grows downward).  Rectangle overlap
//! is strict: boxes that only touch along an edge do not collide.

use bevy::math::{Rect, Vec2};

/// Axis-aligned box from a top-left corner and a size.
#[inline]
pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::new(x, y, x + w, y + h)
}

/// Strict AABB overlap.
#[inline]
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && b.min.x < a.max.x && a.min.y < b.max.y && b.min.y < a.max.y
}

/// Circles overlap when their centre distance is below the sum of the radii.
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    within_distance(a, b, ra + rb)
}

/// `true` when `a` and `b` are strictly closer than `threshold`.
#[inline]
pub fn within_distance(a: Vec2, b: Vec2, threshold: f32) -> bool {
    a.distance_squared(b) < threshold * threshold
}

/// Point inside a box, edges inclusive (used for mouse picking).
#[inline]
pub fn point_in_rect(p: Vec2, r: Rect) -> bool {
    p.x >= r.min.x && p.x <= r.max.x && p.y >= r.min.y && p.y <= r.max.y
}

/// Point inside or on a circle.
#[inline]
pub fn point_in_circle(p: Vec2, centre: Vec2, radius: f32) -> bool {
    p.distance_squared(centre) <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_hits_building_then_clears_it() {
        let plane = rect(100.0, 100.0, 80.0, 40.0);
        assert!(rects_overlap(plane, rect(150.0, 110.0, 50.0, 50.0)));
        assert!(!rects_overlap(plane, rect(300.0, 110.0, 50.0, 50.0)));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(!rects_overlap(a, rect(10.0, 0.0, 10.0, 10.0)));
        assert!(!rects_overlap(a, rect(0.0, 10.0, 10.0, 10.0)));
        assert!(rects_overlap(a, rect(9.5, 9.5, 10.0, 10.0)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = rect(5.0, 5.0, 20.0, 5.0);
        let b = rect(10.0, 0.0, 2.0, 40.0);
        assert_eq!(rects_overlap(a, b), rects_overlap(b, a));
        assert!(rects_overlap(a, b));
    }

    #[test]
    fn distance_threshold_is_strict() {
        let a = Vec2::ZERO;
        assert!(within_distance(a, Vec2::new(26.9, 0.0), 27.0));
        assert!(!within_distance(a, Vec2::new(27.0, 0.0), 27.0));
        assert!(circles_overlap(a, 10.0, Vec2::new(0.0, 19.0), 10.0));
        assert!(!circles_overlap(a, 10.0, Vec2::new(0.0, 21.0), 10.0));
    }

    #[test]
    fn picking_includes_edges() {
        let card = rect(20.0, 20.0, 100.0, 150.0);
        assert!(point_in_rect(Vec2::new(20.0, 170.0), card));
        assert!(!point_in_rect(Vec2::new(121.0, 50.0), card));
        assert!(point_in_circle(Vec2::new(3.0, 4.0), Vec2::ZERO, 5.0));
    }
}
