//! Axis-aligned bounding box collision
//!
//! Every entity in the arena is a box anchored at its top-left corner. Boxes
//! that merely touch count as overlapping.

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Check whether two boxes overlap
///
/// On each axis the gap between the near edges is compared against the size
/// of whichever box starts first. Ties pick box A, which is harmless: a zero
/// gap never exceeds an unsigned size.
#[inline]
pub fn overlaps(pos_a: Vec2, size_a: UVec2, pos_b: Vec2, size_b: UVec2) -> bool {
    let (x_gap, x_limit) = if pos_a.x <= pos_b.x {
        (pos_b.x - pos_a.x, size_a.x)
    } else {
        (pos_a.x - pos_b.x, size_b.x)
    };
    if (x_limit as f32) < x_gap {
        return false;
    }

    let (y_gap, y_limit) = if pos_a.y <= pos_b.y {
        (pos_b.y - pos_a.y, size_a.y)
    } else {
        (pos_a.y - pos_b.y, size_b.y)
    };
    y_limit as f32 >= y_gap
}

/// A positioned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub position: Vec2,
    pub extent: UVec2,
}

impl Aabb {
    pub fn new(position: Vec2, extent: UVec2) -> Self {
        Self { position, extent }
    }

    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        overlaps(self.position, self.extent, other.position, other.extent)
    }

    /// Same corner, extent grown by `padding` on both axes, saturating at `u32::MAX`
    pub fn padded(&self, padding: u32) -> Self {
        Self {
            position: self.position,
            extent: self.extent.saturating_add(UVec2::splat(padding)),
        }
    }

    /// Bottom-right corner
    pub fn max(&self) -> Vec2 {
        self.position + self.extent.as_vec2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlapping_boxes() {
        let a = Aabb::new(Vec2::new(100.0, 100.0), UVec2::new(40, 40));
        let b = Aabb::new(Vec2::new(120.0, 130.0), UVec2::new(30, 30));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_count() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), UVec2::new(10, 10));
        let right = Aabb::new(Vec2::new(10.0, 0.0), UVec2::new(10, 10));
        let below = Aabb::new(Vec2::new(0.0, 10.0), UVec2::new(10, 10));
        assert!(a.overlaps(&right));
        assert!(a.overlaps(&below));

        let apart = Aabb::new(Vec2::new(10.5, 0.0), UVec2::new(10, 10));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn test_separated_on_one_axis_only() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), UVec2::new(10, 10));
        // Same column, far below
        let b = Aabb::new(Vec2::new(5.0, 50.0), UVec2::new(10, 10));
        assert!(!a.overlaps(&b));
        // Same row, far right
        let c = Aabb::new(Vec2::new(50.0, 5.0), UVec2::new(10, 10));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_containment() {
        let outer = Aabb::new(Vec2::new(0.0, 0.0), UVec2::new(100, 100));
        let inner = Aabb::new(Vec2::new(40.0, 40.0), UVec2::new(5, 5));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_padding_closes_gaps() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), UVec2::new(10, 10));
        let b = Aabb::new(Vec2::new(30.0, 0.0), UVec2::new(10, 10));
        assert!(!a.overlaps(&b));
        assert!(a.padded(30).overlaps(&b.padded(30)));
        assert_eq!(a.padded(30).max(), Vec2::new(40.0, 40.0));
    }

    #[test]
    fn test_huge_padding_saturates() {
        let a = Aabb::new(Vec2::new(5.0, 5.0), UVec2::new(40, 40));
        assert_eq!(a.padded(u32::MAX).extent, UVec2::splat(u32::MAX));
        let b = Aabb::new(Vec2::new(900.0, 700.0), UVec2::new(10, 10));
        assert!(a.padded(u32::MAX).overlaps(&b.padded(u32::MAX)));
    }

    #[test]
    fn test_negative_positions() {
        let a = Aabb::new(Vec2::new(-20.0, -20.0), UVec2::new(15, 15));
        let b = Aabb::new(Vec2::new(0.0, 0.0), UVec2::new(15, 15));
        assert!(!a.overlaps(&b));
        let c = Aabb::new(Vec2::new(-10.0, -10.0), UVec2::new(15, 15));
        assert!(c.overlaps(&b));
    }

    fn arb_box() -> impl Strategy<Value = Aabb> {
        (-500.0f32..1500.0, -500.0f32..1500.0, 0u32..200, 0u32..200)
            .prop_map(|(x, y, w, h)| Aabb::new(Vec2::new(x, y), UVec2::new(w, h)))
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in arb_box(), b in arb_box()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn identical_boxes_overlap(a in arb_box()) {
            prop_assert!(a.overlaps(&a));
        }

        #[test]
        fn padding_never_removes_overlap(a in arb_box(), b in arb_box(), pad in 0u32..64) {
            if a.overlaps(&b) {
                prop_assert!(a.padded(pad).overlaps(&b.padded(pad)));
            }
        }
    }
}
