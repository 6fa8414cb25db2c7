//! 2D value types shared by the physics core and the scenes that drive it.
//!
//! Coordinates are screen-space: +x to the right, +y downward. A rectangle's
//! `top` is therefore its smallest y and `bottom` its largest.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A 2D vector of `f32` components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn magnitude(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction. A zero-length vector stays zero
    /// instead of producing NaN components.
    pub fn normalized(self) -> Vec2 {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Vec2::ZERO;
        }
        self / mag
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, scalar: f32) -> Vec2 {
        Vec2::new(self.x * scalar, self.y * scalar)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;

    fn div(self, scalar: f32) -> Vec2 {
        Vec2::new(self.x / scalar, self.y / scalar)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Copy of this rectangle moved by `offset`.
    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Strict AABB overlap: rectangles that only share an edge do not
    /// collide.
    pub fn collides_with(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Half-open containment: the left/top edges are inside, right/bottom are not.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Width and height of the intersection, or `None` when the rectangles
    /// do not strictly overlap.
    pub fn overlap(&self, other: &Rect) -> Option<Vec2> {
        if !self.collides_with(other) {
            return None;
        }
        let w = self.right().min(other.right()) - self.left().max(other.left());
        let h = self.bottom().min(other.bottom()) - self.top().max(other.top());
        Some(Vec2::new(w, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_arithmetic() {
        let a = Vec2::new(3.0, 4.0);
        let b = Vec2::new(1.0, -2.0);
        assert_eq!(a + b, Vec2::new(4.0, 2.0));
        assert_eq!(a - b, Vec2::new(2.0, 6.0));
        assert_eq!(a * 2.0, Vec2::new(6.0, 8.0));
        assert_eq!(a / 2.0, Vec2::new(1.5, 2.0));
        assert_eq!(-a, Vec2::new(-3.0, -4.0));
        assert_eq!(a.magnitude(), 5.0);
    }

    #[test]
    fn normalized_has_unit_length() {
        let n = Vec2::new(3.0, 4.0).normalized();
        assert!((n.magnitude() - 1.0).abs() < 1e-6);
        assert!((n.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn normalized_zero_vector_is_zero() {
        let n = Vec2::ZERO.normalized();
        assert_eq!(n, Vec2::ZERO);
        assert!(n.is_finite());
    }

    #[test]
    fn rect_edges() {
        let r = Rect::new(10.0, 20.0, 32.0, 64.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 42.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 84.0);
        assert_eq!(r.center(), Vec2::new(26.0, 52.0));
    }

    #[test]
    fn overlapping_rects_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.collides_with(&b));
        assert!(b.collides_with(&a));
        assert_eq!(a.overlap(&b), Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.collides_with(&right));
        assert!(!a.collides_with(&below));
        assert_eq!(a.overlap(&right), None);
    }

    #[test]
    fn contains_point_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(Vec2::new(0.0, 0.0)));
        assert!(r.contains_point(Vec2::new(9.9, 9.9)));
        assert!(!r.contains_point(Vec2::new(10.0, 5.0)));
    }

    #[test]
    fn translated_keeps_size() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0).translated(Vec2::new(-1.0, 1.0));
        assert_eq!(r, Rect::new(0.0, 3.0, 3.0, 4.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn collision_is_symmetric(
                ax in -100.0f32..100.0, ay in -100.0f32..100.0,
                bx in -100.0f32..100.0, by in -100.0f32..100.0,
                w in 1.0f32..50.0, h in 1.0f32..50.0,
            ) {
                let a = Rect::new(ax, ay, w, h);
                let b = Rect::new(bx, by, h, w);
                prop_assert_eq!(a.collides_with(&b), b.collides_with(&a));
            }

            #[test]
            fn overlap_is_positive_when_present(
                ax in -100.0f32..100.0, ay in -100.0f32..100.0,
                bx in -100.0f32..100.0, by in -100.0f32..100.0,
            ) {
                let a = Rect::new(ax, ay, 40.0, 40.0);
                let b = Rect::new(bx, by, 30.0, 60.0);
                if let Some(o) = a.overlap(&b) {
                    prop_assert!(o.x > 0.0 && o.y > 0.0);
                }
            }
        }
    }
}
