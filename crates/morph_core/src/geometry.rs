//! Geometry values
//!
//! Two small `Copy` types: [`Vector`] for 2D math and [`Rect`] for pixel
//! rectangles coming out of a layout read.

use std::ops::{Add, Div, Mul, Sub};

/// 2D vector
///
/// Arithmetic is componentwise. The `*_local` methods mutate in place and
/// return `&mut Self` so calls can be chained.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };
    pub const ONE: Vector = Vector { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Copy the components of `other` into `self`
    pub fn reset(&mut self, other: Vector) -> &mut Self {
        self.x = other.x;
        self.y = other.y;
        self
    }

    pub fn reset_values(&mut self, x: f32, y: f32) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn add(&self, other: Vector) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: Vector) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, other: Vector) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }

    pub fn divide(&self, other: Vector) -> Self {
        Self::new(self.x / other.x, self.y / other.y)
    }

    pub fn add_local(&mut self, other: Vector) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self
    }

    pub fn subtract_local(&mut self, other: Vector) -> &mut Self {
        self.x -= other.x;
        self.y -= other.y;
        self
    }

    pub fn multiply_local(&mut self, other: Vector) -> &mut Self {
        self.x *= other.x;
        self.y *= other.y;
        self
    }

    pub fn divide_local(&mut self, other: Vector) -> &mut Self {
        self.x /= other.x;
        self.y /= other.y;
        self
    }

    /// Componentwise reciprocal `(1/x, 1/y)`
    pub fn recip(&self) -> Self {
        Self::ONE.divide(*self)
    }

    /// Both components are neither infinite nor NaN
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::add(&self, rhs)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        self.subtract(rhs)
    }
}

impl Mul for Vector {
    type Output = Vector;

    fn mul(self, rhs: Vector) -> Vector {
        self.multiply(rhs)
    }
}

impl Div for Vector {
    type Output = Vector;

    fn div(self, rhs: Vector) -> Vector {
        self.divide(rhs)
    }
}

impl From<(f32, f32)> for Vector {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Pixel rectangle, in the shape of a bounding client rect
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        left: 0.0,
        top: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Top-left corner
    pub fn position(&self) -> Vector {
        Vector::new(self.left, self.top)
    }

    /// Width and height
    pub fn dimension(&self) -> Vector {
        Vector::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Offset the rect by a delta
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Rect::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    pub fn contains(&self, point: Vector) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ops_chain() {
        let mut v = Vector::new(10.0, 20.0);
        v.divide_local(Vector::new(10.0, 10.0))
            .subtract_local(Vector::new(0.5, 0.5))
            .multiply_local(Vector::new(4.0, 2.0));
        assert_eq!(v, Vector::new(2.0, 3.0));
    }

    #[test]
    fn test_value_ops_leave_receiver_untouched() {
        let a = Vector::new(1.0, 2.0);
        let b = a.add(Vector::new(1.0, 1.0));
        assert_eq!(a, Vector::new(1.0, 2.0));
        assert_eq!(b, Vector::new(2.0, 3.0));
        assert_eq!(a * b, Vector::new(2.0, 6.0));
        assert_eq!(b - a, Vector::ONE);
    }

    #[test]
    fn test_reset() {
        let mut v = Vector::ZERO;
        v.reset_values(3.0, 4.0);
        assert_eq!(v, Vector::new(3.0, 4.0));
        v.reset(Vector::ONE);
        assert_eq!(v, Vector::ONE);
    }

    #[test]
    fn test_recip_and_finite() {
        assert_eq!(Vector::new(2.0, 4.0).recip(), Vector::new(0.5, 0.25));
        assert!(!Vector::new(1.0, 0.0).recip().is_finite());
        assert!(!Vector::new(0.0, 0.0).divide(Vector::ZERO).is_finite());
    }

    #[test]
    fn test_rect_accessors() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.position(), Vector::new(10.0, 20.0));
        assert_eq!(r.dimension(), Vector::new(30.0, 40.0));
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
        assert!(r.contains(Vector::new(15.0, 25.0)));
        assert!(!r.contains(Vector::new(5.0, 25.0)));
        assert_eq!(r.offset(1.0, -1.0), Rect::new(11.0, 19.0, 30.0, 40.0));
    }
}
