//! 2D and 3D point types with integer micrometer coordinates.

use crate::{from_mm, to_mm, Micrometer, Millimeter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A 2D point with integer micrometer coordinates.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: Micrometer,
    pub y: Micrometer,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: Micrometer, y: Micrometer) -> Self {
        Self { x, y }
    }

    /// Create a point from millimeter coordinates.
    #[inline]
    pub fn from_mm(x: Millimeter, y: Millimeter) -> Self {
        Self {
            x: from_mm(x),
            y: from_mm(y),
        }
    }

    /// Dot product, widened to avoid overflow.
    #[inline]
    pub fn dot(&self, other: &Point) -> i128 {
        self.x as i128 * other.x as i128 + self.y as i128 * other.y as i128
    }

    /// 2D cross product (z component of the 3D cross product).
    #[inline]
    pub fn cross(&self, other: &Point) -> i128 {
        self.x as i128 * other.y as i128 - self.y as i128 * other.x as i128
    }

    /// Squared length of the vector from the origin.
    #[inline]
    pub fn length_squared(&self) -> i128 {
        self.dot(self)
    }

    /// Length of the vector from the origin, in micrometers.
    #[inline]
    pub fn length(&self) -> f64 {
        (self.length_squared() as f64).sqrt()
    }

    /// Squared distance to another point.
    #[inline]
    pub fn distance_squared(&self, other: &Point) -> i128 {
        (*self - *other).length_squared()
    }

    /// Distance to another point, in micrometers.
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }

    /// Rotate the vector 90 degrees counter-clockwise.
    #[inline]
    pub fn rotate_90_ccw(&self) -> Point {
        Point::new(-self.y, self.x)
    }

    /// Check whether two points are within `tolerance` of each other.
    #[inline]
    pub fn coincides_with(&self, other: &Point, tolerance: Micrometer) -> bool {
        self.distance_squared(other) <= tolerance as i128 * tolerance as i128
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    #[inline]
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    #[inline]
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Point {
    type Output = Point;
    #[inline]
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl Mul<Micrometer> for Point {
    type Output = Point;
    #[inline]
    fn mul(self, rhs: Micrometer) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", to_mm(self.x), to_mm(self.y))
    }
}

/// A list of 2D points.
pub type Points = Vec<Point>;

/// A 3D point with integer micrometer coordinates.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point3 {
    pub x: Micrometer,
    pub y: Micrometer,
    pub z: Micrometer,
}

impl Point3 {
    /// Create a new 3D point.
    #[inline]
    pub const fn new(x: Micrometer, y: Micrometer, z: Micrometer) -> Self {
        Self { x, y, z }
    }

    /// Create a 3D point from millimeter coordinates.
    #[inline]
    pub fn from_mm(x: Millimeter, y: Millimeter, z: Millimeter) -> Self {
        Self {
            x: from_mm(x),
            y: from_mm(y),
            z: from_mm(z),
        }
    }

    /// Project onto the xy plane.
    #[inline]
    pub fn xy(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl Add for Point3 {
    type Output = Point3;
    #[inline]
    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;
    #[inline]
    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Debug for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A list of 3D points.
pub type Points3 = Vec<Point3>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(3, 4);
        let b = Point::new(1, -2);
        assert_eq!(a + b, Point::new(4, 2));
        assert_eq!(a - b, Point::new(2, 6));
        assert_eq!(-a, Point::new(-3, -4));
        assert_eq!(a * 2, Point::new(6, 8));
    }

    #[test]
    fn test_length_and_distance() {
        let p = Point::new(3, 4);
        assert_eq!(p.length_squared(), 25);
        assert!((p.length() - 5.0).abs() < 1e-12);

        let q = Point::new(0, 0);
        assert_eq!(p.distance_squared(&q), 25);
    }

    #[test]
    fn test_cross_and_dot() {
        let x = Point::new(1, 0);
        let y = Point::new(0, 1);
        assert_eq!(x.cross(&y), 1);
        assert_eq!(y.cross(&x), -1);
        assert_eq!(x.dot(&y), 0);
        assert_eq!(x.dot(&x), 1);
    }

    #[test]
    fn test_coincides_with() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 4);
        assert!(a.coincides_with(&b, 5));
        assert!(!a.coincides_with(&b, 4));
    }

    #[test]
    fn test_from_mm() {
        assert_eq!(Point::from_mm(1.0, -0.5), Point::new(1000, -500));
        assert_eq!(Point3::from_mm(0.1, 0.2, 0.3), Point3::new(100, 200, 300));
    }
}
