//! Integer geometry used by layout, hit-testing and drawing.
//!
//! All coordinates are `i32`. A dimension of `i32::MAX` means "unbounded"
//! and survives arithmetic that would otherwise shrink it, so a control
//! measured against an unbounded axis keeps seeing an unbounded axis.

use std::ops::{Add, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0,
        height: 0,
    };

    /// No constraint on either axis.
    pub const UNBOUNDED: Size = Size {
        width: i32::MAX,
        height: i32::MAX,
    };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Componentwise maximum.
    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Componentwise minimum.
    pub fn min(self, other: Size) -> Size {
        Size::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// Grow by `other`, saturating at unbounded.
    pub fn saturating_add(self, other: Size) -> Size {
        Size::new(
            self.width.saturating_add(other.width),
            self.height.saturating_add(other.height),
        )
    }

    /// Shrink by `other`, never below zero. Unbounded axes stay unbounded.
    pub fn saturating_sub(self, other: Size) -> Size {
        let shrink = |value: i32, by: i32| {
            if value == i32::MAX {
                value
            } else {
                value.saturating_sub(by).max(0)
            }
        };
        Size::new(
            shrink(self.width, other.width),
            shrink(self.height, other.height),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// An axis-aligned rectangle. `contains` is half-open on the far edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(location: Point, size: Size) -> Self {
        Self::new(location.x, location.y, size.width, size.height)
    }

    /// A rectangle at the origin.
    pub fn from_size(size: Size) -> Self {
        Self::from_parts(Point::ZERO, size)
    }

    pub fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// The overlapping area, or an empty rectangle when there is none.
    pub fn intersection(&self, other: &Rectangle) -> Rectangle {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            Rectangle::new(x, y, 0, 0)
        } else {
            Rectangle::new(x, y, right - x, bottom - y)
        }
    }

    pub fn offset(&self, by: Point) -> Rectangle {
        Rectangle::new(self.x + by.x, self.y + by.y, self.width, self.height)
    }

    /// Shrink by a border on each side, never below zero size.
    pub fn deflate(&self, border: Border) -> Rectangle {
        Rectangle::new(
            self.x + border.left,
            self.y + border.top,
            (self.width - border.horizontal()).max(0),
            (self.height - border.vertical()).max(0),
        )
    }
}

/// Thickness on four sides. Used for margins and padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Border {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Border {
    pub const ZERO: Border = Border::all(0);

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn all(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    pub fn size(&self) -> Size {
        Size::new(self.horizontal(), self.vertical())
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }
}

impl Add for Border {
    type Output = Border;

    fn add(self, rhs: Border) -> Border {
        Border::new(
            self.left + rhs.left,
            self.top + rhs.top,
            self.right + rhs.right,
            self.bottom + rhs.bottom,
        )
    }
}

impl From<skin::Insets> for Border {
    fn from(insets: skin::Insets) -> Self {
        Border::new(insets.left, insets.top, insets.right, insets.bottom)
    }
}

/// A 2-D affine transform stored as a 3×2 matrix.
///
/// Points transform as `(x * m11 + y * m21 + dx, x * m12 + y * m22 + dy)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub m11: f32,
    pub m12: f32,
    pub m21: f32,
    pub m22: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        m11: 1.0,
        m12: 0.0,
        m21: 0.0,
        m22: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    pub const fn translation(x: f32, y: f32) -> Self {
        Matrix {
            dx: x,
            dy: y,
            ..Self::IDENTITY
        }
    }

    pub const fn scale(sx: f32, sy: f32) -> Self {
        Matrix {
            m11: sx,
            m22: sy,
            ..Self::IDENTITY
        }
    }

    /// `self` followed by `other`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            m11: self.m11 * other.m11 + self.m12 * other.m21,
            m12: self.m11 * other.m12 + self.m12 * other.m22,
            m21: self.m21 * other.m11 + self.m22 * other.m21,
            m22: self.m21 * other.m12 + self.m22 * other.m22,
            dx: self.dx * other.m11 + self.dy * other.m21 + other.dx,
            dy: self.dx * other.m12 + self.dy * other.m22 + other.dy,
        }
    }

    pub fn transform_point(&self, point: Point) -> Point {
        let x = point.x as f32;
        let y = point.y as f32;
        Point::new(
            (x * self.m11 + y * self.m21 + self.dx).round() as i32,
            (x * self.m12 + y * self.m22 + self.dy).round() as i32,
        )
    }

    /// Bounding box of the transformed corners.
    pub fn transform_rect(&self, rect: Rectangle) -> Rectangle {
        if *self == Self::IDENTITY {
            return rect;
        }
        let corners = [
            self.transform_point(rect.location()),
            self.transform_point(Point::new(rect.right(), rect.y)),
            self.transform_point(Point::new(rect.x, rect.bottom())),
            self.transform_point(Point::new(rect.right(), rect.bottom())),
        ];
        let min_x = corners.iter().map(|p| p.x).min().unwrap_or(rect.x);
        let min_y = corners.iter().map(|p| p.y).min().unwrap_or(rect.y);
        let max_x = corners.iter().map(|p| p.x).max().unwrap_or(rect.x);
        let max_y = corners.iter().map(|p| p.y).max().unwrap_or(rect.y);
        Rectangle::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn translation_part(&self) -> Point {
        Point::new(self.dx.round() as i32, self.dy.round() as i32)
    }

    pub fn with_translation(mut self, translation: Point) -> Matrix {
        self.dx = translation.x as f32;
        self.dy = translation.y as f32;
        self
    }
}
