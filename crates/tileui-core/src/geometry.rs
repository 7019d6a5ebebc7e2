#![forbid(unsafe_code)]

//! Geometric primitives for the tile grid.
//!
//! Coordinates are signed tile offsets. A node's [`Rect`] is relative to its
//! parent; absolute positions are resolved by the tree on demand.
//!
//! # Invariants
//!
//! 1. `width >= 0` and `height >= 0` for every constructed `Rect`.
//! 2. Containment and intersection use half-open intervals, so adjacent
//!    rectangles never both claim a boundary tile.
//! 3. Empty rectangles contain nothing and intersect nothing.
//! 4. `translate` followed by `translate_back` restores the origin exactly,
//!    for every `i32` offset (wrapping arithmetic).

use std::fmt;

/// A rectangle for node bounds and hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in tiles.
    pub width: i32,
    /// Height in tiles.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle, clamping negative sizes to zero.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Create a new rectangle, rejecting negative sizes.
    pub fn try_new(x: i32, y: i32, width: i32, height: i32) -> Result<Self, GeometryError> {
        if width < 0 || height < 0 {
            return Err(GeometryError::NegativeSize { width, height });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// A single tile at `(x, y)`.
    #[inline]
    pub const fn point(x: i32, y: i32) -> Self {
        Self::new(x, y, 1, 1)
    }

    /// Left edge (inclusive). Alias for `self.x`.
    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge (inclusive). Alias for `self.y`.
    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (exclusive), widened so it never overflows.
    #[inline]
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Bottom edge (exclusive), widened so it never overflows.
    #[inline]
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Area in tiles.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (x as i64, y as i64);
        x >= self.x as i64 && x < self.right() && y >= self.y as i64 && y < self.bottom()
    }

    /// Check if this rectangle overlaps the region `(x, y, width, height)`.
    ///
    /// Non-positive sizes describe an empty region, which overlaps nothing.
    pub fn intersects(&self, x: i32, y: i32, width: i32, height: i32) -> bool {
        if self.is_empty() || width <= 0 || height <= 0 {
            return false;
        }
        let (x, y) = (x as i64, y as i64);
        x < self.right()
            && (self.x as i64) < x + width as i64
            && y < self.bottom()
            && (self.y as i64) < y + height as i64
    }

    /// Check if this rectangle overlaps another one.
    #[inline]
    pub fn intersects_rect(&self, other: &Rect) -> bool {
        self.intersects(other.x, other.y, other.width, other.height)
    }

    /// Same size, shifted by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
            width: self.width,
            height: self.height,
        }
    }

    /// Exact inverse of [`translate`](Self::translate).
    #[inline]
    #[must_use]
    pub const fn translate_back(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x.wrapping_sub(dx),
            y: self.y.wrapping_sub(dy),
            width: self.width,
            height: self.height,
        }
    }

    /// Replace position and size. A negative `width` or `height` keeps the
    /// current value.
    #[must_use]
    pub const fn with_xywh(&self, x: i32, y: i32, width: i32, height: i32) -> Rect {
        Rect {
            x,
            y,
            width: if width >= 0 { width } else { self.width },
            height: if height >= 0 { height } else { self.height },
        }
    }

    /// Derive an inset (positive sides) or outset (negative sides) rectangle.
    ///
    /// Sizes clamp at zero.
    pub fn padding(&self, sides: Sides) -> Rect {
        let x = self.x.saturating_add(sides.left);
        let y = self.y.saturating_add(sides.top);
        let width = (self.width as i64 - sides.horizontal_sum()).clamp(0, i32::MAX as i64);
        let height = (self.height as i64 - sides.vertical_sum()).clamp(0, i32::MAX as i64);

        Rect {
            x,
            y,
            width: width as i32,
            height: height as i32,
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}x{})", self.x, self.y, self.width, self.height)
    }
}

/// Sides for padding/margin. Negative values grow the rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sides {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Sides {
    /// Create new sides with equal values.
    pub const fn all(val: i32) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new sides with horizontal values only.
    pub const fn horizontal(val: i32) -> Self {
        Self {
            top: 0,
            right: val,
            bottom: 0,
            left: val,
        }
    }

    /// Create new sides with vertical values only.
    pub const fn vertical(val: i32) -> Self {
        Self {
            top: val,
            right: 0,
            bottom: val,
            left: 0,
        }
    }

    /// Create new sides with specific values.
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub const fn horizontal_sum(&self) -> i64 {
        self.left as i64 + self.right as i64
    }

    /// Sum of top and bottom.
    #[inline]
    pub const fn vertical_sum(&self) -> i64 {
        self.top as i64 + self.bottom as i64
    }
}

impl From<i32> for Sides {
    fn from(val: i32) -> Self {
        Self::all(val)
    }
}

impl From<(i32, i32)> for Sides {
    fn from((vertical, horizontal): (i32, i32)) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

impl From<(i32, i32, i32, i32)> for Sides {
    fn from((top, right, bottom, left): (i32, i32, i32, i32)) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Anything that occupies a rectangle on the grid.
///
/// Implemented by tree nodes and by [`Touch`](crate::touch::Touch), which is a
/// 1×1 region so it can reuse the same hit-testing and move machinery.
pub trait Visual {
    /// Current bounds.
    fn bounds(&self) -> Rect;

    /// Mutable bounds. Writers must not produce negative sizes.
    fn bounds_mut(&mut self) -> &mut Rect;

    /// Check if a point is inside the bounds.
    fn contains(&self, x: i32, y: i32) -> bool {
        self.bounds().contains(x, y)
    }

    /// Check if the bounds overlap `(x, y, width, height)`.
    fn intersects(&self, x: i32, y: i32, width: i32, height: i32) -> bool {
        self.bounds().intersects(x, y, width, height)
    }

    /// Bounds shifted by `(dx, dy)`.
    fn xywh(&self, dx: i32, dy: i32) -> Rect {
        self.bounds().translate(dx, dy)
    }

    /// Bounds with `sides` applied.
    fn padding(&self, sides: Sides) -> Rect {
        self.bounds().padding(sides)
    }
}

/// Geometry errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    NegativeSize { width: i32, height: i32 },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeSize { width, height } => {
                write!(f, "negative rectangle size: {width}x{height}")
            }
        }
    }
}

impl std::error::Error for GeometryError {}
