//! Integer geometry on the unbounded layout plane.
//!
//! Rectangles are inclusive on all four edges: a 1x1 rectangle has
//! `left == right` and `top == bottom`. The y axis grows downward, so `top`
//! is the smaller row coordinate.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{LayoutError, Result};

/// Inclusive axis-aligned rectangle. Always satisfies `left <= right` and
/// `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

impl Rect {
    /// Build a rectangle from its four inclusive edges.
    pub fn new(left: i64, top: i64, right: i64, bottom: i64) -> Result<Self> {
        if left > right || top > bottom {
            return Err(LayoutError::InvalidRectangle {
                left,
                top,
                right,
                bottom,
            });
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Build a rectangle from its top-left corner and size.
    ///
    /// A zero or negative size yields `InvalidRectangle`.
    pub fn from_origin(x: i64, y: i64, width: i64, height: i64) -> Result<Self> {
        let right = far_edge(x, width)?;
        let bottom = far_edge(y, height)?;
        Self::new(x, y, right, bottom)
    }

    pub fn left(&self) -> i64 {
        self.left
    }

    pub fn top(&self) -> i64 {
        self.top
    }

    pub fn right(&self) -> i64 {
        self.right
    }

    pub fn bottom(&self) -> i64 {
        self.bottom
    }

    /// Number of columns covered, at least 1.
    pub fn width(&self) -> u64 {
        self.right.abs_diff(self.left).saturating_add(1)
    }

    /// Number of rows covered, at least 1.
    pub fn height(&self) -> u64 {
        self.bottom.abs_diff(self.top).saturating_add(1)
    }

    pub fn area(&self) -> u64 {
        self.width().saturating_mul(self.height())
    }

    pub fn contains_point(&self, x: i64, y: i64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// True when the two rectangles share at least one cell.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left <= other.right
            && other.left <= self.right
            && self.top <= other.bottom
            && other.top <= self.bottom
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Same size, top-left moved to `(x, y)`.
    pub fn moved_to(&self, x: i64, y: i64) -> Result<Rect> {
        let right = self
            .right
            .checked_sub(self.left)
            .and_then(|span| x.checked_add(span))
            .ok_or_else(|| out_of_range("move", x, y))?;
        let bottom = self
            .bottom
            .checked_sub(self.top)
            .and_then(|span| y.checked_add(span))
            .ok_or_else(|| out_of_range("move", x, y))?;
        Rect::new(x, y, right, bottom)
    }

    /// Envelope of every rectangle in `rects`, `None` when empty.
    pub fn envelope(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
        rects
            .into_iter()
            .reduce(|bounds, rect| bounds.union(&rect))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})-({}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Integer coordinate on the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl FromStr for Point {
    type Err = LayoutError;

    /// Parses `"x,y"`; whitespace around either number is ignored.
    fn from_str(s: &str) -> Result<Self> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| LayoutError::InvalidArgument(format!("expected `x,y`, got `{s}`")))?;
        let parse = |raw: &str| {
            raw.trim().parse::<i64>().map_err(|_| {
                LayoutError::InvalidArgument(format!("`{}` is not an integer coordinate", raw.trim()))
            })
        };
        Ok(Self::new(parse(x)?, parse(y)?))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Loosely specified rectangle accepting either absolute edges or an
/// origin plus size. Absolute edges win field by field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extent {
    pub left: Option<i64>,
    pub top: Option<i64>,
    pub right: Option<i64>,
    pub bottom: Option<i64>,
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl Extent {
    pub fn edges(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            right: Some(right),
            bottom: Some(bottom),
            ..Self::default()
        }
    }

    pub fn origin(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Size only; the origin defaults to `(0, 0)`.
    pub fn sized(width: i64, height: i64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn at(mut self, x: i64, y: i64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Resolve into a concrete rectangle.
    pub fn resolve(&self) -> Result<Rect> {
        let left = self.left.or(self.x).unwrap_or(0);
        let top = self.top.or(self.y).unwrap_or(0);
        let right = match (self.right, self.width) {
            (Some(right), _) => right,
            (None, Some(width)) => far_edge(left, width)?,
            (None, None) => {
                return Err(LayoutError::InvalidArgument(
                    "extent needs `right` or `width`".to_string(),
                ));
            }
        };
        let bottom = match (self.bottom, self.height) {
            (Some(bottom), _) => bottom,
            (None, Some(height)) => far_edge(top, height)?,
            (None, None) => {
                return Err(LayoutError::InvalidArgument(
                    "extent needs `bottom` or `height`".to_string(),
                ));
            }
        };
        Rect::new(left, top, right, bottom)
    }
}

/// Inclusive far edge of a span starting at `start` with `len` cells.
pub(crate) fn far_edge(start: i64, len: i64) -> Result<i64> {
    len.checked_sub(1)
        .and_then(|span| start.checked_add(span))
        .ok_or_else(|| {
            LayoutError::InvalidArgument(format!(
                "span of {len} cells from {start} leaves the coordinate range"
            ))
        })
}

fn out_of_range(op: &str, x: i64, y: i64) -> LayoutError {
    LayoutError::InvalidArgument(format!("{op} to ({x}, {y}) leaves the coordinate range"))
}
