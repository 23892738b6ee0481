use embedded_graphics::prelude::Point;

/// Axis-aligned region bounded by two inclusive corners.
///
/// A rect whose `bottom_right` lies left of or above its `top_left` is
/// empty. Nothing here panics on such a rect; every query simply treats it
/// as covering no pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rect {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl Rect {
    pub const fn new(top_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    pub const fn from_coords(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            top_left: Point::new(x0, y0),
            bottom_right: Point::new(x1, y1),
        }
    }

    /// Distance between the corners along x, never negative.
    pub fn width(self) -> u32 {
        self.bottom_right.x.saturating_sub(self.top_left.x).max(0) as u32
    }

    /// Distance between the corners along y, never negative.
    pub fn height(self) -> u32 {
        self.bottom_right.y.saturating_sub(self.top_left.y).max(0) as u32
    }

    pub fn is_empty(self) -> bool {
        self.bottom_right.x < self.top_left.x || self.bottom_right.y < self.top_left.y
    }

    pub fn top_right(self) -> Point {
        Point::new(self.bottom_right.x, self.top_left.y)
    }

    pub fn bottom_left(self) -> Point {
        Point::new(self.top_left.x, self.bottom_right.y)
    }

    pub fn contains(self, x: i32, y: i32) -> bool {
        self.top_left.x <= x
            && x <= self.bottom_right.x
            && self.top_left.y <= y
            && y <= self.bottom_right.y
    }

    pub fn contains_point(self, point: Point) -> bool {
        self.contains(point.x, point.y)
    }

    /// True when both corners of `other` are inside `self`.
    pub fn contains_rect(self, other: Rect) -> bool {
        self.contains_point(other.top_left) && self.contains_point(other.bottom_right)
    }

    /// Corner-sampling overlap test.
    ///
    /// Checks the four corners of `other` against `self`, then the top-left
    /// corner of `self` against `other`. Two rects that cross without either
    /// one holding a sampled corner of the other (a thin bar passing through
    /// a tall one) are reported as not overlapping. Use [`Rect::intersects`]
    /// for an exact answer.
    pub fn overlaps(self, other: Rect) -> bool {
        self.contains_point(other.top_left)
            || self.contains_point(other.top_right())
            || self.contains_point(other.bottom_left())
            || self.contains_point(other.bottom_right)
            || other.contains_point(self.top_left)
    }

    /// Exact overlap test on the inclusive intervals of both axes.
    pub fn intersects(self, other: Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        !(self.bottom_right.x < other.top_left.x
            || other.bottom_right.x < self.top_left.x
            || self.bottom_right.y < other.top_left.y
            || other.bottom_right.y < self.top_left.y)
    }

    /// Shrinks `self` in place to its intersection with `bound`.
    ///
    /// The result may be empty; check [`Rect::is_empty`] before drawing it.
    pub fn clip_to(&mut self, bound: Rect) {
        self.top_left.x = self.top_left.x.max(bound.top_left.x);
        self.top_left.y = self.top_left.y.max(bound.top_left.y);
        self.bottom_right.x = self.bottom_right.x.min(bound.bottom_right.x);
        self.bottom_right.y = self.bottom_right.y.min(bound.bottom_right.y);
    }

    pub fn intersection(self, bound: Rect) -> Option<Rect> {
        let mut clipped = self;
        clipped.clip_to(bound);
        if clipped.is_empty() {
            return None;
        }
        Some(clipped)
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.top_left.x = self.top_left.x.saturating_add(dx);
        self.top_left.y = self.top_left.y.saturating_add(dy);
        self.bottom_right.x = self.bottom_right.x.saturating_add(dx);
        self.bottom_right.y = self.bottom_right.y.saturating_add(dy);
    }
}
