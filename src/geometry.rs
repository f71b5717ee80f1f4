/// Immutable axis-aligned rectangle in screen coordinates.
///
/// `right` and `bottom` are exclusive. A rectangle whose width or height is
/// not positive is empty; callers never construct inverted rects on purpose
/// but `is_empty` treats them as empty all the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// True iff the two rectangles share positive area.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// The overlap rectangle, or `None` when the two do not intersect.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        if self.intersects(other) {
            Some(Rect::new(
                self.left.max(other.left),
                self.top.max(other.top),
                self.right.min(other.right),
                self.bottom.min(other.bottom),
            ))
        } else {
            None
        }
    }

    /// Smallest rectangle containing both (a bounding box, not a disjoint
    /// union).
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// True iff `other` lies entirely within `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        !self.is_empty()
            && self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }

    /// The portion of `self` not covered by `other`, as a disjoint set of up
    /// to four rectangles.
    ///
    /// Decomposition order is fixed: the left and right bands take the full
    /// height, the top and bottom bands are clipped horizontally to `other`.
    /// Each band is clamped to `self`; empty bands are dropped. When `other`
    /// is empty or covers all of `self` the result is empty, and when the
    /// two share no area the result is `self` unchanged.
    pub fn difference(&self, other: &Rect) -> Vec<Rect> {
        if other.is_empty() || other.contains(self) {
            return Vec::new();
        }
        [
            Rect::new(self.left, self.top, other.left, self.bottom),
            Rect::new(other.right, self.top, self.right, self.bottom),
            Rect::new(other.left, self.top, other.right, other.top),
            Rect::new(other.left, other.bottom, other.right, self.bottom),
        ]
        .into_iter()
        .filter_map(|band| band.intersect(self))
        .collect()
    }

    /// Shrink all four sides by `d`; a negative `d` grows the rectangle.
    pub fn inset(&self, d: i32) -> Rect {
        Rect::new(self.left + d, self.top + d, self.right - d, self.bottom - d)
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }
}
