use crate::geometry::Rect;

/// Accumulates the opaque footprints of nodes visited so far during a single
/// traversal.
///
/// The buffer only ever holds pairwise disjoint rectangles. Disjointness is
/// maintained by construction: a new rectangle is recursively split against
/// the first buffer entry that overlaps it, and only the still-uncovered
/// pieces are inserted. Entries are never merged after the fact.
///
/// An instance is scoped to one traversal and must not be reused across
/// snapshots.
#[derive(Debug, Default)]
pub struct OcclusionBuffer {
    buffer: Vec<Rect>,
}

impl OcclusionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The disjoint rectangles occluded so far.
    pub fn rects(&self) -> &[Rect] {
        &self.buffer
    }

    /// Returns true if some part of `rect` is not yet occluded.
    ///
    /// Read-only: the buffer is left untouched.
    pub fn is_partially_visible(&self, rect: &Rect) -> bool {
        if rect.is_empty() {
            // A degenerate rectangle can never be proven covered. Callers use
            // this query to decide whether a subtree is worth visiting at all.
            return true;
        }
        if self.buffer.iter().any(|entry| entry.contains(rect)) {
            return false;
        }
        let Some(pieces) = self.first_overlap_split(rect) else {
            // Disjoint from everything occluded so far.
            return true;
        };
        pieces.iter().any(|piece| self.is_partially_visible(piece))
    }

    /// Occludes the area of `rect`, returning true if any part of it was
    /// still visible beforehand.
    pub fn add(&mut self, rect: Rect) -> bool {
        if rect.is_empty() {
            return false;
        }
        if self.buffer.iter().any(|entry| entry.contains(&rect)) {
            return false;
        }
        let Some(pieces) = self.first_overlap_split(&rect) else {
            self.buffer.push(rect);
            return true;
        };
        // Every piece is attempted: each one still has to be registered in
        // the buffer, so this must not short-circuit.
        let mut any_visible = false;
        for piece in pieces {
            if self.add(piece) {
                any_visible = true;
            }
        }
        any_visible
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Splits `rect` against the first buffer entry that actually overlaps
    /// it, or `None` when nothing does.
    ///
    /// A difference equal to `[rect]` means the entry merely touches `rect`
    /// without covering any of its area, so it does not count as an overlap.
    fn first_overlap_split(&self, rect: &Rect) -> Option<Vec<Rect>> {
        self.buffer
            .iter()
            .map(|entry| rect.difference(entry))
            .find(|pieces| !pieces.is_empty() && pieces[0] != *rect)
    }
}
