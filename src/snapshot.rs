use std::rc::Rc;

use crate::geometry::Rect;
use crate::occlusion::OcclusionBuffer;
use crate::uitree::{UiNode, UiWindow};

/// Grow the precise text area by this amount, not exceeding the bounds of
/// the owning node. This makes small text areas which are part of huge nodes
/// easier to press.
pub const GROW_PADDING_PX: i32 = 8;

/// Text size used when a node reports none, in pixels.
pub const DEFAULT_TEXT_SIZE_PX: f32 = 18.0;

/// Reported sizes below this are considered bad data.
pub const IMPLAUSIBLY_SMALL_TEXT_SIZE_PX: f32 = 8.0;

/// One visible fragment of on-screen text, chosen as a tap target.
///
/// Produced once per traversal and never mutated afterwards. `bounds` is
/// always a sub-rectangle of the originating node's screen bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRegion {
    pub text: String,
    pub font_size_px: f32,
    pub bounds: Rect,
}

/// Tuning knobs for one traversal.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotConfig {
    pub grow_padding_px: i32,
    pub default_text_size_px: f32,
    pub implausibly_small_text_size_px: f32,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            grow_padding_px: GROW_PADDING_PX,
            default_text_size_px: DEFAULT_TEXT_SIZE_PX,
            implausibly_small_text_size_px: IMPLAUSIBLY_SMALL_TEXT_SIZE_PX,
        }
    }
}

/// Walks the window list in top-to-bottom z-order and collects every text
/// fragment that is at least partially visible.
///
/// One occlusion buffer is shared across all windows of the traversal: each
/// visited node stamps its footprint into it, and because visitation order
/// is front-to-back, anything painted on top has already occluded its area
/// by the time the content beneath it is evaluated. Z-order falls out of
/// traversal order alone; no depth values are compared.
pub struct SnapshotBuilder {
    config: SnapshotConfig,
    occlusion: OcclusionBuffer,
    regions: Vec<TextRegion>,
}

impl SnapshotBuilder {
    pub fn new(config: SnapshotConfig) -> Self {
        Self {
            config,
            occlusion: OcclusionBuffer::new(),
            regions: Vec::new(),
        }
    }

    /// Consumes the builder and returns the regions in visitation order,
    /// front-most window first.
    pub fn build(mut self, windows: &[Rc<dyn UiWindow>]) -> Vec<TextRegion> {
        for window in windows {
            if let Some(root) = window.root() {
                self.visit(&root);
            }
        }
        tracing::debug!("snapshot complete, {} text regions", self.regions.len());
        self.regions
    }

    fn visit(&mut self, node: &Rc<dyn UiNode>) {
        if !node.is_visible_to_user() {
            return;
        }
        let bounds = node.bounds_in_screen();
        let children = node.children_in_z_order();
        if !children.is_empty() {
            // A container fully covered by content already visited cannot
            // contribute anything; skip the whole subtree.
            if !self.occlusion.is_partially_visible(&bounds) {
                return;
            }
            for child in &children {
                self.visit(child);
            }
        }
        let font_size_px = match node.text_size_px() {
            Some(size) if size >= self.config.implausibly_small_text_size_px => size,
            _ => self.config.default_text_size_px,
        };
        // Every visited node occludes its footprint, text or not, so that
        // nodes painted beneath it see the area as covered.
        if self.occlusion.add(bounds) {
            if let Some(text) = node.text().filter(|t| !t.trim().is_empty()) {
                let bounds = self.precise_bounds(node.as_ref(), &bounds);
                self.regions.push(TextRegion {
                    text,
                    font_size_px,
                    bounds,
                });
            }
        }
    }

    /// The node's fine-grained text bounds grown by the configured padding
    /// and clamped to the full bounds, falling back to the full bounds when
    /// unavailable.
    fn precise_bounds(&self, node: &dyn UiNode, bounds: &Rect) -> Rect {
        match node.precise_text_bounds() {
            Some(text_bounds) => text_bounds
                .inset(-self.config.grow_padding_px)
                .intersect(bounds)
                .unwrap_or(*bounds),
            None => *bounds,
        }
    }
}
