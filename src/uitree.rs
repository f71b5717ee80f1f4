use std::rc::Rc;

use crate::geometry::Rect;
use crate::snapshot::TextRegion;

/// An action the platform can perform on a node on our behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAction {
    Focus,
    SetText(String),
    Click,
}

/// Handle to one element of a foreign application's rendered interface.
///
/// All methods must be called from the thread that owns the accessibility
/// connection; handles are not sent across threads.
pub trait UiNode {
    fn is_visible_to_user(&self) -> bool;

    /// Bounds of the node in screen coordinates.
    fn bounds_in_screen(&self) -> Rect;

    fn text(&self) -> Option<String>;

    /// Children sorted by reverse drawing order, topmost-painted first.
    fn children_in_z_order(&self) -> Vec<Rc<dyn UiNode>>;

    /// Rendered text size in pixels, when the platform can report it.
    fn text_size_px(&self) -> Option<f32> {
        None
    }

    /// The sub-region of the bounds actually occupied by glyphs, when the
    /// platform can report it.
    fn precise_text_bounds(&self) -> Option<Rect> {
        None
    }

    /// Locate a descendant (or the node itself) by its platform identifier.
    fn find_by_identifier(&self, id: &str) -> Option<Rc<dyn UiNode>>;

    fn perform_action(&self, action: NodeAction) -> anyhow::Result<()>;
}

/// Depth-first search for the first node satisfying `predicate`, starting at
/// `node` itself.
pub fn find_descendant(
    node: &Rc<dyn UiNode>,
    predicate: &dyn Fn(&dyn UiNode) -> bool,
) -> Option<Rc<dyn UiNode>> {
    if predicate(node.as_ref()) {
        return Some(Rc::clone(node));
    }
    for child in node.children_in_z_order() {
        if let Some(found) = find_descendant(&child, predicate) {
            return Some(found);
        }
    }
    None
}

/// One top-level window known to the platform.
pub trait UiWindow {
    fn title(&self) -> String;
    fn root(&self) -> Option<Rc<dyn UiNode>>;
}

/// The platform's window-introspection surface.
pub trait Desktop {
    /// Current windows, front-most first.
    fn windows(&self) -> Vec<Rc<dyn UiWindow>>;

    /// Suppress or restore the on-screen keyboard. Suppression keeps it from
    /// popping up and covering the screen while text is injected.
    fn set_soft_keyboard_suppressed(&self, _suppressed: bool) {}
}

/// Receives the regions of one snapshot and renders them as tappable
/// targets. Tap handling and all overlay chrome live behind this trait.
pub trait OverlaySink {
    fn present(&self, regions: Vec<TextRegion>);
}

/// Receives user-visible failure notifications, e.g. as a toast.
pub trait FailureSink {
    fn report_failure(&self, message: &str);
}
