#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::mpsc::Sender;

use textgrab::geometry::Rect;
use textgrab::snapshot::TextRegion;
use textgrab::uitree::{Desktop, FailureSink, NodeAction, OverlaySink, UiNode, UiWindow};

/// Scriptable in-memory UI node. Build one with [`FakeNode::new`] and the
/// chained setters, then wrap it in `Rc` via [`FakeNode::rc`].
pub struct FakeNode {
    pub visible: bool,
    pub bounds: Rect,
    pub text: Option<String>,
    pub text_size_px: Option<f32>,
    pub precise_text_bounds: Option<Rect>,
    pub identifier: Option<String>,
    pub fail_actions: bool,
    pub children: RefCell<Vec<Rc<FakeNode>>>,
    /// Incremented every time the traversal asks whether this node is
    /// visible; stays zero for nodes in pruned subtrees.
    pub visibility_queries: Cell<u32>,
    pub actions: RefCell<Vec<NodeAction>>,
}

impl FakeNode {
    pub fn new(bounds: Rect) -> FakeNode {
        FakeNode {
            visible: true,
            bounds,
            text: None,
            text_size_px: None,
            precise_text_bounds: None,
            identifier: None,
            fail_actions: false,
            children: RefCell::new(Vec::new()),
            visibility_queries: Cell::new(0),
            actions: RefCell::new(Vec::new()),
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn text_size(mut self, px: f32) -> Self {
        self.text_size_px = Some(px);
        self
    }

    pub fn precise(mut self, bounds: Rect) -> Self {
        self.precise_text_bounds = Some(bounds);
        self
    }

    pub fn identifier(mut self, id: &str) -> Self {
        self.identifier = Some(id.into());
        self
    }

    pub fn invisible(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_actions = true;
        self
    }

    /// Children in reverse drawing order, topmost-painted first.
    pub fn children(self, children: Vec<Rc<FakeNode>>) -> Self {
        *self.children.borrow_mut() = children;
        self
    }

    pub fn rc(self) -> Rc<FakeNode> {
        Rc::new(self)
    }
}

impl UiNode for FakeNode {
    fn is_visible_to_user(&self) -> bool {
        self.visibility_queries.set(self.visibility_queries.get() + 1);
        self.visible
    }

    fn bounds_in_screen(&self) -> Rect {
        self.bounds
    }

    fn text(&self) -> Option<String> {
        self.text.clone()
    }

    fn children_in_z_order(&self) -> Vec<Rc<dyn UiNode>> {
        self.children
            .borrow()
            .iter()
            .map(|child| Rc::clone(child) as Rc<dyn UiNode>)
            .collect()
    }

    fn text_size_px(&self) -> Option<f32> {
        self.text_size_px
    }

    fn precise_text_bounds(&self) -> Option<Rect> {
        self.precise_text_bounds
    }

    fn find_by_identifier(&self, id: &str) -> Option<Rc<dyn UiNode>> {
        for child in self.children.borrow().iter() {
            if child.identifier.as_deref() == Some(id) {
                return Some(Rc::clone(child) as Rc<dyn UiNode>);
            }
            if let Some(found) = child.find_by_identifier(id) {
                return Some(found);
            }
        }
        None
    }

    fn perform_action(&self, action: NodeAction) -> anyhow::Result<()> {
        if self.fail_actions {
            anyhow::bail!("node rejected {action:?}");
        }
        self.actions.borrow_mut().push(action);
        Ok(())
    }
}

pub struct FakeWindow {
    pub title: String,
    pub root: RefCell<Option<Rc<FakeNode>>>,
}

impl FakeWindow {
    pub fn new(title: &str, root: Rc<FakeNode>) -> Rc<FakeWindow> {
        Rc::new(FakeWindow {
            title: title.into(),
            root: RefCell::new(Some(root)),
        })
    }
}

impl UiWindow for FakeWindow {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn root(&self) -> Option<Rc<dyn UiNode>> {
        self.root
            .borrow()
            .as_ref()
            .map(|root| Rc::clone(root) as Rc<dyn UiNode>)
    }
}

/// Single-threaded fake desktop whose window list tests can edit between
/// automation ticks.
#[derive(Default)]
pub struct FakeDesktop {
    pub windows: RefCell<Vec<Rc<FakeWindow>>>,
    pub keyboard_suppressed: Cell<bool>,
}

impl Desktop for FakeDesktop {
    fn windows(&self) -> Vec<Rc<dyn UiWindow>> {
        self.windows
            .borrow()
            .iter()
            .map(|window| Rc::clone(window) as Rc<dyn UiWindow>)
            .collect()
    }

    fn set_soft_keyboard_suppressed(&self, suppressed: bool) {
        self.keyboard_suppressed.set(suppressed);
    }
}

/// Plain-data description of a node tree, usable across threads; the service
/// worker turns it into [`FakeNode`]s on its own thread.
#[derive(Clone)]
pub struct NodeSpec {
    pub bounds: Rect,
    pub text: Option<String>,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn leaf(bounds: Rect, text: &str) -> NodeSpec {
        NodeSpec {
            bounds,
            text: Some(text.into()),
            children: Vec::new(),
        }
    }

    pub fn container(bounds: Rect, children: Vec<NodeSpec>) -> NodeSpec {
        NodeSpec {
            bounds,
            text: None,
            children,
        }
    }

    pub fn build(&self) -> Rc<FakeNode> {
        let mut node = FakeNode::new(self.bounds);
        node.text = self.text.clone();
        node.children(self.children.iter().map(NodeSpec::build).collect())
            .rc()
    }
}

/// Sendable desktop for service tests: fresh fake trees are built from the
/// specs on every query.
pub struct SpecDesktop {
    pub windows: Vec<(String, NodeSpec)>,
}

impl Desktop for SpecDesktop {
    fn windows(&self) -> Vec<Rc<dyn UiWindow>> {
        self.windows
            .iter()
            .map(|(title, spec)| FakeWindow::new(title, spec.build()) as Rc<dyn UiWindow>)
            .collect()
    }
}

/// Forwards presented snapshots over a channel.
pub struct ChannelOverlay(pub Sender<Vec<TextRegion>>);

impl OverlaySink for ChannelOverlay {
    fn present(&self, regions: Vec<TextRegion>) {
        let _ = self.0.send(regions);
    }
}

/// Forwards failure messages over a channel.
pub struct ChannelFailures(pub Sender<String>);

impl FailureSink for ChannelFailures {
    fn report_failure(&self, message: &str) {
        let _ = self.0.send(message.to_string());
    }
}
