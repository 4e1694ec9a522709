//! External tree interface
//!
//! The navigation core never owns the document. It walks whatever implements
//! [`AutomationTree`], on the caller's thread, and re-reads the tree on every
//! step, so a mutation between calls is picked up (and stale nodes detected)
//! on the next walk.

use fos_spannable::FormType;

use crate::{AriaRole, NodeId};

/// Node bounds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NodeBounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// No area: zero width or zero height
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Smallest box covering both
    pub fn union(&self, other: &NodeBounds) -> NodeBounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        NodeBounds::new(x, y, right - x, bottom - y)
    }

    fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Whether two boxes sit on the same rendered line.
    ///
    /// Either box's vertical center must fall inside the other (widened by `slop`).
    pub fn same_line(&self, other: &NodeBounds, slop: f64) -> bool {
        let inside = |outer: &NodeBounds, y: f64| outer.y - slop <= y && y <= outer.y + outer.height + slop;
        inside(self, other.center_y()) || inside(other, self.center_y())
    }
}

/// States surfaced in spoken descriptions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeState {
    pub checked: Option<bool>,
    pub expanded: Option<bool>,
    pub disabled: bool,
    pub required: bool,
    pub level: Option<u32>,
}

/// The traversal primitives consumed from the document tree.
///
/// `next_node`/`previous_node` must be stable: on an unchanged tree they never
/// repeat or skip a node and return `None` exactly at the document ends.
pub trait AutomationTree {
    /// Document root
    fn root(&self) -> Option<NodeId>;

    /// Whether `node` is attached to this document
    fn contains(&self, node: NodeId) -> bool;

    /// Next node in document order
    fn next_node(&self, node: NodeId) -> Option<NodeId>;

    /// Previous node in document order
    fn previous_node(&self, node: NodeId) -> Option<NodeId>;

    /// Ancestor chain, root first, ending with `node` itself
    fn ancestors_of(&self, node: NodeId) -> Vec<NodeId>;

    /// Node whose content lives in a separate embedded document
    fn is_frame_boundary(&self, node: NodeId) -> bool;

    /// Node with no children
    fn is_leaf(&self, node: NodeId) -> bool;

    /// Text a cursor index points into (accessible name)
    fn text(&self, node: NodeId) -> &str;

    fn role(&self, node: NodeId) -> AriaRole;

    /// Geometry, if laid out
    fn bounds(&self, node: NodeId) -> Option<NodeBounds>;

    fn state(&self, _node: NodeId) -> NodeState {
        NodeState::default()
    }

    /// Value of an editable field
    fn value(&self, _node: NodeId) -> Option<&str> {
        None
    }

    /// Selected range within the value, in chars
    fn text_selection(&self, _node: NodeId) -> Option<(usize, usize)> {
        None
    }

    fn text_style(&self, _node: NodeId) -> FormType {
        FormType::Plain
    }

    /// Pre-translated braille cells replacing the node's text
    fn braille_cells(&self, _node: NodeId) -> Option<&[u8]> {
        None
    }

    /// Text length in chars
    fn text_len(&self, node: NodeId) -> usize {
        self.text(node).chars().count()
    }
}
