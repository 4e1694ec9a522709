//! Stable traversal helpers shared by the walkers and the find engine

use crate::{AutomationTree, Cursor, Direction, NavConfig, NodeId};

/// Outcome of one primitive step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Visit {
    Node(NodeId),
    Frame(NodeId),
    End,
}

/// Bounded wrapper over the tree's next/previous primitive
pub(crate) struct Traversal<'a> {
    tree: &'a dyn AutomationTree,
    direction: Direction,
    remaining: usize,
}

impl<'a> Traversal<'a> {
    pub(crate) fn new(tree: &'a dyn AutomationTree, direction: Direction, config: &NavConfig) -> Self {
        Self { tree, direction, remaining: config.max_steps }
    }

    pub(crate) fn step(&mut self, from: NodeId) -> Visit {
        if self.remaining == 0 {
            tracing::warn!("Traversal step budget exhausted at {}", from);
            return Visit::End;
        }
        self.remaining -= 1;

        let next = match self.direction {
            Direction::Forward => self.tree.next_node(from),
            Direction::Backward => self.tree.previous_node(from),
        };
        match next {
            None => Visit::End,
            Some(node) if self.tree.is_frame_boundary(node) => {
                tracing::debug!("Reached frame boundary {}", node);
                Visit::Frame(node)
            }
            Some(node) => Visit::Node(node),
        }
    }
}

/// One unit of the flattened leaf text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unit {
    Char(Cursor, char),
    /// Moved into another node
    Break,
    /// Hit an embedded document; the stream ends here
    Frame(NodeId),
}

/// Leaf text of the document as a char stream starting at a cursor.
///
/// Forward streams yield the char at the cursor first; backward streams
/// yield the char before it first. Non-leaf nodes contribute only a `Break`.
pub(crate) struct TextStream<'a> {
    tree: &'a dyn AutomationTree,
    traversal: Traversal<'a>,
    direction: Direction,
    node: NodeId,
    chars: Vec<char>,
    pos: usize,
    finished: bool,
}

impl<'a> TextStream<'a> {
    pub(crate) fn new(tree: &'a dyn AutomationTree, at: Cursor, direction: Direction, config: &NavConfig) -> Self {
        let chars = leaf_chars(tree, at.node);
        let pos = at.index.min(chars.len());
        Self {
            tree,
            traversal: Traversal::new(tree, direction, config),
            direction,
            node: at.node,
            chars,
            pos,
            finished: false,
        }
    }
}

impl Iterator for TextStream<'_> {
    type Item = Unit;

    fn next(&mut self) -> Option<Unit> {
        if self.finished {
            return None;
        }

        match self.direction {
            Direction::Forward if self.pos < self.chars.len() => {
                let at = Cursor::new(self.node, self.pos);
                self.pos += 1;
                return Some(Unit::Char(at, self.chars[at.index]));
            }
            Direction::Backward if self.pos > 0 => {
                self.pos -= 1;
                return Some(Unit::Char(Cursor::new(self.node, self.pos), self.chars[self.pos]));
            }
            _ => {}
        }

        match self.traversal.step(self.node) {
            Visit::Node(node) => {
                self.node = node;
                self.chars = leaf_chars(self.tree, node);
                self.pos = match self.direction {
                    Direction::Forward => 0,
                    Direction::Backward => self.chars.len(),
                };
                Some(Unit::Break)
            }
            Visit::Frame(node) => {
                self.finished = true;
                Some(Unit::Frame(node))
            }
            Visit::End => {
                self.finished = true;
                None
            }
        }
    }
}

fn leaf_chars(tree: &dyn AutomationTree, node: NodeId) -> Vec<char> {
    if tree.is_leaf(node) {
        tree.text(node).chars().collect()
    } else {
        Vec::new()
    }
}

/// Char under the cursor, if it points into leaf text
pub(crate) fn char_at(tree: &dyn AutomationTree, at: Cursor) -> Option<char> {
    if !tree.is_leaf(at.node) {
        return None;
    }
    tree.text(at.node).chars().nth(at.index)
}
