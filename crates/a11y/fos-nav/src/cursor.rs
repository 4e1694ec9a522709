//! Cursors and Selections
//!
//! A [`Cursor`] is a character position inside one node. A [`Selection`] is a
//! pair of cursors from the same walk plus a direction flag. Both borrow node
//! ids from the tree and go stale when the tree changes underneath them.

use crate::{AutomationTree, NodeId};

/// Walk direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Position within a node's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub node: NodeId,
    /// Char offset into the node's text
    pub index: usize,
}

impl Cursor {
    pub fn new(node: NodeId, index: usize) -> Self {
        Self { node, index }
    }

    pub fn at_node_start(node: NodeId) -> Self {
        Self { node, index: 0 }
    }

    /// Node still attached and index within its text
    pub fn is_valid(&self, tree: &dyn AutomationTree) -> bool {
        tree.contains(self.node) && self.index <= tree.text_len(self.node)
    }
}

/// Two cursors plus a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub start: Cursor,
    pub end: Cursor,
    pub reversed: bool,
}

impl Selection {
    pub fn new(start: Cursor, end: Cursor) -> Self {
        Self { start, end, reversed: false }
    }

    /// Zero-width selection
    pub fn caret(at: Cursor) -> Self {
        Self::new(at, at)
    }

    /// Span the whole text of `node`.
    ///
    /// A container spans from its own start to the end of its last leaf
    /// descendant, so the text read is that of its subtree.
    pub fn from_node(tree: &dyn AutomationTree, node: NodeId) -> Self {
        let last = if tree.is_leaf(node) { node } else { last_leaf_in(tree, node) };
        Self::new(Cursor::at_node_start(node), Cursor::new(last, tree.text_len(last)))
    }

    /// Whether this covers exactly the whole of one node, in either direction
    pub fn spans_node(&self, tree: &dyn AutomationTree) -> Option<NodeId> {
        let node = self.abs_start().node;
        let whole = Self::from_node(tree, node);
        (self.abs_start() == whole.start && self.abs_end() == whole.end).then_some(node)
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Same cursors, new direction flag
    pub fn set_reversed(self, reversed: bool) -> Self {
        Self { reversed, ..self }
    }

    /// Orient a forward-ordered selection for a walk in `direction`.
    /// Backward results start at the later cursor.
    pub(crate) fn oriented(self, direction: Direction) -> Self {
        match direction {
            Direction::Forward => Self { reversed: false, ..self },
            Direction::Backward => Self { start: self.end, end: self.start, reversed: true },
        }
    }

    /// Earlier cursor regardless of direction
    pub fn abs_start(&self) -> Cursor {
        if self.reversed { self.end } else { self.start }
    }

    /// Later cursor regardless of direction
    pub fn abs_end(&self) -> Cursor {
        if self.reversed { self.start } else { self.end }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// Zero-width selection at `abs_start`, direction kept
    pub fn normalized(&self) -> Self {
        Self::caret(self.abs_start()).set_reversed(self.reversed)
    }

    /// Both endpoints still valid in `tree`
    pub fn is_valid(&self, tree: &dyn AutomationTree) -> bool {
        self.start.is_valid(tree) && self.end.is_valid(tree)
    }

    /// Whether `node` is an endpoint or an ancestor of one
    pub fn contains_node(&self, tree: &dyn AutomationTree, node: NodeId) -> bool {
        [self.start.node, self.end.node]
            .iter()
            .any(|&n| tree.ancestors_of(n).contains(&node))
    }

    /// Text from `abs_start` to `abs_end`.
    ///
    /// Within one node this is a slice of its text. Across nodes only leaves
    /// contribute, joined with a space.
    pub fn get_text(&self, tree: &dyn AutomationTree) -> String {
        let start = self.abs_start();
        let end = self.abs_end();

        if start.node == end.node {
            return char_slice(tree.text(start.node), start.index, end.index).to_string();
        }

        let mut pieces: Vec<&str> = Vec::new();
        let mut current = Some(start.node);
        while let Some(node) = current {
            if tree.is_leaf(node) {
                let text = tree.text(node);
                let from = if node == start.node { start.index } else { 0 };
                let to = if node == end.node { end.index } else { usize::MAX };
                pieces.push(char_slice(text, from, to));
            }
            if node == end.node {
                break;
            }
            current = tree.next_node(node);
        }

        join_pieces(&pieces)
    }
}

/// Last leaf in document order under `root`, or `root` if it has none
fn last_leaf_in(tree: &dyn AutomationTree, root: NodeId) -> NodeId {
    let mut last = root;
    let mut current = tree.next_node(root);
    while let Some(node) = current {
        if !tree.ancestors_of(node).contains(&root) {
            break;
        }
        if tree.is_leaf(node) {
            last = node;
        }
        current = tree.next_node(node);
    }
    last
}

/// Slice by char offsets, clamped to the text
pub(crate) fn char_slice(text: &str, from: usize, to: usize) -> &str {
    let byte = |i: usize| text.char_indices().nth(i).map_or(text.len(), |(b, _)| b);
    let from = byte(from);
    let to = byte(to).max(from);
    &text[from..to]
}

/// Join with single spaces, skipping empties and not doubling existing whitespace
pub(crate) fn join_pieces(pieces: &[&str]) -> String {
    let mut out = String::new();
    for piece in pieces.iter().filter(|p| !p.is_empty()) {
        let needs_space = !out.is_empty()
            && !out.ends_with(char::is_whitespace)
            && !piece.starts_with(char::is_whitespace);
        if needs_space {
            out.push(' ');
        }
        out.push_str(piece);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccessibilityTree, AriaRole, NodeBounds};

    fn two_leaves() -> (AccessibilityTree, NodeId, NodeId) {
        let mut tree = AccessibilityTree::new();
        let root = tree.create_root();
        let p = tree.add_node(AriaRole::Paragraph, Some(root));
        let a = tree.add_text(p, "Hello there", NodeBounds::new(0.0, 0.0, 80.0, 10.0));
        let b = tree.add_text(p, "big world", NodeBounds::new(80.0, 0.0, 60.0, 10.0));
        (tree, a, b)
    }

    #[test]
    fn test_cursor_equality_is_structural() {
        let n = NodeId(4);
        assert_eq!(Cursor::new(n, 2), Cursor::new(n, 2));
        assert_ne!(Cursor::new(n, 2), Cursor::new(n, 3));
        assert_ne!(Cursor::new(n, 2), Cursor::new(NodeId(5), 2));
    }

    #[test]
    fn test_direction_symmetry() {
        let sel = Selection::new(Cursor::new(NodeId(1), 0), Cursor::new(NodeId(2), 4));
        for s in [sel, sel.set_reversed(true)] {
            let flipped = s.set_reversed(!s.is_reversed());
            assert_eq!(flipped.abs_start(), s.abs_end());
            assert_eq!(flipped.abs_end(), s.abs_start());
            assert_eq!(flipped.start, s.start);
            assert_eq!(flipped.end, s.end);
        }
    }

    #[test]
    fn test_caret_vs_empty() {
        let (tree, a, _) = two_leaves();
        let caret = Selection::caret(Cursor::new(a, 3));
        assert!(caret.is_caret());
        assert_eq!(caret.get_text(&tree), "");
        let n = caret.set_reversed(true).normalized();
        assert!(n.is_reversed());
        assert!(n.is_caret());
    }

    #[test]
    fn test_get_text_ignores_direction() {
        let (tree, a, b) = two_leaves();
        let sel = Selection::new(Cursor::new(a, 6), Cursor::new(b, 3));
        assert_eq!(sel.get_text(&tree), "there big");

        let rev = Selection { start: Cursor::new(b, 3), end: Cursor::new(a, 6), reversed: true };
        assert_eq!(rev.get_text(&tree), "there big");
    }

    #[test]
    fn test_from_node() {
        let (tree, a, _) = two_leaves();
        let sel = Selection::from_node(&tree, a);
        assert_eq!(sel.end.index, 11);
        assert_eq!(sel.get_text(&tree), "Hello there");
        assert!(sel.is_valid(&tree));
        assert!(!Cursor::new(a, 12).is_valid(&tree));
    }

    #[test]
    fn test_from_container_spans_subtree() {
        let mut tree = AccessibilityTree::new();
        let root = tree.create_root();
        let heading = tree.add_node(AriaRole::Heading, Some(root));
        let intro = tree.add_text(heading, "Intro", NodeBounds::new(0.0, 0.0, 50.0, 20.0));
        let after = tree.add_text(root, "Body", NodeBounds::new(0.0, 30.0, 50.0, 16.0));

        let sel = Selection::from_node(&tree, heading);
        assert!(!sel.is_caret());
        assert_eq!(sel.start, Cursor::at_node_start(heading));
        assert_eq!(sel.end, Cursor::new(intro, 5));
        assert_eq!(sel.get_text(&tree), "Intro");
        assert!(!sel.contains_node(&tree, after));

        assert_eq!(Selection::from_node(&tree, root).get_text(&tree), "Intro Body");
        assert_eq!(sel.oriented(Direction::Backward).spans_node(&tree), Some(heading));
        assert_eq!(Selection::caret(Cursor::at_node_start(heading)).spans_node(&tree), None);
    }

    #[test]
    fn test_char_slice_clamps() {
        assert_eq!(char_slice("héllo", 1, 3), "él");
        assert_eq!(char_slice("abc", 2, 99), "c");
        assert_eq!(char_slice("abc", 3, 1), "");
    }
}
