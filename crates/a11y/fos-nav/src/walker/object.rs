//! Object walker

use super::{Granularity, Step, Traversal, Visit, Walker, frame_step, start_cursor};
use crate::{AutomationTree, Direction, NavConfig, Selection};

/// Moves one node at a time in document order
#[derive(Debug, Clone, Default)]
pub struct ObjectWalker {
    config: NavConfig,
}

impl ObjectWalker {
    pub fn new(config: NavConfig) -> Self {
        Self { config }
    }
}

impl Walker for ObjectWalker {
    fn granularity(&self) -> Granularity {
        Granularity::Object
    }

    fn config(&self) -> &NavConfig {
        &self.config
    }

    fn next(&self, tree: &dyn AutomationTree, from: &Selection, direction: Direction) -> Step {
        let Some(cursor) = start_cursor(tree, from) else {
            return Step::End;
        };

        match Traversal::new(tree, direction, &self.config).step(cursor.node) {
            Visit::Node(node) => Step::Moved(Selection::from_node(tree, node).oriented(direction)),
            Visit::Frame(node) => frame_step(tree, node, direction),
            Visit::End => Step::End,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccessibilityTree, AriaRole, Cursor, NodeBounds};

    #[test]
    fn test_visits_each_node_once() {
        let mut tree = AccessibilityTree::new();
        let root = tree.create_root();
        let list = tree.add_node(AriaRole::List, Some(root));
        for (i, text) in ["one", "two", "three"].iter().enumerate() {
            let item = tree.add_node(AriaRole::ListItem, Some(list));
            tree.add_text(item, text, NodeBounds::new(0.0, i as f64 * 20.0, 40.0, 10.0));
        }

        let walker = ObjectWalker::default();
        let mut sel = Selection::caret(Cursor::at_node_start(root));
        let mut seen = vec![root];
        for _ in 0..tree.len() {
            match walker.next(&tree, &sel, Direction::Forward) {
                Step::Moved(next) => {
                    assert!(!seen.contains(&next.start.node));
                    seen.push(next.start.node);
                    sel = next;
                }
                Step::End => break,
                Step::Frame(_) => panic!("no frames in this tree"),
            }
        }
        assert_eq!(seen.len(), tree.len());
        assert_eq!(walker.next(&tree, &sel, Direction::Forward), Step::End);
    }

    #[test]
    fn test_backward_is_reversed() {
        let mut tree = AccessibilityTree::new();
        let root = tree.create_root();
        let a = tree.add_text(root, "alpha", NodeBounds::new(0.0, 0.0, 40.0, 10.0));
        let b = tree.add_text(root, "beta", NodeBounds::new(0.0, 20.0, 40.0, 10.0));

        let walker = ObjectWalker::default();
        let step = walker.next(&tree, &Selection::from_node(&tree, b), Direction::Backward);
        let Step::Moved(sel) = step else { panic!("expected a move, got {step:?}") };
        assert!(sel.is_reversed());
        assert_eq!(sel.abs_start(), Cursor::new(a, 0));
        assert_eq!(sel.abs_end(), Cursor::new(a, 5));
        assert_eq!(sel.get_text(&tree), "alpha");
    }

    #[test]
    fn test_frame_escape() {
        let mut tree = AccessibilityTree::new();
        let root = tree.create_root();
        let frame = tree.add_node(AriaRole::Iframe, Some(root));

        let walker = ObjectWalker::default();
        let step = walker.next(&tree, &Selection::caret(Cursor::at_node_start(root)), Direction::Forward);
        assert_eq!(step, Step::Frame(Selection::from_node(&tree, frame)));
    }
}
