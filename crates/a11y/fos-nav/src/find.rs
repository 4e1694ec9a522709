//! Find engine
//!
//! Predicate search over the stable traversal. A match is reported as a
//! selection spanning the matched node.

use crate::walker::{Step, Traversal, Visit, frame_step, start_cursor};
use crate::{AutomationTree, Direction, NavConfig, NodeId, Selection};

/// Search forward from `from` for a node matched by `predicate`.
///
/// With `from_current_node`, a match on the start node's own ancestor chain is
/// returned straight away, so a cursor inside a match re-anchors to it.
/// Otherwise matches on that chain are skipped.
pub fn find_next(
    tree: &dyn AutomationTree,
    from: &Selection,
    predicate: &dyn Fn(&dyn AutomationTree, &[NodeId]) -> Option<NodeId>,
    from_current_node: bool,
    config: &NavConfig,
) -> Step {
    find(tree, from, predicate, Direction::Forward, from_current_node, config)
}

/// Backward counterpart of [`find_next`]
pub fn find_previous(
    tree: &dyn AutomationTree,
    from: &Selection,
    predicate: &dyn Fn(&dyn AutomationTree, &[NodeId]) -> Option<NodeId>,
    from_current_node: bool,
    config: &NavConfig,
) -> Step {
    find(tree, from, predicate, Direction::Backward, from_current_node, config)
}

pub(crate) fn find(
    tree: &dyn AutomationTree,
    from: &Selection,
    predicate: &dyn Fn(&dyn AutomationTree, &[NodeId]) -> Option<NodeId>,
    direction: Direction,
    from_current_node: bool,
    config: &NavConfig,
) -> Step {
    let Some(cursor) = start_cursor(tree, from) else {
        return Step::End;
    };

    let start_chain = tree.ancestors_of(cursor.node);
    if from_current_node {
        if let Some(found) = predicate(tree, &start_chain) {
            tracing::debug!("Re-anchored search to {}", found);
            return Step::Moved(Selection::from_node(tree, found).oriented(direction));
        }
    }

    let mut traversal = Traversal::new(tree, direction, config);
    let mut current = cursor.node;
    loop {
        match traversal.step(current) {
            Visit::Node(node) => {
                let found = predicate(tree, &tree.ancestors_of(node));
                if let Some(found) = found.filter(|f| !start_chain.contains(f)) {
                    return Step::Moved(Selection::from_node(tree, found).oriented(direction));
                }
                current = node;
            }
            Visit::Frame(node) => return frame_step(tree, node, direction),
            Visit::End => return Step::End,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates;
    use crate::{AccessibilityTree, AriaRole, Cursor, NodeBounds};

    struct Page {
        tree: AccessibilityTree,
        root: NodeId,
        h1: NodeId,
        h1_text: NodeId,
        h2: NodeId,
        body: NodeId,
    }

    fn page() -> Page {
        let mut tree = AccessibilityTree::new();
        let root = tree.create_root();
        let h1 = tree.add_node(AriaRole::Heading, Some(root));
        let h1_text = tree.add_text(h1, "Intro", NodeBounds::new(0.0, 0.0, 50.0, 20.0));
        let body = tree.add_text(root, "Some words", NodeBounds::new(0.0, 30.0, 80.0, 16.0));
        let h2 = tree.add_node(AriaRole::Heading, Some(root));
        tree.add_text(h2, "Usage", NodeBounds::new(0.0, 60.0, 50.0, 20.0));
        Page { tree, root, h1, h1_text, h2, body }
    }

    #[test]
    fn test_find_next_heading() {
        let p = page();
        let heading = predicates::heading();
        let from_root = Selection::caret(Cursor::at_node_start(p.root));

        let first = find_next(&p.tree, &from_root, &heading, false, &NavConfig::default());
        assert_eq!(first, Step::Moved(Selection::from_node(&p.tree, p.h1)));

        let second = find_next(&p.tree, first.selection().unwrap(), &heading, false, &NavConfig::default());
        assert_eq!(second, Step::Moved(Selection::from_node(&p.tree, p.h2)));

        let third = find_next(&p.tree, second.selection().unwrap(), &heading, false, &NavConfig::default());
        assert_eq!(third, Step::End);
    }

    #[test]
    fn test_reanchor_inside_match() {
        let p = page();
        let heading = predicates::heading();
        let inside = Selection::caret(Cursor::new(p.h1_text, 2));

        let anchored = find_next(&p.tree, &inside, &heading, true, &NavConfig::default());
        assert_eq!(anchored, Step::Moved(Selection::from_node(&p.tree, p.h1)));
        let sel = anchored.into_selection().unwrap();
        assert!(!sel.is_caret());
        assert_eq!(sel.get_text(&p.tree), "Intro");

        let onward = find_next(&p.tree, &inside, &heading, false, &NavConfig::default());
        assert_eq!(onward, Step::Moved(Selection::from_node(&p.tree, p.h2)));
    }

    #[test]
    fn test_find_previous() {
        let p = page();
        let heading = predicates::heading();
        let from_body = Selection::from_node(&p.tree, p.body);

        let step = find_previous(&p.tree, &from_body, &heading, false, &NavConfig::default());
        let Step::Moved(sel) = step else { panic!("expected heading, got {step:?}") };
        assert!(sel.is_reversed());
        assert_eq!(sel.abs_start(), Cursor::at_node_start(p.h1));
        assert_eq!(sel.abs_end(), Cursor::new(p.h1_text, 5));
        assert_eq!(sel.get_text(&p.tree), "Intro");
    }

    #[test]
    fn test_frame_is_not_a_match() {
        let mut tree = AccessibilityTree::new();
        let root = tree.create_root();
        let frame = tree.add_node(AriaRole::Iframe, Some(root));
        tree.add_node(AriaRole::Button, Some(root));

        let step = find_next(
            &tree,
            &Selection::caret(Cursor::at_node_start(root)),
            &predicates::form_field(),
            false,
            &NavConfig::default(),
        );
        assert_eq!(step, Step::Frame(Selection::from_node(&tree, frame)));
    }

    #[test]
    fn test_closure_predicate_and_stale_start() {
        let mut p = page();
        let named_usage = |tree: &dyn AutomationTree, chain: &[NodeId]| {
            chain.last().copied().filter(|&n| tree.text(n) == "Usage")
        };
        let from = Selection::from_node(&p.tree, p.body);
        let found = find_next(&p.tree, &from, &named_usage, false, &NavConfig::default());
        assert_eq!(found.selection().map(|s| s.get_text(&p.tree)).as_deref(), Some("Usage"));

        p.tree.remove_subtree(p.body);
        assert_eq!(find_next(&p.tree, &from, &named_usage, false, &NavConfig::default()), Step::End);
    }
}
