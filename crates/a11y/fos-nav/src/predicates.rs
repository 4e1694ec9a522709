//! Search predicates
//!
//! A predicate looks at an ancestor chain (root first) and names the node it
//! matches, usually the innermost ancestor with some property. Predicates must
//! be pure; the find engine may call them any number of times.

use crate::{AriaRole, AutomationTree, NodeId};

/// Boxed predicate over an ancestor chain
pub type Predicate = Box<dyn Fn(&dyn AutomationTree, &[NodeId]) -> Option<NodeId>>;

/// Innermost node in the chain satisfying `test`
pub fn matching<F>(test: F) -> Predicate
where
    F: Fn(&dyn AutomationTree, NodeId) -> bool + 'static,
{
    Box::new(move |tree: &dyn AutomationTree, chain: &[NodeId]| chain.iter().rev().copied().find(|&n| test(tree, n)))
}

pub fn role(role: AriaRole) -> Predicate {
    matching(move |tree, node| tree.role(node) == role)
}

pub fn heading() -> Predicate {
    role(AriaRole::Heading)
}

/// Heading of a given level
pub fn heading_level(level: u32) -> Predicate {
    matching(move |tree, node| tree.role(node) == AriaRole::Heading && tree.state(node).level == Some(level))
}

pub fn link() -> Predicate {
    role(AriaRole::Link)
}

pub fn landmark() -> Predicate {
    matching(|tree, node| tree.role(node).is_landmark())
}

pub fn form_field() -> Predicate {
    matching(|tree, node| tree.role(node).is_form_field())
}

/// The node itself, if it is a leaf with text
pub fn leaf() -> Predicate {
    Box::new(|tree: &dyn AutomationTree, chain: &[NodeId]| {
        chain
            .last()
            .copied()
            .filter(|&n| tree.is_leaf(n) && tree.text_len(n) > 0)
    })
}

/// First predicate (in order) that matches
pub fn any_of(predicates: Vec<Predicate>) -> Predicate {
    Box::new(move |tree: &dyn AutomationTree, chain: &[NodeId]| predicates.iter().find_map(|p| p(tree, chain)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccessibilityTree, NodeBounds};

    #[test]
    fn test_innermost_match() {
        let mut tree = AccessibilityTree::new();
        let root = tree.create_root();
        let outer = tree.add_node(AriaRole::Region, Some(root));
        let inner = tree.add_node(AriaRole::Navigation, Some(outer));
        let link = tree.add_node(AriaRole::Link, Some(inner));
        let text = tree.add_text(link, "Home", NodeBounds::new(0.0, 0.0, 30.0, 10.0));

        let chain = tree.ancestors_of(text);
        assert_eq!(landmark()(&tree, &chain), Some(inner));
        assert_eq!(super::link()(&tree, &chain), Some(link));
        assert_eq!(leaf()(&tree, &chain), Some(text));
        assert_eq!(form_field()(&tree, &chain), None);
        assert_eq!(any_of(vec![form_field(), heading(), super::link()])(&tree, &chain), Some(link));
    }

    #[test]
    fn test_heading_level() {
        let mut tree = AccessibilityTree::new();
        let root = tree.create_root();
        let h = tree.add_node(AriaRole::Heading, Some(root));
        if let Some(node) = tree.get_node_mut(h) {
            node.state.level = Some(3);
        }
        let chain = tree.ancestors_of(h);
        assert_eq!(heading_level(3)(&tree, &chain), Some(h));
        assert_eq!(heading_level(1)(&tree, &chain), None);
    }
}
