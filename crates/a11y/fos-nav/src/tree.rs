//! Accessibility Tree
//!
//! Arena-backed accessibility tree implementing [`AutomationTree`].
//! Removed nodes leave an empty slot, so their ids stay stale forever.

use fos_spannable::FormType;

use crate::{AriaRole, AutomationTree, NodeBounds, NodeId, NodeState};

/// Accessibility node
#[derive(Debug, Clone)]
pub struct AccessibilityNode {
    pub id: NodeId,
    pub role: AriaRole,
    pub name: String,
    pub value: Option<String>,
    pub bounds: NodeBounds,
    pub state: NodeState,
    /// Selection inside `value`, in chars
    pub text_selection: Option<(usize, usize)>,
    pub text_style: FormType,
    pub braille_cells: Option<Vec<u8>>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl AccessibilityNode {
    pub fn new(id: NodeId, role: AriaRole) -> Self {
        Self {
            id,
            role,
            name: String::new(),
            value: None,
            bounds: NodeBounds::default(),
            state: NodeState::default(),
            text_selection: None,
            text_style: FormType::Plain,
            braille_cells: None,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Set accessible name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Check if interactive
    pub fn is_interactive(&self) -> bool {
        self.role.is_widget()
    }
}

/// Accessibility tree
#[derive(Debug, Default)]
pub struct AccessibilityTree {
    nodes: Vec<Option<AccessibilityNode>>,
    root_id: Option<NodeId>,
}

impl AccessibilityTree {
    pub fn new() -> Self { Self::default() }

    /// Create root node
    pub fn create_root(&mut self) -> NodeId {
        let id = self.alloc(AriaRole::RootWebArea);
        self.root_id = Some(id);
        id
    }

    /// Add node under `parent_id` (appended as last child)
    pub fn add_node(&mut self, role: AriaRole, parent_id: Option<NodeId>) -> NodeId {
        let id = self.alloc(role);
        if let Some(pid) = parent_id {
            if let Some(parent) = self.get_node_mut(pid) {
                parent.children.push(id);
                if let Some(node) = self.get_node_mut(id) {
                    node.parent = Some(pid);
                }
            }
        }
        id
    }

    /// Add a laid-out text leaf
    pub fn add_text(&mut self, parent: NodeId, text: &str, bounds: NodeBounds) -> NodeId {
        let id = self.add_node(AriaRole::StaticText, Some(parent));
        if let Some(node) = self.get_node_mut(id) {
            node.set_name(text);
            node.bounds = bounds;
        }
        id
    }

    fn alloc(&mut self, role: AriaRole) -> NodeId {
        let id = NodeId(self.nodes.len() as u64);
        self.nodes.push(Some(AccessibilityNode::new(id, role)));
        id
    }

    /// Get node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&AccessibilityNode> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Get mutable node
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut AccessibilityNode> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Detach `id` and its descendants. Their ids become stale.
    pub fn remove_subtree(&mut self, id: NodeId) -> bool {
        let Some(node) = self.get_node(id) else { return false };
        if let Some(pid) = node.parent {
            if let Some(parent) = self.get_node_mut(pid) {
                parent.children.retain(|&c| c != id);
            }
        }
        if self.root_id == Some(id) {
            self.root_id = None;
        }

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(slot) = self.nodes.get_mut(next.0 as usize) {
                if let Some(removed) = slot.take() {
                    pending.extend(removed.children);
                }
            }
        }
        true
    }

    /// Number of attached nodes
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find node by name
    pub fn find_by_name(&self, name: &str) -> Option<&AccessibilityNode> {
        self.nodes.iter().flatten().find(|n| n.name == name)
    }

    /// Get tree depth
    pub fn get_depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;

        while let Some(node) = self.get_node(current) {
            if let Some(parent) = node.parent {
                depth += 1;
                current = parent;
            } else {
                break;
            }
        }

        depth
    }

    /// Deepest last descendant of `id` (itself if it has no children)
    pub fn last_descendant(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&last) = self.get_node(current).and_then(|n| n.children.last()) {
            current = last;
        }
        current
    }

    fn sibling(&self, id: NodeId, offset: isize) -> Option<NodeId> {
        let parent = self.get_node(self.get_node(id)?.parent?)?;
        let index = parent.children.iter().position(|&c| c == id)?;
        let target = index.checked_add_signed(offset)?;
        parent.children.get(target).copied()
    }
}

impl AutomationTree for AccessibilityTree {
    fn root(&self) -> Option<NodeId> {
        self.root_id
    }

    fn contains(&self, node: NodeId) -> bool {
        self.get_node(node).is_some()
    }

    fn next_node(&self, node: NodeId) -> Option<NodeId> {
        let current = self.get_node(node)?;
        if let Some(&first) = current.children.first() {
            return Some(first);
        }
        let mut cursor = node;
        loop {
            if let Some(next) = self.sibling(cursor, 1) {
                return Some(next);
            }
            cursor = self.get_node(cursor)?.parent?;
        }
    }

    fn previous_node(&self, node: NodeId) -> Option<NodeId> {
        let current = self.get_node(node)?;
        match self.sibling(node, -1) {
            Some(prev) => Some(self.last_descendant(prev)),
            None => current.parent,
        }
    }

    fn ancestors_of(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(n) = self.get_node(id) else { break };
            chain.push(id);
            current = n.parent;
        }
        chain.reverse();
        chain
    }

    fn is_frame_boundary(&self, node: NodeId) -> bool {
        self.get_node(node).is_some_and(|n| n.role.is_frame())
    }

    fn is_leaf(&self, node: NodeId) -> bool {
        self.get_node(node).is_some_and(|n| n.children.is_empty())
    }

    fn text(&self, node: NodeId) -> &str {
        self.get_node(node).map_or("", |n| n.name.as_str())
    }

    fn role(&self, node: NodeId) -> AriaRole {
        self.get_node(node).map_or(AriaRole::Generic, |n| n.role)
    }

    fn bounds(&self, node: NodeId) -> Option<NodeBounds> {
        self.get_node(node).map(|n| n.bounds).filter(|b| !b.is_empty())
    }

    fn state(&self, node: NodeId) -> NodeState {
        self.get_node(node).map(|n| n.state).unwrap_or_default()
    }

    fn value(&self, node: NodeId) -> Option<&str> {
        self.get_node(node)?.value.as_deref()
    }

    fn text_selection(&self, node: NodeId) -> Option<(usize, usize)> {
        self.get_node(node)?.text_selection
    }

    fn text_style(&self, node: NodeId) -> FormType {
        self.get_node(node).map_or(FormType::Plain, |n| n.text_style)
    }

    fn braille_cells(&self, node: NodeId) -> Option<&[u8]> {
        self.get_node(node)?.braille_cells.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (AccessibilityTree, Vec<NodeId>) {
        // root > [p1 > [a, b], c]
        let mut tree = AccessibilityTree::new();
        let root = tree.create_root();
        let p1 = tree.add_node(AriaRole::Paragraph, Some(root));
        let a = tree.add_text(p1, "a", NodeBounds::new(0.0, 0.0, 10.0, 10.0));
        let b = tree.add_text(p1, "b", NodeBounds::new(10.0, 0.0, 10.0, 10.0));
        let c = tree.add_text(root, "c", NodeBounds::new(0.0, 20.0, 10.0, 10.0));
        (tree, vec![root, p1, a, b, c])
    }

    #[test]
    fn test_accessibility_tree() {
        let mut tree = AccessibilityTree::new();
        let root = tree.create_root();

        let button = tree.add_node(AriaRole::Button, Some(root));
        if let Some(node) = tree.get_node_mut(button) {
            node.set_name("Submit");
        }

        assert!(tree.get_node(button).unwrap().is_interactive());
        assert_eq!(tree.find_by_name("Submit").map(|n| n.id), Some(button));
        assert_eq!(tree.get_depth(button), 1);
    }

    #[test]
    fn test_preorder_both_ways() {
        let (tree, ids) = sample();
        let mut forward = vec![ids[0]];
        while let Some(next) = tree.next_node(*forward.last().unwrap()) {
            forward.push(next);
        }
        assert_eq!(forward, ids);

        let mut backward = vec![ids[4]];
        while let Some(prev) = tree.previous_node(*backward.last().unwrap()) {
            backward.push(prev);
        }
        backward.reverse();
        assert_eq!(backward, ids);
    }

    #[test]
    fn test_ancestors_root_first() {
        let (tree, ids) = sample();
        assert_eq!(tree.ancestors_of(ids[3]), vec![ids[0], ids[1], ids[3]]);
        assert_eq!(tree.ancestors_of(ids[0]), vec![ids[0]]);
    }

    #[test]
    fn test_remove_subtree_makes_ids_stale() {
        let (mut tree, ids) = sample();
        assert!(tree.remove_subtree(ids[1]));
        assert!(!tree.contains(ids[1]));
        assert!(!tree.contains(ids[2]));
        assert!(tree.contains(ids[4]));
        assert_eq!(tree.next_node(ids[0]), Some(ids[4]));
        assert_eq!(tree.len(), 2);
        assert!(!tree.remove_subtree(ids[2]));
    }
}
