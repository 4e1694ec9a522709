//! Navigator
//!
//! A navigation session: the current position plus the granularity the user
//! is moving by. The tree is passed in on every call and never stored.

use crate::find::find;
use crate::output::{self, NavBraille};
use crate::{
    AutomationTree, Direction, Granularity, GranularityWalker, NavConfig, NavError, NodeId, Selection, Step, TreeEvent,
    Walker,
};

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    config: NavConfig,
    current: Option<Selection>,
    granularity: Granularity,
}

impl Navigator {
    pub fn new(config: NavConfig) -> Self {
        Self { config, current: None, granularity: Granularity::Object }
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn current(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
    }

    /// Walker for the current granularity
    pub fn walker(&self) -> GranularityWalker {
        GranularityWalker::new(self.granularity, self.config.clone())
    }

    /// Jump to the whole of `node`
    pub fn sync_to(&mut self, tree: &dyn AutomationTree, node: NodeId) -> Result<Selection, NavError> {
        if !tree.contains(node) {
            return Err(NavError::StaleReference(node));
        }
        let sel = Selection::from_node(tree, node);
        tracing::debug!("Navigator synced to {}", node);
        self.current = Some(sel);
        Ok(sel)
    }

    /// Current position, checked against the tree
    fn position(&mut self, tree: &dyn AutomationTree) -> Result<Selection, NavError> {
        let current = self.current.ok_or(NavError::NoPosition)?;
        let node = current.abs_start().node;
        if !tree.contains(node) {
            self.current = None;
            return Err(NavError::StaleReference(node));
        }
        Ok(current)
    }

    fn apply(&mut self, step: Step) -> Step {
        if let Some(sel) = step.selection() {
            self.current = Some(*sel);
        }
        step
    }

    /// Move by `granularity`, which also becomes the session granularity.
    ///
    /// `End` leaves the position unchanged; `Frame` moves onto the frame node.
    pub fn move_by(
        &mut self,
        tree: &dyn AutomationTree,
        granularity: Granularity,
        direction: Direction,
    ) -> Result<Step, NavError> {
        self.granularity = granularity;
        let from = self.position(tree)?;
        let step = self.walker().next(tree, &from, direction);
        Ok(self.apply(step))
    }

    pub fn next(&mut self, tree: &dyn AutomationTree) -> Result<Step, NavError> {
        self.move_by(tree, self.granularity, Direction::Forward)
    }

    pub fn previous(&mut self, tree: &dyn AutomationTree) -> Result<Step, NavError> {
        self.move_by(tree, self.granularity, Direction::Backward)
    }

    /// Search from the current position
    pub fn find(
        &mut self,
        tree: &dyn AutomationTree,
        predicate: &dyn Fn(&dyn AutomationTree, &[NodeId]) -> Option<NodeId>,
        direction: Direction,
        from_current_node: bool,
    ) -> Result<Step, NavError> {
        let from = self.position(tree)?;
        let step = find(tree, &from, predicate, direction, from_current_node, &self.config);
        Ok(self.apply(step))
    }

    /// Keep the position consistent after a tree notification
    pub fn on_tree_event(&mut self, tree: &dyn AutomationTree, event: &TreeEvent) {
        match *event {
            TreeEvent::Focus(node) => {
                if let Err(err) = self.sync_to(tree, node) {
                    tracing::warn!("Ignoring focus event: {}", err);
                }
            }
            TreeEvent::LoadComplete(root) => {
                if self.current.is_none() {
                    if let Err(err) = self.sync_to(tree, root) {
                        tracing::warn!("Ignoring load event: {}", err);
                    }
                }
            }
            TreeEvent::NodeRemoved(_) | TreeEvent::ChildrenChanged(_) | TreeEvent::TextChanged(_) => {
                let Some(current) = self.current else { return };
                if current.is_valid(tree) {
                    return;
                }
                let node = current.abs_start().node;
                if tree.contains(node) {
                    // Text shrank under the cursor
                    self.current = Some(Selection::from_node(tree, node));
                    tracing::debug!("Navigator clamped to {}", node);
                } else {
                    tracing::debug!("Navigator dropped stale position at {}", node);
                    self.current = None;
                }
            }
        }
    }

    pub fn is_stale(&self, tree: &dyn AutomationTree) -> bool {
        self.current.is_some_and(|sel| !sel.is_valid(tree))
    }

    /// Braille for the current position
    pub fn braille(&self, tree: &dyn AutomationTree) -> Option<NavBraille> {
        let sel = self.current?;
        Some(self.walker().get_braille(tree, &sel))
    }

    /// Spoken description of the current position
    pub fn description(&self, tree: &dyn AutomationTree) -> Vec<String> {
        match self.current {
            Some(sel) => self.walker().get_description(tree, &sel),
            None => Vec::new(),
        }
    }

    /// Node under a braille routing key at `position`
    pub fn route(&self, tree: &dyn AutomationTree, position: usize) -> Option<NodeId> {
        let sel = self.current?;
        output::braille(tree, &sel).node_at(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccessibilityTree, AriaRole, NodeBounds, predicates};

    fn article() -> (AccessibilityTree, NodeId, NodeId, NodeId) {
        let mut tree = AccessibilityTree::new();
        let root = tree.create_root();
        let h = tree.add_node(AriaRole::Heading, Some(root));
        tree.add_text(h, "Title", NodeBounds::new(0.0, 0.0, 50.0, 20.0));
        let body = tree.add_text(root, "One two. Three.", NodeBounds::new(0.0, 30.0, 120.0, 16.0));
        (tree, root, h, body)
    }

    #[test]
    fn test_requires_position() {
        let (tree, ..) = article();
        let mut nav = Navigator::default();
        assert!(matches!(nav.next(&tree), Err(NavError::NoPosition)));
    }

    #[test]
    fn test_move_and_describe() {
        let (tree, root, _, body) = article();
        let mut nav = Navigator::new(NavConfig::default());
        nav.sync_to(&tree, root).unwrap();

        let step = nav.move_by(&tree, Granularity::Object, Direction::Forward).unwrap();
        assert!(matches!(step, Step::Moved(_)));
        assert_eq!(nav.description(&tree), ["Title", "heading"]);

        nav.sync_to(&tree, body).unwrap();
        nav.move_by(&tree, Granularity::Word, Direction::Forward).unwrap();
        assert_eq!(nav.current().map(|s| s.get_text(&tree)).as_deref(), Some("two."));
        assert_eq!(nav.granularity(), Granularity::Word);

        let before = nav.current().copied();
        let end = nav.move_by(&tree, Granularity::Sentence, Direction::Forward).unwrap();
        assert_eq!(end.selection().map(|s| s.get_text(&tree)).as_deref(), Some("Three."));
        assert_ne!(nav.current().copied(), before);
        assert_eq!(nav.next(&tree).unwrap(), Step::End);
        assert_eq!(nav.current().map(|s| s.get_text(&tree)).as_deref(), Some("Three."));
    }

    #[test]
    fn test_find_and_braille() {
        let (tree, _, h, body) = article();
        let mut nav = Navigator::default();
        nav.sync_to(&tree, body).unwrap();

        let step = nav.find(&tree, &predicates::heading(), Direction::Backward, false).unwrap();
        assert!(matches!(step, Step::Moved(_)));
        assert_eq!(nav.current().map(|s| s.abs_start().node), Some(h));

        let braille = nav.braille(&tree).unwrap();
        assert_eq!(braille.text.text(), "Title");
        assert_eq!(nav.route(&tree, 1), Some(NodeId(2)));
    }

    #[test]
    fn test_events_resync() {
        let (mut tree, root, h, body) = article();
        let mut nav = Navigator::default();

        nav.on_tree_event(&tree, &TreeEvent::LoadComplete(root));
        assert_eq!(nav.current().map(|s| s.start.node), Some(root));

        nav.on_tree_event(&tree, &TreeEvent::Focus(body));
        assert_eq!(nav.current().map(|s| s.start.node), Some(body));

        nav.on_tree_event(&tree, &TreeEvent::Focus(NodeId(99)));
        assert_eq!(nav.current().map(|s| s.start.node), Some(body));

        if let Some(node) = tree.get_node_mut(body) {
            node.set_name("Short");
        }
        assert!(nav.is_stale(&tree));
        nav.on_tree_event(&tree, &TreeEvent::TextChanged(body));
        assert_eq!(nav.current().map(|s| s.get_text(&tree)).as_deref(), Some("Short"));

        tree.remove_subtree(body);
        assert!(matches!(nav.next(&tree), Err(NavError::StaleReference(_))));
        assert!(nav.current().is_none());

        nav.on_tree_event(&tree, &TreeEvent::Focus(h));
        nav.on_tree_event(&tree, &TreeEvent::NodeRemoved(body));
        assert_eq!(nav.current().map(|s| s.start.node), Some(h));
    }
}
