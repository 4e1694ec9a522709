//! Line walker
//!
//! A line is the maximal run of consecutive text leaves whose boxes sit on the
//! same rendered line. Containers between them are transparent; leaves without
//! text or layout are ignored.

use super::{Granularity, Step, Traversal, Visit, Walker, frame_step, start_cursor};
use crate::{AutomationTree, Cursor, Direction, NavConfig, NodeBounds, NodeId, Selection};

#[derive(Debug, Clone, Default)]
pub struct LineWalker {
    config: NavConfig,
}

impl LineWalker {
    pub fn new(config: NavConfig) -> Self {
        Self { config }
    }

    /// Walk from `from` while leaves stay on the line band, growing the band
    /// with each leaf taken. Returns the last leaf taken and the final band.
    fn extend(
        &self,
        tree: &dyn AutomationTree,
        from: NodeId,
        band: NodeBounds,
        direction: Direction,
    ) -> (NodeId, NodeBounds) {
        let mut traversal = Traversal::new(tree, direction, &self.config);
        let mut band = band;
        let mut edge = from;
        let mut current = from;
        loop {
            match traversal.step(current) {
                Visit::Node(node) => {
                    match line_box(tree, node) {
                        Some(b) if b.same_line(&band, self.config.line_slop) => {
                            band = band.union(&b);
                            edge = node;
                        }
                        Some(_) => break,
                        None => {}
                    }
                    current = node;
                }
                Visit::Frame(_) | Visit::End => break,
            }
        }
        (edge, band)
    }
}

fn line_box(tree: &dyn AutomationTree, node: NodeId) -> Option<NodeBounds> {
    if tree.is_leaf(node) && tree.text_len(node) > 0 {
        tree.bounds(node)
    } else {
        None
    }
}

impl Walker for LineWalker {
    fn granularity(&self) -> Granularity {
        Granularity::Line
    }

    fn config(&self) -> &NavConfig {
        &self.config
    }

    fn next(&self, tree: &dyn AutomationTree, from: &Selection, direction: Direction) -> Step {
        let Some(cursor) = start_cursor(tree, from) else {
            return Step::End;
        };

        // Leave the line under the cursor first, so no leaf is read twice.
        let on_line = line_box(tree, cursor.node);
        let origin = match on_line {
            Some(b) => self.extend(tree, cursor.node, b, direction).0,
            None => cursor.node,
        };

        let mut traversal = Traversal::new(tree, direction, &self.config);
        let mut current = origin;
        let (matched, line) = loop {
            match traversal.step(current) {
                Visit::Node(node) => {
                    if let Some(b) = line_box(tree, node) {
                        break (node, b);
                    }
                    current = node;
                }
                Visit::Frame(node) => return frame_step(tree, node, direction),
                Visit::End => return Step::End,
            }
        };

        let (first, last) = match (on_line, direction) {
            (Some(_), Direction::Forward) => (matched, self.extend(tree, matched, line, Direction::Forward).0),
            (Some(_), Direction::Backward) => (self.extend(tree, matched, line, Direction::Backward).0, matched),
            // Started between leaves; the match may sit mid-line, so pull in
            // the lead-in and the tail.
            (None, _) => {
                let (first, band) = self.extend(tree, matched, line, Direction::Backward);
                let (last, _) = self.extend(tree, matched, band, Direction::Forward);
                (first, last)
            }
        };
        tracing::trace!("Line {}..{} around {}", first, last, matched);

        let sel = Selection::new(Cursor::at_node_start(first), Cursor::new(last, tree.text_len(last)));
        Step::Moved(sel.oriented(direction))
    }
}
