//! fOS Navigation
//!
//! Cursor-based navigation and annotated output for the screen reader and
//! braille display.
//!
//! Features:
//! - Cursors and direction-aware selections over a live accessibility tree
//! - Walkers at object, line, sentence, word and character granularity
//! - Predicate search with re-anchoring into an enclosing match
//! - Braille rendering into [`fos_spannable::Spannable`] with value,
//!   selection, emphasis and raw-cell annotations
//! - Tree event subscriptions and a navigator session that re-syncs after mutations
//!
//! The tree itself is external: anything implementing [`AutomationTree`]
//! can be walked. [`AccessibilityTree`] is an in-memory implementation.

pub mod role;
mod automation;
pub mod tree;
mod cursor;
pub mod walker;
pub mod find;
pub mod predicates;
pub mod output;
pub mod events;
mod navigator;
mod config;

pub use role::AriaRole;
pub use automation::{AutomationTree, NodeBounds, NodeState};
pub use tree::{AccessibilityNode, AccessibilityTree};
pub use cursor::{Cursor, Direction, Selection};
pub use walker::{Granularity, GranularityWalker, Step, Walker};
pub use find::{find_next, find_previous};
pub use predicates::Predicate;
pub use output::{NavBraille, NodeSpan};
pub use events::{EventHub, EventKind, Subscription, TreeEvent};
pub use navigator::Navigator;
pub use config::NavConfig;

/// Node identifier, assigned by the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Navigation error
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("Node {0} is not attached to the document")]
    StaleReference(NodeId),

    #[error("Navigator has no current position")]
    NoPosition,

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Span error: {0}")]
    Span(#[from] fos_spannable::SpanError),
}
