//! Walkers
//!
//! Each walker turns a selection into the next (or previous) selection at one
//! granularity. Walks re-read the tree on every step and end with
//! [`Step::End`] at the document edge, on a stale start node, or when the
//! step budget in [`NavConfig`] runs out. Entering an embedded document stops
//! the walk with [`Step::Frame`] so the caller can continue in the child.

mod traversal;
mod object;
mod line;
mod text;

pub use object::ObjectWalker;
pub use line::LineWalker;
pub use text::{CharacterWalker, SentenceWalker, WordWalker};

pub(crate) use traversal::{Traversal, Visit};

use serde::{Deserialize, Serialize};

use crate::output::{self, NavBraille};
use crate::{AutomationTree, Cursor, Direction, NavConfig, NodeId, Selection};

/// Unit of traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Object,
    Line,
    Sentence,
    Word,
    Character,
}

impl Granularity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "object" | "node" => Some(Self::Object),
            "line" => Some(Self::Line),
            "sentence" => Some(Self::Sentence),
            "word" => Some(Self::Word),
            "character" | "char" => Some(Self::Character),
            _ => None,
        }
    }
}

/// Result of a walk or search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved(Selection),
    /// Stopped on an embedded document; continue inside it out-of-band
    Frame(Selection),
    /// Nothing further in this direction
    End,
}

impl Step {
    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Self::Moved(sel) | Self::Frame(sel) => Some(sel),
            Self::End => None,
        }
    }

    pub fn into_selection(self) -> Option<Selection> {
        match self {
            Self::Moved(sel) | Self::Frame(sel) => Some(sel),
            Self::End => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }

    pub fn is_frame(&self) -> bool {
        matches!(self, Self::Frame(_))
    }
}

/// Common walker interface
pub trait Walker {
    fn granularity(&self) -> Granularity;

    fn config(&self) -> &NavConfig;

    /// Next selection from `from` in `direction`
    fn next(&self, tree: &dyn AutomationTree, from: &Selection, direction: Direction) -> Step;

    /// Speech utterances for a selection produced by this walker
    fn get_description(&self, tree: &dyn AutomationTree, selection: &Selection) -> Vec<String> {
        output::describe(tree, selection, self.config())
    }

    /// Braille for a selection produced by this walker
    fn get_braille(&self, tree: &dyn AutomationTree, selection: &Selection) -> NavBraille {
        output::braille(tree, selection)
    }
}

/// Closed set of walkers, one per granularity
#[derive(Debug, Clone)]
pub enum GranularityWalker {
    Object(ObjectWalker),
    Line(LineWalker),
    Sentence(SentenceWalker),
    Word(WordWalker),
    Character(CharacterWalker),
}

impl GranularityWalker {
    pub fn new(granularity: Granularity, config: NavConfig) -> Self {
        match granularity {
            Granularity::Object => Self::Object(ObjectWalker::new(config)),
            Granularity::Line => Self::Line(LineWalker::new(config)),
            Granularity::Sentence => Self::Sentence(SentenceWalker::new(config)),
            Granularity::Word => Self::Word(WordWalker::new(config)),
            Granularity::Character => Self::Character(CharacterWalker::new(config)),
        }
    }

    fn inner(&self) -> &dyn Walker {
        match self {
            Self::Object(w) => w,
            Self::Line(w) => w,
            Self::Sentence(w) => w,
            Self::Word(w) => w,
            Self::Character(w) => w,
        }
    }
}

impl Walker for GranularityWalker {
    fn granularity(&self) -> Granularity {
        self.inner().granularity()
    }

    fn config(&self) -> &NavConfig {
        self.inner().config()
    }

    fn next(&self, tree: &dyn AutomationTree, from: &Selection, direction: Direction) -> Step {
        self.inner().next(tree, from, direction)
    }

    fn get_description(&self, tree: &dyn AutomationTree, selection: &Selection) -> Vec<String> {
        self.inner().get_description(tree, selection)
    }

    fn get_braille(&self, tree: &dyn AutomationTree, selection: &Selection) -> NavBraille {
        self.inner().get_braille(tree, selection)
    }
}

/// Zero-width start of a walk, or `None` if the start node is gone
pub(crate) fn start_cursor(tree: &dyn AutomationTree, from: &Selection) -> Option<Cursor> {
    let at = from.normalized().abs_start();
    if !tree.contains(at.node) {
        tracing::warn!("Walk started from stale node {}", at.node);
        return None;
    }
    Some(Cursor::new(at.node, at.index.min(tree.text_len(at.node))))
}

pub(crate) fn frame_step(tree: &dyn AutomationTree, node: NodeId, direction: Direction) -> Step {
    Step::Frame(Selection::from_node(tree, node).oriented(direction))
}
