//! Character, word and sentence walkers
//!
//! All three read the document as one stream of leaf text. Words never cross
//! a node; sentences may span several leaves.

use super::traversal::{TextStream, Unit, char_at};
use super::{Granularity, Step, Walker, frame_step, start_cursor};
use crate::{AutomationTree, Cursor, Direction, NavConfig, Selection};

fn one_past(at: Cursor) -> Cursor {
    Cursor::new(at.node, at.index + 1)
}

/// Moves one character at a time
#[derive(Debug, Clone, Default)]
pub struct CharacterWalker {
    config: NavConfig,
}

impl CharacterWalker {
    pub fn new(config: NavConfig) -> Self {
        Self { config }
    }
}

impl Walker for CharacterWalker {
    fn granularity(&self) -> Granularity {
        Granularity::Character
    }

    fn config(&self) -> &NavConfig {
        &self.config
    }

    fn next(&self, tree: &dyn AutomationTree, from: &Selection, direction: Direction) -> Step {
        let Some(cursor) = start_cursor(tree, from) else {
            return Step::End;
        };

        for unit in TextStream::new(tree, cursor, direction, &self.config) {
            match unit {
                // Forward streams start on the current char
                Unit::Char(at, _) if at == cursor && direction == Direction::Forward => {}
                Unit::Char(at, _) => {
                    return Step::Moved(Selection::new(at, one_past(at)).oriented(direction));
                }
                Unit::Break => {}
                Unit::Frame(node) => return frame_step(tree, node, direction),
            }
        }
        Step::End
    }

    fn get_description(&self, tree: &dyn AutomationTree, selection: &Selection) -> Vec<String> {
        let text = selection.get_text(tree);
        let spoken = match text.as_str() {
            " " => "space".to_string(),
            "\t" => "tab".to_string(),
            "\n" => "new line".to_string(),
            _ => text,
        };
        vec![spoken]
    }
}

/// Moves by maximal runs of non-whitespace inside one leaf
#[derive(Debug, Clone, Default)]
pub struct WordWalker {
    config: NavConfig,
}

impl WordWalker {
    pub fn new(config: NavConfig) -> Self {
        Self { config }
    }

    fn next_word(&self, tree: &dyn AutomationTree, cursor: Cursor) -> Step {
        let mut stream = TextStream::new(tree, cursor, Direction::Forward, &self.config);

        // Skip the rest of the word under the cursor first
        let mut armed = false;
        let start = loop {
            match stream.next() {
                Some(Unit::Char(at, c)) => {
                    if c.is_whitespace() {
                        armed = true;
                    } else if armed {
                        break at;
                    }
                }
                Some(Unit::Break) => armed = true,
                Some(Unit::Frame(node)) => return frame_step(tree, node, Direction::Forward),
                None => return Step::End,
            }
        };

        let mut last = start;
        while let Some(Unit::Char(at, c)) = stream.next() {
            if c.is_whitespace() {
                break;
            }
            last = at;
        }
        Step::Moved(Selection::new(start, one_past(last)))
    }

    fn previous_word(&self, tree: &dyn AutomationTree, cursor: Cursor) -> Step {
        let mut stream = TextStream::new(tree, cursor, Direction::Backward, &self.config);

        let mut skipping = char_at(tree, cursor).is_some_and(|c| !c.is_whitespace());
        let end = loop {
            match stream.next() {
                Some(Unit::Char(at, c)) => {
                    if c.is_whitespace() {
                        skipping = false;
                    } else if !skipping {
                        break at;
                    }
                }
                Some(Unit::Break) => skipping = false,
                Some(Unit::Frame(node)) => return frame_step(tree, node, Direction::Backward),
                None => return Step::End,
            }
        };

        let mut first = end;
        while let Some(Unit::Char(at, c)) = stream.next() {
            if c.is_whitespace() {
                break;
            }
            first = at;
        }
        Step::Moved(Selection::new(first, one_past(end)).oriented(Direction::Backward))
    }
}

impl Walker for WordWalker {
    fn granularity(&self) -> Granularity {
        Granularity::Word
    }

    fn config(&self) -> &NavConfig {
        &self.config
    }

    fn next(&self, tree: &dyn AutomationTree, from: &Selection, direction: Direction) -> Step {
        let Some(cursor) = start_cursor(tree, from) else {
            return Step::End;
        };
        match direction {
            Direction::Forward => self.next_word(tree, cursor),
            Direction::Backward => self.previous_word(tree, cursor),
        }
    }
}

/// Moves by sentences.
///
/// A sentence ends after a terminator that is followed by whitespace, a node
/// break or the end of the document. Like words, moving back from inside a
/// sentence skips the rest of it and lands on the one before.
#[derive(Debug, Clone, Default)]
pub struct SentenceWalker {
    config: NavConfig,
}

impl SentenceWalker {
    pub fn new(config: NavConfig) -> Self {
        Self { config }
    }

    /// Scan on from the first char of a sentence to one past its last char
    fn sentence_end(&self, stream: &mut TextStream<'_>, start: Cursor, first: char) -> Cursor {
        let mut last = start;
        let mut pending = self.config.is_terminator(first);
        for unit in stream {
            match unit {
                Unit::Char(_, c) if c.is_whitespace() => {
                    if pending {
                        break;
                    }
                }
                Unit::Char(at, c) => {
                    last = at;
                    pending = self.config.is_terminator(c);
                }
                Unit::Break => {
                    if pending {
                        break;
                    }
                }
                Unit::Frame(_) => break,
            }
        }
        one_past(last)
    }

    fn next_sentence(&self, tree: &dyn AutomationTree, cursor: Cursor) -> Step {
        let mut stream = TextStream::new(tree, cursor, Direction::Forward, &self.config);

        let mut armed = !tree.is_leaf(cursor.node);
        let mut pending = false;
        let (start, first) = loop {
            match stream.next() {
                Some(Unit::Char(at, c)) => {
                    if c.is_whitespace() {
                        armed |= pending;
                    } else if armed {
                        break (at, c);
                    } else {
                        pending = self.config.is_terminator(c);
                    }
                }
                Some(Unit::Break) => armed |= pending,
                Some(Unit::Frame(node)) => return frame_step(tree, node, Direction::Forward),
                None => return Step::End,
            }
        };

        let end = self.sentence_end(&mut stream, start, first);
        Step::Moved(Selection::new(start, end))
    }

    /// First char of the sentence that ends before `cursor`, or of the one the
    /// cursor sits in. `Err` carries the step to return when there is none.
    fn sentence_start_before(&self, tree: &dyn AutomationTree, cursor: Cursor) -> Result<(Cursor, char), Step> {
        let stream = TextStream::new(tree, cursor, Direction::Backward, &self.config);

        // Earliest non-space char seen so far; it starts a sentence once a gap
        // and then a terminator show up before it.
        let mut candidate: Option<(Cursor, char)> = None;
        let mut gap = false;
        let mut frame = None;
        for unit in stream {
            match unit {
                Unit::Char(_, c) if c.is_whitespace() => gap |= candidate.is_some(),
                Unit::Char(at, c) => {
                    if gap && self.config.is_terminator(c) {
                        break;
                    }
                    candidate = Some((at, c));
                    gap = false;
                }
                Unit::Break => gap |= candidate.is_some(),
                Unit::Frame(node) => frame = Some(node),
            }
        }

        match (candidate, frame) {
            (Some(found), _) => Ok(found),
            (None, Some(node)) => Err(frame_step(tree, node, Direction::Backward)),
            (None, None) => Err(Step::End),
        }
    }

    fn end_from(&self, tree: &dyn AutomationTree, start: Cursor, first: char) -> Cursor {
        let mut forward = TextStream::new(tree, start, Direction::Forward, &self.config);
        forward.next();
        self.sentence_end(&mut forward, start, first)
    }

    /// Whether `cursor` lies past the first char of the sentence `start..end`
    fn holds(&self, tree: &dyn AutomationTree, start: Cursor, end: Cursor, cursor: Cursor) -> bool {
        let mut in_cursor_node = false;
        for unit in TextStream::new(tree, start, Direction::Forward, &self.config) {
            match unit {
                Unit::Char(at, _) => {
                    if at.node == cursor.node {
                        if at.index >= cursor.index {
                            return at != start;
                        }
                        in_cursor_node = true;
                    }
                    if one_past(at) == end {
                        return false;
                    }
                }
                // Cursor at the end of a node the sentence runs on from
                Unit::Break if in_cursor_node => return true,
                Unit::Break => {}
                Unit::Frame(_) => return false,
            }
        }
        false
    }

    fn previous_sentence(&self, tree: &dyn AutomationTree, cursor: Cursor) -> Step {
        let (mut start, mut first) = match self.sentence_start_before(tree, cursor) {
            Ok(found) => found,
            Err(step) => return step,
        };
        let mut end = self.end_from(tree, start, first);

        // From inside a sentence, step over it as words do
        if self.holds(tree, start, end, cursor) {
            (start, first) = match self.sentence_start_before(tree, start) {
                Ok(found) => found,
                Err(step) => return step,
            };
            end = self.end_from(tree, start, first);
        }
        Step::Moved(Selection::new(start, end).oriented(Direction::Backward))
    }
}

impl Walker for SentenceWalker {
    fn granularity(&self) -> Granularity {
        Granularity::Sentence
    }

    fn config(&self) -> &NavConfig {
        &self.config
    }

    fn next(&self, tree: &dyn AutomationTree, from: &Selection, direction: Direction) -> Step {
        let Some(cursor) = start_cursor(tree, from) else {
            return Step::End;
        };
        match direction {
            Direction::Forward => self.next_sentence(tree, cursor),
            Direction::Backward => self.previous_sentence(tree, cursor),
        }
    }
}
