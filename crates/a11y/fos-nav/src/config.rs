//! Navigation configuration

use serde::{Deserialize, Serialize};

use crate::NavError;

/// Navigation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Characters that end a sentence when followed by whitespace or a node break
    pub sentence_terminators: Vec<char>,
    /// Upper bound on traversal steps per walk or search
    pub max_steps: usize,
    /// Include role names in spoken descriptions
    pub speak_roles: bool,
    /// Vertical tolerance when deciding two boxes share a line
    pub line_slop: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            sentence_terminators: vec!['.', '!', '?'],
            max_steps: 100_000,
            speak_roles: true,
            line_slop: 0.0,
        }
    }
}

impl NavConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, NavError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_speak_roles(mut self, speak_roles: bool) -> Self {
        self.speak_roles = speak_roles;
        self
    }

    pub fn with_line_slop(mut self, line_slop: f64) -> Self {
        self.line_slop = line_slop;
        self
    }

    pub fn with_sentence_terminators(mut self, terminators: impl IntoIterator<Item = char>) -> Self {
        self.sentence_terminators = terminators.into_iter().collect();
        self
    }

    pub(crate) fn is_terminator(&self, c: char) -> bool {
        self.sentence_terminators.contains(&c)
    }
}
