//! Braille annotations
//!
//! Metadata the braille translator reads off rendered output.

use serde::{Deserialize, Serialize};

use crate::{SpanError, SpanRegistry};

/// Marks where an editable value region begins within rendered text.
///
/// `offset` is the position within the value that the covered text starts at,
/// so a value scrolled by the renderer can still be mapped back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSpan {
    pub offset: usize,
}

impl ValueSpan {
    pub const KEY: &'static str = "ValueSpan";

    pub fn new(offset: usize) -> Self {
        Self { offset }
    }
}

/// Marks the selected part of a value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueSelectionSpan;

impl ValueSelectionSpan {
    pub const KEY: &'static str = "ValueSelectionSpan";
}

/// Pre-translated cells spliced in instead of translating the covered text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraCellsSpan {
    pub cells: Vec<u8>,
}

impl ExtraCellsSpan {
    pub const KEY: &'static str = "ExtraCellsSpan";

    pub fn new(cells: impl Into<Vec<u8>>) -> Self {
        Self { cells: cells.into() }
    }
}

/// Emphasis class passed to the braille translator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormType {
    #[default]
    Plain,
    Italic,
    Underline,
    Bold,
    Computer,
    #[serde(rename = "passage_break")]
    PassageBreak,
}

impl FormType {
    /// Translator emphasis bit
    pub fn mask(self) -> u16 {
        match self {
            Self::Plain => 0x0000,
            Self::Italic => 0x0001,
            Self::Underline => 0x0002,
            Self::Bold => 0x0004,
            Self::Computer => 0x0008,
            Self::PassageBreak => 0x0010,
        }
    }
}

/// Marks a sub-range as emphasized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyleSpan {
    pub form_type: FormType,
}

impl TextStyleSpan {
    pub const KEY: &'static str = "BrailleTextStyleSpan";

    pub fn new(form_type: FormType) -> Self {
        Self { form_type }
    }
}

/// Register the four braille annotation types
pub fn register_braille_spans(registry: &mut SpanRegistry) -> Result<(), SpanError> {
    registry.register_stateful::<ValueSpan>(ValueSpan::KEY)?;
    registry.register_stateless::<ValueSelectionSpan>(ValueSelectionSpan::KEY)?;
    registry.register_stateful::<ExtraCellsSpan>(ExtraCellsSpan::KEY)?;
    registry.register_stateful::<TextStyleSpan>(TextStyleSpan::KEY)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_style_payload_shape() {
        let value = serde_json::to_value(TextStyleSpan::new(FormType::Bold)).unwrap();
        assert_eq!(value, serde_json::json!({ "formType": "bold" }));
    }

    #[test]
    fn test_form_type_masks_distinct() {
        let all = [FormType::Italic, FormType::Underline, FormType::Bold, FormType::Computer, FormType::PassageBreak];
        let combined = all.iter().fold(0u16, |acc, f| acc | f.mask());
        assert_eq!(combined.count_ones(), 5);
        assert_eq!(FormType::Plain.mask(), 0);
    }
}
