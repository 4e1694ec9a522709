//! fOS Spannable
//!
//! Annotated text for the braille and speech output stage.
//!
//! Features:
//! - Text with positioned, typed annotations (spans)
//! - Span registry for saving/restoring heterogeneous annotations
//! - Braille annotations (value regions, value selection, emphasis, raw cells)
//!
//! Offsets are counted in Unicode scalar values (`char`s), never bytes.

mod annotation;
mod spannable;
pub mod braille;
pub mod registry;

pub use annotation::{Annotation, SpanHandle};
pub use spannable::Spannable;
pub use braille::{ExtraCellsSpan, FormType, TextStyleSpan, ValueSelectionSpan, ValueSpan, register_braille_spans};
pub use registry::{SerializedSpannable, SpanEntry, SpanRegistry};

/// Spannable error
#[derive(Debug, thiserror::Error)]
pub enum SpanError {
    #[error("Span range {start}..{end} out of bounds for text of length {len}")]
    Range { start: usize, end: usize, len: usize },

    #[error("Unknown span type key: {0}")]
    UnknownKey(String),

    #[error("Span type key already registered: {0}")]
    DuplicateKey(String),

    #[error("Span type already registered under another key: {0}")]
    DuplicateType(&'static str),

    #[error("Span registry is sealed, cannot register {0}")]
    Sealed(String),

    #[error("Invalid payload for span type {key}: {source}")]
    Payload {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
