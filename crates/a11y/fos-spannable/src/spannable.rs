//! Spannable text
//!
//! A text buffer with a multiset of `(annotation, start, end)` attachments.
//! Spans keep insertion order; nothing sorts them behind the caller's back.

use std::fmt;
use std::sync::Arc;

use crate::{Annotation, SpanError, SpanHandle};

#[derive(Debug, Clone)]
struct SpanRecord {
    value: SpanHandle,
    start: usize,
    end: usize,
}

/// Text plus positioned annotations
#[derive(Debug, Clone, Default)]
pub struct Spannable {
    text: String,
    /// Length in chars, cached
    len: usize,
    spans: Vec<SpanRecord>,
}

impl Spannable {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self { text, len, spans: Vec::new() }
    }

    /// Create with one annotation covering the whole text
    pub fn with_span<A: Annotation>(text: impl Into<String>, annotation: A) -> Self {
        let mut s = Self::new(text);
        let len = s.len;
        s.spans.push(SpanRecord { value: Arc::new(annotation), start: 0, end: len });
        s
    }

    /// Length in chars
    pub fn length(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of attached spans
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// Attach an annotation to `start..end`, returning its handle
    pub fn set_span<A: Annotation>(&mut self, annotation: A, start: usize, end: usize) -> Result<SpanHandle, SpanError> {
        let handle: SpanHandle = Arc::new(annotation);
        self.set_span_handle(handle.clone(), start, end)?;
        Ok(handle)
    }

    /// Attach an existing handle (shared with other spannables)
    pub fn set_span_handle(&mut self, value: SpanHandle, start: usize, end: usize) -> Result<(), SpanError> {
        self.check_range(start, end)?;
        self.spans.push(SpanRecord { value, start, end });
        Ok(())
    }

    /// All spans as `(annotation, start, end)` in insertion order
    pub fn spans(&self) -> impl Iterator<Item = (&SpanHandle, usize, usize)> {
        self.spans.iter().map(|r| (&r.value, r.start, r.end))
    }

    /// Annotations overlapping `start..end`.
    ///
    /// A zero-width query matches spans containing the position; a zero-width
    /// span matches queries whose range contains its position.
    pub fn get_spans(&self, start: usize, end: usize) -> Vec<&dyn Annotation> {
        self.spans
            .iter()
            .filter(|r| overlaps(r.start, r.end, start, end))
            .map(|r| &*r.value)
            .collect()
    }

    /// Annotations of type `T` overlapping `start..end`
    pub fn get_spans_of<T: Annotation>(&self, start: usize, end: usize) -> Vec<&T> {
        self.spans
            .iter()
            .filter(|r| overlaps(r.start, r.end, start, end))
            .filter_map(|r| r.value.downcast_ref::<T>())
            .collect()
    }

    /// First annotation of type `T`
    pub fn span_instance_of<T: Annotation>(&self) -> Option<&T> {
        self.spans.iter().find_map(|r| r.value.downcast_ref::<T>())
    }

    /// All annotations of type `T`
    pub fn spans_instance_of<T: Annotation>(&self) -> Vec<&T> {
        self.spans.iter().filter_map(|r| r.value.downcast_ref::<T>()).collect()
    }

    pub fn has_span_of<T: Annotation>(&self) -> bool {
        self.spans.iter().any(|r| r.value.is::<T>())
    }

    /// Range of the first annotation of type `T`
    pub fn span_range_of<T: Annotation>(&self) -> Option<(usize, usize)> {
        self.spans.iter().find(|r| r.value.is::<T>()).map(|r| (r.start, r.end))
    }

    /// Range of a specific attached handle
    pub fn span_range(&self, handle: &SpanHandle) -> Option<(usize, usize)> {
        self.spans
            .iter()
            .find(|r| Arc::ptr_eq(&r.value, handle))
            .map(|r| (r.start, r.end))
    }

    /// Detach every attachment of `handle`; returns whether anything was removed
    pub fn remove_span(&mut self, handle: &SpanHandle) -> bool {
        let before = self.spans.len();
        self.spans.retain(|r| !Arc::ptr_eq(&r.value, handle));
        self.spans.len() != before
    }

    /// Detach all annotations of type `T`
    pub fn remove_spans_of<T: Annotation>(&mut self) {
        self.spans.retain(|r| !r.value.is::<T>());
    }

    /// Insert text at `offset`.
    ///
    /// Spans starting at or after `offset` move right; spans straddling it grow.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), SpanError> {
        self.check_range(offset, offset)?;
        let added = text.chars().count();
        let at = self.byte_offset(offset);
        self.text.insert_str(at, text);
        self.len += added;

        for r in &mut self.spans {
            if r.start >= offset {
                r.start += added;
                r.end += added;
            } else if r.end > offset {
                r.end += added;
            }
        }
        Ok(())
    }

    pub fn append_str(&mut self, text: &str) {
        self.text.push_str(text);
        self.len += text.chars().count();
    }

    /// Append another spannable, shifting its spans by our length
    pub fn append(&mut self, other: &Spannable) {
        let shift = self.len;
        self.append_str(&other.text);
        self.spans.extend(other.spans.iter().map(|r| SpanRecord {
            value: r.value.clone(),
            start: r.start + shift,
            end: r.end + shift,
        }));
    }

    /// Copy of `start..end`.
    ///
    /// Spans overlapping the range are clipped to it. Spans that only touch a
    /// boundary are dropped; zero-width spans inside `start..=end` are kept.
    pub fn substring(&self, start: usize, end: usize) -> Result<Spannable, SpanError> {
        self.check_range(start, end)?;
        Ok(self.slice(start, end))
    }

    /// Strip leading and trailing whitespace
    pub fn trim(&self) -> Spannable {
        self.trim_end().trim_start()
    }

    pub fn trim_start(&self) -> Spannable {
        let skip = self.text.chars().take_while(|c| c.is_whitespace()).count();
        self.slice(skip, self.len)
    }

    pub fn trim_end(&self) -> Spannable {
        let skip = self.text.chars().rev().take_while(|c| c.is_whitespace()).count();
        self.slice(0, self.len - skip)
    }

    fn slice(&self, start: usize, end: usize) -> Spannable {
        let from = self.byte_offset(start);
        let to = self.byte_offset(end);
        let mut out = Spannable::new(&self.text[from..to]);

        for r in &self.spans {
            let keep = if r.start == r.end {
                start <= r.start && r.start <= end
            } else {
                r.start < end && start < r.end
            };
            if keep {
                out.spans.push(SpanRecord {
                    value: r.value.clone(),
                    start: r.start.max(start) - start,
                    end: r.end.min(end) - start,
                });
            }
        }
        out
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), SpanError> {
        if start > end || end > self.len {
            return Err(SpanError::Range { start, end, len: self.len });
        }
        Ok(())
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

fn overlaps(span_start: usize, span_end: usize, start: usize, end: usize) -> bool {
    match (span_start == span_end, start == end) {
        (true, true) => span_start == start,
        (true, false) => start <= span_start && span_start < end,
        (false, true) => span_start <= start && start < span_end,
        (false, false) => span_start < end && start < span_end,
    }
}

impl PartialEq for Spannable {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.spans.len() == other.spans.len()
            && self.spans.iter().zip(&other.spans).all(|(a, b)| {
                a.start == b.start && a.end == b.end && a.value.eq_annotation(&*b.value)
            })
    }
}

impl fmt::Display for Spannable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Spannable {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Spannable {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
