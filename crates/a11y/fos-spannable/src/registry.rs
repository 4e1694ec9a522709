//! Span Registry
//!
//! Maps a span type key to the functions that save and restore it, so a
//! [`Spannable`] carrying arbitrary annotation types can cross a process or
//! frame boundary as JSON.
//!
//! The registry is filled during startup and then sealed; lookups after that
//! are read-only.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Annotation, SpanError, SpanHandle, Spannable, register_braille_spans};

type DeserializeFn = Box<dyn Fn(Option<&Value>) -> Result<SpanHandle, SpanError> + Send + Sync>;
type SerializeFn = Box<dyn Fn(&dyn Annotation) -> Option<Value> + Send + Sync>;

struct Registration {
    key: String,
    type_name: &'static str,
    deserialize: DeserializeFn,
    serialize: SerializeFn,
}

/// One span on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanEntry {
    pub type_key: String,
    /// Absent for stateless spans
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    pub start: usize,
    pub end: usize,
}

/// A spannable on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerializedSpannable {
    pub text: String,
    #[serde(default)]
    pub spans: Vec<SpanEntry>,
}

/// Registry of serializable span types
#[derive(Default)]
pub struct SpanRegistry {
    entries: Vec<Registration>,
    by_key: HashMap<String, usize>,
    by_type: HashMap<TypeId, usize>,
    sealed: bool,
}

impl SpanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sealed registry holding the braille annotation types
    pub fn braille() -> Result<Self, SpanError> {
        let mut registry = Self::new();
        register_braille_spans(&mut registry)?;
        registry.seal();
        Ok(registry)
    }

    /// Register a span type with explicit save/restore functions.
    ///
    /// `serialize` returns the payload, or `None` for a payload-less marker.
    pub fn register<T, D, S>(&mut self, key: &str, deserialize: D, serialize: S) -> Result<(), SpanError>
    where
        T: Annotation,
        D: Fn(Option<&Value>) -> Result<T, SpanError> + Send + Sync + 'static,
        S: Fn(&T) -> Option<Value> + Send + Sync + 'static,
    {
        if self.sealed {
            return Err(SpanError::Sealed(key.to_string()));
        }
        if self.by_key.contains_key(key) {
            return Err(SpanError::DuplicateKey(key.to_string()));
        }
        let type_id = TypeId::of::<T>();
        if self.by_type.contains_key(&type_id) {
            return Err(SpanError::DuplicateType(std::any::type_name::<T>()));
        }

        let index = self.entries.len();
        self.entries.push(Registration {
            key: key.to_string(),
            type_name: std::any::type_name::<T>(),
            deserialize: Box::new(move |payload: Option<&Value>| {
                let span: SpanHandle = Arc::new(deserialize(payload)?);
                Ok(span)
            }),
            serialize: Box::new(move |span: &dyn Annotation| span.downcast_ref::<T>().and_then(&serialize)),
        });
        self.by_key.insert(key.to_string(), index);
        self.by_type.insert(type_id, index);
        Ok(())
    }

    /// Register a span type whose fields travel as a serde payload
    pub fn register_stateful<T>(&mut self, key: &str) -> Result<(), SpanError>
    where
        T: Annotation + Serialize + DeserializeOwned,
    {
        let owned_key = key.to_string();
        self.register::<T, _, _>(
            key,
            move |payload: Option<&Value>| {
                serde_json::from_value(payload.cloned().unwrap_or(Value::Null))
                    .map_err(|source| SpanError::Payload { key: owned_key.clone(), source })
            },
            |span: &T| match serde_json::to_value(span) {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!("Failed to serialize span payload: {}", err);
                    None
                }
            },
        )
    }

    /// Register a field-less marker type
    pub fn register_stateless<T>(&mut self, key: &str) -> Result<(), SpanError>
    where
        T: Annotation + Default,
    {
        self.register::<T, _, _>(key, |_: Option<&Value>| Ok(T::default()), |_: &T| None)
    }

    /// Freeze the registry; later registrations fail
    pub fn seal(&mut self) {
        tracing::debug!("Sealed span registry with {} types", self.entries.len());
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Key an annotation serializes under, if its type is registered
    pub fn key_of(&self, span: &dyn Annotation) -> Option<&str> {
        self.lookup_type(span).map(|e| e.key.as_str())
    }

    /// Save one annotation as `(key, payload)`; `None` if the type is unregistered
    pub fn serialize_span(&self, span: &dyn Annotation) -> Option<(&str, Option<Value>)> {
        let entry = self.lookup_type(span)?;
        Some((entry.key.as_str(), (entry.serialize)(span)))
    }

    /// Restore one annotation
    pub fn deserialize_span(&self, key: &str, payload: Option<&Value>) -> Result<SpanHandle, SpanError> {
        let index = self
            .by_key
            .get(key)
            .ok_or_else(|| SpanError::UnknownKey(key.to_string()))?;
        (self.entries[*index].deserialize)(payload)
    }

    /// Save a spannable. Annotations of unregistered types are omitted.
    pub fn serialize(&self, spannable: &Spannable) -> SerializedSpannable {
        let spans = spannable
            .spans()
            .filter_map(|(span, start, end)| {
                let (key, payload) = self.serialize_span(&**span)?;
                Some(SpanEntry { type_key: key.to_string(), payload, start, end })
            })
            .collect();
        SerializedSpannable { text: spannable.text().to_string(), spans }
    }

    /// Restore a spannable, dropping (and logging) spans that fail to restore
    pub fn deserialize(&self, wire: &SerializedSpannable) -> Spannable {
        let (spannable, dropped) = self.deserialize_reporting(wire);
        for err in &dropped {
            tracing::warn!("Dropped span during deserialization: {}", err);
        }
        spannable
    }

    /// Restore a spannable and return the per-span failures
    pub fn deserialize_reporting(&self, wire: &SerializedSpannable) -> (Spannable, Vec<SpanError>) {
        let mut spannable = Spannable::new(wire.text.as_str());
        let mut dropped = Vec::new();
        for entry in &wire.spans {
            let restored = self
                .deserialize_span(&entry.type_key, entry.payload.as_ref())
                .and_then(|span| spannable.set_span_handle(span, entry.start, entry.end));
            if let Err(err) = restored {
                dropped.push(err);
            }
        }
        (spannable, dropped)
    }

    pub fn to_json(&self, spannable: &Spannable) -> Result<String, SpanError> {
        Ok(serde_json::to_string(&self.serialize(spannable))?)
    }

    pub fn from_json(&self, json: &str) -> Result<Spannable, SpanError> {
        let wire: SerializedSpannable = serde_json::from_str(json)?;
        Ok(self.deserialize(&wire))
    }

    fn lookup_type(&self, span: &dyn Annotation) -> Option<&Registration> {
        self.by_type
            .get(&span.concrete_type_id())
            .map(|&index| &self.entries[index])
    }
}

impl std::fmt::Debug for SpanRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanRegistry")
            .field("types", &self.entries.iter().map(|e| (&e.key, e.type_name)).collect::<Vec<_>>())
            .field("sealed", &self.sealed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExtraCellsSpan, FormType, TextStyleSpan, ValueSelectionSpan, ValueSpan};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Heading {
        level: u8,
    }

    #[derive(Debug, PartialEq)]
    struct Unregistered;

    #[test]
    fn test_duplicate_key_rejected() {
        let mut registry = SpanRegistry::new();
        registry.register_stateful::<Heading>("Heading").unwrap();
        let err = registry.register_stateless::<ValueSelectionSpan>("Heading").unwrap_err();
        assert!(matches!(err, SpanError::DuplicateKey(k) if k == "Heading"));
        let err = registry.register_stateful::<Heading>("Heading2").unwrap_err();
        assert!(matches!(err, SpanError::DuplicateType(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_sealed_rejects_registration() {
        let mut registry = SpanRegistry::braille().unwrap();
        assert!(registry.is_sealed());
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec![
            ValueSpan::KEY,
            ValueSelectionSpan::KEY,
            ExtraCellsSpan::KEY,
            TextStyleSpan::KEY,
        ]);
        assert!(matches!(registry.register_stateful::<Heading>("Heading"), Err(SpanError::Sealed(_))));
    }

    #[test]
    fn test_unknown_key() {
        let registry = SpanRegistry::braille().unwrap();
        assert!(matches!(registry.deserialize_span("Nope", None), Err(SpanError::UnknownKey(k)) if k == "Nope"));
    }

    #[test]
    fn test_stateless_has_no_payload() {
        let registry = SpanRegistry::braille().unwrap();
        let (key, payload) = registry.serialize_span(&ValueSelectionSpan).unwrap();
        assert_eq!(key, "ValueSelectionSpan");
        assert!(payload.is_none());

        let restored = registry.deserialize_span(key, None).unwrap();
        assert!(restored.eq_annotation(&ValueSelectionSpan));
    }

    #[test]
    fn test_round_trip_each_braille_type() {
        let registry = SpanRegistry::braille().unwrap();
        let samples: Vec<SpanHandle> = vec![
            Arc::new(ValueSpan::new(7)),
            Arc::new(ValueSelectionSpan),
            Arc::new(ExtraCellsSpan::new(vec![0x01, 0x3f, 0xff])),
            Arc::new(TextStyleSpan::new(FormType::Underline)),
        ];
        for span in samples {
            let (key, payload) = registry.serialize_span(&*span).unwrap();
            let restored = registry.deserialize_span(key, payload.as_ref()).unwrap();
            assert!(restored.eq_annotation(&*span), "round trip failed for {key}");
        }
    }

    #[test]
    fn test_bad_payload() {
        let registry = SpanRegistry::braille().unwrap();
        let bad = serde_json::json!({ "offset": "seven" });
        let err = registry.deserialize_span(ValueSpan::KEY, Some(&bad)).unwrap_err();
        assert!(matches!(err, SpanError::Payload { ref key, .. } if key == ValueSpan::KEY));
    }

    #[test]
    fn test_unregistered_annotations_omitted() {
        let registry = SpanRegistry::braille().unwrap();
        let mut s = Spannable::new("abc");
        s.set_span(Unregistered, 0, 1).unwrap();
        s.set_span(ValueSpan::new(0), 0, 3).unwrap();

        let wire = registry.serialize(&s);
        assert_eq!(wire.spans.len(), 1);
        assert_eq!(wire.spans[0].type_key, ValueSpan::KEY);
        assert!(registry.key_of(&Unregistered).is_none());
    }

    #[test]
    fn test_custom_register_function() {
        let mut registry = SpanRegistry::new();
        registry
            .register::<Heading, _, _>(
                "H",
                |payload| {
                    let level = payload.and_then(Value::as_u64).unwrap_or(1) as u8;
                    Ok(Heading { level })
                },
                |h| Some(Value::from(h.level)),
            )
            .unwrap();

        let (key, payload) = registry.serialize_span(&Heading { level: 3 }).unwrap();
        assert_eq!(key, "H");
        assert_eq!(payload, Some(Value::from(3)));
        let back = registry.deserialize_span("H", payload.as_ref()).unwrap();
        assert_eq!(back.downcast_ref::<Heading>(), Some(&Heading { level: 3 }));
    }
}
