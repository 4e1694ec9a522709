//! Annotation objects
//!
//! Any `Debug + PartialEq` value can be attached to a [`Spannable`](crate::Spannable).
//! Annotations are shared through [`SpanHandle`] so cloning a spannable never
//! deep-copies its metadata.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A value that can be attached to a range of text
pub trait Annotation: Any + fmt::Debug + Send + Sync + 'static {
    /// Upcast for downcasting to the concrete type
    fn as_any(&self) -> &dyn Any;

    /// Value equality against another (possibly differently typed) annotation
    fn eq_annotation(&self, other: &dyn Annotation) -> bool;

    /// Rust type name, for diagnostics
    fn type_name(&self) -> &'static str;
}

impl<T> Annotation for T
where
    T: Any + fmt::Debug + PartialEq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_annotation(&self, other: &dyn Annotation) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|o| o == self)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

impl dyn Annotation {
    /// Downcast to a concrete annotation type
    pub fn downcast_ref<T: Annotation>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Check the concrete type
    pub fn is<T: Annotation>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// TypeId of the concrete type behind the trait object
    pub fn concrete_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }
}

/// Shared handle to an attached annotation.
///
/// Identity (`Arc::ptr_eq`) is what `span_range` and `remove_span` match on.
pub type SpanHandle = Arc<dyn Annotation>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Marker(u8);

    #[derive(Debug, PartialEq)]
    struct Other;

    #[test]
    fn test_downcast() {
        let handle: SpanHandle = Arc::new(Marker(3));
        assert!(handle.is::<Marker>());
        assert!(!handle.is::<Other>());
        assert_eq!(handle.downcast_ref::<Marker>(), Some(&Marker(3)));
        assert_eq!(handle.concrete_type_id(), TypeId::of::<Marker>());
    }

    #[test]
    fn test_value_equality_across_types() {
        let a: SpanHandle = Arc::new(Marker(1));
        let b: SpanHandle = Arc::new(Marker(1));
        let c: SpanHandle = Arc::new(Other);
        assert!(a.eq_annotation(&*b));
        assert!(!a.eq_annotation(&*c));
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
