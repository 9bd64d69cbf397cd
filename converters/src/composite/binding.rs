//! Declared field bindings
//!
//! A binding pairs a column name with a reader that stores the parsed value
//! into the entity and a writer that turns the entity's field into a tuple.
//! The binder places it at the column's ordinal.

use super::binder::CompositeBinder;
use crate::field::FieldValue;
use std::sync::Arc;
use type_mapping::{PostgresReader, PostgresTuple, TupleError};

pub type FieldReader<T> =
    Arc<dyn Fn(&mut T, &mut PostgresReader<'_>, usize) -> Result<(), TupleError> + Send + Sync>;
pub type FieldWriter<T> = Arc<dyn Fn(&T) -> PostgresTuple + Send + Sync>;

pub struct FieldBinding<T> {
    pub(crate) name: String,
    pub(crate) reader: FieldReader<T>,
    pub(crate) writer: FieldWriter<T>,
}

impl<T> Clone for FieldBinding<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            reader: Arc::clone(&self.reader),
            writer: Arc::clone(&self.writer),
        }
    }
}

impl<T> std::fmt::Debug for FieldBinding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBinding")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> FieldBinding<T> {
    /// Binding from raw closures
    pub fn new<R, W>(name: impl Into<String>, reader: R, writer: W) -> Self
    where
        R: Fn(&mut T, &mut PostgresReader<'_>, usize) -> Result<(), TupleError>
            + Send
            + Sync
            + 'static,
        W: Fn(&T) -> PostgresTuple + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            reader: Arc::new(reader),
            writer: Arc::new(writer),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scalar field of any supported shape
    pub fn value<V, G, S>(name: impl Into<String>, get: G, set: S) -> Self
    where
        V: FieldValue,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        Self::new(
            name,
            move |target, reader, context| {
                set(target, V::read_field(reader, context)?);
                Ok(())
            },
            move |source| get(source).to_tuple(),
        )
    }

    /// Nested composite; an empty field becomes `U::default()`
    pub fn record<U, G, S>(
        name: impl Into<String>,
        binder: Arc<CompositeBinder<U>>,
        get: G,
        set: S,
    ) -> Self
    where
        U: Default + 'static,
        G: Fn(&T) -> &U + Send + Sync + 'static,
        S: Fn(&mut T, U) + Send + Sync + 'static,
    {
        let writer_binder = Arc::clone(&binder);
        Self::new(
            name,
            move |target, reader, context| {
                set(target, binder.parse(reader, context)?.unwrap_or_default());
                Ok(())
            },
            move |source| writer_binder.to_tuple(get(source)),
        )
    }

    /// Nested composite that may be null
    pub fn nullable_record<U, G, S>(
        name: impl Into<String>,
        binder: Arc<CompositeBinder<U>>,
        get: G,
        set: S,
    ) -> Self
    where
        U: Default + 'static,
        G: Fn(&T) -> &Option<U> + Send + Sync + 'static,
        S: Fn(&mut T, Option<U>) + Send + Sync + 'static,
    {
        let writer_binder = Arc::clone(&binder);
        Self::new(
            name,
            move |target, reader, context| {
                set(target, binder.parse(reader, context)?);
                Ok(())
            },
            move |source| writer_binder.to_tuple_nullable(get(source).as_ref()),
        )
    }

    /// Array of nested composites; `NULL` elements become `U::default()`
    pub fn record_collection<U, G, S>(
        name: impl Into<String>,
        binder: Arc<CompositeBinder<U>>,
        get: G,
        set: S,
    ) -> Self
    where
        U: Default + 'static,
        G: Fn(&T) -> &Vec<U> + Send + Sync + 'static,
        S: Fn(&mut T, Vec<U>) + Send + Sync + 'static,
    {
        let writer_binder = Arc::clone(&binder);
        Self::new(
            name,
            move |target, reader, context| {
                set(target, binder.parse_collection(reader, context)?.unwrap_or_default());
                Ok(())
            },
            move |source| writer_binder.to_tuple_collection(get(source)),
        )
    }
}
