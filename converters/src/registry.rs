//! Converter registry
//!
//! Holds the catalog snapshot and one converter per composite type. Nested
//! composites are built on first use and shared by every parent.

use crate::composite::{ColumnInfo, CompositeConverter, CompositeType, Resolver};
use crate::errors::ConverterError;
use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub struct ConverterRegistry {
    columns: Vec<ColumnInfo>,
    converters: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    in_progress: HashSet<TypeId>,
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("columns", &self.columns.len())
            .field("converters", &self.converters.len())
            .finish()
    }
}

impl ConverterRegistry {
    pub fn new(columns: Vec<ColumnInfo>) -> Self {
        Self {
            columns,
            converters: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Converter for `T`, built and cached on first request
    pub fn converter<T: CompositeType>(
        &mut self,
    ) -> Result<Arc<CompositeConverter<T>>, ConverterError> {
        self.resolve::<T>()
    }

    /// Already built converter for `T`, if any
    pub fn get<T: CompositeType>(&self) -> Option<Arc<CompositeConverter<T>>> {
        self.converters
            .get(&TypeId::of::<T>())
            .and_then(|converter| Arc::clone(converter).downcast::<CompositeConverter<T>>().ok())
    }

    /// Number of cached converters
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl Resolver for ConverterRegistry {
    fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    fn resolve<U: CompositeType>(&mut self) -> Result<Arc<CompositeConverter<U>>, ConverterError> {
        if let Some(converter) = self.get::<U>() {
            return Ok(converter);
        }

        let id = TypeId::of::<U>();
        if !self.in_progress.insert(id) {
            return Err(ConverterError::RecursiveComposite(format!(
                "{}.{}",
                U::SCHEMA,
                U::TYPE_NAME
            )));
        }
        let built = CompositeConverter::<U>::build(self);
        self.in_progress.remove(&id);

        let converter = Arc::new(built?);
        self.converters.insert(id, converter.clone());
        tracing::debug!(
            schema = U::SCHEMA,
            type_name = U::TYPE_NAME,
            "registered composite converter"
        );
        Ok(converter)
    }
}
