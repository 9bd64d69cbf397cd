use super::binder::CompositeBinder;
use super::binding::FieldBinding;
use super::column::ColumnInfo;
use crate::errors::ConverterError;
use std::sync::Arc;

/// Which catalog type a composite is bound against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Projection {
    /// The plain composite type
    Base,
    /// The wider companion type named by [`CompositeType::EXTENDED_TYPE_NAME`]
    Extended,
}

/// An entity that maps onto a PostgreSQL composite type.
///
/// Usually generated with `#[derive(Composite)]`.
pub trait CompositeType: Default + Send + Sync + 'static {
    const SCHEMA: &'static str;
    const TYPE_NAME: &'static str;
    const EXTENDED_TYPE_NAME: Option<&'static str> = None;

    /// Declared fields for `projection`; nested composites are obtained from `resolver`
    fn bindings<R: Resolver>(
        resolver: &mut R,
        projection: Projection,
    ) -> Result<Vec<FieldBinding<Self>>, ConverterError>;
}

/// Source of column metadata and of converters for nested composites
pub trait Resolver {
    fn columns(&self) -> &[ColumnInfo];

    fn resolve<U: CompositeType>(&mut self) -> Result<Arc<CompositeConverter<U>>, ConverterError>;
}

/// Base binder plus the optional extended one for a composite type
pub struct CompositeConverter<T> {
    base: Arc<CompositeBinder<T>>,
    extended: Option<Arc<CompositeBinder<T>>>,
}

impl<T> std::fmt::Debug for CompositeConverter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeConverter")
            .field("base", &self.base)
            .field("extended", &self.extended)
            .finish()
    }
}

impl<T: CompositeType> CompositeConverter<T> {
    pub fn build<R: Resolver>(resolver: &mut R) -> Result<Self, ConverterError> {
        let fields = T::bindings(resolver, Projection::Base)?;
        let base = CompositeBinder::bind(resolver.columns(), T::SCHEMA, T::TYPE_NAME, fields)?;

        let extended = match T::EXTENDED_TYPE_NAME {
            Some(extended_name) => {
                let fields = T::bindings(resolver, Projection::Extended)?;
                let binder =
                    CompositeBinder::bind(resolver.columns(), T::SCHEMA, extended_name, fields)?;
                Some(Arc::new(binder))
            }
            None => None,
        };

        Ok(Self {
            base: Arc::new(base),
            extended,
        })
    }

    pub fn base(&self) -> &CompositeBinder<T> {
        &self.base
    }

    pub fn extended(&self) -> Option<&CompositeBinder<T>> {
        self.extended.as_deref()
    }

    /// Binder for `projection`, falling back to base when there is no extended type
    pub fn binder(&self, projection: Projection) -> Arc<CompositeBinder<T>> {
        match (projection, &self.extended) {
            (Projection::Extended, Some(extended)) => Arc::clone(extended),
            _ => Arc::clone(&self.base),
        }
    }
}
