//! Entry point: run a context's map against one source/destination pair.

use std::borrow::Cow;

use tracing::debug;

use crate::container::{Destination, Record, Source};
use crate::error::MappingError;
use crate::map::Map;

/// A named mapping use case that owns exactly one [`Map`].
///
/// Implemented by [`MappingContext`] and by [`Map`] itself; applications
/// typically implement it on their own types and build the map once at
/// construction time.
pub trait Context {
    /// The map to run. Called once per [`Mapper::map`] invocation.
    fn map(&self) -> &Map;

    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl Context for Map {
    fn map(&self) -> &Map {
        self
    }
}

/// A [`Context`] holding a name and a map.
#[derive(Debug, Clone, Default)]
pub struct MappingContext {
    name: String,
    map: Map,
}

impl MappingContext {
    pub fn new(name: impl Into<String>, map: Map) -> Self {
        Self {
            name: name.into(),
            map,
        }
    }
}

impl Context for MappingContext {
    fn map(&self) -> &Map {
        &self.map
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Executes a context's map. Stateless; one instance can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mapper;

impl Mapper {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Map `source` into `destination` using `context`'s map.
    ///
    /// Record destinations come back as a new record; object destinations
    /// are mutated in place and returned.
    ///
    /// # Errors
    ///
    /// Returns the first [`MappingError`] raised by the map.
    pub fn map<'a, C>(
        &self,
        destination: Destination<'a>,
        source: Source<'_>,
        context: &C,
    ) -> Result<Destination<'a>, MappingError>
    where
        C: Context + ?Sized,
    {
        let map = context.map();
        debug!(
            context = context.name(),
            mappings = map.len(),
            "mapping with context"
        );
        map.apply(destination, &source)
    }

    /// Map one record into a copy of another.
    ///
    /// # Errors
    ///
    /// Returns the first [`MappingError`] raised by the map.
    pub fn map_record<C>(
        &self,
        destination: &Record,
        source: &Record,
        context: &C,
    ) -> Result<Record, MappingError>
    where
        C: Context + ?Sized,
    {
        let map = context.map();
        debug!(
            context = context.name(),
            mappings = map.len(),
            "mapping record with context"
        );
        map.apply_to_record(Cow::Borrowed(destination), &Source::record(source))
    }
}
