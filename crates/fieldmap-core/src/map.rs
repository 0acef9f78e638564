//! Ordered collections of mappings.

use std::borrow::Cow;
use std::slice;
use std::sync::Arc;

use tracing::{debug_span, trace};

use crate::container::{Destination, Record, Source};
use crate::error::MappingError;
use crate::mapping::Mapping;

/// An ordered, immutable sequence of [`Mapping`]s applied to one
/// source/destination pair.
///
/// The destination is threaded through the mappings in order: each mapping
/// receives the previous one's output. Record destinations accumulate
/// copy-on-write updates; object destinations keep their identity, so later
/// mappings (resolvers in particular) see earlier writes immediately.
///
/// Cloning a `Map` is cheap and shares the mapping list.
#[derive(Debug, Clone, Default)]
pub struct Map {
    mappings: Arc<[Mapping]>,
}

impl Map {
    pub fn new(mappings: Vec<Mapping>) -> Self {
        Self {
            mappings: mappings.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Mapping> {
        self.mappings.iter()
    }

    #[must_use]
    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Apply every mapping in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing mapping. Object destinations keep the
    /// writes of the mappings that ran before it.
    pub fn apply<'a>(
        &self,
        destination: Destination<'a>,
        source: &Source<'_>,
    ) -> Result<Destination<'a>, MappingError> {
        let span = debug_span!(
            "map",
            mappings = self.mappings.len(),
            source = %source.kind(),
            destination = %destination.kind(),
        );
        let _guard = span.enter();

        self.mappings
            .iter()
            .try_fold(destination, |destination, mapping| {
                trace!(field = mapping.destination().field(), "applying mapping");
                mapping.apply(destination, source)
            })
    }

    /// Apply to a record destination and return the mapped record.
    ///
    /// # Errors
    ///
    /// Stops at the first failing mapping.
    pub fn apply_to_record(
        &self,
        destination: Cow<'_, Record>,
        source: &Source<'_>,
    ) -> Result<Record, MappingError> {
        match self.apply(Destination::Record(destination), source)? {
            Destination::Record(record) => Ok(record.into_owned()),
            // Reference writes hand back the container variant they were given.
            Destination::Object(_) => unreachable!("record destination came back as an object"),
        }
    }
}

impl FromIterator<Mapping> for Map {
    fn from_iter<I: IntoIterator<Item = Mapping>>(iter: I) -> Self {
        Self {
            mappings: iter.into_iter().collect(),
        }
    }
}

impl<'m> IntoIterator for &'m Map {
    type Item = &'m Mapping;
    type IntoIter = slice::Iter<'m, Mapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
