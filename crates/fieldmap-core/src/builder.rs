//! Fluent assembly of [`Map`]s.
//!
//! [`MapBuilder`] remembers a default [`ReferenceKind`] for each side and
//! turns field names into references of those kinds as mappings are added.
//! Changing a default only affects mappings added afterwards.
//!
//! # Example
//!
//! ```
//! use fieldmap_core::{MapBuilder, ReferenceKind};
//!
//! let map = MapBuilder::new()
//!     .with_destination_kind(ReferenceKind::ObjectProperties)?
//!     .add("firstName", "first_name")
//!     .add("lastName", "last_name")
//!     .build();
//! assert_eq!(map.len(), 2);
//! # Ok::<(), fieldmap_core::InvalidReferenceKind>(())
//! ```
//!
//! `build` consumes the builder, so one builder can never leak mappings into
//! a second map.

use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use crate::container::{Destination, Source};
use crate::error::{InvalidReferenceKind, ResolveError};
use crate::map::Map;
use crate::mapping::{EmbeddedTarget, Mapping};
use crate::reference::ReferenceKind;
use crate::resolver::{CallableResolver, ValueResolver};

/// Accumulates mappings and compiles them into a [`Map`].
#[derive(Debug, Clone, Default)]
pub struct MapBuilder {
    source_kind: ReferenceKind,
    destination_kind: ReferenceKind,
    mappings: Vec<Mapping>,
}

impl MapBuilder {
    /// A builder addressing records on both sides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reference kind used for source fields from now on.
    ///
    /// Accepts a [`ReferenceKind`] or its name (`"array"`,
    /// `"object_properties"`, `"object_mutators"`).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidReferenceKind`] for an unrecognized name.
    pub fn with_source_kind<K>(mut self, kind: K) -> Result<Self, InvalidReferenceKind>
    where
        K: TryInto<ReferenceKind>,
        InvalidReferenceKind: From<K::Error>,
    {
        self.source_kind = kind.try_into()?;
        Ok(self)
    }

    /// Set the reference kind used for destination fields from now on.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidReferenceKind`] for an unrecognized name.
    pub fn with_destination_kind<K>(mut self, kind: K) -> Result<Self, InvalidReferenceKind>
    where
        K: TryInto<ReferenceKind>,
        InvalidReferenceKind: From<K::Error>,
    {
        self.destination_kind = kind.try_into()?;
        Ok(self)
    }

    #[must_use]
    pub fn source_kind(&self) -> ReferenceKind {
        self.source_kind
    }

    #[must_use]
    pub fn destination_kind(&self) -> ReferenceKind {
        self.destination_kind
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Copy `source` into `destination`.
    #[must_use]
    pub fn add(self, destination: impl Into<String>, source: impl Into<String>) -> Self {
        let mapping = Mapping::direct(
            self.destination_kind.reference(destination),
            self.source_kind.reference(source),
        );
        self.add_mapping(mapping)
    }

    /// Map the nested record found under `field` through `map` into `field`.
    #[must_use]
    pub fn add_embedded(self, field: impl Into<String>, map: impl Into<Arc<Map>>) -> Self {
        let field = field.into();
        self.add_embedded_from(field.clone(), field, map)
    }

    /// Map the nested record found under `source` through `map` into `destination`.
    ///
    /// `map` keeps the reference kinds it was built with.
    #[must_use]
    pub fn add_embedded_from(
        self,
        destination: impl Into<String>,
        source: impl Into<String>,
        map: impl Into<Arc<Map>>,
    ) -> Self {
        self.add_embedded_into(destination, source, map, EmbeddedTarget::Record)
    }

    /// Like [`add_embedded_from`](Self::add_embedded_from), running `map` into
    /// `target`. Use [`EmbeddedTarget::object`] when `map` writes object
    /// properties or mutators.
    #[must_use]
    pub fn add_embedded_into(
        self,
        destination: impl Into<String>,
        source: impl Into<String>,
        map: impl Into<Arc<Map>>,
        target: EmbeddedTarget,
    ) -> Self {
        let mapping = Mapping::embedded_into(
            self.destination_kind.reference(destination),
            self.source_kind.reference(source),
            map,
            target,
        );
        self.add_mapping(mapping)
    }

    /// Write the value computed by `resolver` into `destination`.
    #[must_use]
    pub fn add_resolver(
        self,
        destination: impl Into<String>,
        resolver: impl ValueResolver + 'static,
    ) -> Self {
        let mapping = Mapping::resolved(self.destination_kind.reference(destination), resolver);
        self.add_mapping(mapping)
    }

    /// Shorthand for [`add_resolver`](Self::add_resolver) with a [`CallableResolver`].
    #[must_use]
    pub fn add_resolver_fn<F>(self, destination: impl Into<String>, resolve: F) -> Self
    where
        F: Fn(&Source<'_>, &Destination<'_>) -> Result<Value, ResolveError>
            + Send
            + Sync
            + 'static,
    {
        self.add_resolver(destination, CallableResolver::new(resolve))
    }

    /// Append a hand-built mapping as is, ignoring the default kinds.
    #[must_use]
    pub fn add_mapping(mut self, mapping: impl Into<Mapping>) -> Self {
        let mapping = mapping.into();
        trace!(mapping = %mapping.describe(), "mapping added");
        self.mappings.push(mapping);
        self
    }

    /// Compile the mappings added so far, in insertion order.
    #[must_use]
    pub fn build(self) -> Map {
        Map::new(self.mappings)
    }
}
