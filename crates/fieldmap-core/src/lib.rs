//! Declarative field mapping between records and objects.
//!
//! A [`Map`] is an ordered list of [`Mapping`]s. Each mapping writes one
//! destination field through a [`Reference`], taking its value from a source
//! reference, from a nested map ([`Mapping::Embedded`]), or from a
//! [`ValueResolver`]. [`MapBuilder`] assembles maps fluently and
//! [`MapDefinition`] loads them from JSON. [`Mapper`] runs a [`Context`]'s map
//! against one source/destination pair.
//!
//! Records ([`Record`]) are copy-on-write: the caller's record is never
//! modified and the mapped record is returned. Objects ([`Object`]) are
//! mutated in place.
//!
//! # Example
//!
//! ```
//! use fieldmap_core::{MapBuilder, MappingContext, Mapper, Record};
//! use serde_json::json;
//!
//! let context = MappingContext::new(
//!     "person",
//!     MapBuilder::new()
//!         .add("firstName", "first_name")
//!         .add("lastName", "last_name")
//!         .build(),
//! );
//!
//! let source: Record = serde_json::from_value(json!({
//!     "first_name": "Test First",
//!     "last_name": "Test Last",
//! }))
//! .unwrap();
//!
//! let mapped = Mapper::new()
//!     .map_record(&Record::new(), &source, &context)
//!     .unwrap();
//! assert_eq!(mapped["firstName"], "Test First");
//! assert_eq!(mapped["lastName"], "Test Last");
//! ```

#![deny(unsafe_code)]

pub mod builder;
pub mod container;
pub mod definition;
pub mod error;
pub mod map;
pub mod mapper;
pub mod mapping;
pub mod reference;
pub mod resolver;

pub use builder::MapBuilder;
pub use container::{
    ContainerKind, Destination, MemberError, Object, Record, Source, decode, encode,
};
pub use definition::{MapDefinition, MappingDefinition};
pub use error::{
    DefinitionError, InvalidReferenceKind, MappingError, ReferenceError, ResolveError, Result,
    error_chain,
};
pub use map::Map;
pub use mapper::{Context, Mapper, MappingContext};
pub use mapping::{
    DirectMapping, EmbeddedMapping, EmbeddedTarget, Mapping, ObjectFactory, ResolverMapping,
};
pub use reference::{
    ArrayReference, MutatorReference, PropertyReference, Reference, ReferenceKind,
};
pub use resolver::{CallableResolver, ConstantResolver, ValueResolver};
pub use serde_json::Value;
