//! Field-level mapping rules.
//!
//! A [`Mapping`] always writes one destination field. Where the value comes
//! from is the variant:
//!
//! - [`Mapping::Direct`]: read from a source field.
//! - [`Mapping::Embedded`]: read a nested record from a source field, run a
//!   nested [`Map`] over it into a fresh [`EmbeddedTarget`], write the result.
//! - [`Mapping::Resolved`]: ask a [`ValueResolver`].
//!
//! Every failure is wrapped in a [`MappingError`] naming the destination
//! field.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::container::{Destination, Object, Record, Source};
use crate::error::{MappingError, ReferenceError};
use crate::map::Map;
use crate::reference::Reference;
use crate::resolver::ValueResolver;

/// Copies one source field into one destination field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectMapping {
    pub destination: Reference,
    pub source: Reference,
}

/// Builds the object an embedded map writes into.
pub type ObjectFactory = Arc<dyn Fn() -> Box<dyn Object> + Send + Sync>;

/// The fresh container an embedded map runs into.
///
/// It must match the destination kind the nested map was built with:
/// `Record` for array references, `Object` for property or mutator
/// references.
#[derive(Clone, Default)]
pub enum EmbeddedTarget {
    /// A new empty record.
    #[default]
    Record,
    /// A new object from the factory, one per run.
    Object(ObjectFactory),
}

impl EmbeddedTarget {
    pub fn object<T, F>(factory: F) -> Self
    where
        T: Object + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::Object(Arc::new(move || Box::new(factory()) as Box<dyn Object>))
    }
}

impl fmt::Debug for EmbeddedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record => f.write_str("Record"),
            Self::Object(_) => f.write_str("Object(..)"),
        }
    }
}

/// Maps a nested record through its own [`Map`].
#[derive(Debug, Clone)]
pub struct EmbeddedMapping {
    pub destination: Reference,
    pub source: Reference,
    pub map: Arc<Map>,
    pub target: EmbeddedTarget,
}

/// Writes a computed value.
#[derive(Clone)]
pub struct ResolverMapping {
    pub destination: Reference,
    pub resolver: Arc<dyn ValueResolver>,
}

impl fmt::Debug for ResolverMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverMapping")
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

/// One rule of a [`Map`].
#[derive(Debug, Clone)]
pub enum Mapping {
    Direct(DirectMapping),
    Embedded(EmbeddedMapping),
    Resolved(ResolverMapping),
}

impl Mapping {
    pub fn direct(destination: Reference, source: Reference) -> Self {
        Self::Direct(DirectMapping {
            destination,
            source,
        })
    }

    pub fn embedded(destination: Reference, source: Reference, map: impl Into<Arc<Map>>) -> Self {
        Self::embedded_into(destination, source, map, EmbeddedTarget::Record)
    }

    /// Like [`Mapping::embedded`] with an explicit container for the nested map.
    pub fn embedded_into(
        destination: Reference,
        source: Reference,
        map: impl Into<Arc<Map>>,
        target: EmbeddedTarget,
    ) -> Self {
        Self::Embedded(EmbeddedMapping {
            destination,
            source,
            map: map.into(),
            target,
        })
    }

    pub fn resolved(destination: Reference, resolver: impl ValueResolver + 'static) -> Self {
        Self::Resolved(ResolverMapping {
            destination,
            resolver: Arc::new(resolver),
        })
    }

    #[must_use]
    pub fn destination(&self) -> &Reference {
        match self {
            Self::Direct(m) => &m.destination,
            Self::Embedded(m) => &m.destination,
            Self::Resolved(m) => &m.destination,
        }
    }

    /// Short human-readable form, e.g. `[name] <- [full_name]`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Direct(m) => format!("{} <- {}", m.destination, m.source),
            Self::Embedded(m) => {
                let into = match m.target {
                    EmbeddedTarget::Record => "",
                    EmbeddedTarget::Object(_) => " into object",
                };
                format!(
                    "{} <- {} via map of {} mapping(s){into}",
                    m.destination,
                    m.source,
                    m.map.len()
                )
            }
            Self::Resolved(m) => format!("{} <- resolver", m.destination),
        }
    }

    /// Apply this rule and hand back the updated destination.
    pub fn apply<'a>(
        &self,
        destination: Destination<'a>,
        source: &Source<'_>,
    ) -> Result<Destination<'a>, MappingError> {
        let value = match self {
            Self::Direct(m) => m
                .source
                .read(source)
                .map_err(|e| self.reference_error(e))?,
            Self::Embedded(m) => self.apply_embedded(m, source)?,
            Self::Resolved(m) => {
                m.resolver
                    .resolve(source, &destination)
                    .map_err(|e| MappingError::Resolver {
                        field: self.field(),
                        source: e,
                    })?
            }
        };
        self.destination()
            .write(destination, value)
            .map_err(|e| self.reference_error(e))
    }

    fn apply_embedded(
        &self,
        mapping: &EmbeddedMapping,
        source: &Source<'_>,
    ) -> Result<Value, MappingError> {
        let nested = mapping
            .source
            .read(source)
            .map_err(|e| self.reference_error(e))?;
        let Value::Object(nested) = nested else {
            return Err(MappingError::EmbeddedSource {
                field: self.field(),
            });
        };
        let nested_source = Source::Record(&nested);
        let embedded = |e: MappingError| MappingError::Embedded {
            field: self.field(),
            source: Box::new(e),
        };
        let result = match &mapping.target {
            EmbeddedTarget::Record => mapping
                .map
                .apply_to_record(Cow::Owned(Record::new()), &nested_source)
                .map_err(embedded)?,
            EmbeddedTarget::Object(factory) => {
                let mut object = factory();
                mapping
                    .map
                    .apply(Destination::Object(object.as_mut()), &nested_source)
                    .map_err(embedded)?;
                read_back(&mapping.map, object.as_ref()).map_err(embedded)?
            }
        };
        Ok(Value::Object(result))
    }

    fn field(&self) -> String {
        self.destination().field().to_string()
    }

    fn reference_error(&self, source: ReferenceError) -> MappingError {
        MappingError::Reference {
            field: self.field(),
            source,
        }
    }
}

/// Snapshot an object filled by `map`, keyed by each destination field.
fn read_back(map: &Map, object: &dyn Object) -> Result<Record, MappingError> {
    let source = Source::Object(object);
    map.iter()
        .map(|mapping| {
            let reference = mapping.destination();
            let field = reference.field().to_string();
            match reference.read(&source) {
                Ok(value) => Ok((field, value)),
                Err(source) => Err(MappingError::Reference { field, source }),
            }
        })
        .collect()
}

impl From<DirectMapping> for Mapping {
    fn from(mapping: DirectMapping) -> Self {
        Self::Direct(mapping)
    }
}

impl From<EmbeddedMapping> for Mapping {
    fn from(mapping: EmbeddedMapping) -> Self {
        Self::Embedded(mapping)
    }
}

impl From<ResolverMapping> for Mapping {
    fn from(mapping: ResolverMapping) -> Self {
        Self::Resolved(mapping)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::container::MemberError;
    use crate::error::ResolveError;
    use crate::resolver::{CallableResolver, ConstantResolver};

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn direct_copies_value() {
        let source = record(json!({"first_name": "Test First"}));
        let mapping = Mapping::direct(Reference::array("firstName"), Reference::array("first_name"));

        let result = mapping
            .apply(Destination::owned(Record::new()), &Source::record(&source))
            .unwrap()
            .into_record()
            .unwrap();
        assert_eq!(result, record(json!({"firstName": "Test First"})));
    }

    #[test]
    fn embedded_maps_nested_record() {
        let source = record(json!({"addr": {"line1": "1 Main St", "zip": "12345"}}));
        let nested = Map::new(vec![
            Mapping::direct(Reference::array("street"), Reference::array("line1")),
            Mapping::direct(Reference::array("postcode"), Reference::array("zip")),
        ]);
        let mapping = Mapping::embedded(Reference::array("address"), Reference::array("addr"), nested);

        let result = mapping
            .apply(Destination::owned(Record::new()), &Source::record(&source))
            .unwrap()
            .into_record()
            .unwrap();
        assert_eq!(
            result,
            record(json!({"address": {"street": "1 Main St", "postcode": "12345"}}))
        );
    }

    #[test]
    fn embedded_rejects_scalar_source() {
        let source = record(json!({"addr": "1 Main St"}));
        let mapping = Mapping::embedded(
            Reference::array("address"),
            Reference::array("addr"),
            Map::default(),
        );
        let error = mapping
            .apply(Destination::owned(Record::new()), &Source::record(&source))
            .unwrap_err();
        assert_eq!(
            error,
            MappingError::EmbeddedSource {
                field: "address".to_string()
            }
        );
    }

    #[test]
    fn embedded_wraps_nested_failure() {
        let source = record(json!({"addr": {}}));
        let nested = Map::new(vec![Mapping::direct(
            Reference::array("street"),
            Reference::array("line1"),
        )]);
        let mapping = Mapping::embedded(Reference::array("address"), Reference::array("addr"), nested);
        let error = mapping
            .apply(Destination::owned(Record::new()), &Source::record(&source))
            .unwrap_err();

        assert_eq!(error.field(), "address");
        assert_eq!(
            error.reference_error(),
            Some(&ReferenceError::UndefinedSourceField("line1".to_string()))
        );
        insta::assert_snapshot!(
            crate::error::error_chain(&error),
            @"embedded mapping to 'address' failed: mapping to 'street' failed: undefined source field 'line1'"
        );
    }

    /// Accepts writes but exposes nothing to read.
    #[derive(Default)]
    struct Sink;

    impl Object for Sink {
        fn type_name(&self) -> &str {
            "Sink"
        }

        fn set_property(&mut self, _name: &str, _value: Value) -> Result<(), MemberError> {
            Ok(())
        }
    }

    #[test]
    fn object_target_must_be_readable_after_mapping() {
        let source = record(json!({"addr": {"line1": "1 Main St"}}));
        let nested = Map::new(vec![Mapping::direct(
            Reference::property("street"),
            Reference::array("line1"),
        )]);
        let mapping = Mapping::embedded_into(
            Reference::array("address"),
            Reference::array("addr"),
            nested,
            EmbeddedTarget::object(Sink::default),
        );

        let error = mapping
            .apply(Destination::owned(Record::new()), &Source::record(&source))
            .unwrap_err();
        insta::assert_snapshot!(
            crate::error::error_chain(&error),
            @"embedded mapping to 'address' failed: mapping to 'street' failed: inaccessible member 'street' on Sink"
        );
    }

    #[test]
    fn record_target_rejects_object_kinds_in_nested_map() {
        let source = record(json!({"addr": {"line1": "1 Main St"}}));
        let nested = Map::new(vec![Mapping::direct(
            Reference::property("street"),
            Reference::array("line1"),
        )]);
        let mapping = Mapping::embedded(Reference::array("address"), Reference::array("addr"), nested);

        let error = mapping
            .apply(Destination::owned(Record::new()), &Source::record(&source))
            .unwrap_err();
        assert!(matches!(
            error.reference_error(),
            Some(ReferenceError::ContainerMismatch { .. })
        ));
    }

    #[test]
    fn resolver_failure_names_field() {
        let mapping = Mapping::resolved(
            Reference::array("total"),
            CallableResolver::new(|_source, _destination| Err(ResolveError::message("no price"))),
        );
        let empty = Record::new();
        let error = mapping
            .apply(Destination::record(&empty), &Source::record(&empty))
            .unwrap_err();
        assert_eq!(error.field(), "total");
    }

    #[test]
    fn describe_names_both_sides() {
        let direct = Mapping::direct(Reference::array("name"), Reference::property("fullName"));
        assert_eq!(direct.describe(), "[name] <- .fullName");

        let resolved = Mapping::resolved(Reference::mutator("kind"), ConstantResolver::new("x"));
        assert_eq!(resolved.describe(), "getKind()/setKind() <- resolver");

        let embedded = Mapping::embedded_into(
            Reference::array("address"),
            Reference::array("addr"),
            Map::default(),
            EmbeddedTarget::object(Sink::default),
        );
        assert_eq!(
            embedded.describe(),
            "[address] <- [addr] via map of 0 mapping(s) into object"
        );
    }
}
