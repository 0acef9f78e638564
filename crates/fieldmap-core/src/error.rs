//! Error types for references, resolvers, mappings and map definitions.
//!
//! Errors nest the way the work nests: a [`ReferenceError`] describes one
//! failed field access, a [`MappingError`] wraps it with the destination
//! field that was being produced, and an embedded mapping wraps the nested
//! map's error once more. Display messages describe one level only; the
//! cause is reachable through [`std::error::Error::source`]. Nothing in this
//! crate catches or retries an error; the first failure aborts the whole
//! `map()` call.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::container::ContainerKind;
use crate::reference::ReferenceKind;

/// A reference-kind name outside `array`, `object_properties` and
/// `object_mutators`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "invalid reference kind '{value}' (expected one of: array, object_properties, object_mutators)"
)]
pub struct InvalidReferenceKind {
    /// The rejected configuration value.
    pub value: String,
}

impl InvalidReferenceKind {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl From<std::convert::Infallible> for InvalidReferenceKind {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

/// Failure to read or write a single field through a reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ReferenceError {
    /// The source record has no entry for the requested key.
    #[error("undefined source field '{0}'")]
    UndefinedSourceField(String),

    /// The object has no such public field or accessor method.
    #[error("inaccessible member '{member}' on {type_name}")]
    InaccessibleMember {
        /// Type name reported by the object.
        type_name: String,
        /// Field or method name that was looked up.
        member: String,
    },

    /// The member exists but refused the value it was handed.
    #[error("member '{member}' on {type_name} rejected value: {reason}")]
    RejectedValue {
        /// Type name reported by the object.
        type_name: String,
        /// Field or method name that was invoked.
        member: String,
        /// Reason given by the object.
        reason: String,
    },

    /// The reference kind cannot address this kind of container.
    #[error("{reference} reference cannot address {container} containers")]
    ContainerMismatch {
        reference: ReferenceKind,
        container: ContainerKind,
    },
}

/// Failure reported by a value resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// A field the resolver read through a reference was unavailable.
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// Free-form failure raised by resolver code.
    #[error("{0}")]
    Message(String),
}

impl ResolveError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Failure of one mapping inside a map, naming the destination field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MappingError {
    /// Reading the source or writing the destination failed.
    #[error("mapping to '{field}' failed")]
    Reference {
        field: String,
        #[source]
        source: ReferenceError,
    },

    /// The resolver could not compute a value.
    #[error("resolver for '{field}' failed")]
    Resolver {
        field: String,
        #[source]
        source: ResolveError,
    },

    /// The nested map of an embedded mapping failed.
    #[error("embedded mapping to '{field}' failed")]
    Embedded {
        field: String,
        #[source]
        source: Box<MappingError>,
    },

    /// The value located for an embedded mapping is not a record.
    #[error("embedded source for '{field}' is not a record")]
    EmbeddedSource { field: String },
}

impl MappingError {
    /// Destination field of the outermost mapping that failed.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Reference { field, .. }
            | Self::Resolver { field, .. }
            | Self::Embedded { field, .. }
            | Self::EmbeddedSource { field } => field,
        }
    }

    /// Innermost reference failure, following embedded mappings down.
    #[must_use]
    pub fn reference_error(&self) -> Option<&ReferenceError> {
        match self {
            Self::Reference { source, .. } => Some(source),
            Self::Resolver {
                source: ResolveError::Reference(source),
                ..
            } => Some(source),
            Self::Embedded { source, .. } => source.reference_error(),
            Self::Resolver { .. } | Self::EmbeddedSource { .. } => None,
        }
    }
}

/// Failure to load or compile a declarative map definition.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DefinitionError {
    #[error("failed to read map definition {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid map definition")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Kind(#[from] InvalidReferenceKind),

    /// A `constant` rule was combined with `from` or `embedded`.
    #[error("mapping to '{field}' combines a constant with a source rule")]
    ConflictingRule { field: String },
}

/// Result type alias for mapping operations.
pub type Result<T> = std::result::Result<T, MappingError>;

/// Render an error and all of its causes, outermost first.
#[must_use]
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut rendered = error.to_string();
    let mut cause = error.source();
    while let Some(inner) = cause {
        rendered.push_str(": ");
        rendered.push_str(&inner.to_string());
        cause = inner.source();
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_reports_outermost_mapping() {
        let inner = MappingError::Reference {
            field: "street".to_string(),
            source: ReferenceError::UndefinedSourceField("line1".to_string()),
        };
        let outer = MappingError::Embedded {
            field: "address".to_string(),
            source: Box::new(inner),
        };

        assert_eq!(outer.field(), "address");
        assert_eq!(
            outer.reference_error(),
            Some(&ReferenceError::UndefinedSourceField("line1".to_string()))
        );
    }

    #[test]
    fn resolver_message_has_no_reference_cause() {
        let error = MappingError::Resolver {
            field: "total".to_string(),
            source: ResolveError::message("price missing"),
        };
        assert!(error.reference_error().is_none());
        insta::assert_snapshot!(error_chain(&error), @"resolver for 'total' failed: price missing");
    }

    #[test]
    fn invalid_kind_lists_accepted_values() {
        let error = InvalidReferenceKind::new("objects");
        insta::assert_snapshot!(
            error.to_string(),
            @"invalid reference kind 'objects' (expected one of: array, object_properties, object_mutators)"
        );
    }
}
