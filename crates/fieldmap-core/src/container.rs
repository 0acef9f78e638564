//! Containers that references read from and write into.
//!
//! Two kinds of container exist:
//!
//! - **Records** ([`Record`]): string-keyed associative structures. Writes are
//!   copy-on-write; a record borrowed into a [`Destination`] is cloned on the
//!   first write and the caller's value is never touched.
//! - **Objects** ([`Object`]): identity-bearing values exposing public fields
//!   and/or accessor methods. Writes mutate the object in place.
//!
//! Values crossing a container boundary are always [`Value`]s. Typed Rust
//! fields are converted through serde with [`encode`] and [`decode`]; no
//! coercion happens beyond what serde itself does.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Associative container: string keys to arbitrary values.
pub type Record = serde_json::Map<String, Value>;

/// Outcome of a member lookup or invocation on an [`Object`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemberError {
    /// No public field or method with that name.
    #[error("no such member")]
    Missing,
    /// The member exists but cannot accept the value.
    #[error("{0}")]
    Rejected(String),
}

/// An object whose public fields or accessor methods can be addressed by name.
///
/// Every hook defaults to [`MemberError::Missing`], so an implementation only
/// provides the members it exposes. Property hooks back
/// [`PropertyReference`](crate::PropertyReference); getter/setter hooks back
/// [`MutatorReference`](crate::MutatorReference) and receive the full method
/// name (`getFirstName`, `setFirstName`, or an override).
///
/// # Example
///
/// ```
/// use fieldmap_core::{MemberError, Object, Value, decode, encode};
///
/// #[derive(Default)]
/// struct Person {
///     first_name: String,
/// }
///
/// impl Object for Person {
///     fn property(&self, name: &str) -> Result<Value, MemberError> {
///         match name {
///             "firstName" => encode(&self.first_name),
///             _ => Err(MemberError::Missing),
///         }
///     }
///
///     fn set_property(&mut self, name: &str, value: Value) -> Result<(), MemberError> {
///         match name {
///             "firstName" => self.first_name = decode(value)?,
///             _ => return Err(MemberError::Missing),
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Object {
    /// Name used in error messages.
    fn type_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn property(&self, name: &str) -> Result<Value, MemberError> {
        let _ = name;
        Err(MemberError::Missing)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), MemberError> {
        let _ = (name, value);
        Err(MemberError::Missing)
    }

    fn call_getter(&self, method: &str) -> Result<Value, MemberError> {
        let _ = method;
        Err(MemberError::Missing)
    }

    fn call_setter(&mut self, method: &str, value: Value) -> Result<(), MemberError> {
        let _ = (method, value);
        Err(MemberError::Missing)
    }
}

/// Serialize a typed field into a [`Value`].
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Value, MemberError> {
    serde_json::to_value(value).map_err(|e| MemberError::Rejected(e.to_string()))
}

/// Deserialize a [`Value`] into a typed field.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, MemberError> {
    serde_json::from_value(value).map_err(|e| MemberError::Rejected(e.to_string()))
}

/// Container variant, used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Record,
    Object,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record => write!(f, "record"),
            Self::Object => write!(f, "object"),
        }
    }
}

/// Read-only view of the value being mapped from.
#[derive(Clone, Copy)]
pub enum Source<'a> {
    Record(&'a Record),
    Object(&'a dyn Object),
}

impl<'a> Source<'a> {
    pub fn record(record: &'a Record) -> Self {
        Self::Record(record)
    }

    pub fn object<T: Object>(object: &'a T) -> Self {
        Self::Object(object)
    }

    #[must_use]
    pub fn kind(&self) -> ContainerKind {
        match self {
            Self::Record(_) => ContainerKind::Record,
            Self::Object(_) => ContainerKind::Object,
        }
    }
}

impl fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(record) => f.debug_tuple("Record").field(record).finish(),
            Self::Object(object) => f.debug_tuple("Object").field(&object.type_name()).finish(),
        }
    }
}

/// The value being mapped into, threaded through every mapping of a map.
pub enum Destination<'a> {
    /// Copy-on-write record. Borrowed records are cloned on first write.
    Record(Cow<'a, Record>),
    /// Object mutated in place.
    Object(&'a mut dyn Object),
}

impl<'a> Destination<'a> {
    /// Map into a copy of `record`, leaving the original untouched.
    pub fn record(record: &'a Record) -> Self {
        Self::Record(Cow::Borrowed(record))
    }

    /// Map into an owned record.
    pub fn owned(record: Record) -> Self {
        Self::Record(Cow::Owned(record))
    }

    /// Map into `object` in place.
    pub fn object<T: Object>(object: &'a mut T) -> Self {
        Self::Object(object)
    }

    #[must_use]
    pub fn kind(&self) -> ContainerKind {
        match self {
            Self::Record(_) => ContainerKind::Record,
            Self::Object(_) => ContainerKind::Object,
        }
    }

    /// Current state of the destination as a source, e.g. for resolvers.
    #[must_use]
    pub fn as_source(&self) -> Source<'_> {
        match self {
            Self::Record(record) => Source::Record(&**record),
            Self::Object(object) => Source::Object(&**object),
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(&**record),
            Self::Object(_) => None,
        }
    }

    /// The mapped record, or `None` for object destinations.
    #[must_use]
    pub fn into_record(self) -> Option<Record> {
        match self {
            Self::Record(record) => Some(record.into_owned()),
            Self::Object(_) => None,
        }
    }
}

impl From<Record> for Destination<'static> {
    fn from(record: Record) -> Self {
        Self::owned(record)
    }
}

impl<'a> From<&'a Record> for Destination<'a> {
    fn from(record: &'a Record) -> Self {
        Self::record(record)
    }
}

impl<'a> From<&'a Record> for Source<'a> {
    fn from(record: &'a Record) -> Self {
        Self::record(record)
    }
}

impl fmt::Debug for Destination<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(record) => f.debug_tuple("Record").field(record).finish(),
            Self::Object(object) => f.debug_tuple("Object").field(&object.type_name()).finish(),
        }
    }
}
