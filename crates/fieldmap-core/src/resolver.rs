//! Value resolvers: computed values for mappings a field reference cannot express.
//!
//! A resolver sees the whole source and the destination as it stands when
//! its mapping runs, so it may read fields written by earlier mappings of the
//! same map. Resolvers are shared between mapping runs and must not keep
//! per-run state.

use std::fmt;

use serde_json::Value;

use crate::container::{Destination, Source};
use crate::error::ResolveError;

/// Computes one destination value from the full source and destination.
pub trait ValueResolver: Send + Sync {
    fn resolve(
        &self,
        source: &Source<'_>,
        destination: &Destination<'_>,
    ) -> Result<Value, ResolveError>;
}

/// Adapts a closure into a [`ValueResolver`].
///
/// # Example
///
/// ```
/// use fieldmap_core::{CallableResolver, Reference, ResolveError};
///
/// let full_name = CallableResolver::new(|source, _destination| {
///     let first = Reference::array("first").read(source)?;
///     let last = Reference::array("last").read(source)?;
///     match (first.as_str(), last.as_str()) {
///         (Some(first), Some(last)) => Ok(format!("{first} {last}").into()),
///         _ => Err(ResolveError::message("names must be strings")),
///     }
/// });
/// # let _ = full_name;
/// ```
pub struct CallableResolver<F> {
    callable: F,
}

impl<F> CallableResolver<F> {
    pub fn new(callable: F) -> Self
    where
        F: Fn(&Source<'_>, &Destination<'_>) -> Result<Value, ResolveError> + Send + Sync,
    {
        Self { callable }
    }
}

impl<F> ValueResolver for CallableResolver<F>
where
    F: Fn(&Source<'_>, &Destination<'_>) -> Result<Value, ResolveError> + Send + Sync,
{
    fn resolve(
        &self,
        source: &Source<'_>,
        destination: &Destination<'_>,
    ) -> Result<Value, ResolveError> {
        (self.callable)(source, destination)
    }
}

impl<F> fmt::Debug for CallableResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallableResolver").finish_non_exhaustive()
    }
}

/// Always resolves to the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantResolver {
    value: Value,
}

impl ConstantResolver {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl ValueResolver for ConstantResolver {
    fn resolve(
        &self,
        _source: &Source<'_>,
        _destination: &Destination<'_>,
    ) -> Result<Value, ResolveError> {
        Ok(self.value.clone())
    }
}
