//! Declarative map definitions loaded from JSON.
//!
//! A definition describes the same rules [`MapBuilder`] assembles in code:
//!
//! ```json
//! {
//!   "name": "person",
//!   "source_kind": "array",
//!   "destination_kind": "array",
//!   "mappings": [
//!     { "to": "firstName", "from": "first_name" },
//!     { "to": "address", "from": "addr", "embedded": { "mappings": [{ "to": "street", "from": "line1" }] } },
//!     { "to": "kind", "constant": "person" }
//!   ]
//! }
//! ```
//!
//! `from` defaults to `to`. A `constant` of `null` is treated as absent.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::builder::MapBuilder;
use crate::error::DefinitionError;
use crate::map::Map;
use crate::mapper::MappingContext;
use crate::reference::ReferenceKind;
use crate::resolver::ConstantResolver;

/// A map described as data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Reference kind for source fields; defaults to `array`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_kind: Option<String>,
    /// Reference kind for destination fields; defaults to `array`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_kind: Option<String>,
    #[serde(default)]
    pub mappings: Vec<MappingDefinition>,
}

/// One rule of a [`MapDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingDefinition {
    /// Destination field.
    pub to: String,
    /// Source field; defaults to `to`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Nested map applied to the record found under `from`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Box<MapDefinition>>,
    /// Fixed value written to `to`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<Value>,
}

impl MappingDefinition {
    /// The source field this rule reads.
    #[must_use]
    pub fn source_field(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.to)
    }
}

impl MapDefinition {
    /// Parse a definition from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::Parse`] for malformed JSON or unknown keys.
    pub fn from_json_str(json: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a definition file.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::Io`] if the file cannot be read, or
    /// [`DefinitionError::Parse`] if it is not a valid definition.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let definition = Self::from_json_str(&text)?;
        debug!(
            path = %path.display(),
            mappings = definition.mappings.len(),
            "loaded map definition"
        );
        Ok(definition)
    }

    /// Compile into a [`Map`]. Embedded definitions compile independently
    /// and do not inherit this definition's kinds.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::Kind`] for an unknown reference kind and
    /// [`DefinitionError::ConflictingRule`] when a `constant` is combined
    /// with `from` or `embedded`.
    pub fn compile(&self) -> Result<Map, DefinitionError> {
        let mut builder = MapBuilder::new();
        if let Some(kind) = &self.source_kind {
            builder = builder.with_source_kind(kind.as_str())?;
        }
        if let Some(kind) = &self.destination_kind {
            builder = builder.with_destination_kind(kind.as_str())?;
        }

        for rule in &self.mappings {
            builder = match (&rule.constant, &rule.embedded) {
                (Some(_), _) if rule.from.is_some() || rule.embedded.is_some() => {
                    return Err(DefinitionError::ConflictingRule {
                        field: rule.to.clone(),
                    });
                }
                (Some(value), None) => {
                    builder.add_resolver(rule.to.as_str(), ConstantResolver::new(value.clone()))
                }
                (None, Some(nested)) => {
                    builder.add_embedded_from(rule.to.as_str(), rule.source_field(), nested.compile()?)
                }
                _ => builder.add(rule.to.as_str(), rule.source_field()),
            };
        }
        Ok(builder.build())
    }

    /// Compile into a [`MappingContext`] named after the definition.
    ///
    /// # Errors
    ///
    /// Same as [`compile`](Self::compile).
    pub fn into_context(self) -> Result<MappingContext, DefinitionError> {
        let map = self.compile()?;
        Ok(MappingContext::new(self.name.unwrap_or_default(), map))
    }

    /// Source and destination kinds after defaulting.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::Kind`] for an unknown reference kind.
    pub fn reference_kinds(&self) -> Result<(ReferenceKind, ReferenceKind), DefinitionError> {
        let parse = |kind: &Option<String>| -> Result<ReferenceKind, DefinitionError> {
            Ok(match kind {
                Some(kind) => kind.parse()?,
                None => ReferenceKind::default(),
            })
        };
        Ok((parse(&self.source_kind)?, parse(&self.destination_kind)?))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::mapping::Mapping;

    #[test]
    fn compiles_all_rule_kinds() {
        let definition = MapDefinition::from_json_str(
            r#"{
                "name": "person",
                "mappings": [
                    { "to": "firstName", "from": "first_name" },
                    { "to": "id" },
                    { "to": "address", "from": "addr", "embedded": { "mappings": [{ "to": "street" }] } },
                    { "to": "kind", "constant": "person" }
                ]
            }"#,
        )
        .unwrap();

        let map = definition.compile().unwrap();
        assert_eq!(map.len(), 4);
        assert!(matches!(map.mappings()[0], Mapping::Direct(_)));
        assert_eq!(map.mappings()[1].describe(), "[id] <- [id]");
        assert!(matches!(map.mappings()[2], Mapping::Embedded(_)));
        assert!(matches!(map.mappings()[3], Mapping::Resolved(_)));
    }

    #[test]
    fn rejects_constant_with_source() {
        let definition = MapDefinition {
            mappings: vec![MappingDefinition {
                to: "kind".to_string(),
                from: Some("type".to_string()),
                embedded: None,
                constant: Some(json!("person")),
            }],
            ..MapDefinition::default()
        };
        let error = definition.compile().unwrap_err();
        assert!(matches!(
            error,
            DefinitionError::ConflictingRule { ref field } if field == "kind"
        ));
    }

    #[test]
    fn rejects_unknown_kind() {
        let definition = MapDefinition {
            source_kind: Some("rows".to_string()),
            ..MapDefinition::default()
        };
        assert!(matches!(
            definition.compile(),
            Err(DefinitionError::Kind(_))
        ));
        assert!(matches!(
            definition.reference_kinds(),
            Err(DefinitionError::Kind(_))
        ));
    }

    #[test]
    fn rejects_unknown_keys() {
        let error = MapDefinition::from_json_str(r#"{ "mappings": [{ "to": "a", "form": "b" }] }"#)
            .unwrap_err();
        assert!(matches!(error, DefinitionError::Parse(_)));
    }

    #[test]
    fn context_takes_definition_name() {
        let definition = MapDefinition {
            name: Some("orders".to_string()),
            ..MapDefinition::default()
        };
        let context = definition.into_context().unwrap();
        assert_eq!(crate::Context::name(&context), "orders");
    }

    #[test]
    fn missing_file_reports_path() {
        let error = MapDefinition::from_path("/nonexistent/fieldmap/map.json").unwrap_err();
        assert!(error.to_string().contains("/nonexistent/fieldmap/map.json"));
    }
}
