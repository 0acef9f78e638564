//! Field addressing inside records and objects.
//!
//! A [`Reference`] names one field and knows how to reach it in one kind of
//! container. References are plain addressing data: they are immutable once
//! built and keep no state between calls, so one instance can serve any
//! number of concurrent mapping runs.
//!
//! | Kind | Container | Read | Write |
//! |------|-----------|------|-------|
//! | [`ArrayReference`] | [`Record`] | key lookup | copy-on-write insert |
//! | [`PropertyReference`] | [`Object`] | `property` | `set_property`, in place |
//! | [`MutatorReference`] | [`Object`] | getter method | setter method, in place |

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::container::{ContainerKind, Destination, MemberError, Object, Record, Source};
use crate::error::{InvalidReferenceKind, ReferenceError};

/// Which container kind a reference addresses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// Keys of an associative record.
    #[default]
    Array,
    /// Public fields of an object.
    ObjectProperties,
    /// Getter/setter method pairs of an object.
    ObjectMutators,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 3] = [
        ReferenceKind::Array,
        ReferenceKind::ObjectProperties,
        ReferenceKind::ObjectMutators,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::ObjectProperties => "object_properties",
            Self::ObjectMutators => "object_mutators",
        }
    }

    /// Build a reference of this kind with default naming.
    pub fn reference(self, field: impl Into<String>) -> Reference {
        match self {
            Self::Array => Reference::array(field),
            Self::ObjectProperties => Reference::property(field),
            Self::ObjectMutators => Reference::mutator(field),
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReferenceKind {
    type Err = InvalidReferenceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| InvalidReferenceKind::new(s))
    }
}

impl TryFrom<&str> for ReferenceKind {
    type Error = InvalidReferenceKind;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for ReferenceKind {
    type Error = InvalidReferenceKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A key in an associative record.
///
/// Reading a key the record does not hold fails with
/// [`ReferenceError::UndefinedSourceField`]; absent keys are never mapped
/// through as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayReference {
    key: String,
}

impl ArrayReference {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn read(&self, record: &Record) -> Result<Value, ReferenceError> {
        record
            .get(&self.key)
            .cloned()
            .ok_or_else(|| ReferenceError::UndefinedSourceField(self.key.clone()))
    }

    /// Returns the record with the key set. A borrowed record is cloned first.
    pub fn write<'a>(&self, mut record: Cow<'a, Record>, value: Value) -> Cow<'a, Record> {
        record.to_mut().insert(self.key.clone(), value);
        record
    }
}

/// A public field of an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyReference {
    name: String,
}

impl PropertyReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn read(&self, object: &dyn Object) -> Result<Value, ReferenceError> {
        object
            .property(&self.name)
            .map_err(|e| member_error(object, &self.name, e))
    }

    pub fn write(&self, object: &mut dyn Object, value: Value) -> Result<(), ReferenceError> {
        match object.set_property(&self.name, value) {
            Ok(()) => Ok(()),
            Err(e) => Err(member_error(object, &self.name, e)),
        }
    }
}

/// A getter/setter method pair on an object.
///
/// Method names default to `get<Field>` / `set<Field>` with the field name in
/// PascalCase, so `first_name` and `firstName` both address `getFirstName`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MutatorReference {
    field: String,
    getter: String,
    setter: String,
}

impl MutatorReference {
    pub fn new(field: impl Into<String>) -> Self {
        let field = field.into();
        let pascal = pascal_case(&field);
        Self {
            getter: format!("get{pascal}"),
            setter: format!("set{pascal}"),
            field,
        }
    }

    #[must_use]
    pub fn with_getter(mut self, getter: impl Into<String>) -> Self {
        self.getter = getter.into();
        self
    }

    #[must_use]
    pub fn with_setter(mut self, setter: impl Into<String>) -> Self {
        self.setter = setter.into();
        self
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn getter(&self) -> &str {
        &self.getter
    }

    #[must_use]
    pub fn setter(&self) -> &str {
        &self.setter
    }

    pub fn read(&self, object: &dyn Object) -> Result<Value, ReferenceError> {
        object
            .call_getter(&self.getter)
            .map_err(|e| member_error(object, &self.getter, e))
    }

    pub fn write(&self, object: &mut dyn Object, value: Value) -> Result<(), ReferenceError> {
        match object.call_setter(&self.setter, value) {
            Ok(()) => Ok(()),
            Err(e) => Err(member_error(object, &self.setter, e)),
        }
    }
}

/// Addressing for one field in one kind of container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    Array(ArrayReference),
    Property(PropertyReference),
    Mutator(MutatorReference),
}

impl Reference {
    pub fn array(key: impl Into<String>) -> Self {
        Self::Array(ArrayReference::new(key))
    }

    pub fn property(name: impl Into<String>) -> Self {
        Self::Property(PropertyReference::new(name))
    }

    pub fn mutator(field: impl Into<String>) -> Self {
        Self::Mutator(MutatorReference::new(field))
    }

    #[must_use]
    pub fn kind(&self) -> ReferenceKind {
        match self {
            Self::Array(_) => ReferenceKind::Array,
            Self::Property(_) => ReferenceKind::ObjectProperties,
            Self::Mutator(_) => ReferenceKind::ObjectMutators,
        }
    }

    /// The field name this reference was built from.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Array(r) => r.key(),
            Self::Property(r) => r.name(),
            Self::Mutator(r) => r.field(),
        }
    }

    pub fn read(&self, source: &Source<'_>) -> Result<Value, ReferenceError> {
        match (self, source) {
            (Self::Array(r), Source::Record(record)) => r.read(record),
            (Self::Property(r), Source::Object(object)) => r.read(*object),
            (Self::Mutator(r), Source::Object(object)) => r.read(*object),
            _ => Err(self.mismatch(source.kind())),
        }
    }

    /// Write `value` and hand back the updated destination.
    ///
    /// Records come back as a new value (the input is cloned if borrowed);
    /// objects are mutated in place and the same reference is returned.
    pub fn write<'a>(
        &self,
        destination: Destination<'a>,
        value: Value,
    ) -> Result<Destination<'a>, ReferenceError> {
        match (self, destination) {
            (Self::Array(r), Destination::Record(record)) => {
                Ok(Destination::Record(r.write(record, value)))
            }
            (Self::Property(r), Destination::Object(object)) => {
                r.write(&mut *object, value)?;
                Ok(Destination::Object(object))
            }
            (Self::Mutator(r), Destination::Object(object)) => {
                r.write(&mut *object, value)?;
                Ok(Destination::Object(object))
            }
            (_, destination) => Err(self.mismatch(destination.kind())),
        }
    }

    fn mismatch(&self, container: ContainerKind) -> ReferenceError {
        ReferenceError::ContainerMismatch {
            reference: self.kind(),
            container,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(r) => write!(f, "[{}]", r.key()),
            Self::Property(r) => write!(f, ".{}", r.name()),
            Self::Mutator(r) => write!(f, "{}()/{}()", r.getter(), r.setter()),
        }
    }
}

fn member_error(object: &dyn Object, member: &str, error: MemberError) -> ReferenceError {
    match error {
        MemberError::Missing => ReferenceError::InaccessibleMember {
            type_name: object.type_name().to_string(),
            member: member.to_string(),
        },
        MemberError::Rejected(reason) => ReferenceError::RejectedValue {
            type_name: object.type_name().to_string(),
            member: member.to_string(),
            reason,
        },
    }
}

/// `first_name`, `first-name` and `firstName` all become `FirstName`.
fn pascal_case(field: &str) -> String {
    field
        .split(['_', '-', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct Account {
        owner: String,
        balance: i64,
        setter_calls: usize,
    }

    impl Object for Account {
        fn type_name(&self) -> &str {
            "Account"
        }

        fn property(&self, name: &str) -> Result<Value, MemberError> {
            match name {
                "owner" => Ok(json!(self.owner)),
                _ => Err(MemberError::Missing),
            }
        }

        fn set_property(&mut self, name: &str, value: Value) -> Result<(), MemberError> {
            match name {
                "owner" => self.owner = crate::decode(value)?,
                _ => return Err(MemberError::Missing),
            }
            Ok(())
        }

        fn call_getter(&self, method: &str) -> Result<Value, MemberError> {
            match method {
                "getBalance" | "balanceInCents" => Ok(json!(self.balance)),
                _ => Err(MemberError::Missing),
            }
        }

        fn call_setter(&mut self, method: &str, value: Value) -> Result<(), MemberError> {
            match method {
                "setBalance" => {
                    self.setter_calls += 1;
                    self.balance = crate::decode(value)?;
                    Ok(())
                }
                _ => Err(MemberError::Missing),
            }
        }
    }

    #[test]
    fn parses_kinds_case_insensitively() {
        assert_eq!("array".parse::<ReferenceKind>(), Ok(ReferenceKind::Array));
        assert_eq!(
            "OBJECT_PROPERTIES".parse::<ReferenceKind>(),
            Ok(ReferenceKind::ObjectProperties)
        );
        assert_eq!(
            ReferenceKind::try_from(" object_mutators "),
            Ok(ReferenceKind::ObjectMutators)
        );
        assert_eq!(
            "objects".parse::<ReferenceKind>(),
            Err(InvalidReferenceKind::new("objects"))
        );
    }

    #[test]
    fn pascal_case_handles_separators() {
        assert_eq!(pascal_case("first_name"), "FirstName");
        assert_eq!(pascal_case("firstName"), "FirstName");
        assert_eq!(pascal_case("zip-code"), "ZipCode");
        assert_eq!(pascal_case("id"), "Id");
    }

    #[test]
    fn mutator_names_default_and_override() {
        let reference = MutatorReference::new("last_name");
        assert_eq!(reference.getter(), "getLastName");
        assert_eq!(reference.setter(), "setLastName");

        let reference = MutatorReference::new("balance").with_getter("balanceInCents");
        assert_eq!(reference.getter(), "balanceInCents");
        assert_eq!(reference.setter(), "setBalance");
    }

    #[test]
    fn array_write_leaves_borrowed_record_untouched() {
        let mut original = Record::new();
        original.insert("a".to_string(), json!(1));

        let reference = Reference::array("b");
        let written = reference
            .write(Destination::record(&original), json!(2))
            .unwrap()
            .into_record()
            .unwrap();

        assert_eq!(original.len(), 1);
        assert_eq!(written.get("a"), Some(&json!(1)));
        assert_eq!(written.get("b"), Some(&json!(2)));
    }

    #[test]
    fn array_read_of_missing_key_is_an_error() {
        let record = Record::new();
        let error = Reference::array("missing")
            .read(&Source::record(&record))
            .unwrap_err();
        assert_eq!(
            error,
            ReferenceError::UndefinedSourceField("missing".to_string())
        );
    }

    #[test]
    fn property_write_mutates_in_place() {
        let mut account = Account::default();
        Reference::property("owner")
            .write(Destination::object(&mut account), json!("Ada"))
            .unwrap();
        assert_eq!(account.owner, "Ada");
        assert_eq!(
            Reference::property("owner").read(&Source::object(&account)),
            Ok(json!("Ada"))
        );
    }

    #[test]
    fn mutator_write_calls_setter_once() {
        let mut account = Account::default();
        Reference::mutator("balance")
            .write(Destination::object(&mut account), json!(250))
            .unwrap();
        assert_eq!(account.balance, 250);
        assert_eq!(account.setter_calls, 1);
    }

    #[test]
    fn missing_members_are_inaccessible() {
        let account = Account::default();
        let error = Reference::property("secret")
            .read(&Source::object(&account))
            .unwrap_err();
        assert_eq!(
            error,
            ReferenceError::InaccessibleMember {
                type_name: "Account".to_string(),
                member: "secret".to_string(),
            }
        );

        let error = Reference::mutator("owner")
            .read(&Source::object(&account))
            .unwrap_err();
        assert!(matches!(
            error,
            ReferenceError::InaccessibleMember { ref member, .. } if member == "getOwner"
        ));
    }

    #[test]
    fn setter_rejects_wrong_value_type() {
        let mut account = Account::default();
        let error = Reference::mutator("balance")
            .write(Destination::object(&mut account), json!("lots"))
            .unwrap_err();
        assert!(matches!(error, ReferenceError::RejectedValue { .. }));
    }

    #[test]
    fn kind_mismatch_is_reported() {
        let record = Record::new();
        let error = Reference::property("owner")
            .read(&Source::record(&record))
            .unwrap_err();
        assert_eq!(
            error,
            ReferenceError::ContainerMismatch {
                reference: ReferenceKind::ObjectProperties,
                container: ContainerKind::Record,
            }
        );
    }
}
