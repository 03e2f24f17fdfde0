//! Field reflection layer.
//!
//! Every component variant declares its fields once, as a static table of
//! [`FieldSpec`] entries. A [`FieldContainer`] stores one [`FieldValue`] per
//! entry and offers name-based access validated against that table:
//!
//! | Kind          | Fields                        | Presentation               |
//! |---------------|-------------------------------|----------------------------|
//! | `Text`        | name, desc, comment, seller, link | as stored              |
//! | `Type`        | tp                            | type label                 |
//! | `Status`      | status                        | title-cased status name    |
//! | `Manufacture` | manufacture                   | manufacture label          |
//! | `Quantity`    | qty, qty_pkg                  | as stored                  |
//! | `Cost`        | cost                          | as stored                  |
//!
//! `replace_field` only checks the name. The stored value is not coerced to the
//! declared kind, so callers own semantic validation (e.g. negative quantities).

use std::fmt;

use crate::domain::enums::{ComponentType, Manufacture, Status};
use crate::domain::error::{DomainError, DomainResult};

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Type,
    Status,
    Manufacture,
    Quantity,
    Cost,
}

/// Compile-time default for a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Seed {
    Text(&'static str),
    Type(ComponentType),
    Status(Status),
    Manufacture(Manufacture),
    Integer(i64),
    Decimal(f64),
}

impl Seed {
    fn to_value(self) -> FieldValue {
        match self {
            Seed::Text(s) => FieldValue::Text(s.to_string()),
            Seed::Type(tp) => FieldValue::Type(tp),
            Seed::Status(st) => FieldValue::Status(st),
            Seed::Manufacture(m) => FieldValue::Manufacture(m),
            Seed::Integer(i) => FieldValue::Integer(i),
            Seed::Decimal(d) => FieldValue::Decimal(d),
        }
    }
}

/// Specification for a single field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: Seed,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind, default: Seed) -> Self {
        Self {
            name,
            kind,
            default,
        }
    }
}

/// Fields shared by every component.
pub const GENERAL_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", FieldKind::Text, Seed::Text("Name")),
    FieldSpec::new(
        "desc",
        FieldKind::Text,
        Seed::Text("Describe here your component..."),
    ),
    FieldSpec::new(
        "comment",
        FieldKind::Text,
        Seed::Text("Write here your notes..."),
    ),
    FieldSpec::new("tp", FieldKind::Type, Seed::Type(ComponentType::Placeholder)),
    FieldSpec::new("status", FieldKind::Status, Seed::Status(Status::Invisible)),
    FieldSpec::new(
        "manufacture",
        FieldKind::Manufacture,
        Seed::Manufacture(Manufacture::Any),
    ),
    FieldSpec::new("qty", FieldKind::Quantity, Seed::Integer(0)),
    FieldSpec::new("cost", FieldKind::Cost, Seed::Decimal(0.0)),
];

/// General fields followed by the purchasing fields of bought hardware.
pub const HARDWARE_FIELDS: &[FieldSpec] = &[
    GENERAL_FIELDS[0],
    GENERAL_FIELDS[1],
    GENERAL_FIELDS[2],
    GENERAL_FIELDS[3],
    GENERAL_FIELDS[4],
    GENERAL_FIELDS[5],
    GENERAL_FIELDS[6],
    GENERAL_FIELDS[7],
    FieldSpec::new("qty_pkg", FieldKind::Quantity, Seed::Integer(0)),
    FieldSpec::new(
        "seller",
        FieldKind::Text,
        Seed::Text("Write here the seller of the component"),
    ),
    FieldSpec::new(
        "link",
        FieldKind::Text,
        Seed::Text("The link for the page goes here..."),
    ),
];

/// Runtime value of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Type(ComponentType),
    Status(Status),
    Manufacture(Manufacture),
    Integer(i64),
    Decimal(f64),
}

impl FieldValue {
    /// Applies the presentation rule: enumerations become their label text,
    /// everything else is returned unchanged.
    pub fn present(&self) -> FieldValue {
        match self {
            FieldValue::Type(tp) => FieldValue::Text(tp.label().to_string()),
            FieldValue::Manufacture(m) => FieldValue::Text(m.label().to_string()),
            FieldValue::Status(st) => FieldValue::Text(st.title().to_string()),
            other => other.clone(),
        }
    }

    /// Parses user text into the value type of `kind`.
    pub fn parse(field: &str, kind: FieldKind, raw: &str) -> DomainResult<FieldValue> {
        let invalid = || DomainError::InvalidFieldValue {
            field: field.to_string(),
            value: raw.to_string(),
        };
        let value = match kind {
            FieldKind::Text => FieldValue::Text(raw.to_string()),
            FieldKind::Type => FieldValue::Type(raw.parse().map_err(|_| invalid())?),
            FieldKind::Status => FieldValue::Status(raw.parse().map_err(|_| invalid())?),
            FieldKind::Manufacture => {
                FieldValue::Manufacture(raw.parse().map_err(|_| invalid())?)
            }
            FieldKind::Quantity => FieldValue::Integer(raw.trim().parse().map_err(|_| invalid())?),
            FieldKind::Cost => FieldValue::Decimal(raw.trim().parse().map_err(|_| invalid())?),
        };
        Ok(value)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            FieldValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Type(tp) => write!(f, "{tp}"),
            FieldValue::Status(st) => write!(f, "{st}"),
            FieldValue::Manufacture(m) => write!(f, "{m}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Decimal(d) => write!(f, "{d:.2}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<ComponentType> for FieldValue {
    fn from(value: ComponentType) -> Self {
        FieldValue::Type(value)
    }
}

impl From<Status> for FieldValue {
    fn from(value: Status) -> Self {
        FieldValue::Status(value)
    }
}

impl From<Manufacture> for FieldValue {
    fn from(value: Manufacture) -> Self {
        FieldValue::Manufacture(value)
    }
}

/// Fixed, ordered set of named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldContainer {
    specs: &'static [FieldSpec],
    values: Vec<FieldValue>,
}

impl FieldContainer {
    /// Creates a container holding the declared default of every field.
    pub fn new(specs: &'static [FieldSpec]) -> Self {
        Self {
            specs,
            values: specs.iter().map(|spec| spec.default.to_value()).collect(),
        }
    }

    fn position(&self, name: &str) -> DomainResult<usize> {
        self.specs
            .iter()
            .position(|spec| spec.name == name)
            .ok_or_else(|| DomainError::UnknownField(name.to_string()))
    }

    /// Returns the value of `name` with the presentation rule applied.
    pub fn get_field(&self, name: &str) -> DomainResult<FieldValue> {
        let pos = self.position(name)?;
        Ok(self.values[pos].present())
    }

    /// Returns the stored value of `name` as is.
    pub fn raw_field(&self, name: &str) -> DomainResult<&FieldValue> {
        let pos = self.position(name)?;
        Ok(&self.values[pos])
    }

    pub fn replace_field(&mut self, name: &str, value: impl Into<FieldValue>) -> DomainResult<()> {
        let pos = self.position(name)?;
        self.values[pos] = value.into();
        Ok(())
    }

    pub fn field_kind(&self, name: &str) -> DomainResult<FieldKind> {
        let pos = self.position(name)?;
        Ok(self.specs[pos].kind)
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.specs.iter().map(|spec| spec.name).collect()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.specs.iter().any(|spec| spec.name == name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Materializes the container as ordered `(name, value)` pairs, stored values.
    pub fn to_map(&self) -> Vec<(&'static str, FieldValue)> {
        self.specs
            .iter()
            .zip(self.values.iter())
            .map(|(spec, value)| (spec.name, value.clone()))
            .collect()
    }
}
