//! Components: a field container plus a tag, specialised by a closed set of kinds.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::enums::{ComponentType, Manufacture, Status};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::fields::{
    FieldContainer, FieldKind, FieldSpec, FieldValue, GENERAL_FIELDS, HARDWARE_FIELDS,
};
use crate::domain::tag::Tag;
use crate::domain::tree::TreeItem;

/// Bought hardware sub-kinds; they differ only in their type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareKind {
    Mechanical,
    Electronic,
    Electromechanical,
    Consumable,
    Measured,
}

/// Structural variant of a component, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Base,
    Project,
    Assembly,
    Jig,
    Part,
    Placeholder,
    Hardware(HardwareKind),
}

/// Which editor mode applies to a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// status, manufacture and cost are computed or fixed
    Summary,
    /// status is editable, manufacture and cost are not
    Assembly,
    /// everything except the type is editable
    PartLeaf,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 11] = [
        ComponentKind::Base,
        ComponentKind::Project,
        ComponentKind::Assembly,
        ComponentKind::Jig,
        ComponentKind::Part,
        ComponentKind::Placeholder,
        ComponentKind::Hardware(HardwareKind::Mechanical),
        ComponentKind::Hardware(HardwareKind::Electronic),
        ComponentKind::Hardware(HardwareKind::Electromechanical),
        ComponentKind::Hardware(HardwareKind::Consumable),
        ComponentKind::Hardware(HardwareKind::Measured),
    ];

    /// Lowercase name under which the kind is registered.
    pub fn type_name(&self) -> &'static str {
        match self {
            ComponentKind::Base => "base",
            ComponentKind::Project => "project",
            ComponentKind::Assembly => "assembly",
            ComponentKind::Jig => "jig",
            ComponentKind::Part => "part",
            ComponentKind::Placeholder => "placeholder",
            ComponentKind::Hardware(HardwareKind::Mechanical) => "mechanical",
            ComponentKind::Hardware(HardwareKind::Electronic) => "electronic",
            ComponentKind::Hardware(HardwareKind::Electromechanical) => "electromechanical",
            ComponentKind::Hardware(HardwareKind::Consumable) => "consumable",
            ComponentKind::Hardware(HardwareKind::Measured) => "measured",
        }
    }

    pub fn component_type(&self) -> ComponentType {
        match self {
            ComponentKind::Base => ComponentType::Base,
            ComponentKind::Project => ComponentType::Project,
            ComponentKind::Assembly => ComponentType::Assembly,
            ComponentKind::Jig => ComponentType::Jig,
            ComponentKind::Part => ComponentType::Part,
            ComponentKind::Placeholder => ComponentType::Placeholder,
            ComponentKind::Hardware(HardwareKind::Mechanical) => ComponentType::Mechanical,
            ComponentKind::Hardware(HardwareKind::Electronic) => ComponentType::Electronic,
            ComponentKind::Hardware(HardwareKind::Electromechanical) => {
                ComponentType::Electromechanical
            }
            ComponentKind::Hardware(HardwareKind::Consumable) => ComponentType::Consumable,
            ComponentKind::Hardware(HardwareKind::Measured) => ComponentType::Measured,
        }
    }

    pub fn from_type_name(name: &str) -> Option<ComponentKind> {
        ComponentKind::ALL
            .into_iter()
            .find(|kind| kind.type_name().eq_ignore_ascii_case(name.trim()))
    }

    fn field_specs(&self) -> &'static [FieldSpec] {
        match self {
            ComponentKind::Hardware(_) => HARDWARE_FIELDS,
            _ => GENERAL_FIELDS,
        }
    }

    pub fn edit_mode(&self) -> EditMode {
        match self {
            ComponentKind::Base | ComponentKind::Project | ComponentKind::Placeholder => {
                EditMode::Summary
            }
            ComponentKind::Assembly => EditMode::Assembly,
            ComponentKind::Jig | ComponentKind::Part | ComponentKind::Hardware(_) => {
                EditMode::PartLeaf
            }
        }
    }

    /// Field values the kind forces after the caller's data is applied.
    fn locked_fields(&self) -> Vec<(&'static str, FieldValue)> {
        let tp = ("tp", FieldValue::Type(self.component_type()));
        match self {
            ComponentKind::Base => vec![],
            ComponentKind::Project | ComponentKind::Assembly => {
                vec![tp, ("manufacture", Manufacture::Assembled.into())]
            }
            ComponentKind::Jig | ComponentKind::Part => vec![tp],
            ComponentKind::Placeholder => vec![
                tp,
                ("status", Status::Invisible.into()),
                ("cost", FieldValue::Decimal(0.0)),
                ("manufacture", Manufacture::Any.into()),
            ],
            ComponentKind::Hardware(_) => vec![tp, ("manufacture", Manufacture::Bought.into())],
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Named field values handed to a constructor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentData {
    values: BTreeMap<String, FieldValue>,
}

impl ComponentData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Type discriminator under `tp`, as lowercase text; `None` when absent or blank.
    pub fn type_name(&self) -> Option<String> {
        let name = match self.values.get("tp")? {
            FieldValue::Type(tp) => tp.label().to_string(),
            FieldValue::Text(text) => text.trim().to_string(),
            _ => return None,
        };
        (!name.is_empty()).then(|| name.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for ComponentData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = ComponentData::new();
        for (k, v) in iter {
            data.insert(k, v);
        }
        data
    }
}

/// One entry of the assembly hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    kind: ComponentKind,
    fields: FieldContainer,
    tag: Tag,
}

impl Component {
    /// Builds a component of `kind` holding its built-in defaults.
    pub fn new(kind: ComponentKind) -> Self {
        let mut component = Self {
            kind,
            fields: FieldContainer::new(kind.field_specs()),
            tag: Tag::default(),
        };
        component.lock_fields();
        component
    }

    /// Applies `data` over the defaults, then locks the kind's fixed fields.
    ///
    /// Fails with `UnknownField` when `data` names a field the kind doesn't declare.
    pub fn with_data(kind: ComponentKind, data: &ComponentData) -> DomainResult<Self> {
        let mut component = Self {
            kind,
            fields: FieldContainer::new(kind.field_specs()),
            tag: Tag::default(),
        };
        for (name, value) in data.iter() {
            component.fields.replace_field(name, value.clone())?;
        }
        component.lock_fields();
        Ok(component)
    }

    fn lock_fields(&mut self) {
        for (name, value) in self.kind.locked_fields() {
            // locked names come from the kind's own table
            let _ = self.fields.replace_field(name, value);
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn replace_tag(&mut self, tag: Tag) {
        self.tag = tag;
    }

    /// Moves the component's tag one level deeper.
    pub fn increment(&mut self, quantity: i64) -> DomainResult<&Tag> {
        self.tag = self.tag.increment(quantity)?;
        Ok(&self.tag)
    }

    pub fn name(&self) -> String {
        self.fields
            .raw_field("name")
            .map(|value| value.to_string())
            .unwrap_or_default()
    }

    pub fn fields(&self) -> &FieldContainer {
        &self.fields
    }

    pub fn get_field(&self, name: &str) -> DomainResult<FieldValue> {
        self.fields.get_field(name)
    }

    pub fn raw_field(&self, name: &str) -> DomainResult<&FieldValue> {
        self.fields.raw_field(name)
    }

    pub fn replace_field(&mut self, name: &str, value: impl Into<FieldValue>) -> DomainResult<()> {
        self.fields.replace_field(name, value)
    }

    pub fn field_kind(&self, name: &str) -> DomainResult<FieldKind> {
        self.fields.field_kind(name)
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.field_names()
    }

    pub fn to_map(&self) -> Vec<(&'static str, FieldValue)> {
        self.fields.to_map()
    }

    /// Whether an editor may change `name` on this kind.
    pub fn is_field_editable(&self, name: &str) -> DomainResult<bool> {
        if !self.fields.has_field(name) {
            return Err(DomainError::UnknownField(name.to_string()));
        }
        let editable = match (name, self.kind.edit_mode()) {
            ("tp", _) => false,
            ("status", EditMode::Summary) => false,
            ("manufacture" | "cost", EditMode::Summary | EditMode::Assembly) => false,
            _ => true,
        };
        Ok(editable)
    }
}

impl TreeItem for Component {
    fn is_root(&self) -> bool {
        self.kind == ComponentKind::Base
    }

    fn is_leaf(&self) -> bool {
        matches!(self.kind, ComponentKind::Hardware(_))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tp = self
            .fields
            .get_field("tp")
            .map(|value| value.to_string())
            .unwrap_or_default();
        write!(f, "{} {} ({})", self.tag, self.name(), tp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_locks_status_cost_and_manufacture() {
        let data = ComponentData::new()
            .with("status", Status::Done)
            .with("cost", 12.0)
            .with("name", "spacer");
        let c = Component::with_data(ComponentKind::Placeholder, &data).unwrap();
        assert_eq!(c.get_field("status"), Ok(FieldValue::from("Invisible")));
        assert_eq!(c.get_field("cost"), Ok(FieldValue::Decimal(0.0)));
        assert_eq!(c.get_field("manufacture"), Ok(FieldValue::from("Any")));
        assert_eq!(c.name(), "spacer");
    }

    #[test]
    fn hardware_kinds_are_bought_and_purchasable() {
        for hw in [
            HardwareKind::Mechanical,
            HardwareKind::Electronic,
            HardwareKind::Electromechanical,
            HardwareKind::Consumable,
            HardwareKind::Measured,
        ] {
            let kind = ComponentKind::Hardware(hw);
            let c = Component::new(kind);
            assert_eq!(c.get_field("manufacture"), Ok(FieldValue::from("Bought")));
            assert_eq!(
                c.raw_field("tp"),
                Ok(&FieldValue::Type(kind.component_type()))
            );
            assert!(c.field_names().contains(&"seller"));
            assert!(c.is_leaf());
        }
    }

    #[test]
    fn project_and_assembly_are_assembled() {
        for kind in [ComponentKind::Project, ComponentKind::Assembly] {
            let c = Component::new(kind);
            assert_eq!(c.get_field("manufacture"), Ok(FieldValue::from("Assembled")));
        }
    }

    #[test]
    fn base_keeps_data_type_and_is_root() {
        let data = ComponentData::new().with("tp", ComponentType::Base).with("name", "root");
        let c = Component::with_data(ComponentKind::Base, &data).unwrap();
        assert_eq!(c.get_field("tp"), Ok(FieldValue::from("Base")));
        assert!(c.is_root());
        assert_eq!(
            Component::new(ComponentKind::Base).get_field("tp"),
            Ok(FieldValue::from("Placeholder"))
        );
    }

    #[test]
    fn unknown_data_field_is_rejected() {
        let data = ComponentData::new().with("seller", "acme");
        assert_eq!(
            Component::with_data(ComponentKind::Part, &data),
            Err(DomainError::UnknownField("seller".into()))
        );
    }

    #[test]
    fn editability_follows_edit_mode() {
        let project = Component::new(ComponentKind::Project);
        let assembly = Component::new(ComponentKind::Assembly);
        let part = Component::new(ComponentKind::Part);

        assert_eq!(project.is_field_editable("status"), Ok(false));
        assert_eq!(project.is_field_editable("cost"), Ok(false));
        assert_eq!(project.is_field_editable("name"), Ok(true));
        assert_eq!(assembly.is_field_editable("status"), Ok(true));
        assert_eq!(assembly.is_field_editable("manufacture"), Ok(false));
        assert_eq!(part.is_field_editable("manufacture"), Ok(true));
        assert_eq!(part.is_field_editable("cost"), Ok(true));
        assert_eq!(part.is_field_editable("tp"), Ok(false));
        assert!(part.is_field_editable("link").is_err());
    }

    #[test]
    fn increment_replaces_the_tag() {
        let mut c = Component::new(ComponentKind::Part);
        c.increment(1).unwrap();
        assert_eq!(c.tag().as_str(), "#100-000");
        assert_eq!(c.to_string(), "#100-000 Name (Part)");
    }

    #[test]
    fn data_type_name_defaults_to_none_when_blank() {
        assert_eq!(ComponentData::new().type_name(), None);
        assert_eq!(ComponentData::new().with("tp", "  ").type_name(), None);
        assert_eq!(
            ComponentData::new().with("tp", ComponentType::Jig).type_name(),
            Some("jig".to_string())
        );
    }
}
