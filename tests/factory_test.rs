use rstest::rstest;

use bomtree::domain::{
    factory, Component, ComponentData, ComponentFactory, ComponentKind, ComponentType,
    DomainError, FieldValue, HardwareKind, Manufacture, Status,
};

#[rstest]
#[case("project", "Assembled")]
#[case("assembly", "Assembled")]
#[case("placeholder", "Any")]
#[case("mechanical", "Bought")]
#[case("electronic", "Bought")]
#[case("part", "Any")]
fn given_type_when_created_then_manufacture_default_applies(
    #[case] tp: &str,
    #[case] manufacture: &str,
) {
    let c = factory::create_default(tp).unwrap();
    assert_eq!(c.get_field("manufacture"), Ok(FieldValue::from(manufacture)));
}

#[rstest]
fn given_empty_data_when_creating_placeholder_then_defaults_are_presented() {
    let factory = ComponentFactory::new();
    let c = factory
        .create(&ComponentData::new().with("tp", "placeholder"))
        .unwrap();

    assert_eq!(c.kind(), ComponentKind::Placeholder);
    assert_eq!(c.get_field("name"), Ok(FieldValue::from("Name")));
    assert_eq!(
        c.get_field("desc"),
        Ok(FieldValue::from("Describe here your component..."))
    );
    assert_eq!(
        c.get_field("comment"),
        Ok(FieldValue::from("Write here your notes..."))
    );
    assert_eq!(c.get_field("tp"), Ok(FieldValue::from("Placeholder")));
    assert_eq!(c.get_field("status"), Ok(FieldValue::from("Invisible")));
    assert_eq!(c.get_field("qty"), Ok(FieldValue::Integer(0)));
    assert_eq!(c.get_field("cost"), Ok(FieldValue::Decimal(0.0)));
    assert_eq!(c.tag().as_str(), "#000-000");
}

#[rstest]
fn given_placeholder_data_when_creating_then_locked_fields_win() {
    let data = ComponentData::new()
        .with("tp", ComponentType::Placeholder)
        .with("status", Status::Done)
        .with("cost", 12.5)
        .with("name", "Wiring");
    let c = factory::create(&data).unwrap();

    assert_eq!(c.name(), "Wiring");
    assert_eq!(c.raw_field("status"), Ok(&FieldValue::Status(Status::Invisible)));
    assert_eq!(c.raw_field("cost"), Ok(&FieldValue::Decimal(0.0)));
}

#[rstest]
fn given_hardware_when_created_then_purchasing_fields_exist() {
    let c = factory::create_default("consumable").unwrap();
    assert_eq!(c.kind(), ComponentKind::Hardware(HardwareKind::Consumable));
    assert_eq!(
        c.field_names(),
        vec![
            "name",
            "desc",
            "comment",
            "tp",
            "status",
            "manufacture",
            "qty",
            "cost",
            "qty_pkg",
            "seller",
            "link"
        ]
    );
    assert_eq!(
        c.get_field("seller"),
        Ok(FieldValue::from("Write here the seller of the component"))
    );
    assert!(factory::create_default("part").unwrap().get_field("seller").is_err());
}

#[rstest]
fn given_unknown_field_in_data_when_creating_then_rejected() {
    let data = ComponentData::new().with("tp", "part").with("colour", "red");
    assert_eq!(
        factory::create(&data),
        Err(DomainError::UnknownField("colour".into()))
    );
}

#[rstest]
#[case("gearbox")]
#[case("")]
#[case("parts")]
fn given_unregistered_name_when_creating_then_unknown_type(#[case] name: &str) {
    assert!(matches!(
        factory::create_default(name),
        Err(DomainError::UnknownComponentType(_))
    ));
}

#[rstest]
fn given_global_registration_when_creating_then_custom_constructor_runs() {
    factory::register("Bracket", |data: &ComponentData| {
        let mut c = Component::with_data(ComponentKind::Part, data)?;
        c.replace_field("manufacture", Manufacture::Machined)?;
        Ok(c)
    });

    let c = factory::create(&ComponentData::new().with("tp", "bracket")).unwrap();
    assert_eq!(c.kind(), ComponentKind::Part);
    assert_eq!(c.get_field("manufacture"), Ok(FieldValue::from("Machined")));

    factory::unregister("bracket");
    assert!(factory::create_default("bracket").is_err());
}

#[rstest]
fn given_data_without_type_when_creating_then_base() {
    let c = factory::create(&ComponentData::new().with("name", "top")).unwrap();
    assert_eq!(c.kind(), ComponentKind::Base);
    assert_eq!(c.name(), "top");
}

#[rstest]
#[case("BASE", ComponentType::Base, "Base")]
#[case(" Assembly ", ComponentType::Assembly, "Assembly")]
#[case("jig", ComponentType::Jig, "Jig")]
fn given_textual_type_when_creating_then_stored_as_type(
    #[case] tp: &str,
    #[case] expected: ComponentType,
    #[case] presented: &str,
) {
    let c = factory::create(&ComponentData::new().with("tp", tp)).unwrap();
    assert_eq!(c.raw_field("tp"), Ok(&FieldValue::Type(expected)));
    assert_eq!(c.get_field("tp"), Ok(FieldValue::from(presented)));
}
