//! Command dispatch for the `bomtree` binary

use std::io;
use std::sync::PoisonError;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::ComponentModel;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{
    factory, Component, ComponentData, ComponentType, FieldKind, FieldValue, Manufacture, Tag,
};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Types) => cmd_types(),
        Some(Commands::Show { tp, set }) => cmd_show(tp, set),
        Some(Commands::Tag {
            tag,
            level,
            times,
            qty,
        }) => cmd_tag(tag, *level, *times, *qty),
        Some(Commands::Demo) => cmd_demo(&Settings::load(cli.config.as_deref())?),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `bomtree --help`".into(),
        )),
    }
}

fn cmd_types() -> CliResult<()> {
    let registry = factory::global()
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    output::header("Component types");
    for name in registry.names() {
        let component = registry.create_default(name)?;
        output::field(name, &component.field_names().iter().join(", "));
    }
    Ok(())
}

/// Splits `key=value` assignments given with `--set`.
pub fn parse_assignment(raw: &str) -> CliResult<(&str, &str)> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim(), value))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| CliError::InvalidArgs(format!("expected KEY=VALUE, got {raw:?}")))
}

/// Builds a component of `tp` through the global registry with the parsed overrides.
#[instrument(level = "debug")]
pub fn build_component(tp: &str, assignments: &[String]) -> CliResult<Component> {
    let template = factory::create_default(tp)?;
    let tp_value = FieldValue::parse("tp", FieldKind::Type, tp)
        .unwrap_or_else(|_| FieldValue::Text(tp.to_string()));

    let mut data = ComponentData::new().with("tp", tp_value);
    for raw in assignments {
        let (key, value) = parse_assignment(raw)?;
        let kind = template.field_kind(key)?;
        debug!("override {} = {:?}", key, value);
        data.insert(key, FieldValue::parse(key, kind, value)?);
    }
    Ok(factory::create(&data)?)
}

fn cmd_show(tp: &str, assignments: &[String]) -> CliResult<()> {
    let component = build_component(tp, assignments)?;
    output::header(&component);
    for (name, value) in component.to_map() {
        if component.is_field_editable(name)? {
            output::field(name, &value);
        } else {
            output::locked_field(name, &value);
        }
    }
    Ok(())
}

fn cmd_tag(raw: &str, level: u32, times: usize, qty: i64) -> CliResult<()> {
    let mut tag = Tag::parse(raw, level)?;
    output::header(&format!("{raw} +{qty} x{times}"));
    for _ in 0..=times {
        output::detail(&format!(
            "{:<12} level {}  size {}",
            tag,
            tag.level(),
            tag.size()
        ));
        match tag.increment(qty) {
            Ok(next) => tag = next,
            Err(e) => {
                output::warning(&e);
                break;
            }
        }
    }
    Ok(())
}

fn data(tp: ComponentType, name: &str) -> ComponentData {
    ComponentData::new().with("tp", tp).with("name", name)
}

/// Sample rover hierarchy inserted below the project node.
pub fn build_demo(settings: &Settings) -> CliResult<ComponentModel> {
    let mut model = ComponentModel::new(settings)?;
    let project = Some(model.project());

    let chassis = model.factory().create(&data(ComponentType::Assembly, "Chassis"))?;
    let chassis = model.insert(chassis, project)?;
    let plate = model.factory().create(
        &data(ComponentType::Part, "Frame plate").with("manufacture", Manufacture::Lasercut),
    )?;
    model.insert(plate, Some(chassis))?;
    let mount = model.factory().create(
        &data(ComponentType::Part, "Motor mount").with("manufacture", Manufacture::Printed),
    )?;
    model.insert(mount, Some(chassis))?;
    let screws = model
        .factory()
        .create(&data(ComponentType::Mechanical, "M3 screw").with("qty", 12_i64))?;
    model.insert(screws, Some(chassis))?;

    let electronics = model
        .factory()
        .create(&data(ComponentType::Assembly, "Electronics"))?;
    let electronics = model.insert(electronics, project)?;
    let controller = model
        .factory()
        .create(&data(ComponentType::Electronic, "Controller").with("cost", 24.5))?;
    model.insert(controller, Some(electronics))?;
    let wiring = model
        .factory()
        .create(&data(ComponentType::Placeholder, "Wiring"))?;
    model.insert(wiring, Some(electronics))?;

    let overflowed = model.retag(Tag::parse(&settings.tag_seed, 0)?)?;
    for node in overflowed {
        output::warning(&format!("tag overflow, kept: {}", model.component(node)?));
    }
    Ok(model)
}

fn cmd_demo(settings: &Settings) -> CliResult<()> {
    let model = build_demo(settings)?;
    output::info(&model.tree().to_tree_string(model.root())?);
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn given_assignment_when_parsing_then_splits_on_first_equals() {
        assert_eq!(parse_assignment("desc=a=b").unwrap(), ("desc", "a=b"));
        assert!(matches!(
            parse_assignment("qty"),
            Err(CliError::InvalidArgs(_))
        ));
        assert!(parse_assignment("=4").is_err());
    }

    #[test]
    fn given_overrides_when_building_then_values_are_typed() {
        let c = build_component("Part", &["qty=3".into(), "status=done".into()]).unwrap();
        assert_eq!(c.raw_field("qty"), Ok(&FieldValue::Integer(3)));
        assert_eq!(c.get_field("status"), Ok(FieldValue::from("Done")));
    }

    #[test]
    fn given_bad_overrides_when_building_then_fails() {
        assert!(matches!(
            build_component("part", &["colour=red".into()]),
            Err(CliError::Application(_))
        ));
        let err = build_component("part", &["qty=many".into()]).unwrap_err();
        assert!(err.to_string().contains("qty"));
        assert!(matches!(
            build_component("gearbox", &[]),
            Err(CliError::Application(crate::application::ApplicationError::Domain(
                DomainError::UnknownComponentType(_)
            )))
        ));
    }

    #[test]
    fn given_default_settings_when_building_demo_then_tree_is_tagged() {
        let model = build_demo(&Settings::default()).unwrap();
        let project = Some(model.project());
        assert_eq!(model.row_count(project), Ok(2));
        let chassis = model.node_at(0, project).unwrap();
        assert_eq!(model.row_count(Some(chassis)), Ok(3));
        let screws = model.node_at(2, Some(chassis)).unwrap();
        assert_eq!(model.component(screws).unwrap().tag().as_str(), "#130-000");
    }
}
