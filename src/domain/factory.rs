//! Component factory: maps lowercase type names to constructors.
//!
//! A [`ComponentFactory`] is a plain value and can be owned by a model. The
//! process-wide table behind [`global`] is seeded on first use and is meant to
//! have a single writer (application start-up or plugin registration).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::instrument;

use crate::domain::component::{Component, ComponentData, ComponentKind};
use crate::domain::enums::ComponentType;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::fields::FieldValue;

pub const DEFAULT_TYPE: &str = "base";

/// Builds a component from (possibly empty) data.
pub type Constructor = Arc<dyn Fn(&ComponentData) -> DomainResult<Component> + Send + Sync>;

#[derive(Clone)]
pub struct ComponentFactory {
    constructors: BTreeMap<String, Constructor>,
}

impl fmt::Debug for ComponentFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentFactory")
            .field("types", &self.names())
            .finish()
    }
}

impl Default for ComponentFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentFactory {
    /// Factory seeded with every built-in kind.
    pub fn new() -> Self {
        let mut factory = Self::empty();
        for kind in ComponentKind::ALL {
            factory.register(kind.type_name(), move |data: &ComponentData| {
                Component::with_data(kind, data)
            });
        }
        factory
    }

    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Adds or replaces the constructor for `name` (stored lowercase).
    pub fn register<F>(&mut self, name: &str, constructor: F)
    where
        F: Fn(&ComponentData) -> DomainResult<Component> + Send + Sync + 'static,
    {
        self.constructors
            .insert(name.to_lowercase(), Arc::new(constructor));
    }

    /// Removes `name`; unknown names are ignored.
    pub fn unregister(&mut self, name: &str) {
        self.constructors.remove(&name.to_lowercase());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(&name.to_lowercase())
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    fn lookup(&self, name: &str) -> DomainResult<&Constructor> {
        self.constructors
            .get(&name.to_lowercase())
            .ok_or_else(|| DomainError::UnknownComponentType(name.to_string()))
    }

    /// Creates a component of the type named by `data["tp"]` (default `base`).
    ///
    /// A textual `tp` naming a built-in type is stored as that type.
    #[instrument(level = "trace", skip(self))]
    pub fn create(&self, data: &ComponentData) -> DomainResult<Component> {
        let type_name = data.type_name().unwrap_or_else(|| DEFAULT_TYPE.to_string());
        let constructor = self.lookup(&type_name)?;
        match data.get("tp") {
            Some(FieldValue::Text(text)) => match text.trim().parse::<ComponentType>() {
                Ok(tp) => constructor(&data.clone().with("tp", tp)),
                Err(_) => constructor(data),
            },
            _ => constructor(data),
        }
    }

    /// Creates a component of `type_name` holding only its defaults.
    #[instrument(level = "trace", skip(self))]
    pub fn create_default(&self, type_name: &str) -> DomainResult<Component> {
        let constructor = self.lookup(type_name)?;
        constructor(&ComponentData::new())
    }
}

/// Process-wide registry, seeded with the built-in kinds on first access.
pub fn global() -> &'static RwLock<ComponentFactory> {
    static REGISTRY: OnceLock<RwLock<ComponentFactory>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(ComponentFactory::new()))
}

pub fn register<F>(name: &str, constructor: F)
where
    F: Fn(&ComponentData) -> DomainResult<Component> + Send + Sync + 'static,
{
    global()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(name, constructor);
}

pub fn unregister(name: &str) {
    global()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .unregister(name);
}

pub fn create(data: &ComponentData) -> DomainResult<Component> {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .create(data)
}

pub fn create_default(type_name: &str) -> DomainResult<Component> {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .create_default(type_name)
}
