//! Addressable component model
//!
//! Exposes the component tree to a view layer as rows under a parent, the way
//! item-view toolkits expect. The model owns an invisible root (a `base`
//! component); `None` as a parent argument stands for that root.
//!
//! Structural mutations are bracketed: observers hear about the affected row
//! range before the tree changes and again once it is consistent. Observers
//! only receive ids and positions, never the model itself, so nothing can read
//! a half-mutated tree. A rejected mutation emits no notifications.

use tracing::{debug, instrument};

use crate::config::Settings;
use crate::domain::fields::GENERAL_FIELDS;
use crate::domain::{
    Component, ComponentData, ComponentFactory, ComponentType, DomainError, DomainResult,
    FieldValue, NodeId, Tag, Tree,
};

/// Position of a node as seen by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    /// The invisible root; it has no parent.
    Root,
    Child { row: usize, parent: NodeId },
}

/// Receives change notifications from a [`ComponentModel`].
#[allow(unused_variables)]
pub trait ModelObserver {
    fn rows_about_to_be_inserted(&mut self, parent: NodeId, first: usize, last: usize) {}
    fn rows_inserted(&mut self, parent: NodeId, first: usize, last: usize) {}
    fn rows_about_to_be_removed(&mut self, parent: NodeId, first: usize, last: usize) {}
    fn rows_removed(&mut self, parent: NodeId, first: usize, last: usize) {}
    fn data_changed(&mut self, node: NodeId, column: usize) {}
}

pub struct ComponentModel {
    tree: Tree<Component>,
    root: NodeId,
    project: NodeId,
    factory: ComponentFactory,
    observers: Vec<Box<dyn ModelObserver>>,
}

impl ComponentModel {
    /// Creates the root and the first project node described by `settings`.
    pub fn new(settings: &Settings) -> DomainResult<Self> {
        Self::with_factory(settings, ComponentFactory::new())
    }

    pub fn with_factory(settings: &Settings, factory: ComponentFactory) -> DomainResult<Self> {
        let root = factory.create(
            &ComponentData::new()
                .with("tp", ComponentType::Base)
                .with("name", settings.root_name.as_str()),
        )?;
        let mut project = factory.create(
            &ComponentData::new()
                .with("tp", ComponentType::Project)
                .with("name", settings.project.name.as_str())
                .with("desc", settings.project.desc.as_str()),
        )?;
        project.replace_tag(Tag::parse(&settings.tag_seed, 0)?);

        let mut tree = Tree::new();
        let root = tree.insert(root);
        let project = tree.insert(project);
        tree.add_child(root, project)?;

        Ok(Self {
            tree,
            root,
            project,
            factory,
            observers: Vec::new(),
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// First project node, created with the model.
    pub fn project(&self) -> NodeId {
        self.project
    }

    pub fn tree(&self) -> &Tree<Component> {
        &self.tree
    }

    pub fn factory(&self) -> &ComponentFactory {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut ComponentFactory {
        &mut self.factory
    }

    pub fn component(&self, node: NodeId) -> DomainResult<&Component> {
        self.tree.get(node)
    }

    pub fn subscribe(&mut self, observer: Box<dyn ModelObserver>) {
        self.observers.push(observer);
    }

    fn resolve(&self, parent: Option<NodeId>) -> NodeId {
        parent.unwrap_or(self.root)
    }

    pub fn index_of(&self, node: NodeId) -> DomainResult<Address> {
        match self.tree.get_parent(node)? {
            None if node == self.root => Ok(Address::Root),
            None => Err(DomainError::ChildNotFound(self.tree.get(node)?.to_string())),
            Some(parent) => Ok(Address::Child {
                row: self.tree.get_row(node)?,
                parent,
            }),
        }
    }

    pub fn node_at(&self, row: usize, parent: Option<NodeId>) -> DomainResult<NodeId> {
        self.tree.get_child_at(self.resolve(parent), row)
    }

    pub fn parent_of(&self, node: NodeId) -> DomainResult<Option<NodeId>> {
        self.tree.get_parent(node)
    }

    pub fn row_count(&self, parent: Option<NodeId>) -> DomainResult<usize> {
        self.tree.len(self.resolve(parent))
    }

    /// Column headers: the fields every component declares.
    pub fn headers(&self) -> Vec<&'static str> {
        GENERAL_FIELDS.iter().map(|spec| spec.name).collect()
    }

    pub fn column_count(&self) -> usize {
        GENERAL_FIELDS.len()
    }

    fn column_name(component: &Component, column: usize) -> DomainResult<&'static str> {
        let names = component.field_names();
        names
            .get(column)
            .copied()
            .ok_or(DomainError::IndexOutOfRange {
                index: column,
                len: names.len(),
            })
    }

    /// Presented value of the field at `column` of the addressed node.
    pub fn data(&self, row: usize, column: usize, parent: Option<NodeId>) -> DomainResult<FieldValue> {
        let component = self.tree.get(self.node_at(row, parent)?)?;
        component.get_field(Self::column_name(component, column)?)
    }

    #[instrument(level = "debug", skip(self, value))]
    pub fn set_data(
        &mut self,
        row: usize,
        column: usize,
        parent: Option<NodeId>,
        value: impl Into<FieldValue>,
    ) -> DomainResult<()> {
        let node = self.node_at(row, parent)?;
        let component = self.tree.get_mut(node)?;
        let name = Self::column_name(component, column)?;
        component.replace_field(name, value)?;
        debug!("set_data: {} = {:?}", name, component.raw_field(name)?);

        for observer in &mut self.observers {
            observer.data_changed(node, column);
        }
        Ok(())
    }

    pub fn is_editable(&self, row: usize, column: usize, parent: Option<NodeId>) -> DomainResult<bool> {
        let component = self.tree.get(self.node_at(row, parent)?)?;
        component.is_field_editable(Self::column_name(component, column)?)
    }

    /// Appends `component` as the last child of `parent`.
    #[instrument(level = "debug", skip(self, component))]
    pub fn insert(&mut self, component: Component, parent: Option<NodeId>) -> DomainResult<NodeId> {
        let parent = self.resolve(parent);
        let row = self.tree.len(parent)?;
        let child = self.tree.insert(component);
        if let Err(e) = self.tree.check_add_child(parent, child) {
            self.tree.discard(child)?;
            return Err(e);
        }

        for observer in &mut self.observers {
            observer.rows_about_to_be_inserted(parent, row, row);
        }
        self.tree.add_child(parent, child)?;
        for observer in &mut self.observers {
            observer.rows_inserted(parent, row, row);
        }
        debug!("insert: {} at row {}", self.tree.get(child)?, row);
        Ok(child)
    }

    /// Removes the node at `address` and drops its subtree, returning the node's component.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, address: Address) -> DomainResult<Component> {
        let (row, parent) = match address {
            Address::Root => {
                return Err(DomainError::RootViolation(self.tree.get(self.root)?.to_string()))
            }
            Address::Child { row, parent } => (row, parent),
        };
        let child = self.tree.get_child_at(parent, row)?;
        if child == self.project {
            return Err(DomainError::RootViolation(self.tree.get(child)?.to_string()));
        }

        for observer in &mut self.observers {
            observer.rows_about_to_be_removed(parent, row, row);
        }
        self.tree.remove_child_at(parent, row)?;
        let mut dropped = self.tree.discard(child)?;
        for observer in &mut self.observers {
            observer.rows_removed(parent, row, row);
        }
        debug!("remove: row {} ({} nodes dropped)", row, dropped.len());

        // post-order: the removed node comes last
        dropped
            .pop()
            .ok_or_else(|| DomainError::ChildNotFound(format!("row {row}")))
    }

    /// Reassigns hierarchical tags from the project node down.
    ///
    /// The project receives `seed`; every child gets its parent's tag
    /// incremented by `row + 1`. Nodes whose tag would overflow keep their
    /// previous tag and are returned.
    #[instrument(level = "debug", skip(self))]
    pub fn retag(&mut self, seed: Tag) -> DomainResult<Vec<NodeId>> {
        self.tree.get_mut(self.project)?.replace_tag(seed);
        let order: Vec<NodeId> = self
            .tree
            .iter_preorder(self.project)?
            .map(|(id, _, _)| id)
            .skip(1)
            .collect();

        let mut overflowed = Vec::new();
        for node in order {
            let Some(parent) = self.tree.get_parent(node)? else {
                continue;
            };
            let row = self.tree.get_row(node)?;
            match self.tree.get(parent)?.tag().increment(row as i64 + 1) {
                Ok(tag) => self.tree.get_mut(node)?.replace_tag(tag),
                Err(e) => {
                    debug!("retag: {} keeps its tag: {}", node, e);
                    overflowed.push(node);
                }
            }
        }
        Ok(overflowed)
    }

    /// Indented text rendering of the whole model.
    pub fn render(&self) -> DomainResult<String> {
        self.tree.render(self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        BeginInsert(usize),
        EndInsert(usize),
        BeginRemove(usize),
        EndRemove(usize),
        Changed(usize),
    }

    struct Recorder(Rc<RefCell<Vec<Event>>>);

    impl ModelObserver for Recorder {
        fn rows_about_to_be_inserted(&mut self, _parent: NodeId, first: usize, _last: usize) {
            self.0.borrow_mut().push(Event::BeginInsert(first));
        }
        fn rows_inserted(&mut self, _parent: NodeId, first: usize, _last: usize) {
            self.0.borrow_mut().push(Event::EndInsert(first));
        }
        fn rows_about_to_be_removed(&mut self, _parent: NodeId, first: usize, _last: usize) {
            self.0.borrow_mut().push(Event::BeginRemove(first));
        }
        fn rows_removed(&mut self, _parent: NodeId, first: usize, _last: usize) {
            self.0.borrow_mut().push(Event::EndRemove(first));
        }
        fn data_changed(&mut self, _node: NodeId, column: usize) {
            self.0.borrow_mut().push(Event::Changed(column));
        }
    }

    fn model_with_recorder() -> (ComponentModel, Rc<RefCell<Vec<Event>>>) {
        let mut model = ComponentModel::new(&Settings::default()).unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));
        model.subscribe(Box::new(Recorder(events.clone())));
        (model, events)
    }

    #[test]
    fn new_model_has_root_and_project() {
        let model = ComponentModel::new(&Settings::default()).unwrap();
        assert_eq!(model.row_count(None), Ok(1));
        assert_eq!(model.node_at(0, None), Ok(model.project()));
        assert_eq!(model.index_of(model.root()), Ok(Address::Root));
        assert_eq!(model.parent_of(model.root()), Ok(None));
        assert_eq!(model.data(0, 0, None), Ok(FieldValue::from("Project")));
        assert_eq!(model.data(0, 3, None), Ok(FieldValue::from("Project")));
    }

    #[test]
    fn insert_is_bracketed() {
        let (mut model, events) = model_with_recorder();
        let project = Some(model.project());
        let part = model.factory().create_default("part").unwrap();
        let node = model.insert(part, project).unwrap();

        assert_eq!(*events.borrow(), vec![Event::BeginInsert(0), Event::EndInsert(0)]);
        assert_eq!(model.node_at(0, project), Ok(node));
        assert_eq!(
            model.index_of(node),
            Ok(Address::Child {
                row: 0,
                parent: model.project()
            })
        );
    }

    #[test]
    fn rejected_insert_emits_nothing() {
        let (mut model, events) = model_with_recorder();
        let screw = model.factory().create_default("mechanical").unwrap();
        let screw = model.insert(screw, Some(model.project())).unwrap();
        events.borrow_mut().clear();
        let nodes_before = model.tree().node_count();

        let part = model.factory().create_default("part").unwrap();
        assert!(matches!(
            model.insert(part, Some(screw)),
            Err(DomainError::LeafViolation(_))
        ));
        let base = model.factory().create_default("base").unwrap();
        assert!(matches!(
            model.insert(base, None),
            Err(DomainError::RootViolation(_))
        ));
        assert!(events.borrow().is_empty());
        assert_eq!(model.tree().node_count(), nodes_before);
    }

    #[test]
    fn remove_returns_component_and_drops_subtree() {
        let (mut model, events) = model_with_recorder();
        let project = Some(model.project());
        let asm = model.factory().create_default("assembly").unwrap();
        let asm = model.insert(asm, project).unwrap();
        let part = model.factory().create_default("part").unwrap();
        model.insert(part, Some(asm)).unwrap();
        let nodes_before = model.tree().node_count();
        events.borrow_mut().clear();

        let removed = model.remove(model.index_of(asm).unwrap()).unwrap();
        assert_eq!(removed.get_field("tp"), Ok(FieldValue::from("Assembly")));
        assert_eq!(model.row_count(project), Ok(0));
        assert_eq!(model.tree().node_count(), nodes_before - 2);
        assert_eq!(*events.borrow(), vec![Event::BeginRemove(0), Event::EndRemove(0)]);
        assert!(model.remove(Address::Root).is_err());
    }

    #[test]
    fn detached_node_has_no_address() {
        let mut model = ComponentModel::new(&Settings::default()).unwrap();
        let loose = model.factory().create_default("part").unwrap();
        let loose = model.tree.insert(loose);

        assert!(matches!(model.index_of(loose), Err(DomainError::ChildNotFound(_))));
        assert_eq!(model.index_of(model.root()), Ok(Address::Root));
    }

    #[test]
    fn set_data_notifies_and_is_visible() {
        let (mut model, events) = model_with_recorder();
        model.set_data(0, 0, None, "Rover").unwrap();
        assert_eq!(model.data(0, 0, None), Ok(FieldValue::from("Rover")));
        assert_eq!(*events.borrow(), vec![Event::Changed(0)]);

        assert_eq!(
            model.set_data(0, 42, None, "x"),
            Err(DomainError::IndexOutOfRange { index: 42, len: 8 })
        );
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn editability_is_exposed_per_cell() {
        let model = ComponentModel::new(&Settings::default()).unwrap();
        let cost = model.headers().iter().position(|h| *h == "cost").unwrap();
        assert_eq!(model.is_editable(0, 0, None), Ok(true));
        assert_eq!(model.is_editable(0, cost, None), Ok(false));
    }

    #[test]
    fn retag_numbers_each_depth() {
        let mut model = ComponentModel::new(&Settings::default()).unwrap();
        let project = Some(model.project());
        let a = model.factory().create_default("assembly").unwrap();
        let a = model.insert(a, project).unwrap();
        let b = model.factory().create_default("assembly").unwrap();
        let b = model.insert(b, project).unwrap();
        let p = model.factory().create_default("part").unwrap();
        let p = model.insert(p, Some(b)).unwrap();

        assert_eq!(model.retag(Tag::default()), Ok(vec![]));
        assert_eq!(model.component(a).unwrap().tag().as_str(), "#100-000");
        assert_eq!(model.component(b).unwrap().tag().as_str(), "#200-000");
        assert_eq!(model.component(p).unwrap().tag().as_str(), "#210-000");
        assert_eq!(model.component(p).unwrap().tag().level(), 2);
    }
}
