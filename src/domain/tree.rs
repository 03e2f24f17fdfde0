//! Arena-backed ownership tree.
//!
//! Nodes live in a generational arena and refer to each other by index, so
//! parent links never own anything and a discarded node can't be reached
//! through a stale id. Structural rules enforced on every mutation:
//!
//! - a node has at most one parent and appears once among its children
//! - no node is its own ancestor
//! - leaf items never get children, root items never get a parent

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use generational_arena::{Arena, Index};
use termtree::Tree as TermTree;
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

const INDENT: &str = "    ";

/// Structural flags of a tree payload. Both default to `false`.
pub trait TreeItem: fmt::Display {
    /// A root item can never be added as a child.
    fn is_root(&self) -> bool {
        false
    }

    /// A leaf item can never acquire children.
    fn is_leaf(&self) -> bool {
        false
    }
}

/// Stable handle to a node, valid only for the tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    tree: u64,
    index: Index,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.index.into_raw_parts();
        write!(f, "{}:{}.{}", self.tree, slot, generation)
    }
}

/// Tree node in the arena.
#[derive(Debug)]
pub struct TreeNode<T> {
    pub data: T,
    parent: Option<Index>,
    children: Vec<Index>,
}

/// Arena holding every node of one hierarchy, attached or detached.
#[derive(Debug)]
pub struct Tree<T> {
    id: u64,
    arena: Arena<TreeNode<T>>,
}

impl<T: TreeItem> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TreeItem> Tree<T> {
    pub fn new() -> Self {
        Self {
            id: NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed),
            arena: Arena::new(),
        }
    }

    fn node_id(&self, index: Index) -> NodeId {
        NodeId {
            tree: self.id,
            index,
        }
    }

    fn node(&self, id: NodeId) -> DomainResult<&TreeNode<T>> {
        if id.tree != self.id {
            return Err(DomainError::InvalidChildType(format!("foreign node {id}")));
        }
        self.arena
            .get(id.index)
            .ok_or_else(|| DomainError::InvalidChildType(format!("stale node {id}")))
    }

    fn describe(&self, index: Index) -> String {
        self.arena
            .get(index)
            .map(|node| node.data.to_string())
            .unwrap_or_default()
    }

    /// Places a detached node into the arena.
    #[instrument(level = "trace", skip(self, data))]
    pub fn insert(&mut self, data: T) -> NodeId {
        let index = self.arena.insert(TreeNode {
            data,
            parent: None,
            children: Vec::new(),
        });
        self.node_id(index)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// Number of nodes in the arena, detached ones included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn get(&self, id: NodeId) -> DomainResult<&T> {
        Ok(&self.node(id)?.data)
    }

    pub fn get_mut(&mut self, id: NodeId) -> DomainResult<&mut T> {
        self.node(id)?;
        self.arena
            .get_mut(id.index)
            .map(|node| &mut node.data)
            .ok_or_else(|| DomainError::InvalidChildType(format!("stale node {id}")))
    }

    /// Runs every check of [`Tree::add_child`] without mutating.
    pub fn check_add_child(&self, parent: NodeId, child: NodeId) -> DomainResult<()> {
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;

        if parent_node.data.is_leaf() {
            return Err(DomainError::LeafViolation(parent_node.data.to_string()));
        }
        if child_node.data.is_root() {
            return Err(DomainError::RootViolation(child_node.data.to_string()));
        }
        if child_node.parent.is_some() {
            return Err(DomainError::AlreadyAttached(child_node.data.to_string()));
        }

        let mut cursor = Some(parent.index);
        while let Some(index) = cursor {
            if index == child.index {
                return Err(DomainError::CycleDetected(child_node.data.to_string()));
            }
            cursor = self.arena.get(index).and_then(|node| node.parent);
        }
        Ok(())
    }

    /// Appends `child` to the children of `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> DomainResult<()> {
        self.check_add_child(parent, child)?;
        if let Some(node) = self.arena.get_mut(parent.index) {
            node.children.push(child.index);
        }
        if let Some(node) = self.arena.get_mut(child.index) {
            node.parent = Some(parent.index);
        }
        Ok(())
    }

    /// Detaches `child` from `parent`; the node stays in the arena.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomainResult<()> {
        self.node(child)?;
        let position = self
            .node(parent)?
            .children
            .iter()
            .position(|&index| index == child.index)
            .ok_or_else(|| DomainError::ChildNotFound(self.describe(child.index)))?;
        self.detach_at(parent, position);
        Ok(())
    }

    /// Detaches the child at `index` and returns its id.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> DomainResult<NodeId> {
        let child = self.get_child_at(parent, index)?;
        self.detach_at(parent, index);
        Ok(child)
    }

    fn detach_at(&mut self, parent: NodeId, position: usize) {
        let removed = self
            .arena
            .get_mut(parent.index)
            .map(|node| node.children.remove(position));
        if let Some(child) = removed.and_then(|index| self.arena.get_mut(index)) {
            child.parent = None;
        }
    }

    pub fn get_child_at(&self, parent: NodeId, index: usize) -> DomainResult<NodeId> {
        let node = self.node(parent)?;
        if node.children.is_empty() {
            return Err(DomainError::EmptyNode(node.data.to_string()));
        }
        node.children
            .get(index)
            .map(|&child| self.node_id(child))
            .ok_or(DomainError::IndexOutOfRange {
                index,
                len: node.children.len(),
            })
    }

    pub fn get_children(&self, id: NodeId) -> DomainResult<Vec<NodeId>> {
        Ok(self
            .node(id)?
            .children
            .iter()
            .map(|&index| self.node_id(index))
            .collect())
    }

    pub fn get_parent(&self, id: NodeId) -> DomainResult<Option<NodeId>> {
        Ok(self.node(id)?.parent.map(|index| self.node_id(index)))
    }

    pub fn len(&self, id: NodeId) -> DomainResult<usize> {
        Ok(self.node(id)?.children.len())
    }

    pub fn is_empty(&self, id: NodeId) -> DomainResult<bool> {
        Ok(self.len(id)? == 0)
    }

    /// Position among the parent's children, 0 for a node without parent.
    #[instrument(level = "trace", skip(self))]
    pub fn get_row(&self, id: NodeId) -> DomainResult<usize> {
        let node = self.node(id)?;
        let Some(parent) = node.parent.and_then(|index| self.arena.get(index)) else {
            return Ok(0);
        };
        Ok(parent
            .children
            .iter()
            .position(|&index| index == id.index)
            .unwrap_or(0))
    }

    /// Number of edges between `id` and the top of its hierarchy.
    pub fn depth(&self, id: NodeId) -> DomainResult<usize> {
        let mut depth = 0;
        let mut cursor = self.node(id)?.parent;
        while let Some(index) = cursor {
            depth += 1;
            cursor = self.arena.get(index).and_then(|node| node.parent);
        }
        Ok(depth)
    }

    /// Post-order listing of the subtree: children before their parent.
    #[instrument(level = "trace", skip(self))]
    pub fn get_subtree(&self, id: NodeId) -> DomainResult<Vec<NodeId>> {
        Ok(self.iter_postorder(id)?.map(|(node_id, _)| node_id).collect())
    }

    pub fn iter_postorder(&self, id: NodeId) -> DomainResult<PostOrderIterator<'_, T>> {
        self.node(id)?;
        Ok(PostOrderIterator::new(self, id.index))
    }

    /// Pre-order listing paired with the depth relative to `id`.
    pub fn iter_preorder(&self, id: NodeId) -> DomainResult<TreeIterator<'_, T>> {
        self.node(id)?;
        Ok(TreeIterator::new(self, id.index))
    }

    /// Drops a detached node and its whole subtree, returning the payloads
    /// in post-order.
    #[instrument(level = "trace", skip(self))]
    pub fn discard(&mut self, id: NodeId) -> DomainResult<Vec<T>> {
        let node = self.node(id)?;
        if node.parent.is_some() {
            return Err(DomainError::AlreadyAttached(node.data.to_string()));
        }
        let doomed = self.get_subtree(id)?;
        Ok(doomed
            .into_iter()
            .filter_map(|node_id| self.arena.remove(node_id.index))
            .map(|node| node.data)
            .collect())
    }

    /// Text rendering with four spaces of indentation per level.
    pub fn render(&self, id: NodeId) -> DomainResult<String> {
        let lines: Vec<String> = self
            .iter_preorder(id)?
            .map(|(_, depth, node)| format!("{}{}", INDENT.repeat(depth), node.data))
            .collect();
        Ok(lines.join("\n"))
    }

    /// Converts the subtree into a `termtree` for terminal display.
    pub fn to_tree_string(&self, id: NodeId) -> DomainResult<TermTree<String>> {
        let node = self.node(id)?;
        let leaves = node
            .children
            .iter()
            .map(|&index| self.to_tree_string(self.node_id(index)))
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(TermTree::new(node.data.to_string()).with_leaves(leaves))
    }
}

pub struct TreeIterator<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<(Index, usize)>,
}

impl<'a, T> TreeIterator<'a, T> {
    fn new(tree: &'a Tree<T>, start: Index) -> Self {
        Self {
            tree,
            stack: vec![(start, 0)],
        }
    }
}

impl<'a, T> Iterator for TreeIterator<'a, T> {
    type Item = (NodeId, usize, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, depth)) = self.stack.pop() {
            if let Some(node) = self.tree.arena.get(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                let id = NodeId {
                    tree: self.tree.id,
                    index: current,
                };
                return Some((id, depth, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<(Index, bool)>,
}

impl<'a, T> PostOrderIterator<'a, T> {
    fn new(tree: &'a Tree<T>, start: Index) -> Self {
        Self {
            tree,
            stack: vec![(start, false)],
        }
    }
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = (NodeId, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.arena.get(current) {
                if !visited {
                    self.stack.push((current, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    let id = NodeId {
                        tree: self.tree.id,
                        index: current,
                    };
                    return Some((id, node));
                }
            }
        }
        None
    }
}
