use std::collections::HashMap;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::{Category, Id};

/// Tree node in the arena-based category hierarchy.
#[derive(Debug)]
pub struct CategoryNode {
    /// Category record for this node
    pub data: Category,
    /// Index of parent node in the arena, None for grouping roots
    pub parent: Option<Index>,
    /// Indices of child nodes in ascending priority order
    pub children: Vec<Index>,
}

/// Arena-based forest of category trees.
///
/// Holds any number of grouping roots (typically one or more per company).
/// Nodes are addressed by arena index; `find` maps a category id to its index.
#[derive(Debug, Default)]
pub struct CategoryTree {
    arena: Arena<CategoryNode>,
    roots: Vec<Index>,
    by_id: HashMap<Id, Index>,
}

impl CategoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `parent`. Children keep insertion order.
    #[instrument(level = "trace", skip(self, data), fields(id = data.id))]
    pub(crate) fn insert_node(&mut self, data: Category, parent: Option<Index>) -> Index {
        let id = data.id;
        let node = CategoryNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.roots.push(node_idx);
        }
        self.by_id.insert(id, node_idx);

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&CategoryNode> {
        self.arena.get(idx)
    }

    pub fn category(&self, idx: Index) -> Option<&Category> {
        self.arena.get(idx).map(|node| &node.data)
    }

    /// Arena index of the category with `id`.
    pub fn find(&self, id: Id) -> Option<Index> {
        self.by_id.get(&id).copied()
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn parent(&self, idx: Index) -> Option<Index> {
        self.get_node(idx).and_then(|node| node.parent)
    }

    /// Children in ascending priority order.
    pub fn children(&self, idx: Index) -> &[Index] {
        self.get_node(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal over every root, siblings in priority order.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Number of levels below and including the deepest root.
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        1 + self
            .children(node_idx)
            .iter()
            .map(|&child| self.calculate_depth(child))
            .max()
            .unwrap_or(0)
    }

    /// Ids of categories without subcategories, in traversal order.
    pub fn leaf_ids(&self) -> Vec<Id> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.data.id)
            .collect()
    }

    /// Render the subtree at `idx` for terminal display.
    pub fn to_tree(&self, idx: Index) -> Tree<String> {
        let label = self
            .category(idx)
            .map(node_label)
            .unwrap_or_else(|| "?".to_string());
        let leaves: Vec<_> = self
            .children(idx)
            .iter()
            .map(|&child| self.to_tree(child))
            .collect();
        Tree::new(label).with_leaves(leaves)
    }

    /// One rendered tree per grouping root.
    pub fn to_forest(&self) -> Vec<Tree<String>> {
        self.roots.iter().map(|&root| self.to_tree(root)).collect()
    }
}

fn node_label(category: &Category) -> String {
    match category.outcome_code() {
        Some(code) => format!("[{}] {} => {}", category.id, category, code),
        None => format!("[{}] {}", category.id, category),
    }
}

pub struct TreeIterator<'a> {
    tree: &'a CategoryTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a CategoryTree) -> Self {
        // Reverse so the first root is popped first
        let stack = tree.roots.iter().rev().copied().collect();
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a CategoryNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
