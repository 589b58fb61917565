//! Tree builder materializing parent links of stored categories into an arena.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::domain::arena::CategoryTree;
use crate::domain::entities::{Category, Id};
use crate::domain::error::{DomainError, DomainResult};

/// Constructs category forests from flat category records.
///
/// Child lists are sorted by `(priority, id)` once here, so traversals never
/// re-sort. Roots are ordered by `(company_id, priority, id)`.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    relationship_cache: HashMap<Option<Id>, Vec<Category>>,
    visited_ids: HashSet<Id>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the forest for `categories`.
    ///
    /// Fails on duplicate ids, parents missing from the input, parent chains
    /// that never reach a root, and children owned by a different company
    /// than their parent.
    #[instrument(level = "debug", skip(self, categories))]
    pub fn build<I>(&mut self, categories: I) -> DomainResult<CategoryTree>
    where
        I: IntoIterator<Item = Category>,
    {
        self.relationship_cache.clear();
        self.visited_ids.clear();

        let mut known: HashMap<Id, Id> = HashMap::new();
        for category in categories {
            if known.insert(category.id, category.company_id).is_some() {
                return Err(DomainError::DuplicateId(category.id));
            }
            self.relationship_cache
                .entry(category.parent_id)
                .or_default()
                .push(category);
        }
        let total = known.len();

        for (parent_id, children) in self.relationship_cache.iter_mut() {
            if let Some(parent_id) = parent_id {
                let Some(&parent_company) = known.get(parent_id) else {
                    let orphan = &children[0];
                    return Err(DomainError::DanglingParent {
                        id: orphan.id,
                        parent_id: *parent_id,
                    });
                };
                if let Some(stray) = children.iter().find(|c| c.company_id != parent_company) {
                    return Err(DomainError::CompanyMismatch {
                        id: stray.id,
                        company_id: stray.company_id,
                        parent_company_id: parent_company,
                    });
                }
                children.sort_by_key(|c| (c.priority, c.id));
            } else {
                children.sort_by_key(|c| (c.company_id, c.priority, c.id));
            }
        }

        let tree = self.insert_from_roots()?;

        if tree.len() != total {
            // Whatever is left hangs off a parent chain with no root
            let stranded = known
                .keys()
                .filter(|id| !self.visited_ids.contains(id))
                .min()
                .copied();
            if let Some(id) = stranded {
                return Err(DomainError::CycleDetected(id));
            }
        }

        debug!("built category tree: {} nodes, {} roots", tree.len(), tree.roots().len());
        Ok(tree)
    }

    fn insert_from_roots(&mut self) -> DomainResult<CategoryTree> {
        let mut tree = CategoryTree::new();
        let roots = self.relationship_cache.remove(&None).unwrap_or_default();
        let mut stack: Vec<_> = roots.into_iter().rev().map(|c| (c, None)).collect();

        while let Some((current, parent_idx)) = stack.pop() {
            if !self.visited_ids.insert(current.id) {
                return Err(DomainError::CycleDetected(current.id));
            }
            let id = current.id;
            let current_idx = tree.insert_node(current, parent_idx);

            // Pushed in reverse so siblings are inserted in priority order
            if let Some(children) = self.relationship_cache.remove(&Some(id)) {
                for child in children.into_iter().rev() {
                    stack.push((child, Some(current_idx)));
                }
            }
        }

        Ok(tree)
    }
}
