//! Category record management and rule-tree queries
//!
//! Every call loads a fresh snapshot from the record store; mutating calls
//! validate and save it back.

use std::sync::Arc;

use chrono::Utc;
use generational_arena::Index;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::validation::validate_category;
use crate::domain::{
    datatype_label, Category, CategoryTree, CombinedPath, Combinator, Dataset, Datatype,
    DomainError, Id, Operation, TreeBuilder,
};
use crate::infrastructure::traits::RecordStore;

/// Fields of a category to be created.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub company_id: Id,
    pub parent_id: Option<Id>,
    pub priority: i32,
    pub tab_name: String,
    pub operation: Operation,
    pub datatype: Datatype,
    pub tab_value: Option<String>,
    pub code: Option<String>,
}

/// Partial update; `None` leaves a field untouched.
///
/// Nullable fields use a nested option: `Some(None)` clears them.
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub parent_id: Option<Option<Id>>,
    pub priority: Option<i32>,
    pub tab_name: Option<String>,
    pub operation: Option<Operation>,
    pub datatype: Option<Datatype>,
    pub tab_value: Option<Option<String>>,
    pub code: Option<Option<String>>,
}

/// A category together with its rendered diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryDetails {
    pub category: Category,
    pub predicate: String,
    pub datatype_label: &'static str,
    pub ancestor_chain: String,
    pub subcategories: Vec<Id>,
}

/// Service for category trees.
pub struct CategoryService {
    store: Arc<dyn RecordStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn load(&self) -> ApplicationResult<Dataset> {
        self.store.load().with_context("load records")
    }

    fn save(&self, data: &Dataset) -> ApplicationResult<()> {
        self.store.save(data).with_context("save records")
    }

    /// Create a category after validating it against its parent.
    #[instrument(level = "debug", skip(self, new), fields(company = new.company_id))]
    pub fn create(&self, new: NewCategory) -> ApplicationResult<Category> {
        let mut data = self.load()?;
        if !data.companies.contains_key(&new.company_id) {
            return Err(DomainError::not_found("company", new.company_id).into());
        }

        let now = Utc::now();
        let mut category = Category {
            id: 0,
            company_id: new.company_id,
            parent_id: new.parent_id,
            priority: new.priority,
            tab_name: new.tab_name,
            operation: new.operation,
            datatype: new.datatype,
            tab_value: new.tab_value,
            code: normalize_code(new.code),
            created_at: now,
            updated_at: now,
        };
        self.check(&data, &category)?;

        category.id = data.allocate_id();
        data.categories.insert(category.id, category.clone());
        self.save(&data)?;

        info!("created category {}: {}", category.id, category);
        Ok(category)
    }

    /// Apply `changes` to category `id` and re-validate it.
    #[instrument(level = "debug", skip(self, changes))]
    pub fn update(&self, id: Id, changes: CategoryChanges) -> ApplicationResult<Category> {
        let mut data = self.load()?;
        let mut category = data
            .categories
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("category", id))?;

        if let Some(parent_id) = changes.parent_id {
            if let Some(new_parent) = parent_id {
                if data.is_descendant(new_parent, id) {
                    return Err(DomainError::CycleDetected(id).into());
                }
            }
            category.parent_id = parent_id;
        }
        if let Some(priority) = changes.priority {
            category.priority = priority;
        }
        if let Some(tab_name) = changes.tab_name {
            category.tab_name = tab_name;
        }
        if let Some(operation) = changes.operation {
            category.operation = operation;
        }
        if let Some(datatype) = changes.datatype {
            category.datatype = datatype;
        }
        if let Some(tab_value) = changes.tab_value {
            category.tab_value = tab_value;
        }
        if let Some(code) = changes.code {
            category.code = normalize_code(code);
        }
        self.check(&data, &category)?;

        category.updated_at = Utc::now();
        data.categories.insert(id, category.clone());
        self.save(&data)?;

        info!("updated category {}: {}", id, category);
        Ok(category)
    }

    /// Delete a category without subcategories.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&self, id: Id) -> ApplicationResult<Category> {
        let mut data = self.load()?;
        if !data.subcategories(id).is_empty() {
            return Err(DomainError::HasSubcategories(id).into());
        }
        let removed = data
            .categories
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("category", id))?;
        self.save(&data)?;

        info!("deleted category {}", id);
        Ok(removed)
    }

    pub fn get(&self, id: Id) -> ApplicationResult<Category> {
        let data = self.load()?;
        data.categories
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("category", id).into())
    }

    /// Grouping roots ordered by company, then priority.
    pub fn root_categories(&self, company: Option<Id>) -> ApplicationResult<Vec<Category>> {
        let data = self.load()?;
        let mut roots: Vec<_> = data
            .categories_of(company)
            .filter(|c| c.is_grouping_root())
            .cloned()
            .collect();
        roots.sort_by_key(|c| (c.company_id, c.priority, c.id));
        Ok(roots)
    }

    /// Direct subcategories of `id` in priority order.
    pub fn subcategories(&self, id: Id) -> ApplicationResult<Vec<Category>> {
        let data = self.load()?;
        if !data.categories.contains_key(&id) {
            return Err(DomainError::not_found("category", id).into());
        }
        Ok(data.subcategories(id).into_iter().cloned().collect())
    }

    /// Category forest of one company, or of all companies.
    #[instrument(level = "debug", skip(self))]
    pub fn tree(&self, company: Option<Id>) -> ApplicationResult<CategoryTree> {
        let data = self.load()?;
        let tree = TreeBuilder::new().build(data.categories_of(company).cloned())?;
        Ok(tree)
    }

    /// Composed predicate chains below category `id` with their outcomes.
    #[instrument(level = "debug", skip(self))]
    pub fn combined_paths(&self, id: Id) -> ApplicationResult<Vec<CombinedPath>> {
        let (data, tree, idx) = self.snapshot_for(id)?;
        let paths = Combinator::new(&tree, &data).combined_paths(idx)?;
        debug!("category {}: {} combined paths", id, paths.len());
        Ok(paths)
    }

    /// Predicates that must hold above category `id`.
    #[instrument(level = "debug", skip(self))]
    pub fn ancestor_chain(&self, id: Id) -> ApplicationResult<String> {
        let (data, tree, idx) = self.snapshot_for(id)?;
        Ok(Combinator::new(&tree, &data).ancestor_chain(idx))
    }

    pub fn describe(&self, id: Id) -> ApplicationResult<CategoryDetails> {
        let (data, tree, idx) = self.snapshot_for(id)?;
        let combinator = Combinator::new(&tree, &data);
        let category = data
            .categories
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("category", id))?;
        let subcategories = tree
            .children(idx)
            .iter()
            .filter_map(|&child| tree.category(child).map(|c| c.id))
            .collect();

        Ok(CategoryDetails {
            predicate: combinator.render(idx),
            datatype_label: datatype_label(&category),
            ancestor_chain: combinator.ancestor_chain(idx),
            subcategories,
            category,
        })
    }

    /// Load the records and build the tree of the company owning `id`.
    fn snapshot_for(&self, id: Id) -> ApplicationResult<(Dataset, CategoryTree, Index)> {
        let data = self.load()?;
        let company = data
            .categories
            .get(&id)
            .map(|c| c.company_id)
            .ok_or_else(|| DomainError::not_found("category", id))?;
        let tree = TreeBuilder::new().build(data.categories_of(Some(company)).cloned())?;
        let idx = tree
            .find(id)
            .ok_or_else(|| DomainError::not_found("category", id))?;
        Ok((data, tree, idx))
    }

    /// Resolve the parent and run record validation.
    ///
    /// An outcome code must name an existing rule set.
    fn check(&self, data: &Dataset, category: &Category) -> ApplicationResult<()> {
        let parent = match category.parent_id {
            Some(parent_id) => Some(
                data.categories
                    .get(&parent_id)
                    .ok_or_else(|| DomainError::not_found("parent category", parent_id))?,
            ),
            None => None,
        };
        let mut errors = validate_category(category, parent).err().unwrap_or_default();
        if let Some(code) = category.outcome_code() {
            if !data.rule_sets.contains_key(code) {
                errors.add("code", format!("has no rule set: {}", code));
            }
        }
        if !errors.is_empty() {
            return Err(DomainError::from(errors).into());
        }
        Ok(())
    }
}

/// Trim a code; blank codes are stored as absent.
fn normalize_code(code: Option<String>) -> Option<String> {
    code.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())
}
