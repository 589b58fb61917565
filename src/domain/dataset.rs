//! Persisted snapshot of all records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::combinator::OutcomeLookup;
use crate::domain::entities::{Category, Company, Contact, Employment, Id, Role, RuleSet};

/// All record collections plus the id counter shared by them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub next_id: Id,
    pub companies: BTreeMap<Id, Company>,
    pub contacts: BTreeMap<Id, Contact>,
    pub roles: BTreeMap<Id, Role>,
    pub employments: BTreeMap<Id, Employment>,
    pub categories: BTreeMap<Id, Category>,
    /// Keyed by outcome code
    pub rule_sets: BTreeMap<String, RuleSet>,
}

impl Dataset {
    /// Hand out the next record id (ids start at 1).
    pub fn allocate_id(&mut self) -> Id {
        // Never reissue an id that is already taken, even after manual edits
        let floor = self
            .categories
            .keys()
            .chain(self.companies.keys())
            .chain(self.contacts.keys())
            .chain(self.roles.keys())
            .chain(self.employments.keys())
            .max()
            .copied()
            .unwrap_or(0);
        self.next_id = self.next_id.max(floor) + 1;
        self.next_id
    }

    /// Categories owned by `company`, or all of them.
    pub fn categories_of(&self, company: Option<Id>) -> impl Iterator<Item = &Category> {
        self.categories
            .values()
            .filter(move |c| company.map_or(true, |id| c.company_id == id))
    }

    /// Direct subcategories of `id`, ascending by priority.
    pub fn subcategories(&self, id: Id) -> Vec<&Category> {
        let mut children: Vec<_> = self
            .categories
            .values()
            .filter(|c| c.parent_id == Some(id))
            .collect();
        children.sort_by_key(|c| (c.priority, c.id));
        children
    }

    /// True when `candidate` is `id` itself or lies below it.
    pub fn is_descendant(&self, candidate: Id, id: Id) -> bool {
        let mut current = Some(candidate);
        let mut steps = 0;
        while let Some(cursor) = current {
            if cursor == id {
                return true;
            }
            // Corrupt parent chain, treat as cyclic
            steps += 1;
            if steps > self.categories.len() {
                return true;
            }
            current = self.categories.get(&cursor).and_then(|c| c.parent_id);
        }
        false
    }
}

impl OutcomeLookup for Dataset {
    fn outcome_text(&self, code: &str) -> Option<String> {
        self.rule_sets.outcome_text(code)
    }
}
