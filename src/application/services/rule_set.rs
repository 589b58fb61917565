//! Outcome rule sets, looked up by code

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::validation::ValidationErrors;
use crate::domain::{is_blank, Dataset, DomainError, RuleSet};
use crate::infrastructure::traits::RecordStore;

pub struct RuleSetService {
    store: Arc<dyn RecordStore>,
}

impl RuleSetService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn load(&self) -> ApplicationResult<Dataset> {
        self.store.load().with_context("load records")
    }

    /// Insert the rule set for `code`, or replace its outcome.
    #[instrument(level = "debug", skip(self))]
    pub fn put(&self, code: &str, outcome: &str) -> ApplicationResult<RuleSet> {
        let mut errors = ValidationErrors::default();
        if is_blank(code) {
            errors.add("code", "can't be blank");
        }
        if is_blank(outcome) {
            errors.add("outcome", "can't be blank");
        }
        if !errors.is_empty() {
            return Err(DomainError::from(errors).into());
        }

        let mut data = self.load()?;
        let now = Utc::now();
        let code = code.trim().to_string();
        let rule_set = match data.rule_sets.get(&code) {
            Some(existing) => RuleSet {
                outcome: outcome.to_string(),
                updated_at: now,
                ..existing.clone()
            },
            None => RuleSet {
                code: code.clone(),
                outcome: outcome.to_string(),
                created_at: now,
                updated_at: now,
            },
        };
        data.rule_sets.insert(code, rule_set.clone());
        self.store.save(&data).with_context("save records")?;

        info!("stored rule set {} => {}", rule_set.code, rule_set.outcome);
        Ok(rule_set)
    }

    pub fn get(&self, code: &str) -> ApplicationResult<RuleSet> {
        let code = code.trim();
        let data = self.load()?;
        data.rule_sets
            .get(code)
            .cloned()
            .ok_or_else(|| DomainError::not_found("rule set", code).into())
    }

    /// All rule sets ordered by code.
    pub fn list(&self) -> ApplicationResult<Vec<RuleSet>> {
        Ok(self.load()?.rule_sets.into_values().collect())
    }

    /// Remove a rule set no category refers to.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&self, code: &str) -> ApplicationResult<RuleSet> {
        let code = code.trim();
        let mut data = self.load()?;
        if let Some(user) = data
            .categories
            .values()
            .find(|c| c.outcome_code() == Some(code))
        {
            return Err(DomainError::OutcomeInUse {
                code: code.to_string(),
                category_id: user.id,
            }
            .into());
        }
        let removed = data
            .rule_sets
            .remove(code)
            .ok_or_else(|| DomainError::not_found("rule set", code))?;
        self.store.save(&data).with_context("save records")?;

        info!("removed rule set {}", code);
        Ok(removed)
    }
}
