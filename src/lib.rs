//! ruletree: per-company category trees of predicates whose leaves map to
//! outcome rule sets.
//!
//! A category carries one predicate (`tab_name <op> tab_value`). Walking a
//! tree composes predicates along each root-to-outcome path; see
//! [`domain::Combinator`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
