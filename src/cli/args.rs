//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::domain::{Datatype, Id, Operation};

/// Rule-classification trees: per-company category predicates mapped to outcome rule sets
#[derive(Parser, Debug)]
#[command(name = "ruletree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more: -d -d -d)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// JSON record store (overrides config)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub data_file: Option<PathBuf>,

    /// Directory holding a local .ruletree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage companies
    Company {
        #[command(subcommand)]
        command: CompanyCommands,
    },

    /// Manage contacts
    Contact {
        #[command(subcommand)]
        command: ContactCommands,
    },

    /// Manage roles
    Role {
        #[command(subcommand)]
        command: RoleCommands,
    },

    /// Employ a contact at a company in a role
    Employ {
        #[arg(long)]
        company: Id,
        #[arg(long)]
        contact: Id,
        #[arg(long)]
        role: Id,
    },

    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Manage outcome rule sets
    Rule {
        #[command(subcommand)]
        command: RuleCommands,
    },

    /// Show category trees
    Tree {
        /// Company (default: configured company, else all)
        #[arg(long)]
        company: Option<Id>,
    },

    /// List composed predicates below a category with their outcomes
    Paths {
        /// Category id
        id: Id,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the predicates that must hold above a category
    Ancestors {
        /// Category id
        id: Id,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum CompanyCommands {
    /// Create a company
    Add {
        /// Company name
        name: String,
    },

    /// List companies
    List,

    /// List contacts employed by a company
    Staff {
        /// Company id
        id: Id,
    },
}

#[derive(Subcommand, Debug)]
pub enum ContactCommands {
    /// Create a contact
    Add {
        /// Contact name
        name: String,
        /// Contact email
        email: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum RoleCommands {
    /// Create a role
    Add {
        /// Role name
        name: String,
    },
}

/// Predicate fields of a new category.
#[derive(Args, Debug)]
pub struct CategoryFields {
    /// Owning company
    #[arg(long)]
    pub company: Id,

    /// Parent category (omit for a grouping root)
    #[arg(long)]
    pub parent: Option<Id>,

    /// Sibling order, ascending
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub priority: i32,

    /// Attribute name
    #[arg(long)]
    pub tab_name: String,

    /// Comparison: symbol (=, <, <=, >, >=, <>), name or code
    #[arg(long, default_value = "=")]
    pub operation: Operation,

    /// Operand type: STRING, INTEGER, FLOAT, DATE, NIL or code
    #[arg(long, default_value = "STRING")]
    pub datatype: Datatype,

    /// Operand text (not needed for NIL)
    #[arg(long)]
    pub tab_value: Option<String>,

    /// Outcome code; makes the category an outcome leaf
    #[arg(long)]
    pub code: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Create a category
    Add(CategoryFields),

    /// Change fields of a category
    Update {
        /// Category id
        id: Id,
        /// New parent category
        #[arg(long, conflicts_with = "root")]
        parent: Option<Id>,
        /// Detach from the parent, making it a grouping root
        #[arg(long)]
        root: bool,
        #[arg(long, allow_negative_numbers = true)]
        priority: Option<i32>,
        #[arg(long)]
        tab_name: Option<String>,
        #[arg(long)]
        operation: Option<Operation>,
        #[arg(long)]
        datatype: Option<Datatype>,
        #[arg(long, conflicts_with = "clear_tab_value")]
        tab_value: Option<String>,
        /// Remove the operand
        #[arg(long)]
        clear_tab_value: bool,
        #[arg(long, conflicts_with = "clear_code")]
        code: Option<String>,
        /// Remove the outcome code
        #[arg(long)]
        clear_code: bool,
    },

    /// Delete a category without subcategories
    Remove {
        /// Category id
        id: Id,
    },

    /// Show a category with its predicate and ancestor chain
    Show {
        /// Category id
        id: Id,
    },

    /// List grouping roots, or the subcategories of a category
    List {
        /// Company (default: configured company, else all)
        #[arg(long, conflicts_with = "parent")]
        company: Option<Id>,
        /// List the subcategories of this category
        #[arg(long)]
        parent: Option<Id>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RuleCommands {
    /// Create or replace the rule set for a code
    Add {
        /// Outcome code
        code: String,
        /// Outcome text
        outcome: String,
    },

    /// List rule sets
    List,

    /// Remove a rule set no category uses
    Remove {
        /// Outcome code
        code: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Print a config template
    Template,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },
}
