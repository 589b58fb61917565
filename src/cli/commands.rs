//! Command dispatch: maps parsed arguments onto the services

use std::env;
use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{CategoryChanges, NewCategory};
use crate::cli::args::{
    CategoryCommands, CategoryFields, Cli, Commands, CompanyCommands, ConfigCommands,
    ContactCommands, RoleCommands, RuleCommands,
};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, OutputFormat, Settings};
use crate::domain::Id;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    // Commands that do not touch the record store
    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
        Commands::Config { command } => return cmd_config(cli, command),
        _ => {}
    }

    let settings = load_settings(cli)?;
    debug!("data file: {}", settings.data_file.display());
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Company { command } => cmd_company(&container, command),
        Commands::Contact { command } => cmd_contact(&container, command),
        Commands::Role { command } => cmd_role(&container, command),
        Commands::Employ {
            company,
            contact,
            role,
        } => cmd_employ(&container, *company, *contact, *role),
        Commands::Category { command } => cmd_category(&container, command),
        Commands::Rule { command } => cmd_rule(&container, command),
        Commands::Tree { company } => cmd_tree(&container, *company),
        Commands::Paths { id, json } => cmd_paths(&container, *id, *json),
        Commands::Ancestors { id } => cmd_ancestors(&container, *id),
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}

fn local_dir(cli: &Cli) -> Option<PathBuf> {
    cli.dir.clone().or_else(|| env::current_dir().ok())
}

/// Layered settings with `--data-file` on top.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(local_dir(cli).as_deref())?;
    if let Some(path) = &cli.data_file {
        settings.data_file = crate::util::path::expand_path(path);
    }
    Ok(settings)
}

// ============================================================
// Directory
// ============================================================

fn cmd_company(container: &ServiceContainer, command: &CompanyCommands) -> CliResult<()> {
    match command {
        CompanyCommands::Add { name } => {
            let company = container.directory.add_company(name)?;
            output::action("Created company", &format!("{} {}", company.id, company.name));
        }
        CompanyCommands::List => {
            let companies = container.directory.companies()?;
            if companies.is_empty() {
                output::warning("no companies");
            }
            for company in companies {
                output::info(&format!("{:>4}  {}", company.id, company.name));
            }
        }
        CompanyCommands::Staff { id } => {
            let company = container.directory.company(*id)?;
            output::header(&company.name);
            for member in container.directory.staff(*id)? {
                output::detail(&format!(
                    "{} <{}> ({})",
                    member.contact.name, member.contact.email, member.role.name
                ));
            }
        }
    }
    Ok(())
}

fn cmd_contact(container: &ServiceContainer, command: &ContactCommands) -> CliResult<()> {
    match command {
        ContactCommands::Add { name, email } => {
            let contact = container.directory.add_contact(name, email)?;
            output::action("Created contact", &format!("{} {}", contact.id, contact.name));
        }
    }
    Ok(())
}

fn cmd_role(container: &ServiceContainer, command: &RoleCommands) -> CliResult<()> {
    match command {
        RoleCommands::Add { name } => {
            let role = container.directory.add_role(name)?;
            output::action("Created role", &format!("{} {}", role.id, role.name));
        }
    }
    Ok(())
}

fn cmd_employ(container: &ServiceContainer, company: Id, contact: Id, role: Id) -> CliResult<()> {
    let employment = container.directory.employ(company, contact, role)?;
    output::success(&format!(
        "contact {} employed at company {} (employment {})",
        employment.contact_id, employment.company_id, employment.id
    ));
    Ok(())
}

// ============================================================
// Categories and rule sets
// ============================================================

fn cmd_category(container: &ServiceContainer, command: &CategoryCommands) -> CliResult<()> {
    match command {
        CategoryCommands::Add(fields) => {
            let category = container.categories.create(new_category(fields))?;
            output::action("Created category", &format!("{} {}", category.id, category));
        }
        CategoryCommands::Update {
            id,
            parent,
            root,
            priority,
            tab_name,
            operation,
            datatype,
            tab_value,
            clear_tab_value,
            code,
            clear_code,
        } => {
            let changes = CategoryChanges {
                parent_id: if *root { Some(None) } else { parent.map(Some) },
                priority: *priority,
                tab_name: tab_name.clone(),
                operation: *operation,
                datatype: *datatype,
                tab_value: clearable(tab_value, *clear_tab_value),
                code: clearable(code, *clear_code),
            };
            let category = container.categories.update(*id, changes)?;
            output::action("Updated category", &format!("{} {}", category.id, category));
        }
        CategoryCommands::Remove { id } => {
            let category = container.categories.delete(*id)?;
            output::action("Removed category", &format!("{} {}", category.id, category));
        }
        CategoryCommands::Show { id } => {
            let details = container.categories.describe(*id)?;
            let category = &details.category;
            output::header(&format!("Category {}", category.id));
            output::detail(&format!("company:     {}", category.company_id));
            output::detail(&format!(
                "parent:      {}",
                category
                    .parent_id
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_string())
            ));
            output::detail(&format!("priority:    {}", category.priority));
            output::detail(&format!("predicate:   {}", details.predicate));
            output::detail(&format!("datatype:    {}", details.datatype_label));
            output::detail(&format!(
                "code:        {}",
                category.outcome_code().unwrap_or("-")
            ));
            output::detail(&format!("ancestors:   {}", details.ancestor_chain));
            output::detail(&format!(
                "children:    {}",
                itertools::join(&details.subcategories, ", ")
            ));
        }
        CategoryCommands::List { company, parent } => {
            let categories = match parent {
                Some(parent) => container.categories.subcategories(*parent)?,
                None => {
                    let company = company.or(container.settings.company);
                    container.categories.root_categories(company)?
                }
            };
            for category in categories {
                output::info(&format!(
                    "{:>4}  [{}] {}",
                    category.id, category.priority, category
                ));
            }
        }
    }
    Ok(())
}

fn new_category(fields: &CategoryFields) -> NewCategory {
    NewCategory {
        company_id: fields.company,
        parent_id: fields.parent,
        priority: fields.priority,
        tab_name: fields.tab_name.clone(),
        operation: fields.operation,
        datatype: fields.datatype,
        tab_value: fields.tab_value.clone(),
        code: fields.code.clone(),
    }
}

/// `--clear-x` wins over an absent value; a given value sets it.
fn clearable(value: &Option<String>, clear: bool) -> Option<Option<String>> {
    if clear {
        Some(None)
    } else {
        value.clone().map(Some)
    }
}

fn cmd_rule(container: &ServiceContainer, command: &RuleCommands) -> CliResult<()> {
    match command {
        RuleCommands::Add { code, outcome } => {
            let rule_set = container.rule_sets.put(code, outcome)?;
            output::action("Stored rule set", &format!("{} => {}", rule_set.code, rule_set));
        }
        RuleCommands::List => {
            for rule_set in container.rule_sets.list()? {
                output::info(&format!("{}  {}", rule_set.code, rule_set));
            }
        }
        RuleCommands::Remove { code } => {
            let rule_set = container.rule_sets.remove(code)?;
            output::action("Removed rule set", &rule_set.code);
        }
    }
    Ok(())
}

// ============================================================
// Tree queries
// ============================================================

#[instrument(level = "debug", skip(container))]
fn cmd_tree(container: &ServiceContainer, company: Option<Id>) -> CliResult<()> {
    let company = company.or(container.settings.company);
    let tree = container.categories.tree(company)?;
    if tree.is_empty() {
        output::warning("no categories");
        return Ok(());
    }
    for rendered in tree.to_forest() {
        output::info(&rendered);
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_paths(container: &ServiceContainer, id: Id, json: bool) -> CliResult<()> {
    let paths = container.categories.combined_paths(id)?;
    if json || container.settings.output == OutputFormat::Json {
        let rendered = serde_json::to_string_pretty(&paths).map_err(InfraError::from)?;
        output::info(&rendered);
        return Ok(());
    }
    for path in paths {
        output::info(&format!("{}  =>  {}", path.predicate, path.outcome));
    }
    Ok(())
}

fn cmd_ancestors(container: &ServiceContainer, id: Id) -> CliResult<()> {
    let chain = container.categories.ancestor_chain(id)?;
    output::info(&chain);
    Ok(())
}

// ============================================================
// Config
// ============================================================

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail("global: (no config directory)"),
            }
            if let Some(dir) = local_dir(cli) {
                output::detail(&format!("local:  {}", local_config_path(&dir).display()));
            }
            let settings = load_settings(cli)?;
            output::detail(&format!("data:   {}", settings.data_file.display()));
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path()
                    .ok_or_else(|| CliError::Usage("no global config directory".into()))?
            } else {
                let dir = local_dir(cli)
                    .ok_or_else(|| CliError::Usage("cannot determine directory".into()))?;
                local_config_path(&dir)
            };
            init_config(&RealFileSystem, &path)?;
            output::action("Created", &path.display());
        }
    }
    Ok(())
}

/// Write the config template to `path`, refusing to overwrite.
fn init_config(fs: &dyn FileSystem, path: &std::path::Path) -> CliResult<()> {
    if fs.exists(path) {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    fs.ensure_parent(path)
        .map_err(|e| InfraError::io(format!("create dir for {}", path.display()), e))?;
    fs.write(path, &Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    Ok(())
}
