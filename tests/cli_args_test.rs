//! Tests for command line parsing

use clap::Parser;
use rstest::rstest;

use ruletree::cli::args::{CategoryCommands, Cli, Commands};
use ruletree::domain::{Datatype, Operation};

#[rstest]
#[case("=", Operation::EqualTo)]
#[case("<>", Operation::NotEqual)]
#[case("greater-than-or-equal", Operation::GreaterThanOrEqual)]
#[case("LESS_THAN", Operation::LessThan)]
#[case("2", Operation::LessThanOrEqual)]
fn given_operation_spelling_when_parsing_add_then_resolves(
    #[case] raw: &str,
    #[case] expected: Operation,
) {
    let cli = Cli::try_parse_from([
        "ruletree", "category", "add", "--company", "1", "--tab-name", "age",
        "--operation", raw, "--tab-value", "18",
    ])
    .unwrap();

    let Some(Commands::Category {
        command: CategoryCommands::Add(fields),
    }) = cli.command
    else {
        panic!("expected category add");
    };
    assert_eq!(fields.operation, expected);
    assert_eq!(fields.datatype, Datatype::String);
    assert_eq!(fields.priority, 0);
}

#[test]
fn given_repeated_debug_flag_when_parsing_then_counts() {
    let cli = Cli::try_parse_from(["ruletree", "-d", "-d", "tree"]).unwrap();

    assert_eq!(cli.debug, 2);
    assert!(matches!(cli.command, Some(Commands::Tree { company: None })));
}

#[test]
fn given_unknown_operation_when_parsing_then_rejected() {
    let result = Cli::try_parse_from([
        "ruletree", "category", "add", "--company", "1", "--tab-name", "age",
        "--operation", "~=",
    ]);

    assert!(result.is_err());
}

#[test]
fn given_root_and_parent_when_updating_then_conflict() {
    let result = Cli::try_parse_from(["ruletree", "category", "update", "3", "--root", "--parent", "1"]);

    assert!(result.is_err());
}

#[test]
fn given_paths_with_json_when_parsing_then_flag_set() {
    let cli =
        Cli::try_parse_from(["ruletree", "--data-file", "/tmp/r.json", "paths", "7", "--json"])
            .unwrap();

    assert_eq!(cli.data_file.as_deref(), Some(std::path::Path::new("/tmp/r.json")));
    assert!(matches!(cli.command, Some(Commands::Paths { id: 7, json: true })));
}
