//! CLI argument parsing tests.

use clap::Parser;
use platformapi::cli::{Cli, Command, Entity, EnvironmentAction};

#[test]
fn test_cli_parses_get_subcommand() {
    let cli = Cli::parse_from(["platformapi", "get", "environment", "main", "--project", "abc"]);

    assert!(!cli.json);
    match cli.command {
        Command::Get {
            entity,
            id,
            project,
        } => {
            assert!(matches!(entity, Entity::Environment));
            assert_eq!(id, "main");
            assert_eq!(project.as_deref(), Some("abc"));
        }
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_cli_parses_list_subcommand() {
    let cli = Cli::parse_from(["platformapi", "list", "projects"]);

    assert!(!cli.json);
    match cli.command {
        Command::List {
            entity,
            project,
            limit,
            ..
        } => {
            assert!(matches!(entity, Entity::Project));
            assert!(project.is_none());
            assert!(limit.is_none());
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_list_limit_and_type_args() {
    let cli = Cli::parse_from([
        "platformapi",
        "list",
        "activities",
        "--project",
        "abc",
        "--limit",
        "5",
        "--type",
        "environment.push",
    ]);

    match cli.command {
        Command::List {
            entity,
            limit,
            activity_type,
            ..
        } => {
            assert!(matches!(entity, Entity::Activity));
            assert_eq!(limit, Some(5));
            assert_eq!(activity_type.as_deref(), Some("environment.push"));
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_cli_parses_add_ssh_key() {
    let cli = Cli::parse_from([
        "platformapi",
        "add-ssh-key",
        "ssh-ed25519 AAAAC3Nza test@host",
        "--title",
        "laptop",
    ]);

    match cli.command {
        Command::AddSshKey { value, title } => {
            assert_eq!(value, "ssh-ed25519 AAAAC3Nza test@host");
            assert_eq!(title.as_deref(), Some("laptop"));
        }
        _ => panic!("Expected AddSshKey command"),
    }
}

#[test]
fn test_cli_parses_environment_action() {
    let cli = Cli::parse_from([
        "platformapi",
        "environment",
        "backup",
        "--project",
        "abc",
        "--environment",
        "main",
        "--wait",
    ]);

    match cli.command {
        Command::Environment {
            action,
            project,
            environment,
            wait,
        } => {
            assert_eq!(action, EnvironmentAction::Backup);
            assert_eq!(project, "abc");
            assert_eq!(environment, "main");
            assert!(wait);
        }
        _ => panic!("Expected Environment command"),
    }
}

#[test]
fn test_global_json_flag() {
    // --json before subcommand
    let cli = Cli::parse_from(["platformapi", "--json", "account"]);
    assert!(cli.json);

    // --json after subcommand (global flag)
    let cli = Cli::parse_from(["platformapi", "list", "ssh-keys", "--json"]);
    assert!(cli.json);
}

#[test]
fn test_entity_variants() {
    let cli = Cli::parse_from(["platformapi", "get", "project", "abc"]);
    assert!(matches!(cli.command, Command::Get { entity: Entity::Project, .. }));

    let cli = Cli::parse_from(["platformapi", "get", "ssh-key", "12"]);
    assert!(matches!(cli.command, Command::Get { entity: Entity::SshKey, .. }));

    let cli = Cli::parse_from(["platformapi", "list", "domains", "--project", "abc"]);
    assert!(matches!(cli.command, Command::List { entity: Entity::Domain, .. }));

    let cli = Cli::parse_from(["platformapi", "delete", "ssh-keys", "12"]);
    assert!(matches!(cli.command, Command::Delete { entity: Entity::SshKey, .. }));
}

#[test]
fn test_unknown_entity_is_rejected() {
    let result = Cli::try_parse_from(["platformapi", "get", "revision", "x"]);
    assert!(result.is_err());
}
