//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the platformapi binary.

use clap::{Parser, Subcommand, ValueEnum};

/// Platform API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "platformapi", about = "Platform API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the authenticated account.
    Account,

    /// Get a single resource by ID.
    Get {
        /// The type of resource to get.
        entity: Entity,

        /// The resource ID (domain name for domains).
        id: String,

        /// Project ID (required for environments, activities and domains).
        #[arg(long)]
        project: Option<String>,
    },

    /// List resources.
    List {
        /// The type of resource to list.
        entity: Entity,

        /// Project ID (required for environments, activities and domains).
        #[arg(long)]
        project: Option<String>,

        /// Keep at most this many items (applied after fetching).
        #[arg(long)]
        limit: Option<usize>,

        /// Activity type filter, e.g. `environment.push`.
        #[arg(long = "type")]
        activity_type: Option<String>,
    },

    /// Register a public SSH key.
    AddSshKey {
        /// The public key, e.g. the contents of `~/.ssh/id_ed25519.pub`.
        value: String,

        /// A title for the key.
        #[arg(long)]
        title: Option<String>,
    },

    /// Delete a resource.
    Delete {
        /// The type of resource to delete.
        entity: Entity,

        /// The resource ID (domain name for domains).
        id: String,

        /// Project ID (required for domains).
        #[arg(long)]
        project: Option<String>,
    },

    /// Run a lifecycle action on an environment.
    Environment {
        /// The action to run.
        action: EnvironmentAction,

        /// Project ID.
        #[arg(long)]
        project: String,

        /// Environment ID.
        #[arg(long)]
        environment: String,

        /// Wait for the resulting activity to complete.
        #[arg(long)]
        wait: bool,
    },
}

/// Resource types that can be operated on.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A project.
    #[value(alias = "projects")]
    Project,
    /// A project environment.
    #[value(alias = "environments")]
    Environment,
    /// A background activity.
    #[value(alias = "activities")]
    Activity,
    /// A project domain.
    #[value(alias = "domains")]
    Domain,
    /// An account SSH key.
    #[value(alias = "ssh-keys")]
    SshKey,
}

/// Environment lifecycle actions.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum EnvironmentAction {
    Activate,
    Deactivate,
    Merge,
    Backup,
}
