//! Platform API CLI binary.
//!
//! A command-line interface for interacting with the Platform API.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use platformapi::cli::{Cli, Command, Entity, EnvironmentAction};
use platformapi::{
    Activity, Domain, Environment, PlatformClient, PlatformError, PrettyPrint, Project, SshKey,
};
use serde::Serialize;
use tabled::{Table, Tabled};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut client = match PlatformClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set PLATFORM_API_TOKEN environment variable");
            return ExitCode::FAILURE;
        }
    };

    match run(&mut client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &mut PlatformClient, cli: Cli) -> platformapi::Result<()> {
    match cli.command {
        Command::Account => handle_account(client, cli.json).await,
        Command::Get {
            entity,
            id,
            project,
        } => handle_get(client, entity, &id, project.as_deref(), cli.json).await,
        Command::List {
            entity,
            project,
            limit,
            activity_type,
        } => {
            handle_list(
                client,
                entity,
                project.as_deref(),
                limit,
                activity_type.as_deref(),
                cli.json,
            )
            .await
        }
        Command::AddSshKey { value, title } => {
            let key = client.add_ssh_key(&value, title.as_deref()).await?;
            output_single(&key, cli.json)
        }
        Command::Delete {
            entity,
            id,
            project,
        } => handle_delete(client, entity, &id, project.as_deref()).await,
        Command::Environment {
            action,
            project,
            environment,
            wait,
        } => handle_environment(client, action, &project, &environment, wait, cli.json).await,
    }
}

async fn handle_account(client: &mut PlatformClient, json: bool) -> platformapi::Result<()> {
    let info = client.account_info(false).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(info)?);
        return Ok(());
    }

    for (label, key) in [
        ("Username", "username"),
        ("Name", "display_name"),
        ("Email", "mail"),
    ] {
        if let Some(value) = info.get(key).and_then(|v| v.as_str()) {
            println!("{:<16}{}", format!("{label}:"), value);
        }
    }
    Ok(())
}

async fn require_project(
    client: &mut PlatformClient,
    project: Option<&str>,
) -> platformapi::Result<Project> {
    let id = project.ok_or_else(|| {
        PlatformError::InvalidArgument("--project is required for this resource".to_string())
    })?;
    client.project(id).await?.ok_or_else(|| PlatformError::NotFound {
        entity_type: "Project",
        id: id.to_string(),
    })
}

fn found<T>(item: Option<T>, entity_type: &'static str, id: &str) -> platformapi::Result<T> {
    item.ok_or_else(|| PlatformError::NotFound {
        entity_type,
        id: id.to_string(),
    })
}

async fn handle_get(
    client: &mut PlatformClient,
    entity: Entity,
    id: &str,
    project: Option<&str>,
    json: bool,
) -> platformapi::Result<()> {
    match entity {
        Entity::Project => {
            let mut project = require_project(client, Some(id)).await?;
            project.ensure_full().await?;
            output_single(&project, json)?;
        }
        Entity::Environment => {
            let project = require_project(client, project).await?;
            let environment = found(project.environment(id).await?, "Environment", id)?;
            output_single(&environment, json)?;
        }
        Entity::Activity => {
            let project = require_project(client, project).await?;
            let activity = found(project.activity(id).await?, "Activity", id)?;
            output_single(&activity, json)?;
        }
        Entity::Domain => {
            let project = require_project(client, project).await?;
            let domain = found(project.domain(id).await?, "Domain", id)?;
            output_single(&domain, json)?;
        }
        Entity::SshKey => {
            let key = found(client.ssh_key(id).await?, "SSH key", id)?;
            output_single(&key, json)?;
        }
    }
    Ok(())
}

async fn handle_list(
    client: &mut PlatformClient,
    entity: Entity,
    project: Option<&str>,
    limit: Option<usize>,
    activity_type: Option<&str>,
    json: bool,
) -> platformapi::Result<()> {
    match entity {
        Entity::Project => {
            let mut projects = client.projects(false).await?;
            if let Some(limit) = limit {
                projects.truncate(limit);
            }
            output_list(&projects, json, |p| ProjectRow::from(p))?;
        }
        Entity::Environment => {
            let project = require_project(client, project).await?;
            let environments = project.environments(limit).await?;
            output_list(&environments, json, |e| EnvironmentRow::from(e))?;
        }
        Entity::Activity => {
            let project = require_project(client, project).await?;
            let activities = project.activities(limit, activity_type).await?;
            output_list(&activities, json, |a| ActivityRow::from(a))?;
        }
        Entity::Domain => {
            let project = require_project(client, project).await?;
            let domains = project.domains(limit).await?;
            output_list(&domains, json, |d| DomainRow::from(d))?;
        }
        Entity::SshKey => {
            let mut keys = client.ssh_keys(false).await?;
            if let Some(limit) = limit {
                keys.truncate(limit);
            }
            output_list(&keys, json, |k| SshKeyRow::from(k))?;
        }
    }
    Ok(())
}

async fn handle_delete(
    client: &mut PlatformClient,
    entity: Entity,
    id: &str,
    project: Option<&str>,
) -> platformapi::Result<()> {
    match entity {
        Entity::SshKey => {
            let key = found(client.ssh_key(id).await?, "SSH key", id)?;
            key.delete().await?;
        }
        Entity::Domain => {
            let project = require_project(client, project).await?;
            let domain = found(project.domain(id).await?, "Domain", id)?;
            domain.delete().await?;
        }
        _ => {
            return Err(PlatformError::InvalidArgument(
                "only ssh-key and domain support delete".to_string(),
            ));
        }
    }
    eprintln!("Deleted {id}");
    Ok(())
}

async fn handle_environment(
    client: &mut PlatformClient,
    action: EnvironmentAction,
    project: &str,
    environment: &str,
    wait: bool,
    json: bool,
) -> platformapi::Result<()> {
    let project = require_project(client, Some(project)).await?;
    let environment = found(
        project.environment(environment).await?,
        "Environment",
        environment,
    )?;

    let mut activity = match action {
        EnvironmentAction::Activate => environment.activate().await?,
        EnvironmentAction::Deactivate => environment.deactivate().await?,
        EnvironmentAction::Merge => environment.merge().await?,
        EnvironmentAction::Backup => environment.backup().await?,
    };

    if wait {
        activity
            .wait(Duration::from_secs(1), |a| {
                eprintln!("{}: {}%", a.state().unwrap_or("unknown"), a.completion_percent());
            })
            .await?;
    }

    output_single(&activity, json)
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> platformapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list<T, R, F>(items: &[T], json: bool, to_row: F) -> platformapi::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} item(s)", items.len());
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct ProjectRow {
    id: String,
    title: String,
    region: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id().unwrap_or_default().to_string(),
            title: p.title().unwrap_or_default().to_string(),
            region: p.region().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Tabled)]
struct EnvironmentRow {
    id: String,
    title: String,
    status: String,
    parent: String,
}

impl From<&Environment> for EnvironmentRow {
    fn from(e: &Environment) -> Self {
        Self {
            id: e.id().unwrap_or_default().to_string(),
            title: e.title().unwrap_or_default().to_string(),
            status: e.status().unwrap_or_default().to_string(),
            parent: e.parent().unwrap_or("-").to_string(),
        }
    }
}

#[derive(Tabled)]
struct ActivityRow {
    id: String,
    #[tabled(rename = "type")]
    activity_type: String,
    state: String,
    created: String,
}

impl From<&Activity> for ActivityRow {
    fn from(a: &Activity) -> Self {
        Self {
            id: a.id().unwrap_or_default().to_string(),
            activity_type: a.activity_type().unwrap_or_default().to_string(),
            state: format!("{} ({}%)", a.state().unwrap_or("unknown"), a.completion_percent()),
            created: a
                .created_at()
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct DomainRow {
    name: String,
    certificate: String,
}

impl From<&Domain> for DomainRow {
    fn from(d: &Domain) -> Self {
        Self {
            name: d.name().unwrap_or_default().to_string(),
            certificate: if d.has_certificate() { "custom" } else { "none" }.to_string(),
        }
    }
}

#[derive(Tabled)]
struct SshKeyRow {
    id: String,
    title: String,
    fingerprint: String,
}

impl From<&SshKey> for SshKeyRow {
    fn from(k: &SshKey) -> Self {
        Self {
            id: k.id().unwrap_or_default(),
            title: k.title().unwrap_or_default().to_string(),
            fingerprint: k.fingerprint().unwrap_or_default().to_string(),
        }
    }
}
