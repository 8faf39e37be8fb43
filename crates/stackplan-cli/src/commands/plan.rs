//! Plan rendering command.

use anyhow::{Context, Result};
use stackplan_core::database::DatabaseProject;
use stackplan_core::plan::{Operation, Plan, Resource, ResourceDeclaration};
use std::fmt::Write;
use std::path::Path;

use super::{join_targets, load_plan};
use crate::OutputFormat;

/// Resolve a stack's plan and print it.
pub fn run(stack: &str, config_path: &Path, format: OutputFormat, show_secrets: bool) -> Result<()> {
    let plan = load_plan(stack, config_path)?;

    match format {
        OutputFormat::Json => {
            let json = plan
                .to_json(show_secrets)
                .context("Failed to serialize plan")?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            print!("{}", render_text(&plan)?);
        }
    }

    Ok(())
}

/// Human-readable plan. Secrets always render as `[secret]`.
pub fn render_text(plan: &Plan) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "Plan for stack '{}' ({} resources)\n",
        plan.stack,
        plan.resources.len()
    )?;

    for decl in &plan.resources {
        render_declaration(&mut out, decl)?;
    }

    writeln!(out, "Outputs:")?;
    writeln!(out, "  dbProviderSelected = {}", plan.outputs.db_provider_selected)?;
    writeln!(out, "  databaseUrl        = {}", plan.outputs.database_url)?;
    writeln!(out, "  hostingProjectId   = {}", plan.outputs.hosting_project_id)?;
    writeln!(out)?;
    writeln!(out, "Fingerprint: {}", plan.fingerprint()?)?;
    Ok(out)
}

fn render_declaration(out: &mut String, decl: &ResourceDeclaration) -> Result<()> {
    let marker = match decl.operation {
        Operation::Create => "+",
        Operation::Import { .. } => "=",
        Operation::CreateIf { .. } => "?",
    };
    writeln!(
        out,
        "{} {} ({}) [{}]",
        marker,
        decl.name,
        decl.resource.kind(),
        decl.operation
    )?;
    if !decl.depends_on.is_empty() {
        let deps: Vec<&str> = decl.depends_on.iter().map(|d| d.as_str()).collect();
        writeln!(out, "    depends on: {}", deps.join(", "))?;
    }

    match &decl.resource {
        Resource::HostingProject(project) => {
            writeln!(out, "    name = {}", project.name())?;
            if let Some(team) = project.team_id() {
                writeln!(out, "    team = {}", team)?;
            }
            if let Some(settings) = project.settings() {
                for (field, value) in [
                    ("framework", &settings.framework),
                    ("buildCommand", &settings.build_command),
                    ("installCommand", &settings.install_command),
                    ("nodeVersion", &settings.node_version),
                    ("rootDirectory", &settings.root_directory),
                ] {
                    if let Some(value) = value {
                        writeln!(out, "    {} = {}", field, value)?;
                    }
                }
            }
        }
        Resource::DatabaseProject(project) => {
            writeln!(out, "    provider = {}", project.provider())?;
            writeln!(out, "    name = {}", project.name())?;
            match project {
                DatabaseProject::Supabase {
                    organization_id,
                    region,
                    instance_size,
                    database_password,
                    ..
                } => {
                    writeln!(out, "    organization = {}", organization_id)?;
                    writeln!(out, "    region = {}", region)?;
                    if let Some(size) = instance_size {
                        writeln!(out, "    instanceSize = {}", size)?;
                    }
                    writeln!(out, "    password = {}", database_password)?;
                }
                DatabaseProject::Neon {
                    org_id, region_id, ..
                } => {
                    writeln!(out, "    organization = {}", org_id)?;
                    if let Some(region) = region_id {
                        writeln!(out, "    region = {}", region)?;
                    }
                }
            }
        }
        Resource::EnvironmentVariable(var) => {
            writeln!(out, "    {} = {}", var.key(), var.value())?;
            writeln!(out, "    targets = {}", join_targets(var.targets()))?;
            writeln!(out, "    sensitive = {}", var.is_sensitive())?;
        }
    }
    writeln!(out)?;
    Ok(())
}
