//! CLI command implementations.

pub mod plan;

use anyhow::{Context, Result};
use stackplan_config::{ConfigResolver, EnvSource, RawConfig};
use stackplan_core::Stack;
use stackplan_core::plan::Plan;
use stackplan_core::variable::Target;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

/// Load the config file and resolve the plan for a stack.
pub fn load_plan(stack: &str, config_path: &Path) -> Result<Plan> {
    let raw = RawConfig::load(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let env = EnvSource::from_process();
    let stack = Stack::new(stack);
    info!(stack = %stack, config = %config_path.display(), "Planning stack");

    let config = ConfigResolver::new(&raw, &env)
        .resolve(&stack)
        .with_context(|| format!("Failed to resolve configuration for stack '{}'", stack))?;

    stackplan_planner::plan(&config)
        .with_context(|| format!("Failed to plan stack '{}'", stack))
}

pub fn validate(stack: &str, config_path: &Path) -> Result<()> {
    let plan = load_plan(stack, config_path)?;
    plan.validate().context("Plan failed validation")?;
    println!(
        "Plan for stack '{}' is valid ({} resources)",
        plan.stack,
        plan.resources.len()
    );
    Ok(())
}

pub fn targets(stack: &str) {
    let stack = Stack::new(stack);
    let targets = stackplan_planner::targets_for(&stack);
    println!("Stack: {} (production: {})", stack, stack.is_production());
    println!("  sensitive: {}", join_targets(&targets.sensitive));
    println!("  standard:  {}", join_targets(&targets.standard));
}

pub fn join_targets(targets: &BTreeSet<Target>) -> String {
    targets
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
