//! Desired-state planning for stackplan.
//!
//! Resolution runs three independent branches over an explicit [`Config`]:
//! - Database provider selection and connection derivation
//! - Hosting project import/create resolution
//! - Environment target policy
//!
//! and joins them into an ordered [`Plan`]. Any configuration error aborts the
//! run before a single declaration is produced.

pub mod assemble;
pub mod database;
pub mod error;
pub mod hosting;
pub mod targets;

use stackplan_config::options::APP_NAME;
use stackplan_config::{Config, ConfigResult};
use stackplan_core::plan::Plan;
use tracing::info;

pub use assemble::{AssemblyOptions, assemble};
pub use database::{DatabaseResolution, DatabaseStrategy, select_and_build};
pub use error::{PlanError, PlanResult};
pub use hosting::resolve_hosting_project;
pub use targets::targets_for;

/// `<appName>-<stack>`, the default name for per-stack resources.
pub(crate) fn stack_resource_name(config: &Config) -> ConfigResult<String> {
    Ok(format!("{}-{}", config.require(APP_NAME)?, config.stack().name()))
}

/// Resolve and assemble the plan for the config's stack.
pub fn plan(config: &Config) -> PlanResult<Plan> {
    let stack = config.stack();

    let database = select_and_build(config)?;
    let hosting = resolve_hosting_project(config)?;
    let targets = targets_for(stack);
    let options = AssemblyOptions::from_config(config)?;

    let plan = assemble(stack, hosting, database, &targets, &options);
    plan.validate()?;

    info!(
        stack = %stack,
        provider = %plan.outputs.db_provider_selected,
        resources = plan.resources.len(),
        "Assembled plan"
    );
    Ok(plan)
}
