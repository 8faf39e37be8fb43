//! Hosting project resolution: import an existing project or create one.

use stackplan_config::options::*;
use stackplan_config::{Config, ConfigResult};
use stackplan_core::hosting::{HostingProject, ProjectSettings};
use tracing::{debug, info};

use crate::stack_resource_name;

/// Resolve the hosting project declaration.
///
/// An import id wins over everything else: imported projects keep whatever
/// settings they already have, even when `manageProjectSettings` is set.
pub fn resolve_hosting_project(config: &Config) -> ConfigResult<HostingProject> {
    let name = match config.get(VERCEL_PROJECT_NAME)? {
        Some(name) => name,
        None => stack_resource_name(config)?,
    };
    let team_id = config.get(VERCEL_TEAM_ID)?;
    let manage = config.get_bool(MANAGE_PROJECT_SETTINGS)?.unwrap_or(false);

    if let Some(import_id) = config.get(VERCEL_IMPORT_PROJECT_ID)? {
        if manage {
            info!(project = %name, "Ignoring managed settings for imported project");
        }
        debug!(project = %name, import_id = %import_id, "Importing hosting project");
        return Ok(HostingProject::imported(name, import_id, team_id));
    }

    if !manage {
        debug!(project = %name, "Creating hosting project with platform defaults");
        return Ok(HostingProject::created(name, team_id));
    }

    let settings = ProjectSettings {
        framework: config.get(VERCEL_FRAMEWORK)?,
        build_command: config.get(VERCEL_BUILD_COMMAND)?,
        install_command: config.get(VERCEL_INSTALL_COMMAND)?,
        node_version: config.get(VERCEL_NODE_VERSION)?,
        root_directory: config.get(VERCEL_ROOT_DIRECTORY)?,
    };
    debug!(project = %name, ?settings, "Creating hosting project with managed settings");
    Ok(HostingProject::managed(name, team_id, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackplan_config::{ConfigResolver, EnvSource, RawConfig};
    use stackplan_core::Stack;

    fn resolve(raw: RawConfig, env: EnvSource, stack: &str) -> HostingProject {
        let config = ConfigResolver::new(&raw, &env)
            .resolve(&Stack::new(stack))
            .unwrap();
        resolve_hosting_project(&config).unwrap()
    }

    #[test]
    fn test_default_name_and_defaults() {
        let project = resolve(RawConfig::new().with(APP_NAME, "demo"), EnvSource::new(), "prod");
        assert_eq!(project.name(), "demo-prod");
        assert!(project.import_id().is_none());
        assert!(!project.manage_settings());
        assert!(project.settings().is_none());
        assert!(project.team_id().is_none());
    }

    #[test]
    fn test_explicit_name() {
        let raw = RawConfig::new().with(VERCEL_PROJECT_NAME, "storefront");
        let project = resolve(raw, EnvSource::new(), "prod");
        assert_eq!(project.name(), "storefront");
    }

    #[test]
    fn test_import_ignores_managed_settings() {
        let raw = RawConfig::new()
            .with(VERCEL_IMPORT_PROJECT_ID, "prj_existing")
            .with_bool(MANAGE_PROJECT_SETTINGS, true)
            .with(VERCEL_FRAMEWORK, "nextjs")
            .with(VERCEL_TEAM_ID, "team_1");
        let project = resolve(raw, EnvSource::new(), "prod");
        assert_eq!(project.import_id(), Some("prj_existing"));
        assert!(!project.manage_settings());
        assert!(project.settings().is_none());
        assert_eq!(project.team_id(), Some("team_1"));
    }

    #[test]
    fn test_managed_settings_only_include_configured_fields() {
        let raw = RawConfig::new()
            .with_bool(MANAGE_PROJECT_SETTINGS, true)
            .with(VERCEL_FRAMEWORK, "nextjs")
            .with(VERCEL_NODE_VERSION, "20.x");
        let project = resolve(raw, EnvSource::new(), "preview");
        assert!(project.manage_settings());
        assert_eq!(
            project.settings(),
            Some(&ProjectSettings {
                framework: Some("nextjs".to_string()),
                node_version: Some("20.x".to_string()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_settings_ignored_without_manage_flag() {
        let raw = RawConfig::new()
            .with_bool(MANAGE_PROJECT_SETTINGS, false)
            .with(VERCEL_BUILD_COMMAND, "npm run build");
        let project = resolve(raw, EnvSource::new(), "preview");
        assert!(!project.manage_settings());
        assert!(project.settings().is_none());
    }

    #[test]
    fn test_team_id_from_environment() {
        let env = EnvSource::new().with("VERCEL_ORG_ID", "team_env");
        let project = resolve(RawConfig::new(), env, "preview");
        assert_eq!(project.team_id(), Some("team_env"));
    }
}
