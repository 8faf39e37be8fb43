//! Plan assembly: the join point of the database, hosting and target branches.

use stackplan_config::options::*;
use stackplan_config::{Config, ConfigResult};
use stackplan_core::Stack;
use stackplan_core::hosting::{HOSTING_PROJECT, HostingProject};
use stackplan_core::plan::{Plan, PlanOutputs, Resource, ResourceDeclaration};
use stackplan_core::value::Value;
use stackplan_core::variable::{EnvironmentTargets, EnvironmentVariable};

use crate::database::DatabaseResolution;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DIRECT_URL: &str = "DIRECT_URL";
pub const NODE_ENV: &str = "NODE_ENV";

/// Per-variable import ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyOptions {
    pub database_url_import_id: Option<String>,
    pub direct_url_import_id: Option<String>,
    pub node_env_import_id: Option<String>,
}

impl AssemblyOptions {
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        Ok(Self {
            database_url_import_id: config.get(DATABASE_URL_IMPORT_ID)?,
            direct_url_import_id: config.get(DIRECT_URL_IMPORT_ID)?,
            node_env_import_id: config.get(NODE_ENV_IMPORT_ID)?,
        })
    }
}

/// Order the declarations: hosting project, database project, database
/// variables, then standard variables.
pub fn assemble(
    stack: &Stack,
    hosting: HostingProject,
    database: DatabaseResolution,
    targets: &EnvironmentTargets,
    options: &AssemblyOptions,
) -> Plan {
    let project_id = Value::reference(HostingProject::id_ref());
    let team_id = hosting.team_id().map(str::to_string);
    let connection = database.connection;

    let mut resources = vec![
        ResourceDeclaration::new(HOSTING_PROJECT, Resource::HostingProject(hosting)),
        ResourceDeclaration::new(
            database.resource,
            Resource::DatabaseProject(database.project),
        ),
    ];

    let database_url = EnvironmentVariable::sensitive(
        DATABASE_URL,
        connection.primary_url().clone(),
        &targets.sensitive,
    )
    .with_project(project_id.clone(), team_id.clone())
    .with_import_id(options.database_url_import_id.clone());
    resources.push(ResourceDeclaration::new(
        "database-url",
        Resource::EnvironmentVariable(database_url),
    ));

    if let Some(direct) = connection.direct_url() {
        let direct_url =
            EnvironmentVariable::sensitive(DIRECT_URL, direct.clone(), &targets.sensitive)
                .with_project(project_id.clone(), team_id.clone())
                .with_import_id(options.direct_url_import_id.clone());
        resources.push(
            ResourceDeclaration::new("direct-url", Resource::EnvironmentVariable(direct_url))
                .conditional("direct database endpoint resolved"),
        );
    }

    let node_env = EnvironmentVariable::standard(
        NODE_ENV,
        Value::literal(stack.runtime_mode()),
        &targets.standard,
    )
    .with_project(project_id.clone(), team_id)
    .with_import_id(options.node_env_import_id.clone());
    resources.push(ResourceDeclaration::new(
        "node-env",
        Resource::EnvironmentVariable(node_env),
    ));

    Plan {
        stack: stack.clone(),
        resources,
        outputs: PlanOutputs {
            db_provider_selected: connection.provider(),
            database_url: connection.primary_url().clone(),
            hosting_project_id: project_id,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{NEON_PROJECT, SUPABASE_PROJECT};
    use crate::targets::targets_for;
    use stackplan_core::database::{DatabaseConnection, DatabaseProject, DatabaseProvider};
    use stackplan_core::plan::Operation;
    use stackplan_core::variable::Target;
    use stackplan_core::{ResourceName, SecretString};
    use std::collections::BTreeSet;

    fn neon_resolution() -> DatabaseResolution {
        let resource = ResourceName::new(NEON_PROJECT);
        DatabaseResolution {
            project: DatabaseProject::Neon {
                org_id: "org2".to_string(),
                name: "demo-preview".to_string(),
                region_id: None,
            },
            connection: DatabaseConnection::new(
                DatabaseProvider::Neon,
                Value::reference(resource.attr("connection_uri")),
                None,
            ),
            resource,
        }
    }

    fn supabase_resolution() -> DatabaseResolution {
        DatabaseResolution {
            resource: ResourceName::new(SUPABASE_PROJECT),
            project: DatabaseProject::Supabase {
                organization_id: "org1".to_string(),
                name: "demo-prod".to_string(),
                database_password: Value::secret(SecretString::new("pw")),
                region: "us-east-1".to_string(),
                instance_size: None,
            },
            connection: DatabaseConnection::new(
                DatabaseProvider::Supabase,
                Value::secret(SecretString::new("postgres://pooled")),
                Some(Value::secret(SecretString::new("postgres://direct"))),
            ),
        }
    }

    fn names(plan: &Plan) -> Vec<&str> {
        plan.resources.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_order_with_direct_url() {
        let stack = Stack::new("prod");
        let plan = assemble(
            &stack,
            HostingProject::created("demo-prod", None),
            supabase_resolution(),
            &targets_for(&stack),
            &AssemblyOptions::default(),
        );
        assert_eq!(
            names(&plan),
            vec!["project", "supabase-project", "database-url", "direct-url", "node-env"]
        );
        assert!(plan.validate().is_ok());

        let direct = plan.get("direct-url").unwrap();
        assert!(matches!(direct.operation, Operation::CreateIf { .. }));
        assert_eq!(plan.variable(DIRECT_URL).unwrap().value().expose(), "postgres://direct");
        assert_eq!(
            plan.variable(DATABASE_URL).unwrap().value().expose(),
            "postgres://pooled"
        );
    }

    #[test]
    fn test_no_direct_url_for_neon() {
        let stack = Stack::new("preview");
        let plan = assemble(
            &stack,
            HostingProject::created("demo-preview", None),
            neon_resolution(),
            &targets_for(&stack),
            &AssemblyOptions::default(),
        );
        assert_eq!(
            names(&plan),
            vec!["project", "neon-project", "database-url", "node-env"]
        );

        let decl = plan.get("database-url").unwrap();
        assert_eq!(
            decl.depends_on,
            vec![ResourceName::new("project"), ResourceName::new(NEON_PROJECT)]
        );
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_variable_shapes() {
        let stack = Stack::new("preview");
        let plan = assemble(
            &stack,
            HostingProject::created("demo-preview", Some("team_1".to_string())),
            neon_resolution(),
            &targets_for(&stack),
            &AssemblyOptions::default(),
        );

        let database_url = plan.variable(DATABASE_URL).unwrap();
        assert!(database_url.is_sensitive());
        assert_eq!(database_url.targets(), &BTreeSet::from([Target::Preview]));
        assert_eq!(database_url.team_id(), Some("team_1"));
        assert_eq!(
            database_url.project_id(),
            Some(&Value::reference(HostingProject::id_ref()))
        );

        let node_env = plan.variable(NODE_ENV).unwrap();
        assert!(!node_env.is_sensitive());
        assert_eq!(node_env.value().as_literal(), Some("development"));
        assert_eq!(
            node_env.targets(),
            &BTreeSet::from([Target::Preview, Target::Development])
        );
    }

    #[test]
    fn test_import_ids() {
        let stack = Stack::new("prod");
        let options = AssemblyOptions {
            database_url_import_id: Some("prj_1/env_db".to_string()),
            direct_url_import_id: Some("prj_1/env_direct".to_string()),
            node_env_import_id: None,
        };
        let plan = assemble(
            &stack,
            HostingProject::imported("demo-prod", "prj_1", None),
            supabase_resolution(),
            &targets_for(&stack),
            &options,
        );

        assert_eq!(
            plan.get("project").unwrap().operation,
            Operation::Import {
                id: "prj_1".to_string()
            }
        );
        assert_eq!(
            plan.get("database-url").unwrap().operation,
            Operation::Import {
                id: "prj_1/env_db".to_string()
            }
        );
        assert_eq!(
            plan.get("direct-url").unwrap().operation,
            Operation::Import {
                id: "prj_1/env_direct".to_string()
            }
        );
        assert_eq!(plan.get("node-env").unwrap().operation, Operation::Create);
        assert_eq!(
            plan.outputs.hosting_project_id,
            Value::reference(HostingProject::id_ref())
        );
    }

    #[test]
    fn test_outputs() {
        let stack = Stack::new("preview");
        let resolution = neon_resolution();
        let expected_url = resolution.connection.primary_url().clone();
        let plan = assemble(
            &stack,
            HostingProject::created("demo-preview", None),
            resolution,
            &targets_for(&stack),
            &AssemblyOptions::default(),
        );
        assert_eq!(plan.outputs.db_provider_selected, DatabaseProvider::Neon);
        assert_eq!(plan.outputs.database_url, expected_url);
        assert_eq!(
            plan.outputs.hosting_project_id,
            Value::reference(HostingProject::id_ref())
        );
    }
}
