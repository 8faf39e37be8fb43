//! Recognized configuration options.

pub const APP_NAME: &str = "appName";
pub const DB_PROVIDER: &str = "dbProvider";

pub const VERCEL_PROJECT_ID: &str = "vercelProjectId";
pub const VERCEL_IMPORT_PROJECT_ID: &str = "vercelImportProjectId";
pub const VERCEL_TEAM_ID: &str = "vercelTeamId";
pub const VERCEL_PROJECT_NAME: &str = "vercelProjectName";
pub const VERCEL_FRAMEWORK: &str = "vercelFramework";
pub const VERCEL_BUILD_COMMAND: &str = "vercelBuildCommand";
pub const VERCEL_INSTALL_COMMAND: &str = "vercelInstallCommand";
pub const VERCEL_NODE_VERSION: &str = "vercelNodeVersion";
pub const VERCEL_ROOT_DIRECTORY: &str = "vercelRootDirectory";
pub const MANAGE_PROJECT_SETTINGS: &str = "manageProjectSettings";

pub const SUPABASE_ORGANIZATION_ID: &str = "supabaseOrganizationId";
pub const SUPABASE_DB_PASSWORD: &str = "supabaseDbPassword";
pub const SUPABASE_REGION: &str = "supabaseRegion";
pub const SUPABASE_INSTANCE_SIZE: &str = "supabaseInstanceSize";
pub const SUPABASE_DIRECT_URL: &str = "supabaseDirectUrl";
pub const SUPABASE_POOLED_URL: &str = "supabasePooledUrl";

pub const NEON_ORG_ID: &str = "neonOrgId";
pub const NEON_PROJECT_NAME: &str = "neonProjectName";
pub const NEON_REGION_ID: &str = "neonRegionId";

pub const DATABASE_URL_IMPORT_ID: &str = "databaseUrlImportId";
pub const DIRECT_URL_IMPORT_ID: &str = "directUrlImportId";
pub const NODE_ENV_IMPORT_ID: &str = "nodeEnvImportId";

/// How an option's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Bool,
    /// Always wrapped as a secret, whatever the source says.
    Secret,
}

/// Lookup rules for one option.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub key: &'static str,
    pub kind: OptionKind,
    /// Process environment variable consulted when no config value is set.
    pub env_fallback: Option<&'static str>,
    pub default: Option<&'static str>,
}

const fn string(key: &'static str) -> OptionSpec {
    OptionSpec {
        key,
        kind: OptionKind::String,
        env_fallback: None,
        default: None,
    }
}

const fn secret(key: &'static str) -> OptionSpec {
    OptionSpec {
        kind: OptionKind::Secret,
        ..string(key)
    }
}

const fn with_default(key: &'static str, default: &'static str) -> OptionSpec {
    OptionSpec {
        default: Some(default),
        ..string(key)
    }
}

const fn with_env(key: &'static str, var: &'static str) -> OptionSpec {
    OptionSpec {
        env_fallback: Some(var),
        ..string(key)
    }
}

pub static OPTIONS: &[OptionSpec] = &[
    with_default(APP_NAME, "happy-testing"),
    with_default(DB_PROVIDER, "supabase"),
    with_env(VERCEL_PROJECT_ID, "VERCEL_PROJECT_ID"),
    string(VERCEL_IMPORT_PROJECT_ID),
    with_env(VERCEL_TEAM_ID, "VERCEL_ORG_ID"),
    string(VERCEL_PROJECT_NAME),
    string(VERCEL_FRAMEWORK),
    string(VERCEL_BUILD_COMMAND),
    string(VERCEL_INSTALL_COMMAND),
    string(VERCEL_NODE_VERSION),
    string(VERCEL_ROOT_DIRECTORY),
    OptionSpec {
        kind: OptionKind::Bool,
        ..string(MANAGE_PROJECT_SETTINGS)
    },
    string(SUPABASE_ORGANIZATION_ID),
    secret(SUPABASE_DB_PASSWORD),
    with_default(SUPABASE_REGION, "us-east-1"),
    string(SUPABASE_INSTANCE_SIZE),
    secret(SUPABASE_DIRECT_URL),
    secret(SUPABASE_POOLED_URL),
    string(NEON_ORG_ID),
    string(NEON_PROJECT_NAME),
    string(NEON_REGION_ID),
    string(DATABASE_URL_IMPORT_ID),
    string(DIRECT_URL_IMPORT_ID),
    string(NODE_ENV_IMPORT_ID),
];

pub fn lookup(key: &str) -> Option<&'static OptionSpec> {
    OPTIONS.iter().find(|spec| spec.key == key)
}

/// Environment variables the resolver is allowed to read.
pub fn env_allow_list() -> impl Iterator<Item = &'static str> {
    OPTIONS.iter().filter_map(|spec| spec.env_fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        for (i, spec) in OPTIONS.iter().enumerate() {
            assert!(
                OPTIONS[i + 1..].iter().all(|other| other.key != spec.key),
                "duplicate option {}",
                spec.key
            );
        }
    }

    #[test]
    fn test_env_allow_list() {
        let vars: Vec<_> = env_allow_list().collect();
        assert_eq!(vars, vec!["VERCEL_PROJECT_ID", "VERCEL_ORG_ID"]);
    }

    #[test]
    fn test_secret_options() {
        assert_eq!(lookup(SUPABASE_DB_PASSWORD).unwrap().kind, OptionKind::Secret);
        assert_eq!(lookup(MANAGE_PROJECT_SETTINGS).unwrap().kind, OptionKind::Bool);
        assert!(lookup("nope").is_none());
    }
}
