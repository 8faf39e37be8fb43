//! Database backend declarations.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// The database provider backing the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseProvider {
    /// Managed Postgres-as-a-service addressed by organization id.
    Supabase,
    /// Serverless Postgres addressed by organization id and region.
    Neon,
}

impl DatabaseProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseProvider::Supabase => "supabase",
            DatabaseProvider::Neon => "neon",
        }
    }
}

impl std::fmt::Display for DatabaseProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized provider tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown database provider: {0}")]
pub struct UnknownProvider(pub String);

impl std::str::FromStr for DatabaseProvider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supabase" => Ok(DatabaseProvider::Supabase),
            "neon" => Ok(DatabaseProvider::Neon),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}

/// Uniform connection descriptor produced by either provider.
///
/// The primary URL carries application traffic; the direct URL, when present,
/// bypasses any pooler and is used for migrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConnection {
    provider: DatabaseProvider,
    primary_url: Value,
    direct_url: Option<Value>,
}

impl DatabaseConnection {
    /// Both URLs are forced secret.
    pub fn new(provider: DatabaseProvider, primary_url: Value, direct_url: Option<Value>) -> Self {
        Self {
            provider,
            primary_url: primary_url.into_secret(),
            direct_url: direct_url.map(Value::into_secret),
        }
    }

    pub fn provider(&self) -> DatabaseProvider {
        self.provider
    }

    pub fn primary_url(&self) -> &Value {
        &self.primary_url
    }

    pub fn direct_url(&self) -> Option<&Value> {
        self.direct_url.as_ref()
    }
}

/// The provider-side database project declared alongside the connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "provider", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum DatabaseProject {
    Supabase {
        organization_id: String,
        name: String,
        database_password: Value,
        region: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        instance_size: Option<String>,
    },
    Neon {
        org_id: String,
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        region_id: Option<String>,
    },
}

impl DatabaseProject {
    pub fn provider(&self) -> DatabaseProvider {
        match self {
            DatabaseProject::Supabase { .. } => DatabaseProvider::Supabase,
            DatabaseProject::Neon { .. } => DatabaseProvider::Neon,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DatabaseProject::Supabase { name, .. } | DatabaseProject::Neon { name, .. } => name,
        }
    }
}
