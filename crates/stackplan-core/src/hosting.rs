//! Hosting project declarations.

use serde::Serialize;

use crate::id::{ResourceName, ResourceRef};

/// Logical name of the hosting project in every plan.
pub const HOSTING_PROJECT: &str = "project";

/// Build and runtime settings applied to a created project.
///
/// Absent fields are omitted so the platform keeps its own default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_directory: Option<String>,
}

/// The hosting project, either created here or imported from an existing id.
///
/// An imported project never carries managed settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostingProject {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    import_id: Option<String>,
    manage_settings: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    settings: Option<ProjectSettings>,
}

impl HostingProject {
    /// Bind to an existing project; only the name and team are declared.
    pub fn imported(
        name: impl Into<String>,
        import_id: impl Into<String>,
        team_id: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            team_id,
            import_id: Some(import_id.into()),
            manage_settings: false,
            settings: None,
        }
    }

    /// Create a project with platform defaults for everything but the name.
    pub fn created(name: impl Into<String>, team_id: Option<String>) -> Self {
        Self {
            name: name.into(),
            team_id,
            import_id: None,
            manage_settings: false,
            settings: None,
        }
    }

    /// Create a project whose configured settings are managed here.
    pub fn managed(
        name: impl Into<String>,
        team_id: Option<String>,
        settings: ProjectSettings,
    ) -> Self {
        Self {
            name: name.into(),
            team_id,
            import_id: None,
            manage_settings: true,
            settings: Some(settings),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn team_id(&self) -> Option<&str> {
        self.team_id.as_deref()
    }

    pub fn import_id(&self) -> Option<&str> {
        self.import_id.as_deref()
    }

    pub fn manage_settings(&self) -> bool {
        self.manage_settings
    }

    pub fn settings(&self) -> Option<&ProjectSettings> {
        self.settings.as_ref()
    }

    /// The id assigned by the platform once the plan is applied.
    pub fn id_ref() -> ResourceRef {
        ResourceName::new(HOSTING_PROJECT).attr("id")
    }
}
