//! Workspace data types as returned by the public API.
//!
//! Field names follow the API's JSON mapping (camelCase). Fields the CLI does
//! not model are kept in `extra` so `--json` output stays faithful to what the
//! server sent.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prefix of every phase name on the wire.
const PHASE_PREFIX: &str = "PHASE_";

/// A workspace owned by the authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Unique workspace identifier.
    pub workspace_id: String,

    /// Owning user.
    #[serde(default)]
    pub owner_id: String,

    /// What the workspace was started from.
    #[serde(default)]
    pub context: WorkspaceContext,

    /// Runtime status.
    #[serde(default)]
    pub status: WorkspaceStatus,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceContext {
    /// The URL the workspace was opened from.
    #[serde(default)]
    pub context_url: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceStatus {
    /// Latest instance; absent for workspaces that never started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<WorkspaceInstance>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceInstance {
    #[serde(default)]
    pub instance_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: InstanceStatus,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceStatus {
    #[serde(default)]
    pub phase: WorkspacePhase,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Workspace {
    /// Phase of the latest instance, `Unspecified` if there is none.
    pub fn phase(&self) -> WorkspacePhase {
        self.status
            .instance
            .as_ref()
            .map(|instance| instance.status.phase.clone())
            .unwrap_or_default()
    }

    /// Creation time of the latest instance.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.status
            .instance
            .as_ref()
            .and_then(|instance| instance.created_at)
    }

    pub fn context_url(&self) -> &str {
        &self.context.context_url
    }
}

/// Lifecycle phase of a workspace instance.
///
/// Serialized as the wire name (`PHASE_RUNNING`); displayed as the
/// lower-case name without the prefix (`running`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkspacePhase {
    #[default]
    Unspecified,
    Preparing,
    ImageBuild,
    Pending,
    Creating,
    Initializing,
    Running,
    Interrupted,
    Stopping,
    Stopped,
    /// A phase this client does not know yet, kept verbatim.
    Other(String),
}

impl WorkspacePhase {
    /// Parses a wire name such as `PHASE_RUNNING`.
    pub fn from_wire(name: &str) -> Self {
        match name {
            "PHASE_UNSPECIFIED" | "" => Self::Unspecified,
            "PHASE_PREPARING" => Self::Preparing,
            "PHASE_IMAGEBUILD" => Self::ImageBuild,
            "PHASE_PENDING" => Self::Pending,
            "PHASE_CREATING" => Self::Creating,
            "PHASE_INITIALIZING" => Self::Initializing,
            "PHASE_RUNNING" => Self::Running,
            "PHASE_INTERRUPTED" => Self::Interrupted,
            "PHASE_STOPPING" => Self::Stopping,
            "PHASE_STOPPED" => Self::Stopped,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire name, e.g. `PHASE_RUNNING`.
    pub fn wire_name(&self) -> String {
        match self {
            Self::Other(raw) => raw.clone(),
            known => format!("{PHASE_PREFIX}{}", known.display_name().to_uppercase()),
        }
    }

    /// Human-readable name, e.g. `running`.
    pub fn display_name(&self) -> String {
        let name = match self {
            Self::Unspecified => "unspecified",
            Self::Preparing => "preparing",
            Self::ImageBuild => "imagebuild",
            Self::Pending => "pending",
            Self::Creating => "creating",
            Self::Initializing => "initializing",
            Self::Running => "running",
            Self::Interrupted => "interrupted",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Other(raw) => {
                return raw
                    .strip_prefix(PHASE_PREFIX)
                    .unwrap_or(raw)
                    .to_lowercase();
            },
        };
        name.to_string()
    }
}

impl fmt::Display for WorkspacePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

impl From<String> for WorkspacePhase {
    fn from(name: String) -> Self {
        Self::from_wire(&name)
    }
}

impl From<WorkspacePhase> for String {
    fn from(phase: WorkspacePhase) -> Self {
        phase.wire_name()
    }
}
