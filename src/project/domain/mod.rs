//! Domain model for projects.

mod error;
mod project;
mod stats;
mod status;

pub use error::{ParseProjectStatusError, ProjectDomainError};
pub use project::{NewProject, PersistedProjectData, Project, ProjectId, ProjectPatch};
pub use stats::ProjectStats;
pub use status::ProjectStatus;
