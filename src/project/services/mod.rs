//! Application services for project management.

mod catalog;

pub use catalog::{
    CreateProjectRequest, ProjectCatalogError, ProjectCatalogResult, ProjectCatalogService,
};
