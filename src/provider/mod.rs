//! Static catalog of LLM providers and the models they serve.
//!
//! Agents name a provider and a model when they are registered. The catalog
//! is read-only: it comes from the `[[providers]]` tables of the
//! configuration file, falling back to a built-in list when none are
//! configured.

mod catalog;
mod domain;

pub use catalog::{ProviderCatalog, ProviderError, ProviderResult};
pub use domain::{Provider, ProviderModel};

#[cfg(test)]
mod tests;
