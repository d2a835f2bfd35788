//! Unit tests for agent domain values and the agent registry service.

mod domain_tests;
mod service_tests;
