//! Unit tests for the provider catalog.
