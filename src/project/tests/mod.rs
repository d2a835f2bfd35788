//! Unit tests for project domain values and the project catalog service.
