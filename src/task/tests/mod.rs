//! Unit tests for task domain values and task services.

mod service_tests;
